//! Table configuration
//!
//! A [`TableSchema`] describes one table on a sheet: where it anchors, how
//! it is oriented, how its boundary is detected, and how its record cells
//! bind to fields. All operation policies are plain enums with explicit
//! defaults, resolved once at table-scan start.

use crate::error::{BindError, BindPath, Result};
use crate::orientation::Orientation;
use crate::pattern::LabelPattern;
use sheetbind_core::Position;

/// How the table's origin is located
#[derive(Debug, Clone)]
pub enum TableAnchor {
    /// The origin cell, given directly (also covers explicit row/column)
    Cell(Position),
    /// A label cell to search for; the origin is one record-axis step
    /// past the label (the header row below it for horizontal tables)
    Label(LabelPattern),
}

/// When is a record-axis position past the last record
#[derive(Debug, Clone, Default)]
pub enum TerminalRule {
    /// The terminal-check cell is blank (read default; forced to
    /// `Border` during save, since templates pre-seed empty cells)
    #[default]
    Empty,
    /// The terminal-check cell has no border on the edge facing the
    /// primary-axis start
    Border,
    /// The terminal-check cell's text matches the pattern
    Label(LabelPattern),
}

/// Policy when bound data has more records than the template has room for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverOperation {
    /// Stop writing; remaining records are dropped without error
    #[default]
    Break,
    /// Grow by copying the preceding unit's style and blanking it
    Copy,
    /// Insert fresh record-axis units (rows only)
    Insert,
    /// Refuse before any mutation
    Error,
}

/// Policy when the template has more record-axis units than bound data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainedOperation {
    /// Leave the template units as they are
    #[default]
    None,
    /// Blank the bound cells of the leftover units
    Clear,
    /// Delete the leftover units (rows only)
    Delete,
}

/// One header-bound column of a record
#[derive(Debug, Clone)]
pub struct ColumnBinding {
    /// Field name passed to the binder
    pub field: String,
    /// Header label this column binds to
    pub label: LabelPattern,
    /// Read a blank cell as continuing the previous record's value
    /// (merge continuation)
    pub merged: bool,
    /// Re-merge adjacent identical values along the record axis on save
    pub merge_on_save: bool,
    /// The header may be absent; the column is skipped instead of failing
    pub optional: bool,
}

impl ColumnBinding {
    /// Create a column binding for a field and header label
    pub fn new(field: impl Into<String>, label: impl Into<LabelPattern>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            merged: false,
            merge_on_save: false,
            optional: false,
        }
    }

    /// Enable merge-continuation reads and save-side re-merging
    pub fn merged(mut self) -> Self {
        self.merged = true;
        self.merge_on_save = true;
        self
    }

    /// Mark the header as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A contiguous run of headers captured into an ordered key→value map
///
/// The run starts after the header matching `previous_label` and ends
/// before the header matching `next_label` (or at the last header).
#[derive(Debug, Clone)]
pub struct MapColumns {
    pub field: String,
    pub previous_label: LabelPattern,
    pub next_label: Option<LabelPattern>,
}

impl MapColumns {
    /// Create a map-columns capture between two sentinel labels
    pub fn new(
        field: impl Into<String>,
        previous_label: impl Into<LabelPattern>,
        next_label: Option<LabelPattern>,
    ) -> Self {
        Self {
            field: field.into(),
            previous_label: previous_label.into(),
            next_label,
        }
    }
}

/// A fixed-size run of cells under one header, bound to a list field
///
/// Elements are laid out along the primary axis starting at the matching
/// header; a merged element cell counts as one element spanning its
/// region.
#[derive(Debug, Clone)]
pub struct ArrayColumns {
    pub field: String,
    pub label: LabelPattern,
    /// Number of elements
    pub size: u32,
    /// Step the cursor past merged spans instead of single cells
    pub element_merged: bool,
    /// Policy when bound data is shorter than `size` on save
    pub over: OverOperation,
}

impl ArrayColumns {
    /// Create an array-columns binding
    pub fn new(field: impl Into<String>, label: impl Into<LabelPattern>, size: u32) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            size,
            element_merged: false,
            over: OverOperation::Break,
        }
    }

    /// Treat merged element cells as single elements
    pub fn element_merged(mut self) -> Self {
        self.element_merged = true;
        self
    }

    /// Set the save-side over policy
    pub fn with_over(mut self, over: OverOperation) -> Self {
        self.over = over;
        self
    }
}

/// A nested sub-table bound to a field holding child records
///
/// Nested records share the parent table's headers; they occupy the
/// record-axis units reserved by the parent record's merged span.
#[derive(Debug, Clone)]
pub struct NestedRecords {
    pub field: String,
    pub record: RecordSchema,
}

impl NestedRecords {
    /// Create a nested-records binding
    pub fn new(field: impl Into<String>, record: RecordSchema) -> Self {
        Self {
            field: field.into(),
            record,
        }
    }
}

/// How one record's cells bind to fields
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    pub columns: Vec<ColumnBinding>,
    pub maps: Vec<MapColumns>,
    pub arrays: Vec<ArrayColumns>,
    pub nested: Vec<NestedRecords>,
}

impl RecordSchema {
    /// Create an empty record schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column binding
    pub fn with_column(mut self, column: ColumnBinding) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a map-columns capture
    pub fn with_map(mut self, map: MapColumns) -> Self {
        self.maps.push(map);
        self
    }

    /// Add an array-columns binding
    pub fn with_array(mut self, array: ArrayColumns) -> Self {
        self.arrays.push(array);
        self
    }

    /// Add a nested-records binding
    pub fn with_nested(mut self, nested: NestedRecords) -> Self {
        self.nested.push(nested);
        self
    }
}

/// Configuration of one table
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name, used in error paths and logs
    pub name: String,
    pub orientation: Orientation,
    pub anchor: TableAnchor,
    /// Missing anchor label degrades to "no table" instead of an error
    pub optional: bool,
    /// Blank-probe tolerance during header discovery (>= 1)
    pub range: u32,
    /// Maximum number of headers (0 = unlimited)
    pub header_limit: u32,
    /// Extra record-axis offset between header and first record
    pub record_offset: u32,
    pub terminal: TerminalRule,
    pub over: OverOperation,
    pub remained: RemainedOperation,
    pub record: RecordSchema,
}

impl TableSchema {
    /// Create a table schema with defaults
    pub fn new(name: impl Into<String>, orientation: Orientation, anchor: TableAnchor) -> Self {
        Self {
            name: name.into(),
            orientation,
            anchor,
            optional: false,
            range: 1,
            header_limit: 0,
            record_offset: 0,
            terminal: TerminalRule::default(),
            over: OverOperation::default(),
            remained: RemainedOperation::default(),
            record: RecordSchema::new(),
        }
    }

    /// Horizontal table anchored at a label
    pub fn horizontal(name: impl Into<String>, label: impl Into<LabelPattern>) -> Self {
        Self::new(
            name,
            Orientation::Horizontal,
            TableAnchor::Label(label.into()),
        )
    }

    /// Vertical table anchored at a label
    pub fn vertical(name: impl Into<String>, label: impl Into<LabelPattern>) -> Self {
        Self::new(name, Orientation::Vertical, TableAnchor::Label(label.into()))
    }

    /// Table anchored at an explicit origin cell
    pub fn at(name: impl Into<String>, orientation: Orientation, origin: Position) -> Self {
        Self::new(name, orientation, TableAnchor::Cell(origin))
    }

    /// Mark the table optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the blank-probe tolerance (>= 1)
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    /// Cap the number of headers
    pub fn with_header_limit(mut self, limit: u32) -> Self {
        self.header_limit = limit;
        self
    }

    /// Offset the first record along the record axis
    pub fn with_record_offset(mut self, offset: u32) -> Self {
        self.record_offset = offset;
        self
    }

    /// Set the terminal rule
    pub fn with_terminal(mut self, terminal: TerminalRule) -> Self {
        self.terminal = terminal;
        self
    }

    /// Set the over-capacity policy
    pub fn with_over(mut self, over: OverOperation) -> Self {
        self.over = over;
        self
    }

    /// Set the leftover-template policy
    pub fn with_remained(mut self, remained: RemainedOperation) -> Self {
        self.remained = remained;
        self
    }

    /// Set the record schema
    pub fn with_record(mut self, record: RecordSchema) -> Self {
        self.record = record;
        self
    }

    /// Add a column binding to the record schema
    pub fn with_column(mut self, column: ColumnBinding) -> Self {
        self.record.columns.push(column);
        self
    }

    /// Validate the configuration; called once at scan start
    pub fn resolve(&self) -> Result<()> {
        let path = BindPath::table(&self.name);

        if self.range == 0 {
            return Err(BindError::config("range must be >= 1", &path));
        }
        if !self.orientation.supports_record_mutation() {
            if self.over == OverOperation::Insert {
                return Err(BindError::UnsupportedMutation {
                    message: "Insert is not supported along the column axis".into(),
                    path,
                });
            }
            if self.remained == RemainedOperation::Delete {
                return Err(BindError::UnsupportedMutation {
                    message: "Delete is not supported along the column axis".into(),
                    path,
                });
            }
        }
        resolve_record(&self.record, &path)
    }
}

fn resolve_record(record: &RecordSchema, path: &BindPath) -> Result<()> {
    for array in &record.arrays {
        let field_path = path.child(array.field.clone());
        if array.size == 0 {
            return Err(BindError::config("array size must be >= 1", &field_path));
        }
        if array.over == OverOperation::Insert {
            return Err(BindError::config(
                "Insert is not valid for fixed-size arrays",
                &field_path,
            ));
        }
    }
    for nested in &record.nested {
        resolve_record(&nested.record, &path.child(nested.field.clone()))?;
    }
    Ok(())
}
