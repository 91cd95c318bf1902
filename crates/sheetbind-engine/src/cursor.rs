//! Merge-aware sequential addressing
//!
//! A [`Cursor`] advances a position by one logical step along one axis,
//! expanding the step to skip past a merged span when the current cell is
//! the anchor of one. It serves both standalone fixed-size sequences
//! (array fields anchored at one cell) and the record scan.

use crate::cells::effective_value;
use crate::error::{BindError, BindPath, Result};
use crate::orientation::StepDirection;
use crate::schema::{OverOperation, TableAnchor};
use crate::search;
use sheetbind_core::{CellRange, CellValue, Grid, Position};

/// A stepping rule along one axis
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    direction: StepDirection,
    element_merged: bool,
}

impl Cursor {
    /// Create a cursor
    pub fn new(direction: StepDirection, element_merged: bool) -> Self {
        Self {
            direction,
            element_merged,
        }
    }

    /// The span the current element occupies along the stepping axis
    pub fn span_at<G: Grid + ?Sized>(&self, grid: &G, pos: Position) -> u32 {
        if !self.element_merged {
            return 1;
        }
        match grid.merged_region_at(pos) {
            Some(region) if region.start == pos => match self.direction {
                StepDirection::Down => region.row_count(),
                StepDirection::Right => region.col_count() as u32,
            },
            _ => 1,
        }
    }

    /// Advance one logical step
    ///
    /// The returned position's stepping coordinate is strictly greater
    /// than the input's; this is what guarantees every scan terminates.
    pub fn advance<G: Grid + ?Sized>(&self, grid: &G, pos: Position) -> Position {
        let span = self.span_at(grid, pos).max(1);
        match self.direction {
            StepDirection::Down => Position::new(pos.row.saturating_add(span), pos.col),
            StepDirection::Right => Position::new(
                pos.row,
                pos.col.saturating_add(span.min(u16::MAX as u32) as u16),
            ),
        }
    }
}

/// A standalone fixed-size cell sequence bound to a list field
#[derive(Debug, Clone)]
pub struct ArraySchema {
    /// Name used in error paths and logs
    pub name: String,
    pub anchor: TableAnchor,
    pub direction: StepDirection,
    /// Number of elements
    pub size: u32,
    /// Step past merged spans instead of single cells
    pub element_merged: bool,
    /// Write policy for the size/data mismatch
    pub over: OverOperation,
    /// Missing anchor label degrades to "no array"
    pub optional: bool,
}

impl ArraySchema {
    /// Create an array schema anchored at a cell
    pub fn at(name: impl Into<String>, origin: Position, direction: StepDirection, size: u32) -> Self {
        Self {
            name: name.into(),
            anchor: TableAnchor::Cell(origin),
            direction,
            size,
            element_merged: false,
            over: OverOperation::Break,
            optional: false,
        }
    }

    /// Create an array schema anchored after a label
    pub fn labelled(
        name: impl Into<String>,
        label: impl Into<crate::pattern::LabelPattern>,
        direction: StepDirection,
        size: u32,
    ) -> Self {
        Self {
            name: name.into(),
            anchor: TableAnchor::Label(label.into()),
            direction,
            size,
            element_merged: false,
            over: OverOperation::Break,
            optional: false,
        }
    }

    /// Treat merged element cells as single elements
    pub fn element_merged(mut self) -> Self {
        self.element_merged = true;
        self
    }

    /// Set the write policy
    pub fn with_over(mut self, over: OverOperation) -> Self {
        self.over = over;
        self
    }

    /// Mark the array optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn resolve(&self) -> Result<()> {
        let path = BindPath::table(&self.name);
        if self.size == 0 {
            return Err(BindError::config("array size must be >= 1", &path));
        }
        if self.over == OverOperation::Insert {
            return Err(BindError::config(
                "Insert is not valid for fixed-size arrays",
                &path,
            ));
        }
        Ok(())
    }

    fn origin<G: Grid + ?Sized>(&self, grid: &G, path: &BindPath) -> Result<Option<Position>> {
        match &self.anchor {
            TableAnchor::Cell(pos) => Ok(Some(*pos)),
            TableAnchor::Label(pattern) => {
                let label_pos = if self.optional {
                    match search::find(grid, pattern, None) {
                        Some(pos) => pos,
                        None => return Ok(None),
                    }
                } else {
                    search::find_required(grid, pattern, None, path)?
                };
                // Values start one step past the label cell.
                Ok(Some(match self.direction {
                    StepDirection::Down => Position::new(label_pos.row + 1, label_pos.col),
                    StepDirection::Right => Position::new(label_pos.row, label_pos.col + 1),
                }))
            }
        }
    }
}

/// Load a fixed-size sequence of cells
pub fn load_array<G: Grid + ?Sized>(
    grid: &G,
    schema: &ArraySchema,
) -> Result<Option<Vec<CellValue>>> {
    schema.resolve()?;
    let path = BindPath::table(&schema.name);
    let origin = match schema.origin(grid, &path)? {
        Some(pos) => pos,
        None => return Ok(None),
    };

    let cursor = Cursor::new(schema.direction, schema.element_merged);
    let mut values = Vec::with_capacity(schema.size as usize);
    let mut pos = origin;
    for _ in 0..schema.size {
        values.push(effective_value(grid, pos));
        pos = cursor.advance(grid, pos);
    }
    Ok(Some(values))
}

/// Save a sequence of values into a fixed-size run of cells
///
/// Returns the written range. Data longer than `size` is handled by the
/// over policy (`Break` drops the excess, `Error` refuses before any
/// mutation); for data shorter than `size`, `Copy` blanks the remaining
/// cells with the preceding cell's style while `Break` leaves them alone.
pub fn save_array<G: Grid + ?Sized>(
    grid: &mut G,
    schema: &ArraySchema,
    values: &[CellValue],
) -> Result<Option<CellRange>> {
    schema.resolve()?;
    let path = BindPath::table(&schema.name);

    if schema.over == OverOperation::Error && values.len() as u32 > schema.size {
        return Err(BindError::config(
            format!(
                "{} values exceed the array size of {}",
                values.len(),
                schema.size
            ),
            &path,
        ));
    }

    let origin = match schema.origin(grid, &path)? {
        Some(pos) => pos,
        None => return Ok(None),
    };

    let cursor = Cursor::new(schema.direction, schema.element_merged);
    let mut pos = origin;
    let mut last = origin;
    let mut prev: Option<Position> = None;
    for index in 0..schema.size as usize {
        match values.get(index) {
            Some(value) => {
                grid.set_value(pos, value.clone())?;
            }
            None => match schema.over {
                OverOperation::Break => break,
                OverOperation::Copy => {
                    if let Some(prev) = prev {
                        grid.copy_style(prev, pos)?;
                    }
                    grid.set_blank(pos);
                }
                // Insert is rejected by resolve; Error only caps growth.
                OverOperation::Insert | OverOperation::Error => break,
            },
        }
        last = pos;
        prev = Some(pos);
        pos = cursor.advance(grid, pos);
    }

    Ok(Some(CellRange::new(origin, last)))
}
