//! Record scanning
//!
//! The state machine at the heart of the engine: iterates record-axis
//! positions after the header, binds per-header cells through the
//! converter and binder, detects the table's terminal boundary, and
//! recurses into nested sub-tables bounded by merge spans. The save path
//! mirrors the load path and grows or shrinks the table in place.

use crate::binder::{RecordBinder, ValueConverter};
use crate::cells::{effective_blank, effective_value};
use crate::cursor::Cursor;
use crate::error::{BindError, BindPath, CellBindError, Result};
use crate::layout::{self, RecordHeader, TableLayout};
use crate::mutator::{self, RecordOperation};
use crate::orientation::Orientation;
use crate::schema::{
    NestedRecords, OverOperation, RecordSchema, RemainedOperation, TableSchema, TerminalRule,
};
use sheetbind_core::{CellRange, CellValue, Grid, Position};

/// Scan behavior knobs
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// Collect conversion failures and substitute blanks instead of
    /// aborting on the first one
    pub continue_on_error: bool,
    /// Discard records the binder judges ignorable
    pub skip_ignorable: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            continue_on_error: false,
            skip_ignorable: true,
        }
    }
}

impl ProcessOptions {
    /// Collect conversion failures instead of aborting
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }

    /// Keep records the binder would discard as ignorable
    pub fn keep_ignorable(mut self) -> Self {
        self.skip_ignorable = false;
        self
    }
}

/// Result of one load call
#[derive(Debug)]
pub struct LoadReport<R> {
    /// Discovered headers, in primary-axis order
    pub headers: Vec<RecordHeader>,
    /// Bound records, in record-axis order
    pub records: Vec<R>,
    /// Collected per-cell conversion failures
    pub errors: Vec<CellBindError>,
}

/// Result of one save call
#[derive(Debug)]
pub struct SaveReport {
    /// Smallest rectangle covering every written cell
    pub rect: Option<CellRange>,
    /// Record-axis units inserted
    pub inserted: u32,
    /// Record-axis units deleted
    pub deleted: u32,
    /// Record-axis units grown by style copy
    pub copied: u32,
    /// Collected per-cell conversion failures
    pub errors: Vec<CellBindError>,
}

/// A column binding matched to a concrete header
struct BoundColumn<'s> {
    binding: &'s crate::schema::ColumnBinding,
    header: usize,
}

/// A map-columns capture resolved to a header index range [from, to)
struct BoundMap<'s> {
    map: &'s crate::schema::MapColumns,
    from: usize,
    to: usize,
}

/// An array-columns binding matched to its first header
struct BoundArray<'s> {
    array: &'s crate::schema::ArrayColumns,
    header: usize,
}

/// A record schema resolved against a discovered layout
struct Resolved<'s> {
    columns: Vec<BoundColumn<'s>>,
    maps: Vec<BoundMap<'s>>,
    arrays: Vec<BoundArray<'s>>,
    nested: Vec<(&'s NestedRecords, Resolved<'s>)>,
    /// Header index used for terminal judgment: the first header with any
    /// bound property, else header 0
    terminal_header: usize,
}

fn resolve<'s>(
    record: &'s RecordSchema,
    layout: &TableLayout,
    path: &BindPath,
) -> Result<Resolved<'s>> {
    let mut claimed = vec![false; layout.headers.len()];
    let mut columns = Vec::new();
    for binding in &record.columns {
        let found = layout
            .headers
            .iter()
            .enumerate()
            .find(|(i, h)| !claimed[*i] && binding.label.matches(&h.label));
        match found {
            Some((i, _)) => {
                claimed[i] = true;
                columns.push(BoundColumn { binding, header: i });
            }
            None if binding.optional => {}
            None => {
                return Err(BindError::CellNotFound {
                    pattern: binding.label.describe(),
                    path: path.child(binding.field.clone()),
                })
            }
        }
    }

    let mut maps = Vec::new();
    for map in &record.maps {
        let field_path = path.child(map.field.clone());
        let from = layout
            .headers
            .iter()
            .position(|h| map.previous_label.matches(&h.label))
            .ok_or_else(|| BindError::CellNotFound {
                pattern: map.previous_label.describe(),
                path: field_path.clone(),
            })?
            + 1;
        let to = match &map.next_label {
            Some(next) => layout
                .headers
                .iter()
                .position(|h| next.matches(&h.label))
                .ok_or_else(|| BindError::CellNotFound {
                    pattern: next.describe(),
                    path: field_path.clone(),
                })?,
            None => layout.headers.len(),
        };
        if to < from {
            return Err(BindError::config(
                "map sentinel labels are out of order",
                &field_path,
            ));
        }
        maps.push(BoundMap { map, from, to });
    }

    let mut arrays = Vec::new();
    for array in &record.arrays {
        let header = layout
            .headers
            .iter()
            .position(|h| array.label.matches(&h.label))
            .ok_or_else(|| BindError::CellNotFound {
                pattern: array.label.describe(),
                path: path.child(array.field.clone()),
            })?;
        arrays.push(BoundArray { array, header });
    }

    let mut nested = Vec::new();
    for binding in &record.nested {
        let child = resolve(&binding.record, layout, &path.child(binding.field.clone()))?;
        nested.push((binding, child));
    }

    let terminal_header = columns
        .iter()
        .map(|c| c.header)
        .chain(arrays.iter().map(|a| a.header))
        .chain(maps.iter().map(|m| m.from))
        .min()
        .unwrap_or(0);

    Ok(Resolved {
        columns,
        maps,
        arrays,
        nested,
        terminal_header,
    })
}

/// The terminal rule actually applied during save
///
/// Templates pre-seed empty value cells, so emptiness cannot signal "end
/// of data" while writing; `Empty` is forced to `Border`.
fn write_rule(rule: &TerminalRule) -> TerminalRule {
    match rule {
        TerminalRule::Empty => TerminalRule::Border,
        other => other.clone(),
    }
}

/// Whether the record-axis position holding `pos` is past the last record
fn judge_terminal<G: Grid + ?Sized>(
    grid: &G,
    orientation: Orientation,
    rule: &TerminalRule,
    pos: Position,
) -> bool {
    match rule {
        TerminalRule::Empty => effective_blank(grid, pos),
        TerminalRule::Border => !grid
            .border_at(pos, orientation.terminal_border())
            .is_present(),
        TerminalRule::Label(pattern) => pattern.matches(&grid.text_at(pos)),
    }
}

/// Largest record-axis merge span anchored at `rpos` among bound columns
fn template_span<G: Grid + ?Sized>(
    grid: &G,
    orientation: Orientation,
    layout: &TableLayout,
    resolved: &Resolved<'_>,
    rpos: u32,
) -> u32 {
    let mut span = 1;
    for column in &resolved.columns {
        let header = &layout.headers[column.header];
        let pos = orientation.with_record(header.position, rpos);
        if let Some(region) = grid.merged_region_at(pos) {
            if orientation.record_of(region.start) == rpos {
                span = span.max(orientation.record_span(&region));
            }
        }
    }
    span
}

/// Walk backward along the record axis to the cell holding the real value
///
/// A blank cell whose edge facing the previous record carries no border
/// continues that record's value; this lets one merged (or visually
/// continued) value serve multiple stacked records.
fn continuation_value<G: Grid + ?Sized>(
    grid: &G,
    orientation: Orientation,
    pos: Position,
    first_record: u32,
) -> CellValue {
    let mut current = pos;
    loop {
        if grid
            .border_at(current, orientation.continuation_border())
            .is_present()
        {
            return CellValue::Empty;
        }
        let prev = match orientation.step_record_back(current, 1) {
            Some(prev) if orientation.record_of(prev) >= first_record => prev,
            _ => return CellValue::Empty,
        };
        let value = effective_value(grid, prev);
        if !value.is_empty() {
            return value;
        }
        current = prev;
    }
}

struct ScanOutcome<R> {
    record: R,
    /// Record-axis units this record occupies (max merge span, min 1)
    skip: u32,
    /// The position was judged past the end; the record is discarded
    terminal: bool,
}

struct LoadCtx<'a, G: Grid + ?Sized, B: RecordBinder, C: ValueConverter> {
    grid: &'a G,
    orientation: Orientation,
    layout: &'a TableLayout,
    terminal: &'a TerminalRule,
    binder: &'a B,
    converter: &'a C,
    options: ProcessOptions,
    errors: Vec<CellBindError>,
}

impl<'a, G: Grid + ?Sized, B: RecordBinder, C: ValueConverter> LoadCtx<'a, G, B, C> {
    /// Convert a cell for binding, collecting or propagating failures
    fn convert_read(
        &mut self,
        field: &str,
        label: &str,
        pos: Position,
        value: CellValue,
        path: &BindPath,
    ) -> Result<CellValue> {
        let text = value.render();
        match self.converter.read(field, &value, &text) {
            Ok(converted) => Ok(converted),
            Err(err) if self.options.continue_on_error => {
                self.errors.push(CellBindError {
                    at: pos,
                    label: label.to_string(),
                    field: field.to_string(),
                    message: err.message,
                    path: path.clone(),
                });
                Ok(CellValue::Empty)
            }
            Err(err) => Err(BindError::Convert {
                at: pos,
                label: label.to_string(),
                message: err.message,
                path: path.clone(),
            }),
        }
    }

    fn scan_record(
        &mut self,
        resolved: &Resolved<'_>,
        rpos: u32,
        path: &BindPath,
    ) -> Result<ScanOutcome<B::Record>> {
        let orientation = self.orientation;
        let mut record = self.binder.new_record();

        // Map columns: a contiguous run of headers into an ordered map.
        for bound in &resolved.maps {
            let mut entries = Vec::with_capacity(bound.to - bound.from);
            for index in bound.from..bound.to {
                let header = &self.layout.headers[index];
                let pos = orientation.with_record(header.position, rpos);
                let value = effective_value(self.grid, pos);
                let converted =
                    self.convert_read(&bound.map.field, &header.label, pos, value, path)?;
                entries.push((header.label.clone(), converted));
            }
            self.binder.bind_map(&mut record, &bound.map.field, entries);
        }

        // Array columns: a cursor-driven fixed run along the primary axis.
        for bound in &resolved.arrays {
            let header = &self.layout.headers[bound.header];
            let cursor = Cursor::new(
                orientation.primary_direction(),
                bound.array.element_merged,
            );
            let mut values = Vec::with_capacity(bound.array.size as usize);
            let mut pos = orientation.with_record(header.position, rpos);
            for _ in 0..bound.array.size {
                let value = effective_value(self.grid, pos);
                values.push(self.convert_read(
                    &bound.array.field,
                    &header.label,
                    pos,
                    value,
                    path,
                )?);
                pos = cursor.advance(self.grid, pos);
            }
            self.binder
                .bind_list(&mut record, &bound.array.field, values);
        }

        // Header-bound columns, with merge bookkeeping for the skip size.
        let mut skip = 1u32;
        for bound in &resolved.columns {
            let header = &self.layout.headers[bound.header];
            let pos = orientation.with_record(header.position, rpos);
            if let Some(region) = self.grid.merged_region_at(pos) {
                if orientation.record_of(region.start) == rpos {
                    skip = skip.max(orientation.record_span(&region));
                }
            }

            let mut value = effective_value(self.grid, pos);
            if bound.binding.merged && value.is_empty() {
                value = continuation_value(self.grid, orientation, pos, self.layout.first_record);
            }
            let converted =
                self.convert_read(&bound.binding.field, &header.label, pos, value, path)?;
            if let Err(err) = self.binder.bind(&mut record, &bound.binding.field, converted) {
                if self.options.continue_on_error {
                    self.errors.push(CellBindError {
                        at: pos,
                        label: header.label.clone(),
                        field: bound.binding.field.clone(),
                        message: err.message,
                        path: path.clone(),
                    });
                } else {
                    return Err(BindError::Convert {
                        at: pos,
                        label: header.label.clone(),
                        message: err.message,
                        path: path.clone(),
                    });
                }
            }
        }

        // Nested sub-tables recurse at the same record position, bounded
        // by the units this record's own merges reserve.
        for (binding, child_resolved) in &resolved.nested {
            let children = self.scan_children(
                child_resolved,
                rpos,
                skip,
                &path.child(binding.field.clone()),
            )?;
            self.binder
                .bind_nested(&mut record, &binding.field, children);
        }

        // Terminal judgment runs last, so a final partial position was
        // still probed for nested content before being discarded.
        let terminal_pos = orientation.with_record(
            self.layout.headers[resolved.terminal_header].position,
            rpos,
        );
        let terminal = judge_terminal(self.grid, orientation, self.terminal, terminal_pos);

        Ok(ScanOutcome {
            record,
            skip,
            terminal,
        })
    }

    fn scan_children(
        &mut self,
        resolved: &Resolved<'_>,
        parent_rpos: u32,
        reserved: u32,
        path: &BindPath,
    ) -> Result<Vec<B::Record>> {
        let mut children = Vec::new();
        let mut consumed = 0u32;
        let mut index = 0usize;
        while consumed < reserved {
            let rpos = parent_rpos + consumed;
            let outcome = self.scan_record(resolved, rpos, &path.record(index))?;
            if outcome.terminal {
                break;
            }
            if consumed + outcome.skip > reserved {
                let at = self.orientation.with_record(
                    self.layout.headers[resolved.terminal_header].position,
                    rpos,
                );
                return Err(BindError::NestedMergeOverflow {
                    at,
                    needed: consumed + outcome.skip,
                    reserved,
                    path: path.clone(),
                });
            }
            if !(self.options.skip_ignorable && self.binder.is_ignorable(&outcome.record)) {
                children.push(outcome.record);
            }
            consumed += outcome.skip.max(1);
            index += 1;
        }
        Ok(children)
    }
}

/// Load records from a table
///
/// Returns `Ok(None)` when the table is optional and absent. The grid is
/// only read; conversion failures either abort or are collected per
/// [`ProcessOptions`].
pub fn load_records<G, B, C>(
    grid: &G,
    schema: &TableSchema,
    binder: &B,
    converter: &C,
    options: ProcessOptions,
) -> Result<Option<LoadReport<B::Record>>>
where
    G: Grid + ?Sized,
    B: RecordBinder,
    C: ValueConverter,
{
    schema.resolve()?;
    let layout = match layout::discover(grid, schema)? {
        Some(layout) => layout,
        None => return Ok(None),
    };
    let path = BindPath::table(&schema.name);
    let resolved = resolve(&schema.record, &layout, &path)?;

    let mut ctx = LoadCtx {
        grid,
        orientation: schema.orientation,
        layout: &layout,
        terminal: &schema.terminal,
        binder,
        converter,
        options,
        errors: Vec::new(),
    };

    let extent = schema.orientation.record_extent(grid);
    let mut records = Vec::new();
    let mut rpos = layout.first_record;
    let mut scanned = 0usize;
    while rpos < extent {
        let outcome = ctx.scan_record(&resolved, rpos, &path.record(scanned))?;
        if outcome.terminal {
            break;
        }
        if !(options.skip_ignorable && binder.is_ignorable(&outcome.record)) {
            records.push(outcome.record);
        }
        rpos += outcome.skip.max(1);
        scanned += 1;
    }

    let errors = ctx.errors;
    log::debug!(
        "table '{}': loaded {} records ({} cell errors)",
        schema.name,
        records.len(),
        errors.len()
    );
    Ok(Some(LoadReport {
        headers: layout.headers,
        records,
        errors,
    }))
}

/// A template record slot: where it starts and how many units it spans
#[derive(Debug, Clone, Copy)]
struct Slot {
    rpos: u32,
    span: u32,
}

struct SaveCtx<'a, G: Grid + ?Sized, B: RecordBinder, C: ValueConverter> {
    grid: &'a mut G,
    orientation: Orientation,
    layout: &'a TableLayout,
    binder: &'a B,
    converter: &'a C,
    op: RecordOperation,
}

impl<'a, G: Grid + ?Sized, B: RecordBinder, C: ValueConverter> SaveCtx<'a, G, B, C> {
    fn write_record(
        &mut self,
        resolved: &Resolved<'_>,
        record: &B::Record,
        slot: Slot,
        prev_anchor: Option<u32>,
        path: &BindPath,
    ) -> Result<()> {
        let orientation = self.orientation;
        let rpos = slot.rpos;

        // Fixed-size arrays refuse oversized data before any cell write.
        for bound in &resolved.arrays {
            if bound.array.over == OverOperation::Error {
                let len = self
                    .binder
                    .read_list(record, &bound.array.field)
                    .map(|values| values.len())
                    .unwrap_or(0);
                if len as u32 > bound.array.size {
                    return Err(BindError::config(
                        format!(
                            "{} values exceed the array size of {}",
                            len, bound.array.size
                        ),
                        &path.child(bound.array.field.clone()),
                    ));
                }
            }
        }

        for bound in &resolved.columns {
            let header = &self.layout.headers[bound.header];
            let pos = orientation.with_record(header.position, rpos);
            let bound_value = self
                .binder
                .read(record, &bound.binding.field)
                .unwrap_or(CellValue::Empty);
            let value = self.converter.write(&bound.binding.field, &bound_value);

            // Adjacent identical values along the record axis re-merge,
            // un-merging the predecessor's region first.
            let mut merged_away = false;
            if bound.binding.merge_on_save && !value.is_empty() {
                if let Some(prev_rpos) = prev_anchor {
                    let prev_pos = orientation.with_record(header.position, prev_rpos);
                    if effective_value(self.grid, prev_pos).render() == value.render() {
                        let end =
                            orientation.with_record(header.position, rpos + slot.span - 1);
                        let start = match self.grid.merged_region_at(prev_pos) {
                            Some(region) => {
                                self.grid.remove_merged_region(&region);
                                region.start
                            }
                            None => prev_pos,
                        };
                        let region = CellRange::new(start, end);
                        let conflict = self
                            .grid
                            .merged_regions()
                            .iter()
                            .any(|m| m.overlaps(&region));
                        if !conflict {
                            self.grid.add_merged_region(region)?;
                        }
                        self.grid.set_blank(pos);
                        self.grid.copy_style(prev_pos, pos)?;
                        self.op.touch(pos);
                        merged_away = true;
                    }
                }
            }
            if !merged_away {
                self.grid.set_value(pos, value)?;
                self.op.touch(pos);
            }
        }

        for bound in &resolved.maps {
            let entries = self.binder.read_map(record, &bound.map.field);
            for index in bound.from..bound.to {
                let header = &self.layout.headers[index];
                let pos = orientation.with_record(header.position, rpos);
                let bound_value = entries
                    .and_then(|entries| {
                        entries
                            .iter()
                            .find(|(key, _)| *key == header.label)
                            .map(|(_, value)| value.clone())
                    })
                    .unwrap_or(CellValue::Empty);
                let value = self.converter.write(&bound.map.field, &bound_value);
                self.grid.set_value(pos, value)?;
                self.op.touch(pos);
            }
        }

        for bound in &resolved.arrays {
            let header = &self.layout.headers[bound.header];
            let values = self
                .binder
                .read_list(record, &bound.array.field)
                .unwrap_or(&[]);
            let cursor = Cursor::new(
                orientation.primary_direction(),
                bound.array.element_merged,
            );
            let mut pos = orientation.with_record(header.position, rpos);
            let mut prev: Option<Position> = None;
            for index in 0..bound.array.size as usize {
                if let Some(bound_value) = values.get(index) {
                    let value = self.converter.write(&bound.array.field, bound_value);
                    self.grid.set_value(pos, value)?;
                    self.op.touch(pos);
                } else {
                    match bound.array.over {
                        OverOperation::Break => break,
                        OverOperation::Copy => {
                            if let Some(prev) = prev {
                                self.grid.copy_style(prev, pos)?;
                            }
                            self.grid.set_blank(pos);
                            self.op.touch(pos);
                        }
                        OverOperation::Insert | OverOperation::Error => break,
                    }
                }
                prev = Some(pos);
                pos = cursor.advance(self.grid, pos);
            }
        }

        if !resolved.nested.is_empty() {
            for (binding, child_resolved) in &resolved.nested {
                let children = self
                    .binder
                    .read_nested(record, &binding.field)
                    .unwrap_or(&[]);
                let needed = children
                    .iter()
                    .map(|child| record_units(self.binder, child_resolved, child))
                    .sum::<u32>()
                    .max(1);
                if needed > slot.span {
                    let at = orientation.with_record(
                        self.layout.headers[resolved.terminal_header].position,
                        rpos,
                    );
                    return Err(BindError::NestedMergeOverflow {
                        at,
                        needed,
                        reserved: slot.span,
                        path: path.child(binding.field.clone()),
                    });
                }

                let mut consumed = 0u32;
                let mut child_prev: Option<u32> = None;
                for (index, child) in children.iter().enumerate() {
                    let units = record_units(self.binder, child_resolved, child);
                    let child_slot = Slot {
                        rpos: rpos + consumed,
                        span: units,
                    };
                    self.write_record(
                        child_resolved,
                        child,
                        child_slot,
                        child_prev,
                        &path.child(format!("{}[{}]", binding.field, index)),
                    )?;
                    child_prev = Some(child_slot.rpos);
                    consumed += units;
                }
            }

            // Cells spanning the nested block re-merge across the span.
            if slot.span > 1 {
                for bound in &resolved.columns {
                    let header = &self.layout.headers[bound.header];
                    let anchor = orientation.with_record(header.position, rpos);
                    let end = orientation.with_record(header.position, rpos + slot.span - 1);
                    let region = CellRange::new(anchor, end);
                    let conflict = self
                        .grid
                        .merged_regions()
                        .iter()
                        .any(|m| m.overlaps(&region));
                    if !conflict {
                        self.grid.add_merged_region(region)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Blank the bound cells of a leftover template slot
    fn clear_slot(&mut self, resolved: &Resolved<'_>, slot: Slot) {
        let orientation = self.orientation;
        for unit in 0..slot.span {
            let rpos = slot.rpos + unit;
            for bound in &resolved.columns {
                let header = &self.layout.headers[bound.header];
                let pos = orientation.with_record(header.position, rpos);
                self.grid.set_blank(pos);
                self.op.touch(pos);
            }
        }
        for bound in &resolved.maps {
            for index in bound.from..bound.to {
                let header = &self.layout.headers[index];
                let pos = orientation.with_record(header.position, slot.rpos);
                self.grid.set_blank(pos);
                self.op.touch(pos);
            }
        }
        for bound in &resolved.arrays {
            let header = &self.layout.headers[bound.header];
            let cursor = Cursor::new(
                orientation.primary_direction(),
                bound.array.element_merged,
            );
            let mut pos = orientation.with_record(header.position, slot.rpos);
            for _ in 0..bound.array.size {
                self.grid.set_blank(pos);
                self.op.touch(pos);
                pos = cursor.advance(self.grid, pos);
            }
        }
    }
}

/// Record-axis units a record needs on save: the largest nested block it
/// carries, at least one
fn record_units<B: RecordBinder>(
    binder: &B,
    resolved: &Resolved<'_>,
    record: &B::Record,
) -> u32 {
    let mut units = 1u32;
    for (binding, child_resolved) in &resolved.nested {
        if let Some(children) = binder.read_nested(record, &binding.field) {
            let total = children
                .iter()
                .map(|child| record_units(binder, child_resolved, child))
                .sum::<u32>();
            units = units.max(total.max(1));
        }
    }
    units
}

/// Save records into a table
///
/// Returns `Ok(None)` when the table is optional and absent. Bound data
/// past the template's capacity is handled by the over policy, leftover
/// template units by the remained policy; afterwards dependent validation
/// ranges, named ranges, and merged regions are repaired.
pub fn save_records<G, B, C>(
    grid: &mut G,
    schema: &TableSchema,
    binder: &B,
    converter: &C,
    records: &[B::Record],
    _options: ProcessOptions,
) -> Result<Option<SaveReport>>
where
    G: Grid + ?Sized,
    B: RecordBinder,
    C: ValueConverter,
{
    schema.resolve()?;
    let layout = match layout::discover(&*grid, schema)? {
        Some(layout) => layout,
        None => return Ok(None),
    };
    let path = BindPath::table(&schema.name);
    let resolved = resolve(&schema.record, &layout, &path)?;
    let orientation = schema.orientation;
    let rule = write_rule(&schema.terminal);

    // Measure the template's record slots with the write-side rule.
    let extent = orientation.record_extent(&*grid);
    let mut slots: Vec<Slot> = Vec::new();
    let mut rpos = layout.first_record;
    while rpos < extent {
        let terminal_pos = orientation.with_record(
            layout.headers[resolved.terminal_header].position,
            rpos,
        );
        if judge_terminal(&*grid, orientation, &rule, terminal_pos) {
            break;
        }
        let span = template_span(&*grid, orientation, &layout, &resolved, rpos);
        slots.push(Slot { rpos, span });
        rpos += span;
    }

    if schema.over == OverOperation::Error && records.len() > slots.len() {
        return Err(BindError::config(
            format!(
                "{} records exceed the template capacity of {}",
                records.len(),
                slots.len()
            ),
            &path,
        ));
    }

    let merges_before = grid.merged_regions();
    let primary_width = layout
        .headers
        .iter()
        .map(|h| h.offset + h.span)
        .max()
        .unwrap_or(1);

    let mut ctx = SaveCtx {
        grid: &mut *grid,
        orientation,
        layout: &layout,
        binder,
        converter,
        op: RecordOperation::new(),
    };

    let mut prev_anchor: Option<u32> = None;
    let mut next_rpos = layout.first_record;
    for (index, record) in records.iter().enumerate() {
        let slot = if index < slots.len() {
            slots[index]
        } else {
            match schema.over {
                OverOperation::Break => {
                    log::debug!(
                        "table '{}': dropping {} records past capacity",
                        schema.name,
                        records.len() - index
                    );
                    break;
                }
                OverOperation::Copy => {
                    mutator::copy_unit_style(
                        &mut *ctx.grid,
                        orientation,
                        layout.origin,
                        primary_width,
                        next_rpos,
                        &mut ctx.op,
                    )?;
                    ctx.op.copied += 1;
                    Slot {
                        rpos: next_rpos,
                        span: 1,
                    }
                }
                OverOperation::Insert => {
                    mutator::insert_unit(
                        &mut *ctx.grid,
                        orientation,
                        layout.origin,
                        primary_width,
                        next_rpos,
                        &mut ctx.op,
                        &path,
                    )?;
                    Slot {
                        rpos: next_rpos,
                        span: 1,
                    }
                }
                // Capacity was checked before any mutation.
                OverOperation::Error => break,
            }
        };
        ctx.write_record(&resolved, record, slot, prev_anchor, &path.record(index))?;
        prev_anchor = Some(slot.rpos);
        next_rpos = slot.rpos + slot.span;
    }

    // Leftover template slots past the bound data.
    if records.len() < slots.len() {
        let leftover = &slots[records.len()..];
        match schema.remained {
            RemainedOperation::None => {}
            RemainedOperation::Clear => {
                for slot in leftover {
                    ctx.clear_slot(&resolved, *slot);
                }
            }
            RemainedOperation::Delete => {
                let start = leftover[0].rpos;
                let units = leftover.iter().map(|slot| slot.span).sum::<u32>();
                mutator::delete_units(
                    &mut *ctx.grid,
                    orientation,
                    layout.origin,
                    primary_width,
                    start,
                    units,
                    &mut ctx.op,
                    &path,
                )?;
            }
        }
    }

    let op = ctx.op;
    mutator::correct_structures(grid, orientation, &op, &merges_before)?;

    log::debug!(
        "table '{}': saved {} records (inserted {}, deleted {}, copied {})",
        schema.name,
        records.len(),
        op.inserted,
        op.deleted,
        op.copied
    );
    Ok(Some(SaveReport {
        rect: op.rect(),
        inserted: op.inserted,
        deleted: op.deleted,
        copied: op.copied,
        errors: Vec::new(),
    }))
}
