//! Structural mutation and coordinate correction
//!
//! The write path grows or shrinks a table in place (insert, delete, or
//! style-copy of record-axis units) and tracks what it touched in a
//! [`RecordOperation`]. After the save pass, [`correct_structures`] patches
//! the absolute-coordinate structures (data validations, named ranges,
//! merged regions) that the row shift invalidated.

use crate::error::{BindError, BindPath, Result};
use crate::orientation::Orientation;
use sheetbind_core::{CellRange, Grid, Position};

/// Accumulator over one save pass
///
/// Created once per top-level save, threaded by reference through nested
/// recursion, consulted once at the end to repair dependent structures.
#[derive(Debug, Clone, Default)]
pub struct RecordOperation {
    /// Record-axis units inserted
    pub inserted: u32,
    /// Record-axis units deleted
    pub deleted: u32,
    /// Record-axis units grown by style copy
    pub copied: u32,
    rect: Option<CellRange>,
}

impl RecordOperation {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a cell was written
    pub fn touch(&mut self, pos: Position) {
        self.rect = Some(match self.rect {
            Some(rect) => rect.expand_to(pos),
            None => CellRange::single(pos),
        });
    }

    /// The smallest rectangle covering every touched cell
    pub fn rect(&self) -> Option<CellRange> {
        self.rect
    }

    /// Net row growth: inserted minus deleted
    pub fn net_delta(&self) -> i64 {
        self.inserted as i64 - self.deleted as i64
    }
}

/// Insert one record-axis unit at `rpos`, copying the preceding unit's style
///
/// Styles are copied across the table's primary width. Only legal when the
/// record axis maps to rows.
pub(crate) fn insert_unit<G: Grid + ?Sized>(
    grid: &mut G,
    orientation: Orientation,
    origin: Position,
    primary_width: u32,
    rpos: u32,
    op: &mut RecordOperation,
    path: &BindPath,
) -> Result<()> {
    if !orientation.supports_record_mutation() {
        return Err(BindError::UnsupportedMutation {
            message: "Insert is not supported along the column axis".into(),
            path: path.clone(),
        });
    }
    grid.insert_row(rpos)?;
    copy_unit_style(grid, orientation, origin, primary_width, rpos, op)?;
    op.inserted += 1;
    log::debug!("inserted record unit at row {}", rpos);
    Ok(())
}

/// Delete `units` record-axis units starting at `rpos`
pub(crate) fn delete_units<G: Grid + ?Sized>(
    grid: &mut G,
    orientation: Orientation,
    origin: Position,
    primary_width: u32,
    rpos: u32,
    units: u32,
    op: &mut RecordOperation,
    path: &BindPath,
) -> Result<()> {
    if !orientation.supports_record_mutation() {
        return Err(BindError::UnsupportedMutation {
            message: "Delete is not supported along the column axis".into(),
            path: path.clone(),
        });
    }
    for _ in 0..units {
        // Rows below shift up, so the next leftover unit lands at rpos again.
        grid.delete_row(rpos)?;
    }
    // Mark the unit above the shrink point; the deleted rows themselves
    // no longer exist, and the rectangle must stay in surviving
    // coordinates for the correction passes.
    let above = rpos.saturating_sub(1);
    for primary in 0..primary_width {
        let base = orientation.step_primary(origin, primary);
        op.touch(orientation.with_record(base, above));
    }
    op.deleted += units;
    log::debug!("deleted {} record units at row {}", units, rpos);
    Ok(())
}

/// Copy the preceding unit's style onto `rpos` and blank its cells
///
/// Used by the `Copy` over-policy: the table grows without a structural
/// row insert.
pub(crate) fn copy_unit_style<G: Grid + ?Sized>(
    grid: &mut G,
    orientation: Orientation,
    origin: Position,
    primary_width: u32,
    rpos: u32,
    op: &mut RecordOperation,
) -> Result<()> {
    if rpos == 0 {
        return Ok(());
    }
    for primary in 0..primary_width {
        let base = orientation.step_primary(origin, primary);
        let to = orientation.with_record(base, rpos);
        let from = orientation.with_record(base, rpos - 1);
        grid.copy_style(from, to)?;
        grid.set_blank(to);
        op.touch(to);
    }
    Ok(())
}

/// Repair validations, named ranges, and merged regions after row mutation
///
/// Three independent passes, each a no-op when no insert/delete occurred.
/// Regions starting inside the operated rectangle get their far edge
/// extended by the net delta; regions starting beyond it along the record
/// axis are shifted whole. Merged regions are replayed from the
/// pre-mutation snapshot, since the underlying row operations drop them.
pub fn correct_structures<G: Grid + ?Sized>(
    grid: &mut G,
    orientation: Orientation,
    op: &RecordOperation,
    merges_before: &[CellRange],
) -> Result<()> {
    if op.inserted == 0 && op.deleted == 0 {
        return Ok(());
    }
    // Insert/delete only exist on the row axis; a vertical table cannot
    // reach this point with nonzero counts.
    debug_assert!(orientation.supports_record_mutation());

    let rect = match op.rect() {
        Some(rect) => rect,
        None => return Ok(()),
    };
    let delta = op.net_delta();
    if delta == 0 {
        return Ok(());
    }

    for range in grid.validation_ranges() {
        if let Some(new) = shifted_range(&range, &rect, delta) {
            log::debug!("validation {} -> {}", range, new);
            grid.update_validation_range(&range, new);
        }
    }

    for name in grid.named_ranges() {
        if name.is_formula() {
            continue;
        }
        let range = match name.range() {
            Some(range) => range,
            None => continue,
        };
        if let Some(new) = shifted_range(&range, &rect, delta) {
            let refers_to = with_reference_prefix(&name.refers_to, &new);
            log::debug!("named range '{}' {} -> {}", name.name, range, new);
            grid.update_named_range(&name.name, refers_to);
        }
    }

    let pre_end = rect.end.row as i64 - delta;
    for region in merges_before {
        if (region.start.row as i64) <= pre_end {
            continue;
        }
        let shifted = match region.offset_rows(delta) {
            Some(shifted) => shifted,
            None => continue,
        };
        let existing = grid.merged_regions();
        let conflict = existing
            .iter()
            .any(|m| m.overlaps(&shifted) || shifted.overlaps(m));
        if !conflict {
            grid.add_merged_region(shifted)?;
        }
    }

    Ok(())
}

/// Apply the shift rule to one range; `None` means it is unaffected
///
/// The rectangle is in post-mutation coordinates and covers any inserted
/// units, while the range still holds pre-mutation coordinates; the
/// table's pre-mutation extent therefore ends `delta` rows earlier.
fn shifted_range(range: &CellRange, rect: &CellRange, delta: i64) -> Option<CellRange> {
    let pre_end = rect.end.row as i64 - delta;
    let col_overlap = range.start.col <= rect.end.col && range.end.col >= rect.start.col;

    if (range.start.row as i64) > pre_end {
        // Starts beyond the rectangle along the record axis: shift whole.
        range.offset_rows(delta)
    } else if range.start.row >= rect.start.row && col_overlap {
        // Starts inside the operated rectangle: the far edge moves.
        let end_row = (range.end.row as i64 + delta).max(range.start.row as i64);
        Some(CellRange::from_indices(
            range.start.row,
            range.start.col,
            end_row as u32,
            range.end.col,
        ))
    } else {
        None
    }
}

/// Re-attach a sheet qualifier ("Data!") to a rewritten reference
fn with_reference_prefix(old_refers_to: &str, new_range: &CellRange) -> String {
    match old_refers_to.rfind('!') {
        Some(idx) => format!("{}!{}", &old_refers_to[..idx], new_range),
        None => new_range.to_string(),
    }
}
