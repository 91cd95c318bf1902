//! Merge-aware cell reads
//!
//! Only the anchor of a merged region carries authoritative content;
//! reads that land on a continuation cell fall back to the anchor.

use sheetbind_core::{CellValue, Grid, Position};

/// The value at a position, reading through merged regions
pub(crate) fn effective_value<G: Grid + ?Sized>(grid: &G, pos: Position) -> CellValue {
    let value = grid.value_at(pos);
    if !value.is_empty() {
        return value;
    }
    match grid.merged_region_at(pos) {
        Some(region) if region.start != pos => grid.value_at(region.start),
        _ => value,
    }
}

/// The rendered text at a position, reading through merged regions
pub(crate) fn effective_text<G: Grid + ?Sized>(grid: &G, pos: Position) -> String {
    effective_value(grid, pos).render()
}

/// Whether the cell at a position is blank, reading through merged regions
pub(crate) fn effective_blank<G: Grid + ?Sized>(grid: &G, pos: Position) -> bool {
    effective_value(grid, pos).is_empty()
}
