//! The grid collaborator interface
//!
//! The mapping engine never owns a spreadsheet; it mutably borrows
//! something that can answer cell, merge, border, validation, and named
//! range questions. [`crate::Sheet`] is the in-memory implementation; a
//! file-backed workbook adapter would implement the same trait.

use crate::error::Result;
use crate::named_range::NamedRange;
use crate::position::{CellRange, Position};
use crate::value::CellValue;

/// One of the four edges of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Whether a border edge carries any line
///
/// Boundary detection only distinguishes "no border" from "some border";
/// the concrete line style is irrelevant to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPresence {
    None,
    Present,
}

impl BorderPresence {
    /// Whether any line is drawn
    pub fn is_present(&self) -> bool {
        matches!(self, BorderPresence::Present)
    }
}

/// A grid of styled, possibly-merged cells
///
/// All coordinates are 0-based. Implementations are mutably borrowed for
/// the duration of one load or save call and must not be shared between
/// concurrent scans.
pub trait Grid {
    /// Number of rows in the used extent
    fn row_count(&self) -> u32;

    /// Number of columns in the used extent
    fn column_count(&self) -> u16;

    /// The value at a position (Empty for untouched cells)
    fn value_at(&self, pos: Position) -> CellValue;

    /// Rendered display text at a position
    fn text_at(&self, pos: Position) -> String {
        self.value_at(pos).render()
    }

    /// Whether the cell at a position is blank
    fn is_blank(&self, pos: Position) -> bool {
        self.value_at(pos).is_empty()
    }

    /// Set the value at a position
    fn set_value(&mut self, pos: Position, value: CellValue) -> Result<()>;

    /// Blank the cell at a position, keeping its style
    fn set_blank(&mut self, pos: Position);

    /// Copy the style of one cell onto another
    fn copy_style(&mut self, from: Position, to: Position) -> Result<()>;

    /// Border presence on one edge of a cell
    fn border_at(&self, pos: Position, side: BorderSide) -> BorderPresence;

    /// The merged region covering a position, if any
    fn merged_region_at(&self, pos: Position) -> Option<CellRange>;

    /// Snapshot of all merged regions
    fn merged_regions(&self) -> Vec<CellRange>;

    /// Register a merged region; fails on overlap with an existing region
    fn add_merged_region(&mut self, region: CellRange) -> Result<()>;

    /// Remove a merged region; returns whether it existed
    fn remove_merged_region(&mut self, region: &CellRange) -> bool;

    /// Insert a row at the index, shifting following rows down
    ///
    /// Merged regions reaching the shifted area are dropped, not moved;
    /// callers that need them must re-register them afterwards.
    fn insert_row(&mut self, row: u32) -> Result<()>;

    /// Delete a row at the index, shifting following rows up
    ///
    /// Returns whether the row held any cells. Same merge semantics as
    /// [`Grid::insert_row`].
    fn delete_row(&mut self, row: u32) -> Result<bool>;

    /// Snapshot of every range covered by a data validation
    fn validation_ranges(&self) -> Vec<CellRange>;

    /// Replace one validation range; returns whether `old` was found
    fn update_validation_range(&mut self, old: &CellRange, new: CellRange) -> bool;

    /// Snapshot of all named ranges
    fn named_ranges(&self) -> Vec<NamedRange>;

    /// Replace the reference of a named range; returns whether it exists
    fn update_named_range(&mut self, name: &str, refers_to: String) -> bool;
}
