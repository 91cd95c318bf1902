//! In-memory sheet
//!
//! A single-sheet grid holding values, styles, merged regions, data
//! validations, and named ranges. This is the reference [`Grid`]
//! implementation used by templates and tests.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::grid::{BorderPresence, BorderSide, Grid};
use crate::named_range::{NamedRange, NamedRanges};
use crate::position::{CellRange, Position};
use crate::style::{Style, StylePool};
use crate::validation::ValidationRegion;
use crate::value::CellValue;
use crate::{MAX_COLS, MAX_ROWS};

/// Value and style of one cell
#[derive(Debug, Clone)]
struct Cell {
    value: CellValue,
    style_index: u32,
}

impl Cell {
    fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            style_index: 0,
        }
    }
}

/// An in-memory sheet
#[derive(Debug)]
pub struct Sheet {
    /// Sheet name
    name: String,
    /// Sparse cell storage keyed by (row, col)
    cells: BTreeMap<(u32, u16), Cell>,
    /// Deduplicated styles
    styles: StylePool,
    /// Merged regions
    merges: Vec<CellRange>,
    /// Data validations
    validations: Vec<ValidationRegion>,
    /// Named ranges
    names: NamedRanges,
}

impl Sheet {
    /// Create a new empty sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            styles: StylePool::new(),
            merges: Vec::new(),
            validations: Vec::new(),
            names: NamedRanges::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set a cell value by A1 address (convenience for tests and templates)
    pub fn set<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let pos = Position::parse(address)?;
        self.set_value(pos, value.into())
    }

    /// Get a cell value by A1 address
    pub fn get(&self, address: &str) -> Result<CellValue> {
        let pos = Position::parse(address)?;
        Ok(self.value_at(pos))
    }

    /// Set a cell's style
    pub fn set_style(&mut self, pos: Position, style: &Style) -> Result<()> {
        self.check_bounds(pos)?;
        let idx = self.styles.get_or_insert(style.clone());
        self.cells.entry((pos.row, pos.col)).or_insert_with(Cell::empty).style_index = idx;
        Ok(())
    }

    /// Get the style applied to a cell (the default style for untouched cells)
    pub fn style_at(&self, pos: Position) -> &Style {
        let idx = self
            .cells
            .get(&(pos.row, pos.col))
            .map(|c| c.style_index)
            .unwrap_or(0);
        self.styles
            .get(idx)
            .unwrap_or_else(|| self.styles.default_style())
    }

    /// Merge cells by A1 range (convenience)
    pub fn merge(&mut self, range: &str) -> Result<()> {
        self.add_merged_region(CellRange::parse(range)?)
    }

    /// Add a data validation
    pub fn add_validation(&mut self, validation: ValidationRegion) {
        self.validations.push(validation);
    }

    /// All data validations
    pub fn validations(&self) -> &[ValidationRegion] {
        &self.validations
    }

    /// Define a named range; returns false if the name already exists
    pub fn define_name(&mut self, name: NamedRange) -> bool {
        self.names.define(name)
    }

    /// Look up a named range
    pub fn named_range(&self, name: &str) -> Option<&NamedRange> {
        self.names.get(name)
    }

    /// Used bounds of the sheet: (max_row, max_col), if any cell is set
    fn used_bounds(&self) -> Option<(u32, u16)> {
        let max_row = self.cells.keys().map(|&(r, _)| r).max()?;
        let max_col = self.cells.keys().map(|&(_, c)| c).max()?;
        Some((max_row, max_col))
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if pos.row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(pos.row, MAX_ROWS - 1));
        }
        if pos.col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(pos.col, MAX_COLS - 1));
        }
        Ok(())
    }

    /// Drop merged regions whose extent reaches `row` or beyond
    ///
    /// Models the destructive side effect of the underlying row shift:
    /// affected regions are forgotten, and whoever shifted the rows is
    /// responsible for re-registering the survivors.
    fn drop_merges_from(&mut self, row: u32) {
        self.merges.retain(|m| m.end.row < row);
    }
}

impl Grid for Sheet {
    fn row_count(&self) -> u32 {
        self.used_bounds().map(|(r, _)| r + 1).unwrap_or(0)
    }

    fn column_count(&self) -> u16 {
        self.used_bounds().map(|(_, c)| c + 1).unwrap_or(0)
    }

    fn value_at(&self, pos: Position) -> CellValue {
        self.cells
            .get(&(pos.row, pos.col))
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    fn set_value(&mut self, pos: Position, value: CellValue) -> Result<()> {
        self.check_bounds(pos)?;
        self.cells
            .entry((pos.row, pos.col))
            .or_insert_with(Cell::empty)
            .value = value;
        Ok(())
    }

    fn set_blank(&mut self, pos: Position) {
        if let Some(cell) = self.cells.get_mut(&(pos.row, pos.col)) {
            cell.value = CellValue::Empty;
        }
    }

    fn copy_style(&mut self, from: Position, to: Position) -> Result<()> {
        self.check_bounds(to)?;
        let idx = self
            .cells
            .get(&(from.row, from.col))
            .map(|c| c.style_index)
            .unwrap_or(0);
        self.cells
            .entry((to.row, to.col))
            .or_insert_with(Cell::empty)
            .style_index = idx;
        Ok(())
    }

    fn border_at(&self, pos: Position, side: BorderSide) -> BorderPresence {
        let borders = self.style_at(pos).borders;
        let line = match side {
            BorderSide::Top => borders.top,
            BorderSide::Bottom => borders.bottom,
            BorderSide::Left => borders.left,
            BorderSide::Right => borders.right,
        };
        if line.is_present() {
            BorderPresence::Present
        } else {
            BorderPresence::None
        }
    }

    fn merged_region_at(&self, pos: Position) -> Option<CellRange> {
        self.merges.iter().find(|m| m.contains(pos)).copied()
    }

    fn merged_regions(&self) -> Vec<CellRange> {
        self.merges.clone()
    }

    fn add_merged_region(&mut self, region: CellRange) -> Result<()> {
        for existing in &self.merges {
            if region.overlaps(existing) {
                return Err(Error::MergedRegionConflict(region.to_string()));
            }
        }
        self.merges.push(region);
        Ok(())
    }

    fn remove_merged_region(&mut self, region: &CellRange) -> bool {
        let before = self.merges.len();
        self.merges.retain(|m| m != region);
        self.merges.len() < before
    }

    fn insert_row(&mut self, row: u32) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        let shifted: Vec<((u32, u16), Cell)> = self
            .cells
            .split_off(&(row, 0))
            .into_iter()
            .map(|((r, c), cell)| ((r + 1, c), cell))
            .collect();
        self.cells.extend(shifted);
        self.drop_merges_from(row);
        Ok(())
    }

    fn delete_row(&mut self, row: u32) -> Result<bool> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        let tail = self.cells.split_off(&(row, 0));
        let mut existed = false;
        for ((r, c), cell) in tail {
            if r == row {
                existed = true;
                continue;
            }
            self.cells.insert((r - 1, c), cell);
        }
        self.drop_merges_from(row);
        Ok(existed)
    }

    fn validation_ranges(&self) -> Vec<CellRange> {
        self.validations
            .iter()
            .flat_map(|v| v.ranges.iter().copied())
            .collect()
    }

    fn update_validation_range(&mut self, old: &CellRange, new: CellRange) -> bool {
        for validation in &mut self.validations {
            for range in &mut validation.ranges {
                if range == old {
                    *range = new;
                    return true;
                }
            }
        }
        false
    }

    fn named_ranges(&self) -> Vec<NamedRange> {
        self.names.iter().cloned().collect()
    }

    fn update_named_range(&mut self, name: &str, refers_to: String) -> bool {
        self.names.update(name, refers_to)
    }
}
