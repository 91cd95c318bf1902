//! Label search
//!
//! Locates a labelled anchor cell by scanning the grid for text matching a
//! pattern, optionally starting after a given cell.

use crate::error::{BindError, BindPath, Result};
use crate::pattern::LabelPattern;
use sheetbind_core::{Grid, Position};

/// Find the first cell matching `pattern`, scanning row-major
///
/// `start_after` excludes every position up to and including the given
/// one (in row-major order). Returns `None` when no cell matches.
pub fn find<G: Grid + ?Sized>(
    grid: &G,
    pattern: &LabelPattern,
    start_after: Option<Position>,
) -> Option<Position> {
    let rows = grid.row_count();
    let cols = grid.column_count();

    for row in 0..rows {
        for col in 0..cols {
            let pos = Position::new(row, col);
            if let Some(after) = start_after {
                if (pos.row, pos.col) <= (after.row, after.col) {
                    continue;
                }
            }
            if pattern.matches(&grid.text_at(pos)) {
                return Some(pos);
            }
        }
    }
    None
}

/// Find a required label, raising [`BindError::CellNotFound`] when absent
pub fn find_required<G: Grid + ?Sized>(
    grid: &G,
    pattern: &LabelPattern,
    start_after: Option<Position>,
    path: &BindPath,
) -> Result<Position> {
    find(grid, pattern, start_after).ok_or_else(|| BindError::CellNotFound {
        pattern: pattern.describe(),
        path: path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetbind_core::Sheet;

    fn sample() -> Sheet {
        let mut sheet = Sheet::new("Test");
        sheet.set("B2", "Name").unwrap();
        sheet.set("C2", "Age").unwrap();
        sheet.set("B6", "Name").unwrap();
        sheet
    }

    #[test]
    fn test_find_first_match() {
        let sheet = sample();
        let pos = find(&sheet, &LabelPattern::exact("Name"), None);
        assert_eq!(pos, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_find_after() {
        let sheet = sample();
        let first = Position::new(1, 1);
        let pos = find(&sheet, &LabelPattern::exact("Name"), Some(first));
        assert_eq!(pos, Some(Position::new(5, 1)));
    }

    #[test]
    fn test_find_required_missing() {
        let sheet = sample();
        let path = BindPath::table("people");
        let err = find_required(&sheet, &LabelPattern::exact("Salary"), None, &path).unwrap_err();
        assert!(matches!(err, BindError::CellNotFound { .. }));
    }
}
