//! Table orientation and axis mapping
//!
//! A table has two axes: the primary axis along which its headers are laid
//! out, and the record axis along which successive records stack. All
//! engine arithmetic is expressed as (along-primary, along-record) pairs;
//! this module maps those onto concrete (row, column) coordinates, so a
//! single scan implementation serves both orientations.

use sheetbind_core::{BorderSide, CellRange, Grid, Position};

/// Direction of one cursor step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Step down rows
    Down,
    /// Step right across columns
    Right,
}

/// Which way a table is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Headers across columns, records stacked down rows
    #[default]
    Horizontal,
    /// Headers down rows, records stacked across columns
    Vertical,
}

impl Orientation {
    /// Map (origin, along-primary, along-record) to a grid position
    pub fn at(&self, origin: Position, primary: u32, record: u32) -> Position {
        match self {
            Orientation::Horizontal => Position::new(
                origin.row.saturating_add(record),
                saturating_col(origin.col, primary),
            ),
            Orientation::Vertical => Position::new(
                origin.row.saturating_add(primary),
                saturating_col(origin.col, record),
            ),
        }
    }

    /// The primary-axis coordinate of a position
    pub fn primary_of(&self, pos: Position) -> u32 {
        match self {
            Orientation::Horizontal => pos.col as u32,
            Orientation::Vertical => pos.row,
        }
    }

    /// The record-axis coordinate of a position
    pub fn record_of(&self, pos: Position) -> u32 {
        match self {
            Orientation::Horizontal => pos.row,
            Orientation::Vertical => pos.col as u32,
        }
    }

    /// Replace the record-axis coordinate of a position
    pub fn with_record(&self, pos: Position, record: u32) -> Position {
        match self {
            Orientation::Horizontal => Position::new(record, pos.col),
            Orientation::Vertical => Position::new(pos.row, record.min(u16::MAX as u32) as u16),
        }
    }

    /// Step a position along the primary axis
    pub fn step_primary(&self, pos: Position, by: u32) -> Position {
        match self {
            Orientation::Horizontal => Position::new(pos.row, saturating_col(pos.col, by)),
            Orientation::Vertical => Position::new(pos.row.saturating_add(by), pos.col),
        }
    }

    /// Step a position along the record axis
    pub fn step_record(&self, pos: Position, by: u32) -> Position {
        match self {
            Orientation::Horizontal => Position::new(pos.row.saturating_add(by), pos.col),
            Orientation::Vertical => Position::new(pos.row, saturating_col(pos.col, by)),
        }
    }

    /// Step a position backward along the record axis, if possible
    pub fn step_record_back(&self, pos: Position, by: u32) -> Option<Position> {
        match self {
            Orientation::Horizontal => pos.row.checked_sub(by).map(|row| Position::new(row, pos.col)),
            Orientation::Vertical => pos
                .col
                .checked_sub(by.min(u16::MAX as u32) as u16)
                .map(|col| Position::new(pos.row, col)),
        }
    }

    /// Span of a region along the primary axis
    pub fn primary_span(&self, region: &CellRange) -> u32 {
        match self {
            Orientation::Horizontal => region.col_count() as u32,
            Orientation::Vertical => region.row_count(),
        }
    }

    /// Span of a region along the record axis
    pub fn record_span(&self, region: &CellRange) -> u32 {
        match self {
            Orientation::Horizontal => region.row_count(),
            Orientation::Vertical => region.col_count() as u32,
        }
    }

    /// Grid extent along the record axis
    pub fn record_extent<G: Grid + ?Sized>(&self, grid: &G) -> u32 {
        match self {
            Orientation::Horizontal => grid.row_count(),
            Orientation::Vertical => grid.column_count() as u32,
        }
    }

    /// Step direction along the primary axis
    pub fn primary_direction(&self) -> StepDirection {
        match self {
            Orientation::Horizontal => StepDirection::Right,
            Orientation::Vertical => StepDirection::Down,
        }
    }

    /// Step direction along the record axis
    pub fn record_direction(&self) -> StepDirection {
        match self {
            Orientation::Horizontal => StepDirection::Down,
            Orientation::Vertical => StepDirection::Right,
        }
    }

    /// Whether record-axis insert/delete maps to row insert/delete
    ///
    /// Only horizontal tables stack records down rows; the grid has no
    /// column insert/delete primitive, so vertical tables cannot grow.
    pub fn supports_record_mutation(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    /// Border edge checked by the Border terminal rule
    ///
    /// The edge facing the primary-axis start: the left edge of a record
    /// row, the top edge of a record column.
    pub fn terminal_border(&self) -> BorderSide {
        match self {
            Orientation::Horizontal => BorderSide::Left,
            Orientation::Vertical => BorderSide::Top,
        }
    }

    /// Border edge facing the previous record
    ///
    /// Checked by the merged-continuation rule: an absent edge here means
    /// the cell continues the previous record's value.
    pub fn continuation_border(&self) -> BorderSide {
        match self {
            Orientation::Horizontal => BorderSide::Top,
            Orientation::Vertical => BorderSide::Left,
        }
    }
}

fn saturating_col(col: u16, by: u32) -> u16 {
    col.saturating_add(by.min(u16::MAX as u32) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_horizontal_mapping() {
        let orientation = Orientation::Horizontal;
        let origin = Position::new(2, 1);

        assert_eq!(orientation.at(origin, 3, 0), Position::new(2, 4));
        assert_eq!(orientation.at(origin, 0, 2), Position::new(4, 1));
        assert_eq!(orientation.primary_of(Position::new(4, 7)), 7);
        assert_eq!(orientation.record_of(Position::new(4, 7)), 4);
    }

    #[test]
    fn test_vertical_mapping() {
        let orientation = Orientation::Vertical;
        let origin = Position::new(2, 1);

        assert_eq!(orientation.at(origin, 3, 0), Position::new(5, 1));
        assert_eq!(orientation.at(origin, 0, 2), Position::new(2, 3));
        assert_eq!(orientation.primary_of(Position::new(4, 7)), 4);
        assert_eq!(orientation.record_of(Position::new(4, 7)), 7);
    }

    #[test]
    fn test_spans() {
        let region = CellRange::from_indices(1, 1, 3, 2); // 3 rows x 2 cols
        assert_eq!(Orientation::Horizontal.record_span(&region), 3);
        assert_eq!(Orientation::Horizontal.primary_span(&region), 2);
        assert_eq!(Orientation::Vertical.record_span(&region), 2);
        assert_eq!(Orientation::Vertical.primary_span(&region), 3);
    }

    #[test]
    fn test_step_record_back() {
        let orientation = Orientation::Horizontal;
        assert_eq!(
            orientation.step_record_back(Position::new(3, 2), 1),
            Some(Position::new(2, 2))
        );
        assert_eq!(orientation.step_record_back(Position::new(0, 2), 1), None);
    }

    #[test]
    fn test_mutation_support() {
        assert!(Orientation::Horizontal.supports_record_mutation());
        assert!(!Orientation::Vertical.supports_record_mutation());
    }
}
