//! # sheetbind-core
//!
//! Grid data model for the sheetbind mapping engine.
//!
//! This crate provides the types the engine operates on:
//! - [`Position`] and [`CellRange`] - 0-based addressing with A1 notation
//! - [`CellValue`] - cell contents (text, numbers, booleans, date/times)
//! - [`Style`] and [`StylePool`] - borders and formatting, deduplicated
//! - [`ValidationRegion`] and [`NamedRange`] - absolute-coordinate
//!   structures that structural mutation must keep consistent
//! - [`Grid`] - the collaborator trait the engine scans and mutates
//! - [`Sheet`] - the in-memory reference [`Grid`] implementation
//!
//! ## Example
//!
//! ```rust
//! use sheetbind_core::{Grid, Sheet, Position};
//!
//! let mut sheet = Sheet::new("People");
//! sheet.set("B2", "Name").unwrap();
//! sheet.set("C2", "Age").unwrap();
//!
//! assert_eq!(sheet.text_at(Position::new(1, 1)), "Name");
//! ```

pub mod error;
pub mod grid;
pub mod named_range;
pub mod position;
pub mod sheet;
pub mod style;
pub mod validation;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use grid::{BorderPresence, BorderSide, Grid};
pub use named_range::{NamedRange, NamedRanges};
pub use position::{CellRange, Position};
pub use sheet::Sheet;
pub use style::{BorderLine, Borders, Rgb, Style, StylePool};
pub use validation::{ValidationRegion, ValidationRule};
pub use value::CellValue;

/// Maximum number of rows in a sheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
