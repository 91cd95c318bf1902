//! # sheetbind-engine
//!
//! The table engine behind sheetbind: discovers a table's header and body
//! region inside an arbitrarily large sheet, iterates records while
//! interpreting merged cells and borders as structural signals, recurses
//! into nested sub-tables bounded by merge spans, and on write grows or
//! shrinks the table while keeping dependent absolute-coordinate
//! structures (data validations, named ranges, merged regions) consistent.
//!
//! ## Example
//!
//! ```rust
//! use sheetbind_core::Sheet;
//! use sheetbind_engine::{
//!     load_records, BasicConverter, ColumnBinding, MapBinder, ProcessOptions, TableSchema,
//! };
//!
//! let mut sheet = Sheet::new("People");
//! sheet.set("A1", "Roster").unwrap();
//! sheet.set("A2", "Name").unwrap();
//! sheet.set("B2", "Age").unwrap();
//! sheet.set("A3", "Ann").unwrap();
//! sheet.set("B3", 30.0).unwrap();
//!
//! let schema = TableSchema::horizontal("people", "Roster")
//!     .with_column(ColumnBinding::new("name", "Name"))
//!     .with_column(ColumnBinding::new("age", "Age"));
//!
//! let report = load_records(&sheet, &schema, &MapBinder, &BasicConverter,
//!     ProcessOptions::default()).unwrap().unwrap();
//! assert_eq!(report.records.len(), 1);
//! ```

pub mod binder;
mod cells;
pub mod cursor;
pub mod error;
pub mod layout;
pub mod mutator;
pub mod orientation;
pub mod pattern;
pub mod scanner;
pub mod schema;
pub mod search;

// Re-exports for convenience
pub use binder::{
    BasicConverter, ConvertError, FieldValue, MapBinder, MapRecord, RecordBinder, ValueConverter,
};
pub use cursor::{load_array, save_array, ArraySchema, Cursor};
pub use error::{BindError, BindPath, CellBindError, Result};
pub use layout::{discover, RecordHeader, TableLayout};
pub use mutator::{correct_structures, RecordOperation};
pub use orientation::{Orientation, StepDirection};
pub use pattern::LabelPattern;
pub use scanner::{load_records, save_records, LoadReport, ProcessOptions, SaveReport};
pub use schema::{
    ArrayColumns, ColumnBinding, MapColumns, NestedRecords, OverOperation, RecordSchema,
    RemainedOperation, TableAnchor, TableSchema, TerminalRule,
};
