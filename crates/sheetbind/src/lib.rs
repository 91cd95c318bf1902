//! # sheetbind
//!
//! Maps structured records onto a two-dimensional grid of styled,
//! possibly-merged cells (a spreadsheet) and back.
//!
//! The engine discovers a table's header and body region, iterates
//! records while interpreting merged cells and borders as structural
//! signals, recurses into nested sub-tables bounded by merge spans, and
//! on write grows or shrinks the table (insert/copy/delete record rows)
//! while keeping dependent data-validation ranges, named ranges, and
//! merged regions consistent.
//!
//! ## Example
//!
//! ```rust
//! use sheetbind::prelude::*;
//!
//! // A template: a label, a header row, and room for records.
//! let mut sheet = Sheet::new("Roster");
//! sheet.set("B2", "People").unwrap();
//! sheet.set("B3", "Name").unwrap();
//! sheet.set("C3", "Age").unwrap();
//! sheet.set("B4", "Ann").unwrap();
//! sheet.set("C4", 30.0).unwrap();
//!
//! let schema = TableSchema::horizontal("people", "People")
//!     .with_column(ColumnBinding::new("name", "Name"))
//!     .with_column(ColumnBinding::new("age", "Age"));
//!
//! let report = load_records(&sheet, &schema, &MapBinder, &BasicConverter,
//!     ProcessOptions::default()).unwrap().unwrap();
//! assert_eq!(report.records[0].get("name"), Some(&"Ann".into()));
//! ```

pub mod prelude;

// Re-export core types
pub use sheetbind_core::{
    BorderLine, BorderPresence, BorderSide, Borders, CellRange, CellValue, Error, Grid,
    NamedRange, NamedRanges, Position, Rgb, Sheet, Style, StylePool, ValidationRegion,
    ValidationRule, MAX_COLS, MAX_ROWS,
};

// Re-export engine types
pub use sheetbind_engine::{
    correct_structures, discover, load_array, load_records, save_array, save_records,
    ArrayColumns, ArraySchema, BasicConverter, BindError, BindPath, CellBindError, ColumnBinding,
    ConvertError, Cursor, FieldValue, LabelPattern, LoadReport, MapBinder, MapColumns, MapRecord,
    NestedRecords, Orientation, OverOperation, ProcessOptions, RecordBinder, RecordHeader,
    RecordOperation, RecordSchema, RemainedOperation, Result, SaveReport, StepDirection,
    TableAnchor, TableLayout, TableSchema, TerminalRule, ValueConverter,
};
