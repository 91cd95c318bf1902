//! Prelude module - common imports for sheetbind users
//!
//! ```rust
//! use sheetbind::prelude::*;
//! ```

pub use crate::{
    // Grid model
    BorderLine,
    Borders,
    CellRange,
    CellValue,
    Grid,
    NamedRange,
    Position,
    Sheet,
    Style,
    ValidationRegion,

    // Binding
    BasicConverter,
    ColumnBinding,
    MapBinder,
    MapColumns,
    MapRecord,
    NestedRecords,
    RecordBinder,
    RecordSchema,
    ValueConverter,

    // Schema and policies
    ArrayColumns,
    ArraySchema,
    LabelPattern,
    Orientation,
    OverOperation,
    RemainedOperation,
    StepDirection,
    TableAnchor,
    TableSchema,
    TerminalRule,

    // Operations
    load_array,
    load_records,
    save_array,
    save_records,
    BindError,
    LoadReport,
    ProcessOptions,
    SaveReport,
};
