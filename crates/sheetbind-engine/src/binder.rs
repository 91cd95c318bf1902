//! Record binding and value conversion
//!
//! The engine is ignorant of record shape. Callers supply a
//! [`RecordBinder`] (field access by name) and a [`ValueConverter`]
//! (per-cell conversion); [`MapRecord`] and [`MapBinder`] are the
//! map-backed defaults used by the tests and available out of the box.

use ahash::AHashMap;
use sheetbind_core::CellValue;
use std::fmt;

/// A single cell's conversion failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub message: String,
}

impl ConvertError {
    /// Create a conversion error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConvertError {}

/// Per-field cell value conversion
///
/// Called once per header per record: `read` turns a cell into the value
/// handed to the binder, `write` turns a bound value back into a cell.
pub trait ValueConverter {
    /// Convert a cell for binding
    fn read(&self, field: &str, value: &CellValue, text: &str) -> Result<CellValue, ConvertError>;

    /// Convert a bound value for writing
    fn write(&self, field: &str, value: &CellValue) -> CellValue;
}

/// Pass-through converter: cells bind as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConverter;

impl ValueConverter for BasicConverter {
    fn read(&self, _field: &str, value: &CellValue, _text: &str) -> Result<CellValue, ConvertError> {
        Ok(value.clone())
    }

    fn write(&self, _field: &str, value: &CellValue) -> CellValue {
        value.clone()
    }
}

/// Field access for one record type
pub trait RecordBinder {
    /// The record type produced and consumed
    type Record;

    /// Create an empty record
    fn new_record(&self) -> Self::Record;

    /// Bind a scalar field
    fn bind(
        &self,
        record: &mut Self::Record,
        field: &str,
        value: CellValue,
    ) -> Result<(), ConvertError>;

    /// Bind a list field (array columns)
    fn bind_list(&self, record: &mut Self::Record, field: &str, values: Vec<CellValue>);

    /// Bind an ordered key→value map field (map columns)
    fn bind_map(&self, record: &mut Self::Record, field: &str, entries: Vec<(String, CellValue)>);

    /// Bind nested child records
    fn bind_nested(&self, record: &mut Self::Record, field: &str, children: Vec<Self::Record>);

    /// Read a scalar field
    fn read(&self, record: &Self::Record, field: &str) -> Option<CellValue>;

    /// Read a list field
    fn read_list<'a>(&self, record: &'a Self::Record, field: &str) -> Option<&'a [CellValue]>;

    /// Read a map field
    fn read_map<'a>(
        &self,
        record: &'a Self::Record,
        field: &str,
    ) -> Option<&'a [(String, CellValue)]>;

    /// Read nested child records
    fn read_nested<'a>(&self, record: &'a Self::Record, field: &str) -> Option<&'a [Self::Record]>;

    /// Whether a fully scanned record should be discarded
    fn is_ignorable(&self, _record: &Self::Record) -> bool {
        false
    }
}

/// A bound field value in a [`MapRecord`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(CellValue),
    List(Vec<CellValue>),
    Map(Vec<(String, CellValue)>),
    Records(Vec<MapRecord>),
}

/// A record backed by a field map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapRecord {
    fields: AHashMap<String, FieldValue>,
}

impl MapRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar field (builder style, for tests and call sites)
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields
            .insert(field.into(), FieldValue::Scalar(value.into()));
        self
    }

    /// Set nested child records (builder style)
    pub fn with_children(mut self, field: impl Into<String>, children: Vec<MapRecord>) -> Self {
        self.fields
            .insert(field.into(), FieldValue::Records(children));
        self
    }

    /// Set a list field (builder style)
    pub fn with_list(mut self, field: impl Into<String>, values: Vec<CellValue>) -> Self {
        self.fields.insert(field.into(), FieldValue::List(values));
        self
    }

    /// Get a scalar field
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        match self.fields.get(field) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Get a list field
    pub fn get_list(&self, field: &str) -> Option<&[CellValue]> {
        match self.fields.get(field) {
            Some(FieldValue::List(values)) => Some(values),
            _ => None,
        }
    }

    /// Get a map field
    pub fn get_map(&self, field: &str) -> Option<&[(String, CellValue)]> {
        match self.fields.get(field) {
            Some(FieldValue::Map(entries)) => Some(entries),
            _ => None,
        }
    }

    /// Get nested child records
    pub fn get_children(&self, field: &str) -> Option<&[MapRecord]> {
        match self.fields.get(field) {
            Some(FieldValue::Records(children)) => Some(children),
            _ => None,
        }
    }

    /// Whether every scalar field is empty and no list/map/children exist
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| match value {
            FieldValue::Scalar(v) => v.is_empty(),
            FieldValue::List(values) => values.iter().all(|v| v.is_empty()),
            FieldValue::Map(entries) => entries.iter().all(|(_, v)| v.is_empty()),
            FieldValue::Records(children) => children.is_empty(),
        })
    }
}

/// [`RecordBinder`] over [`MapRecord`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MapBinder;

impl RecordBinder for MapBinder {
    type Record = MapRecord;

    fn new_record(&self) -> MapRecord {
        MapRecord::new()
    }

    fn bind(
        &self,
        record: &mut MapRecord,
        field: &str,
        value: CellValue,
    ) -> Result<(), ConvertError> {
        record
            .fields
            .insert(field.to_string(), FieldValue::Scalar(value));
        Ok(())
    }

    fn bind_list(&self, record: &mut MapRecord, field: &str, values: Vec<CellValue>) {
        record
            .fields
            .insert(field.to_string(), FieldValue::List(values));
    }

    fn bind_map(&self, record: &mut MapRecord, field: &str, entries: Vec<(String, CellValue)>) {
        record
            .fields
            .insert(field.to_string(), FieldValue::Map(entries));
    }

    fn bind_nested(&self, record: &mut MapRecord, field: &str, children: Vec<MapRecord>) {
        record
            .fields
            .insert(field.to_string(), FieldValue::Records(children));
    }

    fn read(&self, record: &MapRecord, field: &str) -> Option<CellValue> {
        record.get(field).cloned()
    }

    fn read_list<'a>(&self, record: &'a MapRecord, field: &str) -> Option<&'a [CellValue]> {
        record.get_list(field)
    }

    fn read_map<'a>(
        &self,
        record: &'a MapRecord,
        field: &str,
    ) -> Option<&'a [(String, CellValue)]> {
        record.get_map(field)
    }

    fn read_nested<'a>(&self, record: &'a MapRecord, field: &str) -> Option<&'a [MapRecord]> {
        record.get_children(field)
    }

    fn is_ignorable(&self, record: &MapRecord) -> bool {
        record.is_blank()
    }
}
