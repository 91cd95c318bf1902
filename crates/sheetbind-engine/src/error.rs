//! Error types for sheetbind-engine

use sheetbind_core::Position;
use std::fmt;
use thiserror::Error;

/// Result type alias using [`BindError`]
pub type Result<T> = std::result::Result<T, BindError>;

/// Accumulated table/record/field path
///
/// Pushed as the scan descends (table name, record index, field name) so a
/// fatal error is addressable to an exact header/record/nesting position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindPath {
    segments: Vec<String>,
}

impl BindPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path rooted at a table name
    pub fn table(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// Push a segment, returning the extended path
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Push a record index segment
    pub fn record(&self, index: usize) -> Self {
        self.child(format!("record[{}]", index))
    }
}

impl fmt::Display for BindPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.segments.join(" / "))
        }
    }
}

/// Errors raised by table binding
#[derive(Debug, Error)]
pub enum BindError {
    /// A required label or anchor cell is missing
    #[error("cell not found: no match for '{pattern}' at {path}")]
    CellNotFound { pattern: String, path: BindPath },

    /// Malformed table configuration (size/range/direction)
    #[error("invalid table configuration at {path}: {message}")]
    Config { message: String, path: BindPath },

    /// A single cell's value could not be converted
    #[error("cannot convert cell {at} ('{label}') at {path}: {message}")]
    Convert {
        at: Position,
        label: String,
        message: String,
        path: BindPath,
    },

    /// A nested table's merge span exceeds its parent's reserved span
    #[error(
        "nested records at {at} need {needed} record units but the parent reserves {reserved} at {path}"
    )]
    NestedMergeOverflow {
        at: Position,
        needed: u32,
        reserved: u32,
        path: BindPath,
    },

    /// Insert/Delete requested on an axis that cannot support it
    #[error("unsupported structural mutation at {path}: {message}")]
    UnsupportedMutation { message: String, path: BindPath },

    /// Error from the underlying grid
    #[error(transparent)]
    Grid(#[from] sheetbind_core::Error),
}

impl BindError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>, path: &BindPath) -> Self {
        BindError::Config {
            message: message.into(),
            path: path.clone(),
        }
    }
}

/// A collectable per-cell conversion failure
///
/// Under the continue-on-failure configuration these are recorded in the
/// load/save report instead of aborting the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBindError {
    /// Cell position the failure occurred at
    pub at: Position,
    /// Header label of the offending column
    pub label: String,
    /// Field the value was bound to
    pub field: String,
    /// Converter message
    pub message: String,
    /// Table/record/field path
    pub path: BindPath,
}

impl fmt::Display for CellBindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ('{}', field '{}') at {}: {}",
            self.at, self.label, self.field, self.path, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = BindPath::table("orders").record(3).child("price");
        assert_eq!(path.to_string(), "orders / record[3] / price");
        assert_eq!(BindPath::new().to_string(), "<root>");
    }

    #[test]
    fn test_error_messages() {
        let err = BindError::CellNotFound {
            pattern: "Name".into(),
            path: BindPath::table("people"),
        };
        assert_eq!(err.to_string(), "cell not found: no match for 'Name' at people");
    }
}
