//! Data validation regions
//!
//! A validation restricts what users may enter into the cells it covers.
//! The mapping engine does not evaluate rules; it cares about the covered
//! ranges, which hold absolute coordinates that must be patched after a
//! structural mutation.

use crate::position::{CellRange, Position};

/// Kind of restriction a validation applies
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationRule {
    /// Dropdown list: comma-separated values or a range reference
    List(String),
    /// Free-form rule expression (kept verbatim)
    Custom(String),
}

/// A data validation rule with the ranges it applies to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationRegion {
    /// The restriction
    pub rule: ValidationRule,
    /// Cell ranges this validation applies to
    pub ranges: Vec<CellRange>,
    /// Allow blank/empty cells
    pub allow_blank: bool,
}

impl ValidationRegion {
    /// Create a list validation (dropdown)
    pub fn list(source: impl Into<String>) -> Self {
        Self {
            rule: ValidationRule::List(source.into()),
            ranges: Vec::new(),
            allow_blank: true,
        }
    }

    /// Create a custom-rule validation
    pub fn custom(expr: impl Into<String>) -> Self {
        Self {
            rule: ValidationRule::Custom(expr.into()),
            ranges: Vec::new(),
            allow_blank: true,
        }
    }

    /// Add a range this validation applies to
    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Disallow blank cells
    pub fn required(mut self) -> Self {
        self.allow_blank = false;
        self
    }

    /// Check if this validation applies to the given position
    pub fn applies_to(&self, pos: Position) -> bool {
        self.ranges.iter().any(|r| r.contains(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_to() {
        let v = ValidationRegion::list("Yes,No")
            .with_range(CellRange::parse("A1:A10").unwrap());

        assert!(v.applies_to(Position::new(0, 0)));
        assert!(v.applies_to(Position::new(9, 0)));
        assert!(!v.applies_to(Position::new(0, 1)));
    }

    #[test]
    fn test_builder() {
        let v = ValidationRegion::custom("LEN(A1)<10")
            .with_range(CellRange::parse("B2:B4").unwrap())
            .required();
        assert!(!v.allow_blank);
        assert_eq!(v.ranges.len(), 1);
    }
}
