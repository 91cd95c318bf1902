//! Named ranges
//!
//! Names assign a label to a cell or range reference. References hold
//! absolute coordinates, so they are part of what a structural mutation
//! must patch afterwards.

use crate::position::CellRange;
use ahash::AHashMap;

/// A named range definition
///
/// `refers_to` is either a plain reference (`"Data!$A$1:$A$10"`, `"B2"`)
/// or a formula expression (leading `=`). Formula names are never patched
/// by coordinate correction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedRange {
    /// The name (case-insensitive for lookup)
    pub name: String,
    /// What the name refers to
    pub refers_to: String,
    /// Whether this name is hidden from the UI
    pub hidden: bool,
}

impl NamedRange {
    /// Create a new named range
    pub fn new(name: impl Into<String>, refers_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            refers_to: refers_to.into(),
            hidden: false,
        }
    }

    /// Mark this named range as hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Check if the refers_to is a formula (starts with =)
    pub fn is_formula(&self) -> bool {
        self.refers_to.starts_with('=')
    }

    /// Parse the referenced range, if this is a plain reference
    pub fn range(&self) -> Option<CellRange> {
        if self.is_formula() {
            return None;
        }
        CellRange::parse(&self.refers_to).ok()
    }
}

/// Collection of named ranges with case-insensitive lookup
#[derive(Debug, Default, Clone)]
pub struct NamedRanges {
    ranges: AHashMap<String, NamedRange>,
    order: Vec<String>,
}

impl NamedRanges {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new named range
    ///
    /// Returns `false` (and leaves the collection unchanged) if the name
    /// already exists.
    pub fn define(&mut self, range: NamedRange) -> bool {
        let key = range.name.to_lowercase();
        if self.ranges.contains_key(&key) {
            return false;
        }
        self.order.push(key.clone());
        self.ranges.insert(key, range);
        true
    }

    /// Get a named range by name
    pub fn get(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.get(&name.to_lowercase())
    }

    /// Replace the reference of an existing name
    pub fn update(&mut self, name: &str, refers_to: String) -> bool {
        match self.ranges.get_mut(&name.to_lowercase()) {
            Some(range) => {
                range.refers_to = refers_to;
                true
            }
            None => false,
        }
    }

    /// Remove a named range
    pub fn remove(&mut self, name: &str) -> Option<NamedRange> {
        let key = name.to_lowercase();
        self.order.retain(|k| k != &key);
        self.ranges.remove(&key)
    }

    /// Iterate over all named ranges in definition order
    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.order.iter().filter_map(|k| self.ranges.get(k))
    }

    /// Get the number of named ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
