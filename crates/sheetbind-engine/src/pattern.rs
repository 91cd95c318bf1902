//! Label matching rules

use regex::Regex;

/// Normalize cell text before label comparison
///
/// Trims and collapses internal whitespace runs (including newlines) to a
/// single space, so decorative line breaks in template headers do not
/// break bindings.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A rule for matching a label cell's text
#[derive(Debug, Clone)]
pub enum LabelPattern {
    /// Normalized text equals the given label
    Exact(String),
    /// Normalized text contains the given fragment
    Contains(String),
    /// Normalized text matches the regular expression
    Regex(Regex),
}

impl LabelPattern {
    /// Create an exact-match pattern
    pub fn exact(label: impl Into<String>) -> Self {
        LabelPattern::Exact(normalize(&label.into()))
    }

    /// Create a substring pattern
    pub fn contains(fragment: impl Into<String>) -> Self {
        LabelPattern::Contains(normalize(&fragment.into()))
    }

    /// Create a regex pattern
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(LabelPattern::Regex(Regex::new(pattern)?))
    }

    /// Check whether a cell's raw text matches this rule
    pub fn matches(&self, raw_text: &str) -> bool {
        let text = normalize(raw_text);
        if text.is_empty() {
            return false;
        }
        match self {
            LabelPattern::Exact(label) => text == *label,
            LabelPattern::Contains(fragment) => text.contains(fragment.as_str()),
            LabelPattern::Regex(regex) => regex.is_match(&text),
        }
    }

    /// Human-readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            LabelPattern::Exact(label) => label.clone(),
            LabelPattern::Contains(fragment) => format!("*{}*", fragment),
            LabelPattern::Regex(regex) => format!("/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for LabelPattern {
    fn from(label: &str) -> Self {
        LabelPattern::exact(label)
    }
}

impl From<String> for LabelPattern {
    fn from(label: String) -> Self {
        LabelPattern::exact(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Name  "), "Name");
        assert_eq!(normalize("Unit\nPrice"), "Unit Price");
        assert_eq!(normalize("a   b"), "a b");
    }

    #[test]
    fn test_exact() {
        let pattern = LabelPattern::exact("Unit Price");
        assert!(pattern.matches("Unit\nPrice"));
        assert!(pattern.matches("  Unit Price "));
        assert!(!pattern.matches("Price"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_contains() {
        let pattern = LabelPattern::contains("Price");
        assert!(pattern.matches("Unit Price"));
        assert!(!pattern.matches("Cost"));
    }

    #[test]
    fn test_regex() {
        let pattern = LabelPattern::regex(r"^Q[1-4]$").unwrap();
        assert!(pattern.matches("Q3"));
        assert!(!pattern.matches("Q5"));
        assert!(LabelPattern::regex("(").is_err());
    }
}
