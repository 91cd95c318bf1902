//! Cell styles: borders, fills, and the deduplicating style pool

use ahash::AHashMap;

/// Line style of a single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLine {
    /// No border drawn
    #[default]
    None,
    Thin,
    Medium,
    Dashed,
    Thick,
    Double,
}

impl BorderLine {
    /// Whether any line is drawn at all
    pub fn is_present(&self) -> bool {
        !matches!(self, BorderLine::None)
    }
}

/// Border lines on the four edges of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Borders {
    pub left: BorderLine,
    pub right: BorderLine,
    pub top: BorderLine,
    pub bottom: BorderLine,
}

impl Borders {
    /// No borders on any edge
    pub fn none() -> Self {
        Self::default()
    }

    /// The same line on all four edges
    pub fn all(line: BorderLine) -> Self {
        Self {
            left: line,
            right: line,
            top: line,
            bottom: line,
        }
    }

    /// Check if all edges are empty
    pub fn is_empty(&self) -> bool {
        !self.left.is_present()
            && !self.right.is_present()
            && !self.top.is_present()
            && !self.bottom.is_present()
    }
}

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Cell formatting
///
/// Only what the mapping engine observes or copies: borders (structural
/// signals for boundary detection) plus enough formatting that style-copy
/// is visible in tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Border lines
    pub borders: Borders,
    /// Bold font
    pub bold: bool,
    /// Background fill color
    pub fill: Option<Rgb>,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the borders
    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the fill color
    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Style pool for deduplication
///
/// Sheets typically have many cells sharing the same style. The pool stores
/// each unique style once; cells reference styles by index, and index 0 is
/// always the default style.
#[derive(Debug)]
pub struct StylePool {
    styles: Vec<Style>,
    index_map: AHashMap<Style, u32>,
}

impl StylePool {
    /// Create a new style pool with the default style at index 0
    pub fn new() -> Self {
        let mut pool = Self {
            styles: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
        };
        pool.styles.push(Style::default());
        pool.index_map.insert(Style::default(), 0);
        pool
    }

    /// Get or create a style, returning its index
    pub fn get_or_insert(&mut self, style: Style) -> u32 {
        if let Some(&idx) = self.index_map.get(&style) {
            return idx;
        }
        let idx = self.styles.len() as u32;
        self.index_map.insert(style.clone(), idx);
        self.styles.push(style);
        idx
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Get the default style (index 0)
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Get the number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the pool only holds the default style
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}
