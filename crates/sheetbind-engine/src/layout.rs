//! Table layout discovery
//!
//! Locates a table's origin and enumerates its header cells along the
//! primary axis, producing the ordered header list every scan runs
//! against.

use crate::cells::effective_text;
use crate::error::{BindError, BindPath, Result};
use crate::pattern::normalize;
use crate::schema::{TableAnchor, TableSchema};
use crate::search;
use sheetbind_core::{Grid, Position};

/// One discovered header cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Normalized header text
    pub label: String,
    /// Primary-axis offset from the table origin
    pub offset: u32,
    /// The header cell's position
    pub position: Position,
    /// Merged width of the header along the primary axis (1 if unmerged)
    pub span: u32,
}

/// A discovered table: origin, headers, and where records start
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// The table origin (first header position)
    pub origin: Position,
    /// Headers in primary-axis order
    pub headers: Vec<RecordHeader>,
    /// Record-axis coordinate of the first record
    pub first_record: u32,
}

impl TableLayout {
    /// Find headers matching a label, in discovery order
    pub fn headers_labelled<'a>(
        &'a self,
        pattern: &'a crate::pattern::LabelPattern,
    ) -> impl Iterator<Item = (usize, &'a RecordHeader)> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| pattern.matches(&h.label))
    }
}

/// Discover a table's layout
///
/// Returns `Ok(None)` when the table is optional and its anchor label is
/// absent; a required table with a missing anchor raises
/// [`BindError::CellNotFound`].
pub fn discover<G: Grid + ?Sized>(grid: &G, schema: &TableSchema) -> Result<Option<TableLayout>> {
    let path = BindPath::table(&schema.name);
    let orientation = schema.orientation;

    let origin = match &schema.anchor {
        TableAnchor::Cell(pos) => *pos,
        TableAnchor::Label(pattern) => {
            let label_pos = if schema.optional {
                match search::find(grid, pattern, None) {
                    Some(pos) => pos,
                    None => return Ok(None),
                }
            } else {
                search::find_required(grid, pattern, None, &path)?
            };
            // The label sits one record-axis step before the header line.
            orientation.step_record(label_pos, 1)
        }
    };

    let mut headers = Vec::new();
    let mut pos = origin;
    loop {
        if schema.header_limit > 0 && headers.len() as u32 >= schema.header_limit {
            break;
        }

        // Probe past blank decorative cells, up to the configured range.
        let mut found = None;
        for delta in 0..schema.range {
            let candidate = orientation.step_primary(pos, delta);
            let text = effective_text(grid, candidate);
            if !text.trim().is_empty() {
                found = Some((candidate, text));
                break;
            }
        }
        let (cell, text) = match found {
            Some(hit) => hit,
            None => break,
        };

        let span = grid
            .merged_region_at(cell)
            .map(|region| orientation.primary_span(&region))
            .unwrap_or(1);

        headers.push(RecordHeader {
            label: normalize(&text),
            offset: orientation.primary_of(cell) - orientation.primary_of(origin),
            position: cell,
            span,
        });

        pos = orientation.step_primary(cell, span);
    }

    if headers.is_empty() {
        if schema.optional {
            return Ok(None);
        }
        return Err(BindError::config(
            format!("no header cells found at {}", origin),
            &path,
        ));
    }

    // Records start below (or beside) the deepest header cell.
    let header_end = headers
        .iter()
        .map(|h| {
            grid.merged_region_at(h.position)
                .map(|region| orientation.record_of(region.end) + 1)
                .unwrap_or_else(|| orientation.record_of(h.position) + 1)
        })
        .max()
        .unwrap_or_else(|| orientation.record_of(origin) + 1);

    let layout = TableLayout {
        origin,
        headers,
        first_record: header_end + schema.record_offset,
    };
    log::debug!(
        "table '{}': origin {}, {} headers, records from {}",
        schema.name,
        layout.origin,
        layout.headers.len(),
        layout.first_record
    );
    Ok(Some(layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;
    use pretty_assertions::assert_eq;
    use sheetbind_core::Sheet;

    fn labelled(layout: &TableLayout) -> Vec<(&str, u32)> {
        layout
            .headers
            .iter()
            .map(|h| (h.label.as_str(), h.offset))
            .collect()
    }

    #[test]
    fn test_discover_at_origin() {
        let mut sheet = Sheet::new("Test");
        sheet.set("B3", "Name").unwrap();
        sheet.set("C3", "Age").unwrap();
        sheet.set("D3", "City").unwrap();

        let schema = TableSchema::at("people", Orientation::Horizontal, Position::new(2, 1));
        let layout = discover(&sheet, &schema).unwrap().unwrap();

        assert_eq!(layout.origin, Position::new(2, 1));
        assert_eq!(
            labelled(&layout),
            vec![("Name", 0), ("Age", 1), ("City", 2)]
        );
        assert_eq!(layout.first_record, 3);
    }

    #[test]
    fn test_discover_via_label() {
        let mut sheet = Sheet::new("Test");
        sheet.set("B2", "People").unwrap();
        sheet.set("B3", "Name").unwrap();
        sheet.set("C3", "Age").unwrap();

        let schema = TableSchema::horizontal("people", "People");
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(layout.origin, Position::new(2, 1));
        assert_eq!(labelled(&layout), vec![("Name", 0), ("Age", 1)]);
    }

    #[test]
    fn test_blank_probe_range() {
        let mut sheet = Sheet::new("Test");
        sheet.set("A1", "Name").unwrap();
        // decorative blank in B1
        sheet.set("C1", "Age").unwrap();
        sheet.set("E1", "City").unwrap();

        let schema = TableSchema::at("people", Orientation::Horizontal, Position::new(0, 0))
            .with_range(2);
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(
            labelled(&layout),
            vec![("Name", 0), ("Age", 2), ("City", 4)]
        );

        // With the default range the blank ends enumeration.
        let schema = TableSchema::at("people", Orientation::Horizontal, Position::new(0, 0));
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(labelled(&layout), vec![("Name", 0)]);
    }

    #[test]
    fn test_merged_header_span() {
        let mut sheet = Sheet::new("Test");
        sheet.set("A1", "Name").unwrap();
        sheet.set("B1", "Score").unwrap();
        sheet.merge("B1:D1").unwrap();
        sheet.set("E1", "City").unwrap();

        let schema = TableSchema::at("people", Orientation::Horizontal, Position::new(0, 0));
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(
            labelled(&layout),
            vec![("Name", 0), ("Score", 1), ("City", 4)]
        );
        assert_eq!(layout.headers[1].span, 3);
    }

    #[test]
    fn test_header_merged_down_moves_first_record() {
        let mut sheet = Sheet::new("Test");
        sheet.set("A1", "Name").unwrap();
        sheet.merge("A1:A2").unwrap();
        sheet.set("B1", "Age").unwrap();

        let schema = TableSchema::at("people", Orientation::Horizontal, Position::new(0, 0));
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(layout.first_record, 2);
    }

    #[test]
    fn test_header_limit() {
        let mut sheet = Sheet::new("Test");
        sheet.set("A1", "A").unwrap();
        sheet.set("B1", "B").unwrap();
        sheet.set("C1", "C").unwrap();

        let schema = TableSchema::at("t", Orientation::Horizontal, Position::new(0, 0))
            .with_header_limit(2);
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(layout.headers.len(), 2);
    }

    #[test]
    fn test_vertical_headers() {
        let mut sheet = Sheet::new("Test");
        sheet.set("A2", "Name").unwrap();
        sheet.set("A3", "Age").unwrap();

        let schema = TableSchema::at("people", Orientation::Vertical, Position::new(1, 0));
        let layout = discover(&sheet, &schema).unwrap().unwrap();
        assert_eq!(labelled(&layout), vec![("Name", 0), ("Age", 1)]);
        assert_eq!(layout.first_record, 1); // records start in column B
    }

    #[test]
    fn test_missing_required_and_optional() {
        let sheet = Sheet::new("Test");

        let schema = TableSchema::horizontal("people", "People");
        assert!(matches!(
            discover(&sheet, &schema),
            Err(BindError::CellNotFound { .. })
        ));

        let schema = TableSchema::horizontal("people", "People").optional();
        assert!(discover(&sheet, &schema).unwrap().is_none());
    }
}
