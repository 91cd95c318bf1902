//! Write-side growth, shrinkage, and structural correction

use pretty_assertions::assert_eq;
use sheetbind::prelude::*;

/// A template with a Name/Age header at B3 and `rows` bordered record rows
fn template(rows: u32) -> Sheet {
    let mut sheet = Sheet::new("Template");
    sheet.set("B3", "Name").unwrap();
    sheet.set("C3", "Age").unwrap();
    let edged = Style::new().with_borders(Borders::all(BorderLine::Thin));
    for row in 3..3 + rows {
        for col in 1..3 {
            sheet.set_style(Position::new(row, col), &edged).unwrap();
        }
    }
    sheet
}

fn people_schema() -> TableSchema {
    TableSchema::at("people", Orientation::Horizontal, Position::new(2, 1))
        .with_column(ColumnBinding::new("name", "Name"))
        .with_column(ColumnBinding::new("age", "Age"))
}

fn person(name: &str, age: f64) -> MapRecord {
    MapRecord::new().with("name", name).with("age", age)
}

fn four_people() -> Vec<MapRecord> {
    vec![
        person("Ann", 30.0),
        person("Bo", 41.0),
        person("Cy", 19.0),
        person("Di", 52.0),
    ]
}

/// Break writes exactly the template capacity and drops the rest silently
#[test]
fn test_over_break_stops_at_capacity() {
    let mut sheet = template(2);
    let report = save_records(
        &mut sheet,
        &people_schema(),
        &MapBinder,
        &BasicConverter,
        &four_people(),
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("B5").unwrap().as_text(), Some("Bo"));
    assert!(sheet.get("B6").unwrap().is_empty());
    assert_eq!(report.inserted, 0);
    assert_eq!(report.copied, 0);
}

/// Error refuses over-capacity data before touching the grid
#[test]
fn test_over_error_before_any_mutation() {
    let mut sheet = template(2);
    sheet.set("B4", "stale").unwrap();
    sheet.set("B5", "stale").unwrap();

    let schema = people_schema().with_over(OverOperation::Error);
    let err = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &four_people(),
        ProcessOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, BindError::Config { .. }));
    // Nothing was written.
    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("stale"));
    assert_eq!(sheet.get("B5").unwrap().as_text(), Some("stale"));
}

/// Copy grows the table by K - capacity rows, each taking the preceding
/// row's style
#[test]
fn test_over_copy_grows_with_styles() {
    let mut sheet = template(2);
    let edged = sheet.style_at(Position::new(3, 1)).clone();

    let schema = people_schema().with_over(OverOperation::Copy);
    let report = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &four_people(),
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("B6").unwrap().as_text(), Some("Cy"));
    assert_eq!(sheet.get("B7").unwrap().as_text(), Some("Di"));
    assert_eq!(sheet.get("C7").unwrap().as_number(), Some(52.0));
    // The grown rows carry the preceding row's style.
    assert_eq!(sheet.style_at(Position::new(5, 1)), &edged);
    assert_eq!(sheet.style_at(Position::new(6, 2)), &edged);
    assert_eq!(report.copied, 2);
    assert_eq!(report.inserted, 0);
    assert_eq!(sheet.row_count(), 7);
}

/// Insert grows the table structurally and shifts everything below:
/// validation regions and named ranges past the insertion move whole,
/// regions starting inside the table have their far edge extended, and
/// merged regions below are re-registered at their shifted position
#[test]
fn test_over_insert_repairs_structures() {
    let mut sheet = template(2);
    // Content below the table that the insertion will displace.
    sheet.set("B6", "Total").unwrap();
    sheet.merge("B6:C6").unwrap();
    // A validation over the record cells and one past the table.
    sheet.add_validation(
        ValidationRegion::list("0,1,2").with_range(CellRange::parse("C4:C5").unwrap()),
    );
    sheet.add_validation(
        ValidationRegion::list("Yes,No").with_range(CellRange::parse("C7:C9").unwrap()),
    );
    sheet.define_name(NamedRange::new("AgeCells", "C4:C5"));
    sheet.define_name(NamedRange::new("BelowTable", "C7:C9"));

    let schema = people_schema().with_over(OverOperation::Insert);
    let report = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &four_people(),
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.deleted, 0);

    // All four records landed in consecutive rows.
    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("B7").unwrap().as_text(), Some("Di"));

    // The displaced content moved down by the two inserted rows.
    assert_eq!(sheet.get("B8").unwrap().as_text(), Some("Total"));
    assert_eq!(
        sheet.merged_regions(),
        vec![CellRange::parse("B8:C8").unwrap()]
    );

    // Far edge extended for the region starting inside the table.
    assert_eq!(
        sheet.validation_ranges(),
        vec![
            CellRange::parse("C4:C7").unwrap(),
            CellRange::parse("C9:C11").unwrap(),
        ]
    );
    assert_eq!(sheet.named_range("AgeCells").unwrap().refers_to, "C4:C7");
    assert_eq!(sheet.named_range("BelowTable").unwrap().refers_to, "C9:C11");
}

/// Delete removes the leftover template rows and pulls everything below
/// back up
#[test]
fn test_remained_delete_shrinks() {
    let mut sheet = template(5);
    sheet.set("B9", "Total").unwrap();
    sheet.add_validation(
        ValidationRegion::list("Yes,No").with_range(CellRange::parse("C10:C11").unwrap()),
    );

    let schema = people_schema().with_remained(RemainedOperation::Delete);
    let report = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &[person("Ann", 30.0), person("Bo", 41.0)],
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(report.deleted, 3);
    assert_eq!(report.inserted, 0);

    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("B5").unwrap().as_text(), Some("Bo"));
    // The content below the table moved up by the three deleted rows.
    assert_eq!(sheet.get("B6").unwrap().as_text(), Some("Total"));
    assert_eq!(
        sheet.validation_ranges(),
        vec![CellRange::parse("C7:C8").unwrap()]
    );
}

/// A nested block larger than the parent's reserved merge span is a
/// structural contradiction, refused on save
#[test]
fn test_nested_overflow_is_fatal() {
    let mut sheet = Sheet::new("Orders");
    sheet.set("A1", "Customer").unwrap();
    sheet.set("B1", "Item").unwrap();
    let edged = Style::new().with_borders(Borders::all(BorderLine::Thin));
    for row in 1..4 {
        for col in 0..2 {
            sheet.set_style(Position::new(row, col), &edged).unwrap();
        }
    }
    sheet.merge("A2:A4").unwrap(); // the parent reserves 3 units

    let schema = TableSchema::at("orders", Orientation::Horizontal, Position::new(0, 0))
        .with_record(
            RecordSchema::new()
                .with_column(ColumnBinding::new("customer", "Customer"))
                .with_nested(NestedRecords::new(
                    "lines",
                    RecordSchema::new().with_column(ColumnBinding::new("item", "Item")),
                )),
        );

    // Three children fit the reserved span.
    let fits = vec![MapRecord::new().with("customer", "Ann").with_children(
        "lines",
        (0..3)
            .map(|i| MapRecord::new().with("item", format!("item{}", i)))
            .collect(),
    )];
    assert!(save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &fits,
        ProcessOptions::default(),
    )
    .is_ok());

    // A fourth child does not.
    let overflows = vec![MapRecord::new().with("customer", "Ann").with_children(
        "lines",
        (0..4)
            .map(|i| MapRecord::new().with("item", format!("item{}", i)))
            .collect(),
    )];
    let err = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &overflows,
        ProcessOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BindError::NestedMergeOverflow {
            needed: 4,
            reserved: 3,
            ..
        }
    ));
}

/// Insert and Delete are configuration errors on the column axis, not
/// silent no-ops
#[test]
fn test_vertical_mutation_is_rejected() {
    let mut sheet = Sheet::new("Template");
    sheet.set("A2", "Name").unwrap();

    let schema = TableSchema::at("people", Orientation::Vertical, Position::new(1, 0))
        .with_column(ColumnBinding::new("name", "Name"))
        .with_over(OverOperation::Insert);
    let err = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &[person("Ann", 30.0)],
        ProcessOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, BindError::UnsupportedMutation { .. }));
}
