//! End-to-end tests for record round-trips (save -> load -> verify)

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

/// Writing K records then reading them back yields the same K records,
/// field by field, for K below the template capacity
#[test]
fn test_roundtrip_records() {
    let mut sheet = template(5);
    let records = vec![person("Ann", 30.0), person("Bo", 41.0), person("Cy", 19.0)];

    let report = save_records(
        &mut sheet,
        &people_schema(),
        &MapBinder,
        &BasicConverter,
        &records,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.deleted, 0);

    let reloaded = load_records(
        &sheet,
        &people_schema(),
        &MapBinder,
        &BasicConverter,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(reloaded.records, records);
}

/// Writing exactly the template capacity uses every record row
#[test]
fn test_roundtrip_at_capacity() {
    let mut sheet = template(2);
    let records = vec![person("Ann", 30.0), person("Bo", 41.0)];

    save_records(
        &mut sheet,
        &people_schema(),
        &MapBinder,
        &BasicConverter,
        &records,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("B5").unwrap().as_text(), Some("Bo"));
    assert_eq!(sheet.get("C5").unwrap().as_number(), Some(41.0));
}

/// Three records into five template rows with Clear: the three records
/// land verbatim, the two leftover rows are blanked, and no structural
/// mutation is reported
#[test]
fn test_save_clears_leftover_rows() {
    let mut sheet = template(5);
    // Stale template content that the save must overwrite or clear.
    for row in 4..9 {
        sheet.set(&format!("B{}", row), "stale").unwrap();
        sheet.set(&format!("C{}", row), "stale").unwrap();
    }

    let schema = people_schema().with_remained(RemainedOperation::Clear);
    let records = vec![person("Ann", 30.0), person("Bo", 41.0), person("Cy", 19.0)];
    let report = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &records,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("C4").unwrap().as_number(), Some(30.0));
    assert_eq!(sheet.get("B5").unwrap().as_text(), Some("Bo"));
    assert_eq!(sheet.get("C5").unwrap().as_number(), Some(41.0));
    assert_eq!(sheet.get("B6").unwrap().as_text(), Some("Cy"));
    assert_eq!(sheet.get("C6").unwrap().as_number(), Some(19.0));

    for row in 7..9 {
        assert!(sheet.get(&format!("B{}", row)).unwrap().is_empty());
        assert!(sheet.get(&format!("C{}", row)).unwrap().is_empty());
    }

    assert_eq!(report.inserted, 0);
    assert_eq!(report.deleted, 0);
}

/// Vertical tables: headers down rows, records across columns
#[test]
fn test_roundtrip_vertical() {
    let mut sheet = Sheet::new("Template");
    sheet.set("A2", "Name").unwrap();
    sheet.set("A3", "Age").unwrap();
    let topped = Style::new().with_borders(Borders::all(BorderLine::Thin));
    for col in 1..4 {
        sheet.set_style(Position::new(1, col), &topped).unwrap();
        sheet.set_style(Position::new(2, col), &topped).unwrap();
    }

    let schema = TableSchema::at("people", Orientation::Vertical, Position::new(1, 0))
        .with_column(ColumnBinding::new("name", "Name"))
        .with_column(ColumnBinding::new("age", "Age"));
    let records = vec![person("Ann", 30.0), person("Bo", 41.0)];

    save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &records,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("B2").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("C2").unwrap().as_text(), Some("Bo"));
    assert_eq!(sheet.get("C3").unwrap().as_number(), Some(41.0));

    let reloaded = load_records(
        &sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(reloaded.records, records);
}

/// Nested records bounded by a merged span survive a round-trip
#[test]
fn test_roundtrip_nested() {
    let mut sheet = Sheet::new("Orders");
    sheet.set("A1", "Customer").unwrap();
    sheet.set("B1", "Item").unwrap();
    let edged = Style::new().with_borders(Borders::all(BorderLine::Thin));
    for row in 1..4 {
        for col in 0..2 {
            sheet.set_style(Position::new(row, col), &edged).unwrap();
        }
    }
    sheet.merge("A2:A4").unwrap(); // the parent record reserves 3 units

    let schema = TableSchema::at("orders", Orientation::Horizontal, Position::new(0, 0))
        .with_record(
            RecordSchema::new()
                .with_column(ColumnBinding::new("customer", "Customer"))
                .with_nested(NestedRecords::new(
                    "lines",
                    RecordSchema::new().with_column(ColumnBinding::new("item", "Item")),
                )),
        );
    let records = vec![MapRecord::new().with("customer", "Ann").with_children(
        "lines",
        vec![
            MapRecord::new().with("item", "apples"),
            MapRecord::new().with("item", "pears"),
            MapRecord::new().with("item", "plums"),
        ],
    )];

    save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &records,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(sheet.get("A2").unwrap().as_text(), Some("Ann"));
    assert_eq!(sheet.get("B2").unwrap().as_text(), Some("apples"));
    assert_eq!(sheet.get("B4").unwrap().as_text(), Some("plums"));

    let reloaded = load_records(
        &sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        ProcessOptions::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(reloaded.records, records);
}

/// Optional tables degrade to "no table" on both paths
#[test]
fn test_optional_table_absent() {
    let mut sheet = Sheet::new("Empty");
    let schema = TableSchema::horizontal("people", "People")
        .optional()
        .with_column(ColumnBinding::new("name", "Name"));

    let loaded = load_records(
        &sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        ProcessOptions::default(),
    )
    .unwrap();
    assert!(loaded.is_none());

    let saved = save_records(
        &mut sheet,
        &schema,
        &MapBinder,
        &BasicConverter,
        &[person("Ann", 30.0)],
        ProcessOptions::default(),
    )
    .unwrap();
    assert!(saved.is_none());
}

/// A standalone labelled array round-trips through the cursor
#[test]
fn test_roundtrip_labelled_array() {
    let mut sheet = Sheet::new("Scores");
    sheet.set("A1", "Points").unwrap();

    let schema = ArraySchema::labelled("points", "Points", StepDirection::Right, 3);
    let values: Vec<CellValue> = vec![1.0.into(), 2.0.into(), 3.0.into()];
    let range = save_array(&mut sheet, &schema, &values).unwrap().unwrap();
    assert_eq!(range, CellRange::parse("B1:D1").unwrap());

    let reloaded = load_array(&sheet, &schema).unwrap().unwrap();
    assert_eq!(reloaded, values);
}
