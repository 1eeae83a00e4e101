use rust_xlsxwriter::Workbook;

use sheet_combine::codec::excel::decode_sheet_by_name;
use sheet_combine::codec::export::{to_csv_bytes, to_xlsx_bytes, EXPORT_SHEET_NAME};
use sheet_combine::merge::{JoinPolicy, SOURCE_FILE_COLUMN, SOURCE_SHEET_COLUMN};
use sheet_combine::pipeline::{merge_files, merge_workbook_sheets, MergeOptions, SheetSelector};
use sheet_combine::types::Value;
use sheet_combine::MergeError;

fn options(policy: JoinPolicy, add_source: bool) -> MergeOptions {
    MergeOptions {
        policy,
        add_source,
        ..Default::default()
    }
}

/// One sheet, columns `id,name`, 3 rows.
fn id_name_file() -> (String, Vec<u8>) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    for (i, name) in ["Ada", "Grace", "Linus"].iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_number(row, 0, (i + 1) as f64).unwrap();
        ws.write_string(row, 1, *name).unwrap();
    }
    ("names.xlsx".to_string(), wb.save_to_buffer().unwrap())
}

/// One sheet, columns `id,price`, 2 rows.
fn id_price_file() -> (String, Vec<u8>) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "price").unwrap();
    ws.write_number(1, 0, 4.0).unwrap();
    ws.write_number(1, 1, 9.5).unwrap();
    ws.write_number(2, 0, 5.0).unwrap();
    ws.write_number(2, 1, 3.25).unwrap();
    ("prices.xlsx".to_string(), wb.save_to_buffer().unwrap())
}

/// Workbook with sheets Jan and Feb, identical `date,amount` schema, 10 rows
/// each.
fn monthly_workbook() -> Vec<u8> {
    let mut wb = Workbook::new();
    for (month, sheet_name) in [(1, "Jan"), (2, "Feb")] {
        let ws = wb.add_worksheet();
        ws.set_name(sheet_name).unwrap();
        ws.write_string(0, 0, "date").unwrap();
        ws.write_string(0, 1, "amount").unwrap();
        for day in 1..=10u32 {
            ws.write_string(day, 0, format!("2024-{month:02}-{day:02}"))
                .unwrap();
            ws.write_number(day, 1, (day * 10) as f64).unwrap();
        }
    }
    wb.save_to_buffer().unwrap()
}

#[test]
fn union_merge_of_divergent_files_fills_gaps() {
    // Scenario: {id,name} x3 rows + {id,price} x2 rows under UNION.
    let files = vec![id_name_file(), id_price_file()];
    let merged = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Union, false),
    )
    .unwrap();

    assert_eq!(merged.schema.columns, vec!["id", "name", "price"]);
    assert_eq!(merged.row_count(), 5);
    for row in 0..3 {
        assert_eq!(merged.value_at(row, "price"), Some(&Value::Null));
    }
    for row in 3..5 {
        assert_eq!(merged.value_at(row, "name"), Some(&Value::Null));
    }
}

#[test]
fn intersection_merge_of_divergent_files_keeps_shared_columns() {
    let files = vec![id_name_file(), id_price_file()];
    let merged = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Intersection, false),
    )
    .unwrap();

    assert_eq!(merged.schema.columns, vec!["id"]);
    assert_eq!(merged.row_count(), 5);
    assert!(merged.rows.iter().flatten().all(|v| !v.is_null()));
}

#[test]
fn workbook_merge_tags_rows_with_sheet_names() {
    // Scenario: sheets Jan/Feb, 10 rows each, provenance on.
    let bytes = monthly_workbook();
    let merged = merge_workbook_sheets(
        "monthly.xlsx",
        &bytes,
        &options(JoinPolicy::Union, true),
    )
    .unwrap();

    assert_eq!(merged.row_count(), 20);
    assert_eq!(
        merged.schema.columns,
        vec!["date", "amount", SOURCE_FILE_COLUMN, SOURCE_SHEET_COLUMN]
    );

    for row in 0..10 {
        assert_eq!(
            merged.value_at(row, SOURCE_SHEET_COLUMN),
            Some(&Value::Utf8("Jan".to_string()))
        );
    }
    for row in 10..20 {
        assert_eq!(
            merged.value_at(row, SOURCE_SHEET_COLUMN),
            Some(&Value::Utf8("Feb".to_string()))
        );
    }
    assert_eq!(
        merged.value_at(0, SOURCE_FILE_COLUMN),
        Some(&Value::Utf8("monthly.xlsx".to_string()))
    );
}

#[test]
fn first_sheet_fallback_records_sentinel_not_index() {
    // Multi-sheet workbook, empty selector: only the sheet at position 0
    // (Jan) is merged, and provenance records the sentinel, not an index.
    let files = vec![("monthly.xlsx".to_string(), monthly_workbook())];
    let selector = SheetSelector::from_optional_name(Some(""));
    let merged = merge_files(&files, &selector, &options(JoinPolicy::Union, true)).unwrap();

    assert_eq!(merged.row_count(), 10);
    assert_eq!(
        merged.value_at(0, "date"),
        Some(&Value::Utf8("2024-01-01".to_string()))
    );
    assert_eq!(
        merged.value_at(0, SOURCE_SHEET_COLUMN),
        Some(&Value::Utf8("<first>".to_string()))
    );
}

#[test]
fn named_selector_applies_to_every_file() {
    let bytes = monthly_workbook();
    let files = vec![
        ("a.xlsx".to_string(), bytes.clone()),
        ("b.xlsx".to_string(), bytes),
    ];

    let merged = merge_files(
        &files,
        &SheetSelector::Name("Feb".to_string()),
        &options(JoinPolicy::Union, true),
    )
    .unwrap();

    assert_eq!(merged.row_count(), 20);
    for row in 0..merged.row_count() {
        assert_eq!(
            merged.value_at(row, SOURCE_SHEET_COLUMN),
            Some(&Value::Utf8("Feb".to_string()))
        );
    }
}

#[test]
fn named_selector_missing_in_one_file_fails_the_request() {
    let files = vec![id_name_file()];
    let err = merge_files(
        &files,
        &SheetSelector::Name("Feb".to_string()),
        &options(JoinPolicy::Union, false),
    )
    .unwrap_err();

    assert!(matches!(err, MergeError::SheetNotFound { .. }));
}

#[test]
fn all_sheets_selector_takes_every_sheet_of_every_file() {
    let files = vec![
        ("m1.xlsx".to_string(), monthly_workbook()),
        ("m2.xlsx".to_string(), monthly_workbook()),
    ];

    let merged = merge_files(&files, &SheetSelector::All, &options(JoinPolicy::Union, true))
        .unwrap();

    assert_eq!(merged.row_count(), 40);
    assert_eq!(
        merged.value_at(39, SOURCE_FILE_COLUMN),
        Some(&Value::Utf8("m2.xlsx".to_string()))
    );
    assert_eq!(
        merged.value_at(39, SOURCE_SHEET_COLUMN),
        Some(&Value::Utf8("Feb".to_string()))
    );
}

#[test]
fn csv_and_excel_files_merge_together() {
    let files = vec![
        ("extra.csv".to_string(), b"id,name\n9,Radia\n".to_vec()),
        id_name_file(),
    ];

    let merged = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Union, true),
    )
    .unwrap();

    assert_eq!(merged.row_count(), 4);
    // CSV cells stay strings; spreadsheet numbers stay numbers.
    assert_eq!(merged.value_at(0, "id"), Some(&Value::Utf8("9".to_string())));
    assert_eq!(merged.value_at(1, "id"), Some(&Value::Float64(1.0)));
    assert_eq!(
        merged.value_at(0, SOURCE_SHEET_COLUMN),
        Some(&Value::Utf8("<first>".to_string()))
    );
}

#[test]
fn csv_file_has_no_named_sheets() {
    let files = vec![("extra.csv".to_string(), b"id\n1\n".to_vec())];
    let err = merge_files(
        &files,
        &SheetSelector::Name("Sheet1".to_string()),
        &options(JoinPolicy::Union, false),
    )
    .unwrap_err();

    match err {
        MergeError::SheetNotFound {
            requested,
            available,
        } => {
            assert_eq!(requested, "Sheet1");
            assert!(available.is_empty());
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let files = vec![("data.parquet".to_string(), vec![1, 2, 3])];
    let err = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Union, false),
    )
    .unwrap_err();

    assert!(matches!(err, MergeError::UnsupportedFormat { .. }));
}

#[test]
fn empty_file_list_merges_to_empty_table() {
    let merged = merge_files(&[], &SheetSelector::First, &options(JoinPolicy::Union, true))
        .unwrap();
    assert!(merged.schema.is_empty());
    assert_eq!(merged.row_count(), 0);
}

#[test]
fn merged_table_round_trips_through_xlsx_export() {
    let files = vec![id_name_file(), id_price_file()];
    let merged = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Union, false),
    )
    .unwrap();

    let xlsx = to_xlsx_bytes(&merged).unwrap();
    let reloaded = decode_sheet_by_name(&xlsx, EXPORT_SHEET_NAME).unwrap();

    assert_eq!(reloaded.schema, merged.schema);
    assert_eq!(reloaded.rows, merged.rows);
}

#[test]
fn merged_table_exports_csv_with_provenance_columns() {
    let bytes = monthly_workbook();
    let merged = merge_workbook_sheets(
        "monthly.xlsx",
        &bytes,
        &options(JoinPolicy::Union, true),
    )
    .unwrap();

    let csv = to_csv_bytes(&merged).unwrap();
    let text = std::str::from_utf8(&csv[3..]).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("date,amount,_source_file,_source_sheet")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-01,10,monthly.xlsx,Jan")
    );
}

#[test]
fn preview_head_serializes_as_json_rows() {
    let files = vec![id_name_file()];
    let merged = merge_files(
        &files,
        &SheetSelector::First,
        &options(JoinPolicy::Union, false),
    )
    .unwrap();

    let preview = serde_json::to_value(merged.head(2)).unwrap();
    assert_eq!(
        preview,
        serde_json::json!([
            {"id": 1.0, "name": "Ada"},
            {"id": 2.0, "name": "Grace"},
        ])
    );
}
