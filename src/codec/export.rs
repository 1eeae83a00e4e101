//! Encode a merged [`Table`] into downloadable payloads.

use rust_xlsxwriter::Workbook;

use crate::error::MergeResult;
use crate::types::{Table, Value};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Sheet name used for exported workbooks.
pub const EXPORT_SHEET_NAME: &str = "combined";

/// Encode a table as CSV bytes.
///
/// The output is prefixed with a UTF-8 BOM so locale-sensitive spreadsheet
/// viewers detect the encoding of non-ASCII text. Null cells render as empty
/// fields, booleans as `true`/`false`.
pub fn to_csv_bytes(table: &Table) -> MergeResult<Vec<u8>> {
    let mut buf = Vec::from(UTF8_BOM);
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(table.schema.column_names())?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(csv_field))?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(v) => v.clone(),
    }
}

/// Encode a table as a single-sheet XLSX workbook, in memory.
///
/// The sheet is named [`EXPORT_SHEET_NAME`]. Header names are written as row
/// 0; null cells are left blank.
pub fn to_xlsx_bytes(table: &Table) -> MergeResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in table.schema.column_names().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let col = col_idx as u16;
            match value {
                Value::Null => {}
                Value::Int64(v) => {
                    sheet.write_number(row_num, col, *v as f64)?;
                }
                Value::Float64(v) => {
                    sheet.write_number(row_num, col, *v)?;
                }
                Value::Bool(v) => {
                    sheet.write_boolean(row_num, col, *v)?;
                }
                Value::Utf8(v) => {
                    sheet.write_string(row_num, col, v.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
