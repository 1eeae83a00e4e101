//! Spreadsheet decoding via `calamine`.
//!
//! Behavior shared by all entry points:
//!
//! - The first non-empty row of a sheet is the header row; its cells become
//!   the column names (see [`super::normalize_headers`] for blank/duplicate
//!   handling).
//! - Remaining rows become data rows. Cells convert natively: empty cells are
//!   [`Value::Null`], date-time cells keep the serial number the codec
//!   exposes, error cells decode to null.
//! - Rows shorter than the header are padded with nulls; cells beyond the
//!   header width are dropped.
//! - A sheet with no non-empty rows decodes to an empty table.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::error::{MergeError, MergeResult};
use crate::types::{Schema, Table, Value};

fn open_workbook(bytes: &[u8]) -> MergeResult<Sheets<Cursor<&[u8]>>> {
    Ok(open_workbook_auto_from_rs(Cursor::new(bytes))?)
}

/// Decode every sheet of a workbook, in workbook order.
pub fn decode_workbook(bytes: &[u8]) -> MergeResult<Vec<(String, Table)>> {
    let mut workbook = open_workbook(bytes)?;
    let names = workbook.sheet_names().to_vec();

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let table = table_from_range(&range);
        out.push((name, table));
    }
    Ok(out)
}

/// Decode a single sheet selected by name.
///
/// Returns [`MergeError::SheetNotFound`] (listing the sheets that do exist)
/// when the workbook has no sheet with this exact name.
pub fn decode_sheet_by_name(bytes: &[u8], name: &str) -> MergeResult<Table> {
    let mut workbook = open_workbook(bytes)?;
    let names = workbook.sheet_names().to_vec();
    if !names.iter().any(|n| n == name) {
        return Err(MergeError::SheetNotFound {
            requested: name.to_string(),
            available: names,
        });
    }

    let range = workbook.worksheet_range(name)?;
    Ok(table_from_range(&range))
}

/// Decode a single sheet selected by zero-based position.
pub fn decode_sheet_at(bytes: &[u8], index: usize) -> MergeResult<Table> {
    let mut workbook = open_workbook(bytes)?;
    let names = workbook.sheet_names().to_vec();
    let name = match names.get(index) {
        Some(name) => name.clone(),
        None => {
            return Err(MergeError::SheetNotFound {
                requested: index.to_string(),
                available: names,
            });
        }
    };

    let range = workbook.worksheet_range(&name)?;
    Ok(table_from_range(&range))
}

fn table_from_range(range: &Range<Data>) -> Table {
    let mut header_row_idx: Option<usize> = None;
    let mut header_cells: Vec<String> = Vec::new();

    for (idx0, row) in range.rows().enumerate() {
        let non_empty = row.iter().any(|c| !matches!(c, Data::Empty));
        if non_empty {
            header_row_idx = Some(idx0);
            header_cells = row.iter().map(cell_to_header_string).collect();
            break;
        }
    }

    let Some(header_row_idx) = header_row_idx else {
        return Table::empty();
    };

    let columns = super::normalize_headers(&header_cells);
    let width = columns.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 <= header_row_idx {
            continue;
        }

        let mut out_row: Vec<Value> = Vec::with_capacity(width);
        for col_idx in 0..width {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            out_row.push(convert_cell(cell));
        }
        rows.push(out_row);
    }

    Table::new(Schema::new(columns), rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::Float64(dt.as_f64()),
        Data::DateTimeIso(s) => Value::Utf8(s.clone()),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(_) => Value::Null,
    }
}
