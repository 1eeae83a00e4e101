//! CSV decoding.
//!
//! A CSV source behaves as a workbook with exactly one anonymous sheet. Cells
//! stay strings ([`Value::Utf8`]); the CSV codec provides strings natively and
//! no further type inference is applied. Empty cells decode to
//! [`Value::Null`].

use crate::error::MergeResult;
use crate::types::{Schema, Table, Value};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode CSV bytes into a single [`Table`].
///
/// The first record is the header row (blank/duplicate names are normalized
/// the same way as for spreadsheets). A leading UTF-8 BOM is tolerated, so a
/// previously exported `combined.csv` can be re-merged. Ragged records are
/// padded with nulls or truncated to the header width.
pub fn decode_table(bytes: &[u8]) -> MergeResult<Table> {
    let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let header_cells: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if header_cells.is_empty() {
        return Ok(Table::empty());
    }

    let columns = super::normalize_headers(&header_cells);
    let width = columns.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(width);
        for idx in 0..width {
            let raw = record.get(idx).unwrap_or("").trim();
            if raw.is_empty() {
                row.push(Value::Null);
            } else {
                row.push(Value::Utf8(raw.to_string()));
            }
        }
        rows.push(row);
    }

    Ok(Table::new(Schema::new(columns), rows))
}
