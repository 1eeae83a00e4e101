//! Provenance tagging: record which file/sheet each row came from.

use std::fmt;

use crate::types::{Table, Value};

/// Name of the provenance column holding the source file name.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";

/// Name of the provenance column holding the source sheet.
pub const SOURCE_SHEET_COLUMN: &str = "_source_sheet";

/// Identifies the sheet a table was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOrigin {
    /// The sheet was selected by name.
    Named(String),
    /// The sheet was selected by zero-based position.
    Index(usize),
    /// The first sheet was used without the caller naming it.
    First,
}

impl fmt::Display for SheetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetOrigin::Named(name) => f.write_str(name),
            SheetOrigin::Index(idx) => write!(f, "{idx}"),
            SheetOrigin::First => f.write_str("<first>"),
        }
    }
}

/// Append provenance columns to a table.
///
/// With `enabled == false` this returns an equivalent copy with no new
/// columns. With `enabled == true` the result carries
/// [`SOURCE_FILE_COLUMN`] holding `source` and [`SOURCE_SHEET_COLUMN`]
/// holding `sheet`'s display value, for every row.
///
/// If the input already has a provenance column (a previously merged export
/// being merged again), its values are overwritten in place of appending a
/// duplicate name. The input table is never mutated.
pub fn tag(table: &Table, source: &str, sheet: &SheetOrigin, enabled: bool) -> Table {
    if !enabled {
        return table.clone();
    }

    let mut out = table.clone();
    set_column(&mut out, SOURCE_FILE_COLUMN, Value::Utf8(source.to_string()));
    set_column(
        &mut out,
        SOURCE_SHEET_COLUMN,
        Value::Utf8(sheet.to_string()),
    );
    out
}

fn set_column(table: &mut Table, name: &str, value: Value) {
    match table.schema.index_of(name) {
        Some(idx) => {
            for row in &mut table.rows {
                row[idx] = value.clone();
            }
        }
        None => {
            table.schema.columns.push(name.to_string());
            for row in &mut table.rows {
                row.push(value.clone());
            }
        }
    }
}
