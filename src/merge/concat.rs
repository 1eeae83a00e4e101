//! Schema-reconciling concatenation.

use serde::{Deserialize, Serialize};

use crate::types::{Schema, Table, Value};

/// How divergent column sets across input tables are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Keep the union of all columns; cells a source table never had are
    /// filled with [`Value::Null`].
    Union,
    /// Keep only columns present in every input table; no nulls are
    /// introduced.
    Intersection,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self::Union
    }
}

/// Concatenate an ordered list of tables into one, reconciling schemas under
/// `policy`.
///
/// Rows are concatenated in table order, then row order within each table;
/// the output row count is always the sum of the input row counts. Column
/// name matching is exact and case-sensitive.
///
/// Output column order is deterministic:
///
/// - `Union`: order of first appearance, scanning tables in input order and
///   each table's columns in its own order.
/// - `Intersection`: the first table's column order restricted to the common
///   set (the intersection is folded across the sequence starting from the
///   first table's column set).
///
/// Edge cases, none of which are errors:
///
/// - empty input list → empty table;
/// - single input → an equivalent copy of that table;
/// - `Intersection` over tables with no shared columns → a zero-column table
///   whose row count is still the total (the pipeline layer surfaces this
///   outcome as a warning).
pub fn concatenate(tables: &[Table], policy: JoinPolicy) -> Table {
    match tables {
        [] => Table::empty(),
        [single] => single.clone(),
        _ => {
            let columns = match policy {
                JoinPolicy::Union => union_columns(tables),
                JoinPolicy::Intersection => intersection_columns(tables),
            };
            reshape_and_concat(tables, columns)
        }
    }
}

fn union_columns(tables: &[Table]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for name in table.schema.column_names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn intersection_columns(tables: &[Table]) -> Vec<String> {
    let first = &tables[0].schema;
    first
        .column_names()
        .filter(|name| tables[1..].iter().all(|t| t.schema.contains(name)))
        .map(|name| name.to_string())
        .collect()
}

fn reshape_and_concat(tables: &[Table], columns: Vec<String>) -> Table {
    let total_rows: usize = tables.iter().map(Table::row_count).sum();
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(total_rows);

    for table in tables {
        // Merged column -> source column index, or None for a gap to fill.
        let projection: Vec<Option<usize>> = columns
            .iter()
            .map(|name| table.schema.index_of(name))
            .collect();

        for row in &table.rows {
            let out_row: Vec<Value> = projection
                .iter()
                .map(|idx| match idx {
                    Some(i) => row.get(*i).cloned().unwrap_or(Value::Null),
                    None => Value::Null,
                })
                .collect();
            rows.push(out_row);
        }
    }

    Table::new(Schema::new(columns), rows)
}
