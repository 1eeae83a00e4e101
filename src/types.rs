//! Core data model types.
//!
//! This crate merges decoded spreadsheet/CSV inputs into an in-memory [`Table`].
//! Unlike a schema-first ingestion model, column names here are discovered at
//! decode time: every [`Table`] carries its own [`Schema`], and schemas may
//! differ from table to table until the concatenator reconciles them.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Ordered set of column names describing a [`Table`].
///
/// Order matters for display and export; set membership (exact, case-sensitive
/// string match) drives schema reconciliation. Column names within one schema
/// are unique; the loaders enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of column names.
    pub columns: Vec<String>,
}

impl Schema {
    /// Create a new schema from column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// A schema with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single scalar cell value.
///
/// `Null` is the missing-value marker: it is what an empty cell decodes to and
/// what the union reconciliation fills into columns a row's source table never
/// had.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Whether this value is the missing-value marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// In-memory table with a per-table schema.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`]
/// columns; every row has exactly `schema.len()` cells. Tables are never
/// mutated in place: each pipeline stage that changes shape returns a new
/// `Table`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Look up a cell by row index and column name.
    pub fn value_at(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// A copy of the table truncated to its first `n` rows.
    ///
    /// Callers use this for preview rendering; the schema is unchanged.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Utf8(v) => serializer.serialize_str(v),
        }
    }
}

/// Tables serialize as a JSON array of objects (one object per row, keyed by
/// column name), the shape preview renderers expect.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct RowObject<'a> {
            schema: &'a Schema,
            row: &'a [Value],
        }

        impl Serialize for RowObject<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.row.len()))?;
                for (name, value) in self.schema.columns.iter().zip(self.row.iter()) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowObject {
                schema: &self.schema,
                row: row.as_slice(),
            })?;
        }
        seq.end()
    }
}
