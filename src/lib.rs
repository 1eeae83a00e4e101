//! `sheet-combine` merges tabular data spread across multiple spreadsheet
//! sheets or multiple spreadsheet/CSV files into one unified [`types::Table`],
//! then encodes the result for download as CSV or XLSX.
//!
//! Input tables may have different column sets; the merge reconciles them
//! under a [`merge::JoinPolicy`]:
//!
//! - [`merge::JoinPolicy::Union`]: keep every column that appears anywhere;
//!   rows from tables lacking a column get [`types::Value::Null`] there.
//! - [`merge::JoinPolicy::Intersection`]: keep only columns every table has.
//!
//! Each row can optionally be tagged with its origin (`_source_file`,
//! `_source_sheet`) before concatenation.
//!
//! ## Quick example: reconcile two tables
//!
//! ```rust
//! use sheet_combine::merge::{concatenate, JoinPolicy};
//! use sheet_combine::types::{Schema, Table, Value};
//!
//! let orders = Table::new(
//!     Schema::new(vec!["id".into(), "name".into()]),
//!     vec![vec![Value::Int64(1), Value::Utf8("Ada".into())]],
//! );
//! let prices = Table::new(
//!     Schema::new(vec!["id".into(), "price".into()]),
//!     vec![vec![Value::Int64(2), Value::Float64(9.5)]],
//! );
//!
//! let merged = concatenate(&[orders, prices], JoinPolicy::Union);
//! assert_eq!(merged.schema.columns, vec!["id", "name", "price"]);
//! assert_eq!(merged.row_count(), 2);
//! assert_eq!(merged.value_at(0, "price"), Some(&Value::Null));
//! ```
//!
//! ## End to end: many files, one sheet each, CSV download
//!
//! ```rust
//! use sheet_combine::codec::export::to_csv_bytes;
//! use sheet_combine::pipeline::{merge_files, MergeOptions, SheetSelector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![
//!     ("jan.csv".to_string(), b"date,amount\n2024-01-02,10\n".to_vec()),
//!     ("feb.csv".to_string(), b"date,amount\n2024-02-03,12\n".to_vec()),
//! ];
//!
//! // Empty sheet-name input from the form means "first sheet of each file".
//! let selector = SheetSelector::from_optional_name(None);
//! let merged = merge_files(&files, &selector, &MergeOptions::default())?;
//! assert_eq!(merged.row_count(), 2);
//!
//! let csv = to_csv_bytes(&merged)?; // UTF-8 BOM + header + rows
//! assert!(csv.starts_with(&[0xEF, 0xBB, 0xBF]));
//! # Ok(())
//! # }
//! ```
//!
//! Workbook inputs (`.xlsx`, `.xls`, `.ods`, ...) go through the same
//! pipeline; see [`pipeline::merge_workbook_sheets`] for the
//! all-sheets-of-one-file variant.
//!
//! ## Modules
//!
//! - [`types`]: dynamic-schema table model
//! - [`codec`]: decode spreadsheet/CSV bytes, encode the merged table
//! - [`merge`]: provenance tagging + schema-reconciling concatenation
//! - [`pipeline`]: the two merge orchestrators and observability hooks
//! - [`error`]: error types used across the crate

pub mod codec;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod types;

pub use error::{MergeError, MergeResult};
