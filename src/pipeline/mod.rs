//! Pipeline orchestrators: loader → provenance tagger → concatenator.
//!
//! Two merge variants are exposed, mirroring the two ways users combine
//! spreadsheets:
//!
//! - [`merge_workbook_sheets`]: all sheets of one workbook.
//! - [`merge_files`]: many files, with a [`SheetSelector`] applied to each.
//!
//! Both are synchronous and request-scoped: inputs are fully in memory, each
//! stage hands a fresh [`Table`] to the next, and nothing is retained after
//! the call returns. An optional [`MergeObserver`] receives
//! success/warning/failure events.

pub mod observability;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{self, SourceFormat};
use crate::error::{MergeError, MergeResult};
use crate::merge::{concatenate, tag, JoinPolicy, SheetOrigin};
use crate::types::Table;

pub use observability::{
    CompositeObserver, FileObserver, MergeContext, MergeObserver, MergeSeverity, MergeStats,
    StdErrObserver,
};

/// Which sheet(s) to take from each input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSelector {
    /// The sheet at position 0, without the caller naming it. Provenance
    /// records the "first sheet" sentinel rather than an index.
    First,
    /// A single sheet selected by exact name.
    Name(String),
    /// A single sheet selected by zero-based position.
    Index(usize),
    /// Every sheet, in workbook order.
    All,
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::First
    }
}

impl SheetSelector {
    /// Map the form layer's optional sheet-name string to a selector.
    ///
    /// `None` and the empty string both mean "first sheet": an empty text
    /// input is not a sheet named `""`.
    pub fn from_optional_name(name: Option<&str>) -> Self {
        match name {
            Some(s) if !s.is_empty() => Self::Name(s.to_string()),
            _ => Self::First,
        }
    }
}

/// Options controlling a merge request.
///
/// Defaults match the interactive tool this engine backs: union policy,
/// provenance columns on.
#[derive(Clone)]
pub struct MergeOptions {
    /// How divergent schemas are reconciled.
    pub policy: JoinPolicy,
    /// Whether to append `_source_file` / `_source_sheet` columns.
    pub add_source: bool,
    /// Optional observer for logging/warnings.
    pub observer: Option<Arc<dyn MergeObserver>>,
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("policy", &self.policy)
            .field("add_source", &self.add_source)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            policy: JoinPolicy::default(),
            add_source: true,
            observer: None,
        }
    }
}

/// Merge every sheet of one workbook into a single table.
///
/// Sheets are decoded in workbook order, tagged with
/// `(file_name, sheet name)` when `options.add_source` is set, and
/// concatenated under `options.policy`.
///
/// # Examples
///
/// ```
/// use rust_xlsxwriter::Workbook;
/// use sheet_combine::pipeline::{merge_workbook_sheets, MergeOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut wb = Workbook::new();
/// for sheet_name in ["Jan", "Feb"] {
///     let ws = wb.add_worksheet();
///     ws.set_name(sheet_name)?;
///     ws.write_string(0, 0, "amount")?;
///     ws.write_number(1, 0, 10.0)?;
/// }
/// let bytes = wb.save_to_buffer()?;
///
/// let merged = merge_workbook_sheets("report.xlsx", &bytes, &MergeOptions::default())?;
/// assert_eq!(merged.row_count(), 2);
/// assert!(merged.schema.contains("_source_sheet"));
/// # Ok(())
/// # }
/// ```
pub fn merge_workbook_sheets(
    file_name: &str,
    bytes: &[u8],
    options: &MergeOptions,
) -> MergeResult<Table> {
    let ctx = MergeContext {
        source: file_name.to_string(),
        policy: options.policy,
    };

    match decode_workbook_tables(file_name, bytes, options) {
        Ok(tagged) => {
            let merged = reconcile(&tagged, options, &ctx);
            observe_success(options, &ctx, tagged.len(), &merged);
            Ok(merged)
        }
        Err(e) => {
            observe_failure(options, &ctx, &e);
            Err(e)
        }
    }
}

/// Merge one (or all) sheet(s) from each of several files into a single
/// table.
///
/// Files are processed in the given order, which fixes the row order of the
/// merged output. The same `selector` applies to every file; CSV files are
/// treated as single-sheet sources, so only [`SheetSelector::First`],
/// [`SheetSelector::Index`] 0, and [`SheetSelector::All`] select their one
/// table. A file that fails to decode fails the whole request with a typed
/// error; no partial result is returned.
///
/// # Examples
///
/// ```
/// use sheet_combine::merge::JoinPolicy;
/// use sheet_combine::pipeline::{merge_files, MergeOptions, SheetSelector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let files = vec![
///     ("a.csv".to_string(), b"id,name\n1,Ada\n".to_vec()),
///     ("b.csv".to_string(), b"id,price\n2,9.5\n".to_vec()),
/// ];
///
/// let options = MergeOptions {
///     policy: JoinPolicy::Union,
///     add_source: false,
///     ..Default::default()
/// };
/// let merged = merge_files(&files, &SheetSelector::First, &options)?;
/// assert_eq!(merged.schema.columns, vec!["id", "name", "price"]);
/// assert_eq!(merged.row_count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn merge_files(
    files: &[(String, Vec<u8>)],
    selector: &SheetSelector,
    options: &MergeOptions,
) -> MergeResult<Table> {
    let ctx = MergeContext {
        source: request_label(files),
        policy: options.policy,
    };

    let mut tagged: Vec<Table> = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        match select_from_file(name, bytes, selector) {
            Ok(parts) => {
                for (origin, table) in parts {
                    tagged.push(tag(&table, name, &origin, options.add_source));
                }
            }
            Err(e) => {
                let file_ctx = MergeContext {
                    source: name.clone(),
                    policy: options.policy,
                };
                observe_failure(options, &file_ctx, &e);
                return Err(e);
            }
        }
    }

    let merged = reconcile(&tagged, options, &ctx);
    observe_success(options, &ctx, tagged.len(), &merged);
    Ok(merged)
}

fn request_label(files: &[(String, Vec<u8>)]) -> String {
    match files {
        [(name, _)] => name.clone(),
        _ => format!("{} files", files.len()),
    }
}

fn decode_workbook_tables(
    file_name: &str,
    bytes: &[u8],
    options: &MergeOptions,
) -> MergeResult<Vec<Table>> {
    let sheets = codec::excel::decode_workbook(bytes)?;
    Ok(sheets
        .into_iter()
        .map(|(sheet_name, table)| {
            tag(
                &table,
                file_name,
                &SheetOrigin::Named(sheet_name),
                options.add_source,
            )
        })
        .collect())
}

fn select_from_file(
    name: &str,
    bytes: &[u8],
    selector: &SheetSelector,
) -> MergeResult<Vec<(SheetOrigin, Table)>> {
    match SourceFormat::from_file_name(name)? {
        SourceFormat::Excel => match selector {
            SheetSelector::First => Ok(vec![(
                SheetOrigin::First,
                codec::excel::decode_sheet_at(bytes, 0)?,
            )]),
            SheetSelector::Name(sheet) => Ok(vec![(
                SheetOrigin::Named(sheet.clone()),
                codec::excel::decode_sheet_by_name(bytes, sheet)?,
            )]),
            SheetSelector::Index(idx) => Ok(vec![(
                SheetOrigin::Index(*idx),
                codec::excel::decode_sheet_at(bytes, *idx)?,
            )]),
            SheetSelector::All => Ok(codec::excel::decode_workbook(bytes)?
                .into_iter()
                .map(|(sheet, table)| (SheetOrigin::Named(sheet), table))
                .collect()),
        },
        SourceFormat::Csv => match selector {
            SheetSelector::First | SheetSelector::Index(0) | SheetSelector::All => Ok(vec![(
                SheetOrigin::First,
                codec::csv::decode_table(bytes)?,
            )]),
            SheetSelector::Name(sheet) => Err(MergeError::SheetNotFound {
                requested: sheet.clone(),
                available: Vec::new(),
            }),
            SheetSelector::Index(idx) => Err(MergeError::SheetNotFound {
                requested: idx.to_string(),
                available: Vec::new(),
            }),
        },
    }
}

fn reconcile(tagged: &[Table], options: &MergeOptions, ctx: &MergeContext) -> Table {
    let merged = concatenate(tagged, options.policy);

    if options.policy == JoinPolicy::Intersection
        && tagged.len() >= 2
        && merged.schema.is_empty()
        && tagged.iter().any(|t| !t.schema.is_empty())
    {
        if let Some(obs) = options.observer.as_ref() {
            obs.on_warning(
                ctx,
                &format!(
                    "input tables share no columns; result has {} rows and 0 columns",
                    merged.row_count()
                ),
            );
        }
    }

    merged
}

fn observe_success(options: &MergeOptions, ctx: &MergeContext, tables: usize, merged: &Table) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_success(
            ctx,
            MergeStats {
                tables,
                rows: merged.row_count(),
                columns: merged.column_count(),
            },
        );
    }
}

fn observe_failure(options: &MergeOptions, ctx: &MergeContext, error: &MergeError) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_failure(ctx, severity_for_error(error), error);
    }
}

fn severity_for_error(e: &MergeError) -> MergeSeverity {
    match e {
        MergeError::Io(_) => MergeSeverity::Critical,
        _ => MergeSeverity::Error,
    }
}
