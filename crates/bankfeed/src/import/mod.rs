pub mod amount;
pub mod bank_formats;
pub mod classify;
pub mod dedupe;
pub mod mapping;
pub mod review;
pub mod wizard;

use crate::ImportResult;
use crate::error::ClassificationError;
use crate::import::classify::{CategorySuggester, classify_rows};
use crate::import::dedupe::{ExistingRecord, ImportCandidate, MatchTolerance, build_candidates};
use crate::import::mapping::ColumnMapping;

/// Output of the full classification and matching pass. Candidates are in
/// source row order; failed rows land in `errors` without aborting the rest.
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub candidates: Vec<ImportCandidate>,
    pub errors: Vec<ClassificationError>,
    pub rows_read: usize,
}

/// Run a raw table through classification and duplicate matching against the
/// ledger snapshot. The mapping must already be complete; an incomplete one
/// is fatal before any row is touched.
pub fn prepare_import(
    headers: &[String],
    rows: &[Vec<String>],
    mapping: &ColumnMapping,
    ledger: &[ExistingRecord],
    tolerance: &MatchTolerance,
    suggester: Option<&dyn CategorySuggester>,
) -> ImportResult<PreparedImport> {
    let batch = classify_rows(headers, rows, mapping, suggester)?;
    let candidates = build_candidates(&batch.transactions, ledger, tolerance);
    Ok(PreparedImport {
        candidates,
        errors: batch.errors,
        rows_read: batch.rows_read,
    })
}
