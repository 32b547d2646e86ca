use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

use crate::import::classify::ClassifiedTransaction;

/// One previously recorded ledger transaction, used only for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub description: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    New,
    Likely,
    Exact,
}

impl MatchType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Likely => "likely",
            Self::Exact => "exact",
        }
    }

    /// Closed lookup; the matcher never overrides a later user choice.
    pub const fn default_action(self) -> ImportAction {
        match self {
            Self::New | Self::Likely => ImportAction::Import,
            Self::Exact => ImportAction::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Import,
    Update,
    Skip,
}

impl ImportAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Update => "update",
            Self::Skip => "skip",
        }
    }
}

/// Likely-match tolerance. A window of 1 means an amount-identical record
/// dated one day apart still counts as a probable duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTolerance {
    pub date_window_days: i64,
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            date_window_days: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportCandidate {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub category: Option<String>,
    pub match_type: MatchType,
    pub matched_record_id: Option<String>,
    pub matched_record: Option<ExistingRecord>,
    pub action: ImportAction,
    /// Set once the user picks an action for this row; bulk operations
    /// leave overridden rows alone.
    pub overridden: bool,
    pub selected: bool,
}

/// Match one classified transaction against the ledger snapshot.
///
/// Rule ladder, first hit wins: exact (same date, signed amount, and
/// normalized description), then likely (identical amount within the date
/// window, or same date and amount with an overlapping description).
pub fn match_candidate<'a>(
    transaction: &ClassifiedTransaction,
    ledger: &'a [ExistingRecord],
    tolerance: &MatchTolerance,
) -> (MatchType, Option<&'a ExistingRecord>) {
    let normalized = normalize_description(&transaction.description);

    for record in ledger {
        if record.date == transaction.date
            && record.amount == transaction.amount
            && normalize_description(&record.description) == normalized
        {
            return (MatchType::Exact, Some(record));
        }
    }

    for record in ledger {
        if record.amount != transaction.amount {
            continue;
        }
        let day_diff = (transaction.date - record.date).num_days().abs();
        if day_diff != 0 && day_diff <= tolerance.date_window_days {
            return (MatchType::Likely, Some(record));
        }
        if day_diff == 0
            && descriptions_overlap(&normalized, &normalize_description(&record.description))
        {
            return (MatchType::Likely, Some(record));
        }
    }

    (MatchType::New, None)
}

/// Build review candidates for a classified batch, preserving row order.
pub fn build_candidates(
    transactions: &[ClassifiedTransaction],
    ledger: &[ExistingRecord],
    tolerance: &MatchTolerance,
) -> Vec<ImportCandidate> {
    transactions
        .iter()
        .map(|transaction| {
            let (match_type, matched) = match_candidate(transaction, ledger, tolerance);
            ImportCandidate {
                id: transaction.id.clone(),
                date: transaction.date,
                description: transaction.description.clone(),
                amount: transaction.amount.clone(),
                category: transaction.suggested_category.clone(),
                match_type,
                matched_record_id: matched.map(|record| record.id.clone()),
                matched_record: matched.cloned(),
                action: match_type.default_action(),
                overridden: false,
                selected: true,
            }
        })
        .collect()
}

pub(crate) fn normalize_description(value: &str) -> String {
    value
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<String>>()
        .join(" ")
}

// Exact-equal descriptions are handled by the exact pass; here either side
// containing the other counts as similar.
fn descriptions_overlap(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(right) || right.contains(left)
}
