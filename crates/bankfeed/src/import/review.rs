use bigdecimal::{BigDecimal, RoundingMode};
use serde::Serialize;

use crate::import::dedupe::{ImportAction, ImportCandidate, MatchType};
use crate::{ImportError, ImportResult};

/// Income/expense counts and absolute-value totals over the reviewed batch.
/// Exact duplicates still set to skip are left out; overriding their action
/// brings them back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub income_count: usize,
    pub expense_count: usize,
    pub income_total: BigDecimal,
    pub expense_total: BigDecimal,
}

/// The candidate batch under user review.
#[derive(Debug, Clone)]
pub struct ImportReview {
    candidates: Vec<ImportCandidate>,
}

impl ImportReview {
    pub fn new(candidates: Vec<ImportCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[ImportCandidate] {
        &self.candidates
    }

    pub fn summary(&self) -> ReviewSummary {
        let zero = BigDecimal::from(0);
        let mut summary = ReviewSummary {
            income_count: 0,
            expense_count: 0,
            income_total: zero.clone(),
            expense_total: zero.clone(),
        };

        for candidate in &self.candidates {
            if candidate.match_type == MatchType::Exact && candidate.action == ImportAction::Skip {
                continue;
            }
            if candidate.amount < zero {
                summary.expense_count += 1;
                summary.expense_total += candidate.amount.abs();
            } else {
                summary.income_count += 1;
                summary.income_total += candidate.amount.clone();
            }
        }

        summary
    }

    /// Set action=import on every new candidate. Rows the user already
    /// chose an action for keep that choice; others are untouched.
    /// Idempotent.
    pub fn import_all_new(&mut self) {
        for candidate in &mut self.candidates {
            if candidate.match_type == MatchType::New && !candidate.overridden {
                candidate.action = ImportAction::Import;
            }
        }
    }

    /// Set action=skip on every exact duplicate. Rows the user already
    /// chose an action for keep that choice; others are untouched.
    /// Idempotent.
    pub fn skip_all_duplicates(&mut self) {
        for candidate in &mut self.candidates {
            if candidate.match_type == MatchType::Exact && !candidate.overridden {
                candidate.action = ImportAction::Skip;
            }
        }
    }

    /// Per-row user override. Update requires a matched ledger record.
    /// An overridden row is pinned: bulk operations no longer move it.
    pub fn set_action(&mut self, candidate_id: &str, action: ImportAction) -> ImportResult<()> {
        let candidate = self
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == candidate_id)
            .ok_or_else(|| ImportError::UnknownCandidate(candidate_id.to_string()))?;
        if action == ImportAction::Update && candidate.matched_record_id.is_none() {
            return Err(ImportError::UpdateWithoutMatch);
        }
        candidate.action = action;
        candidate.overridden = true;
        Ok(())
    }

    pub fn set_selected(&mut self, candidate_id: &str, selected: bool) -> ImportResult<()> {
        let candidate = self
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == candidate_id)
            .ok_or_else(|| ImportError::UnknownCandidate(candidate_id.to_string()))?;
        candidate.selected = selected;
        Ok(())
    }

    /// Everything that will actually be written: import and update rows.
    /// Skip is always excluded regardless of match type.
    pub fn final_import_set(&self) -> Vec<&ImportCandidate> {
        self.candidates
            .iter()
            .filter(|candidate| {
                matches!(candidate.action, ImportAction::Import | ImportAction::Update)
            })
            .collect()
    }

    pub fn into_candidates(self) -> Vec<ImportCandidate> {
        self.candidates
    }
}

/// Absolute-value currency string rounded half-up to two decimal places
/// ("1250.00"). Sign is conveyed separately by the classification.
pub fn format_amount(value: &BigDecimal) -> String {
    value
        .abs()
        .with_scale_round(2, RoundingMode::HalfUp)
        .to_string()
}
