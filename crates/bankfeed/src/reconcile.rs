//! Cross-cutting issue detection over a matched import batch. Severity is
//! fixed per issue kind, never derived from counts.

use serde::Serialize;

use crate::import::dedupe::{ImportCandidate, MatchType};

const SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    PotentialDuplicates,
    MissingCategories,
    DateGaps,
}

impl IssueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PotentialDuplicates => "potential_duplicates",
            Self::MissingCategories => "missing_categories",
            Self::DateGaps => "date_gaps",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::PotentialDuplicates => Severity::High,
            Self::MissingCategories => Severity::Medium,
            Self::DateGaps => Severity::Low,
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::PotentialDuplicates => 0,
            Self::MissingCategories => 1,
            Self::DateGaps => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub count: usize,
    pub sample_details: Vec<String>,
}

/// Aggregate ledger counts, carried for display alongside the issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerContext {
    pub existing_income_count: usize,
    pub existing_expense_count: usize,
}

#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    issues: Vec<ReconciliationIssue>,
    pub context: LedgerContext,
}

impl ReconciliationReport {
    pub fn issues(&self) -> &[ReconciliationIssue] {
        &self.issues
    }

    pub fn is_all_clear(&self) -> bool {
        self.issues.is_empty()
    }

    /// User dismissal: removes one issue kind without recomputing the rest.
    /// Returns whether anything was removed.
    pub fn dismiss(&mut self, kind: IssueKind) -> bool {
        let before = self.issues.len();
        self.issues.retain(|issue| issue.kind != kind);
        self.issues.len() != before
    }
}

/// Analyze a classified and matched batch. Date gaps (e.g. months with no
/// transactions) are detected by an external collaborator and passed in as
/// labels.
pub fn analyze(
    candidates: &[ImportCandidate],
    date_gaps: &[String],
    context: &LedgerContext,
) -> ReconciliationReport {
    let mut issues = Vec::new();

    let duplicates: Vec<&ImportCandidate> = candidates
        .iter()
        .filter(|candidate| {
            matches!(candidate.match_type, MatchType::Exact | MatchType::Likely)
        })
        .collect();
    if !duplicates.is_empty() {
        issues.push(issue(
            IssueKind::PotentialDuplicates,
            duplicates.len(),
            duplicates
                .iter()
                .map(|candidate| candidate.description.clone()),
        ));
    }

    let uncategorized: Vec<&ImportCandidate> = candidates
        .iter()
        .filter(|candidate| candidate.category.is_none())
        .collect();
    if !uncategorized.is_empty() {
        issues.push(issue(
            IssueKind::MissingCategories,
            uncategorized.len(),
            uncategorized
                .iter()
                .map(|candidate| candidate.description.clone()),
        ));
    }

    if !date_gaps.is_empty() {
        issues.push(issue(
            IssueKind::DateGaps,
            date_gaps.len(),
            date_gaps.iter().cloned(),
        ));
    }

    issues.sort_by_key(|entry| (entry.severity.rank(), entry.kind.rank()));

    ReconciliationReport {
        issues,
        context: *context,
    }
}

fn issue(
    kind: IssueKind,
    count: usize,
    details: impl Iterator<Item = String>,
) -> ReconciliationIssue {
    ReconciliationIssue {
        kind,
        severity: kind.severity(),
        count,
        sample_details: details.take(SAMPLE_LIMIT).collect(),
    }
}
