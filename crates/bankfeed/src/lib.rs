pub mod error;
pub mod import;
pub mod input;
pub mod reconcile;

pub use error::{
    AmountParseError, ClassificationError, ClassificationErrorKind, ImportError, ImportResult,
};
pub use import::PreparedImport;
pub use import::amount::parse_amount;
pub use import::bank_formats::{BankFormat, detect, detect_with_mapping};
pub use import::classify::{
    CategorySuggester, CategorySuggestion, Classification, ClassifiedBatch, ClassifiedTransaction,
    KeywordSuggester, classify_rows,
};
pub use import::dedupe::{
    ExistingRecord, ImportAction, ImportCandidate, MatchTolerance, MatchType, build_candidates,
    match_candidate,
};
pub use import::mapping::{AmountInterpretation, ColumnMapping};
pub use import::prepare_import;
pub use import::review::{ImportReview, ReviewSummary, format_amount};
pub use import::wizard::{MappingWizard, WizardStep};
pub use input::{CsvTable, read_csv};
pub use reconcile::{
    IssueKind, LedgerContext, ReconciliationIssue, ReconciliationReport, Severity, analyze,
};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
