use serde::Serialize;
use thiserror::Error;

/// Fatal pipeline errors. Row-level problems are collected as
/// [`ClassificationError`] values instead and never abort a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("column mapping is incomplete: {0}")]
    MappingIncomplete(String),
    #[error("mapped column `{0}` is not present in the source headers")]
    UnknownColumn(String),
    #[error("import source is empty")]
    EmptySource,
    #[error("row {0} is malformed or not UTF-8")]
    MalformedCsv(usize),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("action `update` requires a matched ledger record")]
    UpdateWithoutMatch,
    #[error("no import candidate with id `{0}`")]
    UnknownCandidate(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("value is not numeric: `{0}`")]
    NotNumeric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationErrorKind {
    UnparseableDate,
    UnparseableAmount,
    MissingRequiredField,
}

impl ClassificationErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnparseableDate => "unparseable_date",
            Self::UnparseableAmount => "unparseable_amount",
            Self::MissingRequiredField => "missing_required_field",
        }
    }
}

/// One rejected source row. `row` is the 1-based index in the input batch.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("row {row}: {detail}")]
pub struct ClassificationError {
    pub row: usize,
    pub kind: ClassificationErrorKind,
    pub detail: String,
}

pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::{ClassificationError, ClassificationErrorKind};

    #[test]
    fn classification_errors_serialize_with_snake_case_kinds() {
        let error = ClassificationError {
            row: 3,
            kind: ClassificationErrorKind::UnparseableDate,
            detail: "date `31/31/2026` does not match format `dd/MM/yyyy`".to_string(),
        };

        let rendered = serde_json::to_value(&error).unwrap();
        assert_eq!(rendered["row"], 3);
        assert_eq!(rendered["kind"], "unparseable_date");
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(
            ClassificationErrorKind::MissingRequiredField.as_str(),
            "missing_required_field"
        );
        assert_eq!(
            ClassificationErrorKind::UnparseableAmount.as_str(),
            "unparseable_amount"
        );
    }
}
