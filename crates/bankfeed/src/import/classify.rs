use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use ulid::Ulid;

use crate::error::{ClassificationError, ClassificationErrorKind};
use crate::import::amount::parse_amount;
use crate::import::mapping::{AmountInterpretation, AmountSource, ColumnMapping, parse_date};
use crate::{ImportError, ImportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Income,
    Expense,
}

impl Classification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// A normalized row ready for duplicate matching. `amount` is always signed
/// per the standard convention (income positive, expense negative)
/// regardless of the source interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub classification: Classification,
    pub suggested_category: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ClassifiedBatch {
    pub transactions: Vec<ClassifiedTransaction>,
    pub errors: Vec<ClassificationError>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySuggestion {
    pub category: String,
    pub confidence: f64,
}

/// Seam for an external category classifier. Suggestions are carried
/// through to candidates; the pipeline never second-guesses them.
pub trait CategorySuggester {
    fn suggest(&self, description: &str) -> Option<CategorySuggestion>;
}

/// Deterministic keyword rules covering common UK merchants. First rule
/// with any matching keyword wins.
pub struct KeywordSuggester;

const KEYWORD_RULES: &[(&[&str], &str, f64)] = &[
    (&["SALARY", "PAYROLL", "WAGES"], "Salary", 0.95),
    (&["HMRC"], "Tax", 0.95),
    (
        &["TESCO", "SAINSBURY", "ASDA", "MORRISONS", "ALDI", "LIDL", "WAITROSE"],
        "Groceries",
        0.9,
    ),
    (
        &["BRITISH GAS", "EDF ENERGY", "OCTOPUS ENERGY", "THAMES WATER"],
        "Utilities",
        0.9,
    ),
    (
        &["NETFLIX", "SPOTIFY", "DISNEY", "AMAZON PRIME", "YOUTUBE PREMIUM"],
        "Subscriptions",
        0.9,
    ),
    (
        &["TFL", "TRAINLINE", "NATIONAL RAIL", "UBER"],
        "Transport",
        0.85,
    ),
    (&["RENT", "MORTGAGE"], "Housing", 0.8),
    (&["PAYPAL"], "Online payments", 0.6),
];

impl CategorySuggester for KeywordSuggester {
    fn suggest(&self, description: &str) -> Option<CategorySuggestion> {
        let upper = description.to_uppercase();
        for (keywords, category, confidence) in KEYWORD_RULES {
            if keywords.iter().any(|keyword| upper.contains(keyword)) {
                return Some(CategorySuggestion {
                    category: (*category).to_string(),
                    confidence: *confidence,
                });
            }
        }
        None
    }
}

enum AmountIndices {
    Single(usize),
    Split { income: usize, expense: usize },
}

struct ResolvedColumns {
    date: usize,
    description: usize,
    amount: AmountIndices,
    category: Option<usize>,
}

/// Classify a batch of raw rows against a frozen, complete mapping.
///
/// Row-level failures are collected in the result; an incomplete mapping is
/// fatal and returns before any row is touched.
pub fn classify_rows(
    headers: &[String],
    rows: &[Vec<String>],
    mapping: &ColumnMapping,
    suggester: Option<&dyn CategorySuggester>,
) -> ImportResult<ClassifiedBatch> {
    if !mapping.is_complete() {
        return Err(ImportError::MappingIncomplete(mapping.missing_pieces()));
    }
    let columns = resolve_columns(headers, mapping)?;
    let date_format = mapping.date_format.as_deref().unwrap_or_default();

    let mut transactions = Vec::new();
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match classify_row(row, row_number, &columns, date_format, mapping, suggester) {
            Ok(transaction) => transactions.push(transaction),
            Err(error) => errors.push(error),
        }
    }

    Ok(ClassifiedBatch {
        transactions,
        errors,
        rows_read: rows.len(),
    })
}

fn classify_row(
    row: &[String],
    row_number: usize,
    columns: &ResolvedColumns,
    date_format: &str,
    mapping: &ColumnMapping,
    suggester: Option<&dyn CategorySuggester>,
) -> Result<ClassifiedTransaction, ClassificationError> {
    let date_raw = required_cell(row, columns.date, row_number, "date")?;
    let date = parse_date(date_raw, date_format).ok_or_else(|| ClassificationError {
        row: row_number,
        kind: ClassificationErrorKind::UnparseableDate,
        detail: format!("date `{}` does not match format `{date_format}`", date_raw.trim()),
    })?;

    let description = required_cell(row, columns.description, row_number, "description")?
        .trim()
        .to_string();

    let amount = resolve_signed_amount(row, row_number, columns, mapping.interpretation)?;
    let classification = if amount < BigDecimal::from(0) {
        Classification::Expense
    } else {
        // Zero classifies as income by convention.
        Classification::Income
    };

    let source_category = columns
        .category
        .and_then(|index| row.get(index))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let (suggested_category, confidence) = match source_category {
        Some(category) => (Some(category), None),
        None => match suggester.and_then(|s| s.suggest(&description)) {
            Some(suggestion) => (Some(suggestion.category), Some(suggestion.confidence)),
            None => (None, None),
        },
    };

    Ok(ClassifiedTransaction {
        id: Ulid::new().to_string(),
        date,
        description,
        amount,
        classification,
        suggested_category,
        confidence,
    })
}

fn resolve_signed_amount(
    row: &[String],
    row_number: usize,
    columns: &ResolvedColumns,
    interpretation: AmountInterpretation,
) -> Result<BigDecimal, ClassificationError> {
    match &columns.amount {
        AmountIndices::Single(index) => {
            let raw = required_cell(row, *index, row_number, "amount")?;
            let parsed = parse_amount(raw).map_err(|_| ClassificationError {
                row: row_number,
                kind: ClassificationErrorKind::UnparseableAmount,
                detail: format!("amount `{}` is not numeric", raw.trim()),
            })?;
            match interpretation {
                AmountInterpretation::Inverted => Ok(-parsed),
                AmountInterpretation::Standard | AmountInterpretation::SeparateColumns => {
                    Ok(parsed)
                }
            }
        }
        AmountIndices::Split { income, expense } => {
            let income_raw = row.get(*income).map(|value| value.trim()).unwrap_or("");
            let expense_raw = row.get(*expense).map(|value| value.trim()).unwrap_or("");
            match (income_raw.is_empty(), expense_raw.is_empty()) {
                (true, true) => Err(ClassificationError {
                    row: row_number,
                    kind: ClassificationErrorKind::MissingRequiredField,
                    detail: "neither income nor expense column has a value".to_string(),
                }),
                (false, false) => Err(ClassificationError {
                    row: row_number,
                    kind: ClassificationErrorKind::MissingRequiredField,
                    detail: "both income and expense columns have values".to_string(),
                }),
                (false, true) => parse_split_cell(income_raw, row_number).map(|value| value.abs()),
                (true, false) => {
                    parse_split_cell(expense_raw, row_number).map(|value| -value.abs())
                }
            }
        }
    }
}

fn parse_split_cell(raw: &str, row_number: usize) -> Result<BigDecimal, ClassificationError> {
    parse_amount(raw).map_err(|_| ClassificationError {
        row: row_number,
        kind: ClassificationErrorKind::UnparseableAmount,
        detail: format!("amount `{raw}` is not numeric"),
    })
}

fn required_cell<'a>(
    row: &'a [String],
    index: usize,
    row_number: usize,
    field: &str,
) -> Result<&'a str, ClassificationError> {
    let value = row.get(index).map(String::as_str).unwrap_or("");
    if value.trim().is_empty() {
        return Err(ClassificationError {
            row: row_number,
            kind: ClassificationErrorKind::MissingRequiredField,
            detail: format!("{field} cell is missing or empty"),
        });
    }
    Ok(value)
}

fn resolve_columns(headers: &[String], mapping: &ColumnMapping) -> ImportResult<ResolvedColumns> {
    let date = resolve_header(headers, mapping.date_column.as_deref())?;
    let description = resolve_header(headers, mapping.description_column.as_deref())?;
    let amount = match mapping.amount_source() {
        Some(AmountSource::Single(column)) => {
            AmountIndices::Single(resolve_header(headers, Some(column))?)
        }
        Some(AmountSource::Split { income, expense }) => AmountIndices::Split {
            income: resolve_header(headers, Some(income))?,
            expense: resolve_header(headers, Some(expense))?,
        },
        None => {
            return Err(ImportError::MappingIncomplete(mapping.missing_pieces()));
        }
    };
    let category = match mapping.category_column.as_deref() {
        Some(column) => Some(resolve_header(headers, Some(column))?),
        None => None,
    };

    Ok(ResolvedColumns {
        date,
        description,
        amount,
        category,
    })
}

fn resolve_header(headers: &[String], column: Option<&str>) -> ImportResult<usize> {
    let Some(name) = column else {
        return Err(ImportError::UnknownColumn(String::new()));
    };
    if let Some(index) = headers.iter().position(|header| header == name) {
        return Ok(index);
    }
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .ok_or_else(|| ImportError::UnknownColumn(name.to_string()))
}
