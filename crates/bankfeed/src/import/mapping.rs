use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Policy for deriving income/expense sign from raw amount data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountInterpretation {
    /// Positive is income, negative is expense.
    #[default]
    Standard,
    /// Signs are reversed (credit-card style exports).
    Inverted,
    /// Two source columns; the non-empty one implies the sign.
    SeparateColumns,
}

impl AmountInterpretation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Inverted => "inverted",
            Self::SeparateColumns => "separate_columns",
        }
    }
}

/// Assignment of semantic roles to source columns, by header name.
///
/// Fields are set freely with no cross-validation; `is_complete` is the
/// single gate the classifier checks before any row is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub date_column: Option<String>,
    pub description_column: Option<String>,
    pub amount_column: Option<String>,
    pub income_column: Option<String>,
    pub expense_column: Option<String>,
    pub category_column: Option<String>,
    pub date_format: Option<String>,
    pub interpretation: AmountInterpretation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource<'a> {
    Single(&'a str),
    Split { income: &'a str, expense: &'a str },
}

impl ColumnMapping {
    /// Generic keyword auto-detection, independent of any bank signature.
    /// First header matching a role keyword wins; the date format is left
    /// for the caller to choose.
    pub fn auto_detect(headers: &[String]) -> Self {
        Self {
            date_column: find_header(headers, &["date"]),
            description_column: find_header(headers, &["description", "desc", "narrative"]),
            amount_column: find_header(headers, &["amount", "value"]),
            ..Self::default()
        }
    }

    /// Which amount source is configured, respecting the interpretation.
    pub fn amount_source(&self) -> Option<AmountSource<'_>> {
        match self.interpretation {
            AmountInterpretation::SeparateColumns => {
                let income = self.income_column.as_deref()?;
                let expense = self.expense_column.as_deref()?;
                Some(AmountSource::Split { income, expense })
            }
            AmountInterpretation::Standard | AmountInterpretation::Inverted => {
                self.amount_column.as_deref().map(AmountSource::Single)
            }
        }
    }

    /// Holds iff date, description, exactly one amount source consistent
    /// with the interpretation, and a non-empty date format are all set.
    pub fn is_complete(&self) -> bool {
        let single = self.amount_column.is_some();
        let split = self.income_column.is_some() && self.expense_column.is_some();
        let amount_ok = match self.interpretation {
            AmountInterpretation::SeparateColumns => split && !single,
            AmountInterpretation::Standard | AmountInterpretation::Inverted => single && !split,
        };

        self.date_column.is_some()
            && self.description_column.is_some()
            && amount_ok
            && self
                .date_format
                .as_deref()
                .is_some_and(|format| !format.trim().is_empty())
    }

    /// Headers assigned to more than one role. Nothing rejects these, but
    /// callers should surface them instead of importing silently.
    pub fn conflicting_columns(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let roles = [
            &self.date_column,
            &self.description_column,
            &self.amount_column,
            &self.income_column,
            &self.expense_column,
            &self.category_column,
        ];
        for column in roles.into_iter().flatten() {
            *counts.entry(column.as_str()).or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|(_, uses)| *uses > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Human-readable list of what `is_complete` still needs.
    pub(crate) fn missing_pieces(&self) -> String {
        let mut missing = Vec::new();
        if self.date_column.is_none() {
            missing.push("date column");
        }
        if self.description_column.is_none() {
            missing.push("description column");
        }
        let single = self.amount_column.is_some();
        let split = self.income_column.is_some() && self.expense_column.is_some();
        match self.interpretation {
            AmountInterpretation::SeparateColumns => {
                if !split {
                    missing.push("income and expense columns");
                } else if single {
                    missing.push("amount column conflicts with income/expense columns");
                }
            }
            AmountInterpretation::Standard | AmountInterpretation::Inverted => {
                if !single {
                    missing.push("amount column");
                } else if split {
                    missing.push("income/expense columns conflict with amount column");
                }
            }
        }
        if self
            .date_format
            .as_deref()
            .is_none_or(|format| format.trim().is_empty())
        {
            missing.push("date format");
        }
        missing.join(", ")
    }
}

fn find_header(headers: &[String], keywords: &[&str]) -> Option<String> {
    headers
        .iter()
        .find(|header| {
            let lowered = header.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword))
        })
        .cloned()
}

/// Translate a bank-export date pattern (`dd/MM/yyyy`, `dd MMM yyyy`) into
/// chrono specifiers. Patterns already using `%` pass through untouched.
pub(crate) fn chrono_date_pattern(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let characters: Vec<char> = pattern.chars().collect();
    let mut output = String::new();
    let mut index = 0;
    while index < characters.len() {
        let current = characters[index];
        let run = characters[index..]
            .iter()
            .take_while(|candidate| **candidate == current)
            .count();
        match current {
            'y' => output.push_str(if run >= 4 { "%Y" } else { "%y" }),
            'M' => output.push_str(if run >= 3 { "%b" } else { "%m" }),
            'd' => output.push_str("%d"),
            other => {
                for _ in 0..run {
                    output.push(other);
                }
            }
        }
        index += run;
    }
    output
}

pub(crate) fn parse_date(value: &str, pattern: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), &chrono_date_pattern(pattern)).ok()
}
