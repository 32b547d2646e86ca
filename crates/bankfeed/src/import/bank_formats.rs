use std::fmt;

use serde::Serialize;

use crate::import::mapping::{AmountInterpretation, ColumnMapping};

/// Known CSV layout of a specific UK bank export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BankFormat {
    Barclays,
    Hsbc,
    Lloyds,
    Nationwide,
    Starling,
    Monzo,
    Unknown,
}

impl BankFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Barclays => "barclays",
            Self::Hsbc => "hsbc",
            Self::Lloyds => "lloyds",
            Self::Nationwide => "nationwide",
            Self::Starling => "starling",
            Self::Monzo => "monzo",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

enum AmountColumns {
    Single(&'static str),
    Split {
        income: &'static str,
        expense: &'static str,
    },
}

struct BankSignature {
    format: BankFormat,
    /// Lowercase header fragments; all must be present for a match.
    required: &'static [&'static str],
    date: &'static str,
    description: &'static str,
    amount: AmountColumns,
    date_format: &'static str,
}

// Two-amount-column layouts come first so the generic {date, description,
// amount} signature cannot shadow them. First full match wins.
const SIGNATURES: &[BankSignature] = &[
    BankSignature {
        format: BankFormat::Barclays,
        required: &["money out", "money in", "description"],
        date: "date",
        description: "description",
        amount: AmountColumns::Split {
            income: "money in",
            expense: "money out",
        },
        date_format: "dd/MM/yyyy",
    },
    BankSignature {
        format: BankFormat::Lloyds,
        required: &["transaction date", "debit amount", "credit amount"],
        date: "transaction date",
        description: "transaction description",
        amount: AmountColumns::Split {
            income: "credit amount",
            expense: "debit amount",
        },
        date_format: "dd/MM/yyyy",
    },
    BankSignature {
        format: BankFormat::Nationwide,
        required: &["transaction type", "paid out", "paid in"],
        date: "date",
        description: "description",
        amount: AmountColumns::Split {
            income: "paid in",
            expense: "paid out",
        },
        date_format: "dd MMM yyyy",
    },
    BankSignature {
        format: BankFormat::Starling,
        required: &["counter party", "amount (gbp)"],
        date: "date",
        description: "reference",
        amount: AmountColumns::Single("amount (gbp)"),
        date_format: "dd/MM/yyyy",
    },
    BankSignature {
        format: BankFormat::Monzo,
        required: &["transaction id", "amount", "description"],
        date: "date",
        description: "description",
        amount: AmountColumns::Single("amount"),
        date_format: "dd/MM/yyyy",
    },
    BankSignature {
        format: BankFormat::Hsbc,
        required: &["date", "description", "amount"],
        date: "date",
        description: "description",
        amount: AmountColumns::Single("amount"),
        date_format: "dd/MM/yyyy",
    },
];

/// Match headers against the known bank signatures.
pub fn detect(headers: &[String]) -> BankFormat {
    detect_with_mapping(headers).0
}

/// Match headers against the known bank signatures and, on a hit,
/// pre-populate a column mapping with the actual header strings found.
pub fn detect_with_mapping(headers: &[String]) -> (BankFormat, Option<ColumnMapping>) {
    let lowered = headers
        .iter()
        .map(|header| header.to_lowercase())
        .collect::<Vec<String>>();

    for signature in SIGNATURES {
        let all_present = signature
            .required
            .iter()
            .all(|fragment| lowered.iter().any(|header| header.contains(fragment)));
        if !all_present {
            continue;
        }
        return (
            signature.format,
            Some(mapping_for(signature, headers, &lowered)),
        );
    }

    (BankFormat::Unknown, None)
}

fn mapping_for(
    signature: &BankSignature,
    headers: &[String],
    lowered: &[String],
) -> ColumnMapping {
    let header_containing = |fragment: &str| -> Option<String> {
        lowered
            .iter()
            .position(|header| header.contains(fragment))
            .map(|index| headers[index].clone())
    };

    let mut mapping = ColumnMapping {
        date_column: header_containing(signature.date),
        description_column: header_containing(signature.description),
        date_format: Some(signature.date_format.to_string()),
        ..ColumnMapping::default()
    };

    match signature.amount {
        AmountColumns::Single(amount) => {
            mapping.amount_column = header_containing(amount);
            mapping.interpretation = AmountInterpretation::Standard;
        }
        AmountColumns::Split { income, expense } => {
            mapping.income_column = header_containing(income);
            mapping.expense_column = header_containing(expense);
            mapping.interpretation = AmountInterpretation::SeparateColumns;
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::{BankFormat, detect, detect_with_mapping};
    use crate::import::mapping::AmountInterpretation;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn barclays_headers_detect_with_populated_mapping() {
        let source = headers(&[
            "Date",
            "Type",
            "Description",
            "Money out",
            "Money in",
            "Balance",
        ]);
        let (format, mapping) = detect_with_mapping(&source);
        assert_eq!(format, BankFormat::Barclays);

        let mapping = mapping.unwrap();
        assert_eq!(mapping.income_column.as_deref(), Some("Money in"));
        assert_eq!(mapping.expense_column.as_deref(), Some("Money out"));
        assert_eq!(mapping.date_column.as_deref(), Some("Date"));
        assert_eq!(
            mapping.interpretation,
            AmountInterpretation::SeparateColumns
        );
        assert!(mapping.is_complete());
    }

    #[test]
    fn unknown_headers_produce_no_mapping() {
        let (format, mapping) = detect_with_mapping(&headers(&["Col1", "Col2", "Col3"]));
        assert_eq!(format, BankFormat::Unknown);
        assert!(mapping.is_none());
    }

    #[test]
    fn matching_is_case_insensitive_and_substring_based() {
        let source = headers(&["Transaction Date", "Transaction Description", "Debit Amount", "Credit Amount", "Balance"]);
        assert_eq!(detect(&source), BankFormat::Lloyds);

        let shouty = headers(&["TRANSACTION DATE", "TRANSACTION DESCRIPTION", "DEBIT AMOUNT", "CREDIT AMOUNT"]);
        assert_eq!(detect(&shouty), BankFormat::Lloyds);
    }

    #[test]
    fn generic_single_amount_signature_does_not_shadow_split_layouts() {
        // Nationwide exports carry Date/Description/Amount-like headers too;
        // the split signature must win.
        let source = headers(&["Date", "Transaction type", "Description", "Paid out", "Paid in", "Balance"]);
        assert_eq!(detect(&source), BankFormat::Nationwide);
    }

    #[test]
    fn single_amount_layouts_detect_standard_interpretation() {
        let starling = headers(&["Date", "Counter Party", "Reference", "Type", "Amount (GBP)", "Balance (GBP)"]);
        let (format, mapping) = detect_with_mapping(&starling);
        assert_eq!(format, BankFormat::Starling);
        let mapping = mapping.unwrap();
        assert_eq!(mapping.amount_column.as_deref(), Some("Amount (GBP)"));
        assert_eq!(mapping.interpretation, AmountInterpretation::Standard);

        let monzo = headers(&["Transaction ID", "Date", "Name", "Amount", "Currency", "Description"]);
        assert_eq!(detect(&monzo), BankFormat::Monzo);

        let hsbc = headers(&["Date", "Description", "Amount"]);
        assert_eq!(detect(&hsbc), BankFormat::Hsbc);
    }
}
