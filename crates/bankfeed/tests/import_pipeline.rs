use bankfeed::{
    AmountInterpretation, BankFormat, Classification, ColumnMapping, ExistingRecord, ImportAction,
    ImportReview, IssueKind, KeywordSuggester, LedgerContext, MappingWizard, MatchTolerance,
    MatchType, Severity, WizardStep, classify_rows, detect, format_amount, prepare_import,
    read_csv, reconcile,
};
use chrono::NaiveDate;

const STATEMENT: &str = "\
Date,Description,Amount
15/01/2026,AMAZON UK RETAIL,-45.99
14/01/2026,ACME LTD SALARY,1250.00
";

fn statement_mapping(interpretation: AmountInterpretation) -> ColumnMapping {
    ColumnMapping {
        date_column: Some("Date".to_string()),
        description_column: Some("Description".to_string()),
        amount_column: Some("Amount".to_string()),
        date_format: Some("dd/MM/yyyy".to_string()),
        interpretation,
        ..ColumnMapping::default()
    }
}

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

#[test]
fn statement_flows_from_csv_to_reviewed_candidates() {
    let table = read_csv(STATEMENT).unwrap();
    assert_eq!(detect(&table.headers), BankFormat::Hsbc);

    let mut wizard = MappingWizard::new(statement_mapping(AmountInterpretation::Standard));
    assert_eq!(wizard.advance(), WizardStep::AmountInterpretation);
    assert_eq!(wizard.advance(), WizardStep::Confirmation);
    wizard.confirm_mapping().unwrap();
    // Confirming again changes nothing.
    wizard.confirm_mapping().unwrap();
    let mapping = wizard.into_mapping();

    let prepared = prepare_import(
        &table.headers,
        &table.rows,
        &mapping,
        &[],
        &MatchTolerance::default(),
        Some(&KeywordSuggester),
    )
    .unwrap();

    assert_eq!(prepared.rows_read, 2);
    assert!(prepared.errors.is_empty());
    assert_eq!(prepared.candidates.len(), 2);

    let expense = &prepared.candidates[0];
    assert_eq!(expense.date, date("2026-01-15"));
    assert_eq!(format_amount(&expense.amount), "45.99");
    assert_eq!(expense.match_type, MatchType::New);

    let income = &prepared.candidates[1];
    assert_eq!(income.date, date("2026-01-14"));
    assert_eq!(format_amount(&income.amount), "1250.00");
    assert_eq!(income.category.as_deref(), Some("Salary"));

    let review = ImportReview::new(prepared.candidates);
    let summary = review.summary();
    assert_eq!(summary.income_count, 1);
    assert_eq!(summary.expense_count, 1);
    assert_eq!(format_amount(&summary.income_total), "1250.00");
    assert_eq!(format_amount(&summary.expense_total), "45.99");
    assert_eq!(review.final_import_set().len(), 2);
}

#[test]
fn inverted_interpretation_mirrors_the_standard_classification() {
    let table = read_csv(STATEMENT).unwrap();

    let standard = classify_rows(
        &table.headers,
        &table.rows,
        &statement_mapping(AmountInterpretation::Standard),
        None,
    )
    .unwrap();
    let inverted = classify_rows(
        &table.headers,
        &table.rows,
        &statement_mapping(AmountInterpretation::Inverted),
        None,
    )
    .unwrap();

    let incomes = |transactions: &[bankfeed::ClassifiedTransaction]| {
        transactions
            .iter()
            .filter(|t| t.classification == Classification::Income)
            .count()
    };
    assert_eq!(incomes(&standard.transactions), 1);
    assert_eq!(
        incomes(&standard.transactions),
        standard.transactions.len() - incomes(&inverted.transactions)
    );
    assert_eq!(format_amount(&inverted.transactions[0].amount), "45.99");
}

#[test]
fn re_importing_the_same_statement_defaults_every_row_to_skip() {
    let table = read_csv(STATEMENT).unwrap();
    let mapping = statement_mapping(AmountInterpretation::Standard);

    let ledger = vec![
        ExistingRecord {
            id: "rec_1".to_string(),
            date: date("2026-01-15"),
            amount: "-45.99".parse().unwrap(),
            description: "AMAZON UK RETAIL".to_string(),
            category: Some("Shopping".to_string()),
        },
        ExistingRecord {
            id: "rec_2".to_string(),
            date: date("2026-01-14"),
            amount: "1250.00".parse().unwrap(),
            description: "acme ltd salary".to_string(),
            category: Some("Salary".to_string()),
        },
    ];

    let prepared = prepare_import(
        &table.headers,
        &table.rows,
        &mapping,
        &ledger,
        &MatchTolerance::default(),
        None,
    )
    .unwrap();

    assert!(prepared
        .candidates
        .iter()
        .all(|candidate| candidate.match_type == MatchType::Exact));
    assert!(prepared
        .candidates
        .iter()
        .all(|candidate| candidate.action == ImportAction::Skip));

    let review = ImportReview::new(prepared.candidates);
    let summary = review.summary();
    assert_eq!(summary.income_count, 0);
    assert_eq!(summary.expense_count, 0);
    assert!(review.final_import_set().is_empty());
}

#[test]
fn manual_overrides_interleave_with_bulk_operations() {
    let table = read_csv(STATEMENT).unwrap();
    let ledger = vec![ExistingRecord {
        id: "rec_1".to_string(),
        date: date("2026-01-15"),
        amount: "-45.99".parse().unwrap(),
        description: "AMAZON UK RETAIL".to_string(),
        category: None,
    }];

    let prepared = prepare_import(
        &table.headers,
        &table.rows,
        &statement_mapping(AmountInterpretation::Standard),
        &ledger,
        &MatchTolerance::default(),
        None,
    )
    .unwrap();
    let duplicate_id = prepared.candidates[0].id.clone();

    let mut review = ImportReview::new(prepared.candidates);
    review.import_all_new();
    review
        .set_action(&duplicate_id, ImportAction::Update)
        .unwrap();
    review.skip_all_duplicates();

    // The per-row choice is more specific than the bulk skip and survives it.
    let duplicate = review
        .candidates()
        .iter()
        .find(|candidate| candidate.id == duplicate_id)
        .unwrap();
    assert_eq!(duplicate.action, ImportAction::Update);

    let ids: Vec<_> = review
        .final_import_set()
        .iter()
        .map(|candidate| candidate.id.clone())
        .collect();
    assert!(ids.contains(&duplicate_id));
    assert_eq!(ids.len(), 2);
}

#[test]
fn reconciliation_flags_a_fully_duplicated_batch_once() {
    let table = read_csv(
        "Date,Description,Amount\n\
         15/01/2026,COFFEE SHOP,-3.20\n\
         15/01/2026,COFFEE SHOP,-3.20\n\
         15/01/2026,COFFEE SHOP,-3.20\n",
    )
    .unwrap();
    let ledger = vec![ExistingRecord {
        id: "rec_1".to_string(),
        date: date("2026-01-15"),
        amount: "-3.20".parse().unwrap(),
        description: "COFFEE SHOP".to_string(),
        category: Some("Eating out".to_string()),
    }];

    let prepared = prepare_import(
        &table.headers,
        &table.rows,
        &statement_mapping(AmountInterpretation::Standard),
        &ledger,
        &MatchTolerance::default(),
        None,
    )
    .unwrap();

    let context = LedgerContext {
        existing_income_count: 0,
        existing_expense_count: 1,
    };
    let mut report = reconcile::analyze(&prepared.candidates, &[], &context);

    let duplicate_issues: Vec<_> = report
        .issues()
        .iter()
        .filter(|issue| issue.kind == IssueKind::PotentialDuplicates)
        .collect();
    assert_eq!(duplicate_issues.len(), 1);
    assert_eq!(duplicate_issues[0].severity, Severity::High);
    assert_eq!(duplicate_issues[0].count, 3);

    report.dismiss(IssueKind::PotentialDuplicates);
    report.dismiss(IssueKind::MissingCategories);
    assert!(report.is_all_clear());
}

#[test]
fn clean_categorized_batch_reconciles_all_clear() {
    let table = read_csv("Date,Description,Amount\n15/01/2026,TESCO STORES 2043,-32.50\n").unwrap();
    let prepared = prepare_import(
        &table.headers,
        &table.rows,
        &statement_mapping(AmountInterpretation::Standard),
        &[],
        &MatchTolerance::default(),
        Some(&KeywordSuggester),
    )
    .unwrap();

    let report = reconcile::analyze(&prepared.candidates, &[], &LedgerContext::default());
    assert!(report.is_all_clear());
}
