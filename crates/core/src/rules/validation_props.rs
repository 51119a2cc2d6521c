//! Property-based tests for structural validation.

use proptest::prelude::*;

use super::finding::FlaggedRow;
use super::types::RuleStatus;
use super::validation::validate;
use crate::model::{Column, JournalTable, RawJournalEntry};

/// How a generated record is broken, if at all.
#[derive(Debug, Clone, Copy)]
enum Defect {
    None,
    MissingVoucher,
    TextAmount,
    NegativeAmount,
    BadDate,
}

fn defect() -> impl Strategy<Value = Defect> {
    prop_oneof![
        4 => Just(Defect::None),
        1 => Just(Defect::MissingVoucher),
        1 => Just(Defect::TextAmount),
        1 => Just(Defect::NegativeAmount),
        1 => Just(Defect::BadDate),
    ]
}

/// One record per voucher so that no cross-date or duplicate findings occur.
fn record(index: usize, defect: Defect) -> RawJournalEntry {
    let mut record = RawJournalEntry {
        entry_date: Some("2023-03-15".into()),
        voucher_number: Some(format!("V{index}")),
        account_code: Some("1000".into()),
        account_name: Some("Cash".into()),
        debit_amount: Some(format!("{index}.50")),
        credit_amount: Some("0".into()),
        ..RawJournalEntry::default()
    };
    match defect {
        Defect::None => {}
        Defect::MissingVoucher => record.voucher_number = None,
        Defect::TextAmount => record.debit_amount = Some("twelve".into()),
        Defect::NegativeAmount => record.credit_amount = Some("-1".into()),
        Defect::BadDate => record.entry_date = Some("2023-13-45".into()),
    }
    record
}

fn table(defects: &[Defect]) -> JournalTable {
    JournalTable::new(
        Column::REQUIRED,
        defects
            .iter()
            .enumerate()
            .map(|(index, defect)| record(index, *defect))
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Exactly the broken records are flagged, each once.
    #[test]
    fn prop_flags_exactly_violating_rows(defects in prop::collection::vec(defect(), 1..30)) {
        let result = validate(&table(&defects));
        let flagged: Vec<usize> = result
            .flagged_rows
            .iter()
            .filter_map(|row| match row {
                FlaggedRow::Violation(violation) => violation.row_number,
                _ => None,
            })
            .collect();
        let expected: Vec<usize> = defects
            .iter()
            .enumerate()
            .filter(|(_, defect)| !matches!(defect, Defect::None))
            .map(|(index, _)| index + 1)
            .collect();

        prop_assert_eq!(&flagged, &expected);
        let status = if expected.is_empty() { RuleStatus::Pass } else { RuleStatus::Fail };
        prop_assert_eq!(result.status, status);
    }

    /// Validating twice yields the same result.
    #[test]
    fn prop_validate_is_idempotent(defects in prop::collection::vec(defect(), 0..30)) {
        let table = table(&defects);
        prop_assert_eq!(validate(&table), validate(&table));
    }
}
