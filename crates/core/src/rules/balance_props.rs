//! Property-based tests for the voucher balance check.

use chrono::NaiveDate;
use jet_shared::types::Tolerance;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{check_balance, voucher_totals};
use super::finding::FlaggedRow;
use super::types::RuleStatus;
use crate::model::{JournalEntryRow, Ledger};

/// Amounts from 0.00 to 100,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Tolerances from 0.00 to 10.00.
fn tolerance() -> impl Strategy<Value = Tolerance> {
    (0i64..1_000i64).prop_map(|cents| Tolerance::new(Decimal::new(cents, 2)).unwrap_or_default())
}

/// (voucher index, debit, credit) lines over a handful of vouchers.
fn lines() -> impl Strategy<Value = Vec<(u8, Decimal, Decimal)>> {
    prop::collection::vec((0u8..6, amount(), amount()), 0..40)
}

fn ledger(lines: &[(u8, Decimal, Decimal)]) -> Ledger {
    let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default();
    Ledger::new(
        lines
            .iter()
            .enumerate()
            .map(|(n, (voucher, dr, cr))| {
                JournalEntryRow::new(n + 1, date, format!("V{voucher}"), "1000", "Cash", *dr, *cr)
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A voucher is flagged exactly when its difference exceeds the tolerance,
    /// so every unflagged voucher balances within it.
    #[test]
    fn prop_flagged_iff_difference_exceeds_tolerance(
        lines in lines(),
        tolerance in tolerance(),
    ) {
        let ledger = ledger(&lines);
        let result = check_balance(&ledger, tolerance).unwrap();
        let flagged: Vec<&str> = result
            .flagged_rows
            .iter()
            .filter_map(|row| match row {
                FlaggedRow::Voucher(totals) => Some(totals.voucher_number.as_str()),
                _ => None,
            })
            .collect();

        for totals in voucher_totals(&ledger).unwrap() {
            let is_flagged = flagged.contains(&totals.voucher_number.as_str());
            prop_assert_eq!(is_flagged, totals.difference.abs() > tolerance.value());
            prop_assert_eq!(totals.difference, totals.total_debit - totals.total_credit);
        }

        let expected = if flagged.is_empty() { RuleStatus::Pass } else { RuleStatus::Warn };
        prop_assert_eq!(result.status, expected);
    }

    /// Mirroring every line's debit into a credit balances every voucher.
    #[test]
    fn prop_mirrored_lines_always_pass(lines in lines()) {
        let mirrored: Vec<_> = lines
            .iter()
            .flat_map(|(voucher, dr, _)| [(*voucher, *dr, Decimal::ZERO), (*voucher, Decimal::ZERO, *dr)])
            .collect();
        let result = check_balance(&ledger(&mirrored), Tolerance::ZERO).unwrap();
        prop_assert_eq!(result.status, RuleStatus::Pass);
    }
}
