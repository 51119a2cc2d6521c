//! Property-based tests for the roll-forward identity.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use jet_shared::types::Tolerance;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rollforward::reconcile;
use crate::model::{JournalEntryRow, Ledger, TrialBalance, TrialBalanceRow};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Account code -> (debit, credit) over a small code space so sources overlap.
fn snapshot() -> impl Strategy<Value = BTreeMap<u8, (Decimal, Decimal)>> {
    prop::collection::btree_map(0u8..8, (amount(), amount()), 0..8)
}

fn movements() -> impl Strategy<Value = Vec<(u8, Decimal, Decimal)>> {
    prop::collection::vec((0u8..8, amount(), amount()), 0..30)
}

fn code(account: u8) -> String {
    format!("{}", 1000 + u32::from(account))
}

fn trial_balance(rows: &BTreeMap<u8, (Decimal, Decimal)>) -> TrialBalance {
    TrialBalance::new(
        rows.iter()
            .map(|(account, (dr, cr))| TrialBalanceRow::new(code(*account), "Account", *dr, *cr))
            .collect(),
    )
    .unwrap_or_default()
}

fn ledger(lines: &[(u8, Decimal, Decimal)]) -> Ledger {
    let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default();
    Ledger::new(
        lines
            .iter()
            .enumerate()
            .map(|(n, (account, dr, cr))| {
                JournalEntryRow::new(n + 1, date, format!("V{n}"), code(*account), "Account", *dr, *cr)
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// computed = opening + movement, difference = computed - reported, and a
    /// line is flagged exactly when the difference exceeds the tolerance.
    #[test]
    fn prop_roll_forward_identity(
        opening in snapshot(),
        closing in snapshot(),
        lines in movements(),
        cents in 0i64..500i64,
    ) {
        let tolerance = Tolerance::new(Decimal::new(cents, 2)).unwrap_or_default();
        let (opening_tb, closing_tb) = (trial_balance(&opening), trial_balance(&closing));
        let ledger = ledger(&lines);

        let result = reconcile(&opening_tb, &ledger, &closing_tb, tolerance).unwrap();

        for line in &result {
            let expected_movement: Decimal = ledger
                .rows()
                .iter()
                .filter(|row| row.account_code == line.account_code)
                .map(JournalEntryRow::net_amount)
                .sum();
            prop_assert_eq!(line.opening, opening_tb.net_balance(&line.account_code));
            prop_assert_eq!(line.movement, expected_movement);
            prop_assert_eq!(line.computed, line.opening + line.movement);
            prop_assert_eq!(line.reported, closing_tb.net_balance(&line.account_code));
            prop_assert_eq!(line.difference, line.computed - line.reported);
            prop_assert_eq!(line.flagged, line.difference.abs() > tolerance.value());
        }
    }

    /// Closing = opening + movement always reconciles exactly.
    #[test]
    fn prop_consistent_closing_reconciles(
        opening in snapshot(),
        lines in movements(),
    ) {
        let opening_tb = trial_balance(&opening);
        let ledger = ledger(&lines);

        let mut closing: BTreeMap<u8, (Decimal, Decimal)> = opening.clone();
        for (account, dr, cr) in &lines {
            let entry = closing.entry(*account).or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += *dr;
            entry.1 += *cr;
        }
        let closing_tb = trial_balance(&closing);

        let result = reconcile(&opening_tb, &ledger, &closing_tb, Tolerance::ZERO).unwrap();
        prop_assert!(result.iter().all(|line| !line.flagged));
    }
}
