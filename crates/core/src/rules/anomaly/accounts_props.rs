//! Property-based tests for the seldom-used account threshold.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::accounts::low_frequency_accounts;
use crate::model::{JournalEntryRow, Ledger};
use crate::rules::finding::FlaggedRow;
use crate::rules::types::RuleStatus;

fn ledger(accounts: &[u8]) -> Ledger {
    let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap_or_default();
    Ledger::new(
        accounts
            .iter()
            .enumerate()
            .map(|(n, account)| {
                JournalEntryRow::new(
                    n + 1,
                    date,
                    format!("V{n}"),
                    format!("{}", 5000 + u32::from(*account)),
                    "Expense",
                    Decimal::ONE,
                    Decimal::ZERO,
                )
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A threshold of zero flags nothing.
    #[test]
    fn prop_zero_threshold_flags_nothing(accounts in prop::collection::vec(0u8..10, 0..40)) {
        let result = low_frequency_accounts(&ledger(&accounts), None, 0);
        prop_assert_eq!(result.status, RuleStatus::Pass);
        prop_assert_eq!(result.flagged_count(), 0);
    }

    /// A threshold above the busiest account flags every account and row.
    #[test]
    fn prop_threshold_above_max_usage_flags_everything(
        accounts in prop::collection::vec(0u8..10, 1..40),
    ) {
        let ledger = ledger(&accounts);
        let max_usage = ledger.accounts().values().map(Vec::len).max().unwrap_or(0) as u64;
        let result = low_frequency_accounts(&ledger, None, max_usage + 1);
        let entries = result.flagged_rows.iter().filter_map(FlaggedRow::as_entry).count();
        prop_assert_eq!(entries, ledger.len());
        prop_assert_eq!(result.flagged_count(), ledger.len() + ledger.accounts().len());
        prop_assert_eq!(result.status, RuleStatus::Warn);
    }
}
