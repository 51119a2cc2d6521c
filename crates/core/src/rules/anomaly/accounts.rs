//! Account-based anomaly rules (B01 to B04).

use rust_decimal::Decimal;

use crate::model::{ChartOfAccounts, JournalEntryRow, Ledger, TrialBalance, UsageHistory};
use crate::rules::catalog::ReferenceTable;
use crate::rules::context::RuleContext;
use crate::rules::error::RuleError;
use crate::rules::finding::{AccountTotal, AccountUsage, EntryFlag, FlaggedEntry, FlaggedRow};
use crate::rules::types::{RuleId, RuleResult, RuleStatus};

/// B01: income statement accounts whose `|Σdebit - Σcredit|` exceeds the
/// materiality threshold.
///
/// # Errors
///
/// Returns `Overflow` when an account's sums leave the decimal range.
pub fn material_accounts(
    ledger: &Ledger,
    chart: &ChartOfAccounts,
    threshold: Decimal,
) -> Result<RuleResult, RuleError> {
    let mut flagged = Vec::new();
    for (code, rows) in ledger.accounts() {
        let Some(account) = chart.get(code).filter(|account| account.class.is_income_statement())
        else {
            continue;
        };
        let overflow = || RuleError::overflow(format!("totals of account {code}"));
        let (total_debit, total_credit) =
            JournalEntryRow::checked_totals(rows.iter().copied()).ok_or_else(overflow)?;
        let net = total_debit.checked_sub(total_credit).ok_or_else(overflow)?;
        if net.abs() > threshold {
            flagged.push(FlaggedRow::AccountTotal(AccountTotal {
                account_code: code.to_string(),
                account_name: account.account_name.clone(),
                class: Some(account.class),
                total_debit,
                total_credit,
                net,
                line_count: rows.len(),
            }));
        }
    }

    let summary = format!(
        "{} income statement accounts exceed materiality {threshold}",
        flagged.len()
    );
    Ok(RuleResult::from_findings(RuleId::B01, RuleStatus::Warn, summary, flagged))
}

/// B02: rows posted to accounts marked for abnormal usage, and rows whose
/// account is not in the chart of accounts.
#[must_use]
pub fn abnormal_accounts(ledger: &Ledger, chart: &ChartOfAccounts) -> RuleResult {
    let flagged: Vec<FlaggedRow> = ledger
        .rows()
        .iter()
        .filter_map(|row| match chart.get(&row.account_code) {
            None => Some(FlaggedEntry::new(
                EntryFlag::UnknownAccount,
                format!("account {} is not in the chart of accounts", row.account_code),
                row,
            )),
            Some(account) if account.abnormal_usage => Some(FlaggedEntry::new(
                EntryFlag::AbnormalUsage,
                format!("account {} is marked for abnormal usage", row.account_code),
                row,
            )),
            Some(_) => None,
        })
        .map(FlaggedRow::Entry)
        .collect();

    let summary = format!("{} entries posted to abnormal or unknown accounts", flagged.len());
    RuleResult::from_findings(RuleId::B02, RuleStatus::Warn, summary, flagged)
}

/// B03: rows posted to accounts created this period.
///
/// An account is new when the chart of accounts marks it `is_new`, or when
/// an opening trial balance is given and does not list it.
///
/// # Errors
///
/// Returns `ReferenceDataMissing` when neither source is supplied and the
/// ledger has rows.
pub fn new_accounts(
    ledger: &Ledger,
    chart: Option<&ChartOfAccounts>,
    opening: Option<&TrialBalance>,
) -> Result<RuleResult, RuleError> {
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B03));
    }
    if chart.is_none() && opening.is_none() {
        return Err(RuleError::ReferenceDataMissing {
            table: ReferenceTable::ChartOfAccounts,
        });
    }

    let flagged: Vec<FlaggedRow> = ledger
        .rows()
        .iter()
        .filter_map(|row| {
            let code = row.account_code.as_str();
            if chart.and_then(|chart| chart.get(code)).is_some_and(|account| account.is_new) {
                Some(FlaggedEntry::new(
                    EntryFlag::NewAccount,
                    format!("account {code} was created this period"),
                    row,
                ))
            } else if opening.is_some_and(|opening| !opening.contains(code)) {
                Some(FlaggedEntry::new(
                    EntryFlag::NotInOpeningBalance,
                    format!("account {code} is not in the opening trial balance"),
                    row,
                ))
            } else {
                None
            }
        })
        .map(FlaggedRow::Entry)
        .collect();

    let summary = format!("{} entries posted to new accounts", flagged.len());
    Ok(RuleResult::from_findings(RuleId::B03, RuleStatus::Warn, summary, flagged))
}

/// B04: accounts used fewer than `threshold` times.
///
/// Each such account yields one usage row followed by every ledger row
/// posted to it. Usage is the number of ledger rows plus the historical
/// count when a usage history is given. A threshold of zero flags nothing.
#[must_use]
pub fn low_frequency_accounts(
    ledger: &Ledger,
    history: Option<&UsageHistory>,
    threshold: u64,
) -> RuleResult {
    let mut account_count = 0;
    let mut entry_count = 0;
    let mut flagged = Vec::new();
    for (code, rows) in ledger.accounts() {
        let ledger_count = rows.len() as u64;
        let historical_count = history.map_or(0, |history| history.count(code));
        let usage = ledger_count.saturating_add(historical_count);
        if usage >= threshold {
            continue;
        }
        account_count += 1;
        entry_count += rows.len();
        flagged.push(FlaggedRow::AccountUsage(AccountUsage {
            account_code: code.to_string(),
            account_name: rows.first().map(|row| row.account_name.clone()).unwrap_or_default(),
            ledger_count,
            historical_count,
            usage,
        }));
        flagged.extend(rows.into_iter().map(|row| {
            FlaggedRow::Entry(FlaggedEntry::new(
                EntryFlag::LowFrequency,
                format!("account {code} used {usage} times, below {threshold}"),
                row,
            ))
        }));
    }

    let summary = format!(
        "{account_count} accounts used fewer than {threshold} times ({entry_count} entries)"
    );
    RuleResult::from_findings(RuleId::B04, RuleStatus::Warn, summary, flagged)
}

pub(crate) fn evaluate_material(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B01));
    }
    let threshold = ctx.params.materiality_threshold()?;
    material_accounts(ledger, ctx.require_chart_of_accounts()?, threshold)
}

pub(crate) fn evaluate_abnormal(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B02));
    }
    Ok(abnormal_accounts(ledger, ctx.require_chart_of_accounts()?))
}

pub(crate) fn evaluate_new(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    new_accounts(ctx.require_ledger()?, ctx.aux.chart_of_accounts.as_ref(), ctx.opening)
}

pub(crate) fn evaluate_low_frequency(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B04));
    }
    let threshold = ctx.params.low_frequency_threshold()?;
    Ok(low_frequency_accounts(ledger, ctx.aux.usage_history.as_ref(), threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountClass, CoaAccount, JournalEntryRow, TrialBalanceRow};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(n: usize, code: &str, dr: Decimal, cr: Decimal) -> JournalEntryRow {
        let date = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
        JournalEntryRow::new(n, date, format!("V{n}"), code, "Account", dr, cr)
    }

    fn chart() -> ChartOfAccounts {
        ChartOfAccounts::new(vec![
            CoaAccount::new("1000", "Cash", AccountClass::Asset),
            CoaAccount::new("4000", "Sales", AccountClass::Revenue),
            CoaAccount::new("5000", "Salaries", AccountClass::Expense),
            CoaAccount::new("5900", "Suspense", AccountClass::Other).abnormal(),
            CoaAccount::new("6100", "Consulting", AccountClass::Expense).new_this_period(),
        ])
        .unwrap()
    }

    fn flags(result: &RuleResult) -> Vec<(usize, EntryFlag)> {
        result
            .flagged_rows
            .iter()
            .filter_map(FlaggedRow::as_entry)
            .map(|entry| (entry.entry.row_number, entry.flag))
            .collect()
    }

    #[test]
    fn test_material_accounts_only_income_statement() {
        let ledger = Ledger::new(vec![
            row(1, "1000", dec!(5000), dec!(0)),
            row(2, "4000", dec!(0), dec!(3000)),
            row(3, "4000", dec!(0), dec!(2500)),
            row(4, "5000", dec!(900), dec!(0)),
        ]);
        let result = material_accounts(&ledger, &chart(), dec!(1000)).unwrap();
        assert_eq!(result.status, RuleStatus::Warn);
        assert_eq!(result.flagged_count(), 1);
        let FlaggedRow::AccountTotal(total) = &result.flagged_rows[0] else {
            panic!("expected account total");
        };
        assert_eq!(total.account_code, "4000");
        assert_eq!(total.net, dec!(-5500));
        assert_eq!(total.line_count, 2);
    }

    #[test]
    fn test_materiality_is_strict() {
        let ledger = Ledger::new(vec![row(1, "5000", dec!(1000), dec!(0))]);
        assert_eq!(
            material_accounts(&ledger, &chart(), dec!(1000)).unwrap().status,
            RuleStatus::Pass
        );
    }

    #[test]
    fn test_material_overflow_is_an_error() {
        let ledger = Ledger::new(vec![
            row(1, "4000", Decimal::MAX, dec!(0)),
            row(2, "4000", Decimal::MAX, dec!(0)),
        ]);
        let err = material_accounts(&ledger, &chart(), dec!(1000)).unwrap_err();
        assert_eq!(err, RuleError::overflow("totals of account 4000"));
    }

    #[test]
    fn test_abnormal_and_unknown_accounts() {
        let ledger = Ledger::new(vec![
            row(1, "1000", dec!(10), dec!(0)),
            row(2, "5900", dec!(0), dec!(10)),
            row(3, "7777", dec!(1), dec!(0)),
        ]);
        let result = abnormal_accounts(&ledger, &chart());
        assert_eq!(flags(&result), vec![
            (2, EntryFlag::AbnormalUsage),
            (3, EntryFlag::UnknownAccount)
        ]);
    }

    #[test]
    fn test_new_accounts_from_chart_and_opening() {
        let ledger = Ledger::new(vec![
            row(1, "6100", dec!(10), dec!(0)),
            row(2, "1000", dec!(0), dec!(10)),
            row(3, "4000", dec!(0), dec!(10)),
        ]);
        let opening = TrialBalance::new(vec![
            TrialBalanceRow::new("1000", "Cash", dec!(100), dec!(0)),
            TrialBalanceRow::new("6100", "Consulting", dec!(0), dec!(0)),
        ])
        .unwrap();

        let from_chart = new_accounts(&ledger, Some(&chart()), None).unwrap();
        assert_eq!(flags(&from_chart), vec![(1, EntryFlag::NewAccount)]);

        let from_opening = new_accounts(&ledger, None, Some(&opening)).unwrap();
        assert_eq!(flags(&from_opening), vec![(3, EntryFlag::NotInOpeningBalance)]);

        let both = new_accounts(&ledger, Some(&chart()), Some(&opening)).unwrap();
        assert_eq!(both.flagged_count(), 2);
    }

    #[test]
    fn test_new_accounts_requires_a_source() {
        let ledger = Ledger::new(vec![row(1, "1000", dec!(1), dec!(0))]);
        let err = new_accounts(&ledger, None, None).unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_DATA_MISSING");
        assert!(new_accounts(&Ledger::default(), None, None).is_ok());
    }

    #[test]
    fn test_low_frequency_counts_history() {
        let ledger = Ledger::new(vec![
            row(1, "1000", dec!(1), dec!(0)),
            row(2, "1000", dec!(1), dec!(0)),
            row(3, "5000", dec!(1), dec!(0)),
        ]);
        let result = low_frequency_accounts(&ledger, None, 2);
        assert_eq!(flags(&result), vec![(3, EntryFlag::LowFrequency)]);

        let history = UsageHistory::new([("5000".to_string(), 4)]);
        let result = low_frequency_accounts(&ledger, Some(&history), 2);
        assert_eq!(result.status, RuleStatus::Pass);
    }

    #[test]
    fn test_low_frequency_flags_every_row_of_account() {
        let ledger = Ledger::new(vec![
            row(1, "1000", dec!(1), dec!(0)),
            row(2, "1000", dec!(1), dec!(0)),
        ]);
        let result = low_frequency_accounts(&ledger, None, 3);
        assert_eq!(result.flagged_count(), 3);
        assert_eq!(result.summary, "1 accounts used fewer than 3 times (2 entries)");
    }

    #[test]
    fn test_low_frequency_reports_account_usage_first() {
        let ledger = Ledger::new(vec![
            row(1, "5000", dec!(1), dec!(0)),
            row(2, "1000", dec!(1), dec!(0)),
        ]);
        let history = UsageHistory::new([("5000".to_string(), 1)]);
        let result = low_frequency_accounts(&ledger, Some(&history), 3);

        let FlaggedRow::AccountUsage(cash) = &result.flagged_rows[0] else {
            panic!("expected account usage");
        };
        assert_eq!(cash.account_code, "1000");
        assert_eq!((cash.ledger_count, cash.historical_count, cash.usage), (1, 0, 1));
        assert_eq!(result.flagged_rows[1].as_entry().unwrap().entry.row_number, 2);

        let FlaggedRow::AccountUsage(salaries) = &result.flagged_rows[2] else {
            panic!("expected account usage");
        };
        assert_eq!((salaries.ledger_count, salaries.historical_count, salaries.usage), (1, 1, 2));
        assert_eq!(flags(&result), vec![
            (2, EntryFlag::LowFrequency),
            (1, EntryFlag::LowFrequency)
        ]);
    }
}
