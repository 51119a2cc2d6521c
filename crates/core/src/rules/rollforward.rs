//! Trial balance roll-forward (A03).
//!
//! For every account in the union of the opening snapshot, the ledger and
//! the closing snapshot:
//!
//! ```text
//! computed   = opening + (Σdebit - Σcredit)
//! difference = computed - reported closing
//! ```
//!
//! All balances use one sign convention: debit positive, credit negative.
//! Account type never flips the sign here.

use std::collections::{BTreeMap, BTreeSet};

use jet_shared::types::Tolerance;
use rust_decimal::Decimal;

use super::context::RuleContext;
use super::error::RuleError;
use super::finding::{FlaggedRow, RollForwardLine};
use super::types::{RuleId, RuleResult, RuleStatus};
use crate::model::{Ledger, TrialBalance};

/// Reconciles every account, flagged or not, in account-code order.
///
/// # Errors
///
/// Returns `Overflow` when an account's arithmetic leaves the decimal range.
pub fn reconcile(
    opening: &TrialBalance,
    ledger: &Ledger,
    closing: &TrialBalance,
    tolerance: Tolerance,
) -> Result<Vec<RollForwardLine>, RuleError> {
    let mut movements: BTreeMap<&str, (Decimal, &str)> = BTreeMap::new();
    for row in ledger.rows() {
        let code = row.account_code.as_str();
        let entry = movements
            .entry(code)
            .or_insert((Decimal::ZERO, row.account_name.as_str()));
        entry.0 = row
            .debit_amount
            .checked_sub(row.credit_amount)
            .and_then(|net| entry.0.checked_add(net))
            .ok_or_else(|| overflow(code))?;
    }

    let universe: BTreeSet<&str> = opening
        .account_codes()
        .chain(closing.account_codes())
        .chain(movements.keys().copied())
        .collect();

    universe
        .into_iter()
        .map(|code| {
            let (movement, ledger_name) = movements.get(code).copied().unwrap_or((Decimal::ZERO, ""));
            let account_name = closing
                .get(code)
                .or_else(|| opening.get(code))
                .map_or(ledger_name, |row| row.account_name.as_str());

            let opening_balance = net_balance(opening, code)?;
            let reported = net_balance(closing, code)?;
            let computed = opening_balance
                .checked_add(movement)
                .ok_or_else(|| overflow(code))?;
            let difference = computed
                .checked_sub(reported)
                .ok_or_else(|| overflow(code))?;

            Ok(RollForwardLine {
                account_code: code.to_string(),
                account_name: account_name.to_string(),
                opening: opening_balance,
                movement,
                computed,
                reported,
                difference,
                flagged: tolerance.is_exceeded_by(difference),
            })
        })
        .collect()
}

fn net_balance(snapshot: &TrialBalance, code: &str) -> Result<Decimal, RuleError> {
    snapshot
        .get(code)
        .map_or(Some(Decimal::ZERO), |row| {
            row.debit_balance.checked_sub(row.credit_balance)
        })
        .ok_or_else(|| overflow(code))
}

fn overflow(code: &str) -> RuleError {
    RuleError::overflow(format!("roll-forward of account {code}"))
}

/// Runs the roll-forward check.
///
/// `NOT_RUN` when either snapshot is missing, `WARN` when any account does
/// not reconcile within the tolerance.
///
/// # Errors
///
/// Returns `Overflow` when an account's arithmetic leaves the decimal range.
pub fn roll_forward(
    opening: Option<&TrialBalance>,
    ledger: &Ledger,
    closing: Option<&TrialBalance>,
    tolerance: Tolerance,
) -> Result<RuleResult, RuleError> {
    let (opening, closing) = match (opening, closing) {
        (Some(opening), Some(closing)) => (opening, closing),
        (None, _) => {
            return Ok(RuleResult::from_error(
                RuleId::A03,
                &RuleError::ReconciliationNotApplicable {
                    missing: "opening trial balance",
                },
            ));
        }
        (Some(_), None) => {
            return Ok(RuleResult::from_error(
                RuleId::A03,
                &RuleError::ReconciliationNotApplicable {
                    missing: "closing trial balance",
                },
            ));
        }
    };

    let lines = reconcile(opening, ledger, closing, tolerance)?;
    let account_count = lines.len();
    let flagged: Vec<FlaggedRow> = lines
        .into_iter()
        .filter(|line| line.flagged)
        .map(FlaggedRow::RollForward)
        .collect();

    let summary = if flagged.is_empty() {
        format!("All {account_count} accounts roll forward within {tolerance}")
    } else {
        format!(
            "{} of {account_count} accounts do not roll forward within {tolerance}",
            flagged.len()
        )
    };
    Ok(RuleResult::from_findings(RuleId::A03, RuleStatus::Warn, summary, flagged))
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    if ctx.opening.is_none() || ctx.closing.is_none() {
        return roll_forward(ctx.opening, ctx.ledger, ctx.closing, Tolerance::ZERO);
    }
    let ledger = ctx.require_ledger()?;
    roll_forward(ctx.opening, ledger, ctx.closing, ctx.params.rollforward_tolerance()?)
}
