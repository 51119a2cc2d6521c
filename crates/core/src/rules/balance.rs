//! Voucher debit/credit balance (A02).

use jet_shared::types::Tolerance;

use super::context::RuleContext;
use super::error::RuleError;
use super::finding::{FlaggedRow, VoucherTotals};
use super::types::{RuleId, RuleResult, RuleStatus};
use crate::model::{JournalEntryRow, Ledger};

/// Debit and credit sums of every voucher, in voucher-number order.
///
/// # Errors
///
/// Returns `Overflow` when a voucher's sums leave the decimal range.
pub fn voucher_totals(ledger: &Ledger) -> Result<Vec<VoucherTotals>, RuleError> {
    ledger
        .vouchers()
        .into_iter()
        .map(|(voucher_number, rows)| {
            let overflow = || RuleError::overflow(format!("totals of voucher {voucher_number}"));
            let (total_debit, total_credit) =
                JournalEntryRow::checked_totals(rows.iter().copied()).ok_or_else(overflow)?;
            Ok(VoucherTotals {
                voucher_number: voucher_number.to_string(),
                total_debit,
                total_credit,
                difference: total_debit
                    .checked_sub(total_credit)
                    .ok_or_else(overflow)?,
            })
        })
        .collect()
}

/// Flags vouchers whose `|debit - credit|` exceeds the tolerance.
///
/// `WARN` when any voucher is flagged. Single-row vouchers are evaluated
/// like any other.
///
/// # Errors
///
/// Returns `Overflow` when a voucher's sums leave the decimal range.
pub fn check_balance(ledger: &Ledger, tolerance: Tolerance) -> Result<RuleResult, RuleError> {
    let totals = voucher_totals(ledger)?;
    let voucher_count = totals.len();

    let flagged: Vec<FlaggedRow> = totals
        .into_iter()
        .filter(|totals| tolerance.is_exceeded_by(totals.difference))
        .map(FlaggedRow::Voucher)
        .collect();

    let summary = if flagged.is_empty() {
        format!("All {voucher_count} vouchers balance within {tolerance}")
    } else {
        format!(
            "{} of {voucher_count} vouchers are out of balance by more than {tolerance}",
            flagged.len()
        )
    };
    Ok(RuleResult::from_findings(RuleId::A02, RuleStatus::Warn, summary, flagged))
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::A02));
    }
    check_balance(ledger, ctx.params.balance_tolerance()?)
}
