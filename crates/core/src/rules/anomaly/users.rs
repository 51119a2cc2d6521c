//! User-based anomaly rules (B05, B06, B08).

use crate::model::{AuthorizationMatrix, HrRoster, JournalEntryRow, Ledger};
use crate::rules::context::RuleContext;
use crate::rules::error::RuleError;
use crate::rules::finding::{EntryFlag, FlaggedEntry, FlaggedRow};
use crate::rules::types::{RuleId, RuleResult, RuleStatus};

const NO_PREPARER_COLUMN: &str = "Ledger has no preparer column";

/// B05: rows whose preparer is missing or not on the roster.
///
/// When the ledger carries an approver column and the roster lists
/// approvers, rows whose approver is not listed are flagged as well.
/// `NOT_APPLICABLE` when the ledger has no preparer column.
#[must_use]
pub fn unregistered_users(ledger: &Ledger, roster: &HrRoster) -> RuleResult {
    if !ledger.has_preparer_column() {
        return RuleResult::not_applicable(RuleId::B05, NO_PREPARER_COLUMN);
    }

    let check_approvers = ledger.has_approver_column() && !roster.approvers.is_empty();
    let mut flagged = Vec::new();

    for row in ledger.rows() {
        match row.preparer_id.as_deref() {
            None => flagged.push(FlaggedEntry::new(
                EntryFlag::MissingPreparer,
                "no preparer recorded",
                row,
            )),
            Some(preparer) if !roster.is_valid_preparer(preparer) => flagged.push(FlaggedEntry::new(
                EntryFlag::UnknownPreparer,
                format!("preparer {preparer} is not on the HR roster"),
                row,
            )),
            Some(_) => {}
        }

        if check_approvers
            && let Some(approver) = row.approver_id.as_deref()
            && !roster.is_valid_approver(approver)
        {
            flagged.push(FlaggedEntry::new(
                EntryFlag::UnknownApprover,
                format!("approver {approver} is not on the HR roster"),
                row,
            ));
        }
    }

    let summary = format!("{} entries by unregistered users", flagged.len());
    let flagged = flagged.into_iter().map(FlaggedRow::Entry).collect();
    RuleResult::from_findings(RuleId::B05, RuleStatus::Warn, summary, flagged)
}

/// B06: rows whose (preparer, account) pair is not in the authorization
/// matrix. Rows without a preparer cannot be authorized and are flagged.
///
/// `NOT_APPLICABLE` when the ledger has no preparer column.
#[must_use]
pub fn unauthorized_postings(ledger: &Ledger, matrix: &AuthorizationMatrix) -> RuleResult {
    if !ledger.has_preparer_column() {
        return RuleResult::not_applicable(RuleId::B06, NO_PREPARER_COLUMN);
    }

    let flagged: Vec<FlaggedRow> = ledger
        .rows()
        .iter()
        .filter_map(|row| {
            let detail = match row.preparer_id.as_deref() {
                Some(preparer) if matrix.is_authorized(preparer, &row.account_code) => return None,
                Some(preparer) => {
                    format!("{preparer} is not authorized for account {}", row.account_code)
                }
                None => format!("no preparer recorded for account {}", row.account_code),
            };
            Some(FlaggedRow::Entry(FlaggedEntry::new(EntryFlag::Unauthorized, detail, row)))
        })
        .collect();

    let summary = format!("{} entries posted without authorization", flagged.len());
    RuleResult::from_findings(RuleId::B06, RuleStatus::Warn, summary, flagged)
}

fn is_self_approved(row: &JournalEntryRow) -> bool {
    matches!(
        (row.preparer_id.as_deref(), row.approver_id.as_deref()),
        (Some(preparer), Some(approver)) if preparer == approver
    )
}

/// B08: vouchers where a row's preparer is also its approver. Every row of
/// such a voucher is flagged.
///
/// `NOT_APPLICABLE` when the ledger has no approver column.
#[must_use]
pub fn self_approved_vouchers(ledger: &Ledger) -> RuleResult {
    if !ledger.has_approver_column() {
        return RuleResult::not_applicable(RuleId::B08, "Ledger has no approver column");
    }

    let mut voucher_count = 0;
    let mut flagged = Vec::new();
    for (voucher_number, rows) in ledger.vouchers() {
        let Some(culprit) = rows.iter().find(|row| is_self_approved(row)) else {
            continue;
        };
        voucher_count += 1;
        let user = culprit.preparer_id.as_deref().unwrap_or_default();
        flagged.extend(rows.iter().map(|row| {
            FlaggedRow::Entry(FlaggedEntry::new(
                EntryFlag::SelfApproved,
                format!("voucher {voucher_number} prepared and approved by {user}"),
                row,
            ))
        }));
    }

    let summary = format!("{voucher_count} vouchers approved by their preparer");
    RuleResult::from_findings(RuleId::B08, RuleStatus::Warn, summary, flagged)
}

pub(crate) fn evaluate_unregistered(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B05));
    }
    Ok(unregistered_users(ledger, ctx.require_hr_roster()?))
}

pub(crate) fn evaluate_unauthorized(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B06));
    }
    Ok(unauthorized_postings(ledger, ctx.require_authorization_matrix()?))
}

pub(crate) fn evaluate_self_approval(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B08));
    }
    Ok(self_approved_vouchers(ledger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn row(n: usize, voucher: &str, code: &str) -> JournalEntryRow {
        let date = NaiveDate::from_ymd_opt(2023, 5, 2).unwrap();
        JournalEntryRow::new(n, date, voucher, code, "Account", dec!(10), Decimal::ZERO)
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
    fn test_unregistered_preparers() {
        let ledger = Ledger::new(vec![
            row(1, "V1", "1000").with_preparer("U1"),
            row(2, "V1", "2000").with_preparer("GHOST"),
            row(3, "V2", "1000"),
        ]);
        let roster = HrRoster::new(["U1"], Vec::<String>::new());
        let result = unregistered_users(&ledger, &roster);
        assert_eq!(flags(&result), vec![
            (2, EntryFlag::UnknownPreparer),
            (3, EntryFlag::MissingPreparer)
        ]);
    }

    #[test]
    fn test_unregistered_approvers_checked_when_listed() {
        let ledger = Ledger::new(vec![
            row(1, "V1", "1000").with_preparer("U1").with_approver("M1"),
            row(2, "V2", "1000").with_preparer("U1").with_approver("M9"),
        ]);
        let unlisted = HrRoster::new(["U1"], Vec::<String>::new());
        assert_eq!(unregistered_users(&ledger, &unlisted).status, RuleStatus::Pass);

        let listed = HrRoster::new(["U1"], ["M1"]);
        assert_eq!(flags(&unregistered_users(&ledger, &listed)), vec![(
            2,
            EntryFlag::UnknownApprover
        )]);
    }

    #[test]
    fn test_unauthorized_pairs() {
        let ledger = Ledger::new(vec![
            row(1, "V1", "1000").with_preparer("U1"),
            row(2, "V1", "5000").with_preparer("U1"),
        ]);
        let matrix = AuthorizationMatrix::new().grant("U1", "1000");
        let result = unauthorized_postings(&ledger, &matrix);
        assert_eq!(flags(&result), vec![(2, EntryFlag::Unauthorized)]);

        let matrix = matrix.grant("U1", "5000");
        assert_eq!(unauthorized_postings(&ledger, &matrix).status, RuleStatus::Pass);
    }

    #[test]
    fn test_preparer_rules_need_preparer_column() {
        let ledger = Ledger::new(vec![row(1, "V1", "1000"), row(2, "V1", "5000")]);
        let roster = HrRoster::new(["U1"], Vec::<String>::new());
        let matrix = AuthorizationMatrix::new().grant("U1", "1000");

        let b05 = unregistered_users(&ledger, &roster);
        assert_eq!(b05.status, RuleStatus::NotApplicable);
        assert!(b05.flagged_rows.is_empty());
        let b06 = unauthorized_postings(&ledger, &matrix);
        assert_eq!(b06.status, RuleStatus::NotApplicable);
        assert!(b06.flagged_rows.is_empty());
    }

    #[test]
    fn test_blank_preparer_flagged_when_column_present() {
        let ledger = Ledger::new(vec![
            row(1, "V1", "1000").with_preparer("U1"),
            row(2, "V1", "1000"),
        ]);
        let matrix = AuthorizationMatrix::new().grant("U1", "1000");
        assert_eq!(
            flags(&unauthorized_postings(&ledger, &matrix)),
            vec![(2, EntryFlag::Unauthorized)]
        );
    }

    #[test]
    fn test_self_approval_flags_whole_voucher() {
        let ledger = Ledger::new(vec![
            row(1, "V1", "1000").with_preparer("U1").with_approver("U1"),
            row(2, "V1", "2000").with_preparer("U2").with_approver("M1"),
            row(3, "V2", "1000").with_preparer("U1").with_approver("M1"),
        ]);
        let result = self_approved_vouchers(&ledger);
        assert_eq!(result.status, RuleStatus::Warn);
        assert_eq!(flags(&result), vec![
            (1, EntryFlag::SelfApproved),
            (2, EntryFlag::SelfApproved)
        ]);
        assert_eq!(result.summary, "1 vouchers approved by their preparer");
    }

    #[test]
    fn test_self_approval_needs_approver_column() {
        let ledger = Ledger::new(vec![row(1, "V1", "1000").with_preparer("U1")]);
        assert_eq!(
            self_approved_vouchers(&ledger).status,
            RuleStatus::NotApplicable
        );
    }
}
