//! Unusual account combinations (B09).

use std::collections::BTreeSet;

use crate::model::{CombinationRule, Ledger};
use crate::rules::context::RuleContext;
use crate::rules::error::RuleError;
use crate::rules::finding::{CombinationMatch, FlaggedRow};
use crate::rules::types::{RuleId, RuleResult, RuleStatus};

/// Flags vouchers matching any of the combination rules. A voucher matching
/// several rules is reported once per rule.
#[must_use]
pub fn combination_matches(ledger: &Ledger, rules: &[CombinationRule]) -> RuleResult {
    let mut flagged = Vec::new();

    for (voucher_number, rows) in ledger.vouchers() {
        let codes: Vec<&str> = rows.iter().map(|row| row.account_code.as_str()).collect();
        for rule in rules.iter().filter(|rule| rule.matches(&codes)) {
            let distinct: BTreeSet<&str> = codes.iter().copied().collect();
            flagged.push(FlaggedRow::Combination(CombinationMatch {
                rule_name: rule.name.clone(),
                voucher_number: voucher_number.to_string(),
                entry_date: rows[0].entry_date,
                account_codes: distinct.into_iter().map(str::to_string).collect(),
                row_numbers: rows.iter().map(|row| row.row_number).collect(),
            }));
        }
    }

    let summary = format!(
        "{} voucher matches against {} combination rules",
        flagged.len(),
        rules.len()
    );
    RuleResult::from_findings(RuleId::B09, RuleStatus::Warn, summary, flagged)
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B09));
    }
    Ok(match &ctx.aux.combination_rules {
        Some(rules) => combination_matches(ledger, rules),
        None => combination_matches(ledger, &CombinationRule::defaults()),
    })
}
