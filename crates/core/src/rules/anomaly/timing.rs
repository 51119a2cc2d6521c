//! Posting timing anomalies (B07).

use chrono::NaiveDate;

use crate::model::Ledger;
use crate::rules::context::RuleContext;
use crate::rules::error::RuleError;
use crate::rules::finding::{EntryFlag, FlaggedEntry, FlaggedRow};
use crate::rules::types::{RuleId, RuleResult, RuleStatus};

/// Flags rows recorded after the fiscal year end into the closed period
/// (`entry_date <= fiscal_year_end < input_date`) and rows effective after
/// they were recorded (`entry_date > input_date`).
///
/// `NOT_APPLICABLE` when the ledger has no input-date column. Rows with a
/// blank input date are skipped; rows whose input date cannot be read are
/// flagged, since neither check can clear them.
#[must_use]
pub fn timing_anomalies(ledger: &Ledger, fiscal_year_end: NaiveDate) -> RuleResult {
    if !ledger.has_input_date_column() {
        return RuleResult::not_applicable(RuleId::B07, "Ledger has no input date column");
    }

    let flagged: Vec<FlaggedRow> = ledger
        .rows()
        .iter()
        .filter_map(|row| {
            let entry = row.entry_date;
            let Some(input) = row.input_date else {
                return ledger.has_unreadable_input_date(row.row_number).then(|| {
                    FlaggedEntry::new(
                        EntryFlag::UnreadableInputDate,
                        format!("dated {entry} but its input date could not be read"),
                        row,
                    )
                });
            };
            if entry <= fiscal_year_end && fiscal_year_end < input {
                Some(FlaggedEntry::new(
                    EntryFlag::PostedAfterCutoff,
                    format!("dated {entry} but recorded {input}, after year end {fiscal_year_end}"),
                    row,
                ))
            } else if entry > input {
                Some(FlaggedEntry::new(
                    EntryFlag::EffectiveAfterInput,
                    format!("dated {entry}, later than its input date {input}"),
                    row,
                ))
            } else {
                None
            }
        })
        .map(FlaggedRow::Entry)
        .collect();

    let summary = format!("{} entries with posting timing anomalies", flagged.len());
    RuleResult::from_findings(RuleId::B07, RuleStatus::Warn, summary, flagged)
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    let ledger = ctx.require_ledger()?;
    if ledger.is_empty() {
        return Ok(RuleResult::empty_ledger(RuleId::B07));
    }
    if !ledger.has_input_date_column() {
        return Ok(RuleResult::not_applicable(
            RuleId::B07,
            "Ledger has no input date column",
        ));
    }
    Ok(timing_anomalies(ledger, ctx.params.fiscal_year_end_date()?))
}
