//! Structural validation of the raw journal table (A01).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use jet_shared::types::{parse_amount, parse_date};
use rust_decimal::Decimal;

use super::context::RuleContext;
use super::error::RuleError;
use super::finding::{FlaggedRow, Violation, ViolationCode};
use super::types::{RuleId, RuleResult, RuleStatus};
use crate::model::{Column, JournalTable, RawJournalEntry};

#[derive(Default)]
struct Issues {
    codes: BTreeSet<ViolationCode>,
    columns: BTreeSet<Column>,
}

impl Issues {
    fn add(&mut self, code: ViolationCode, column: Option<Column>) {
        self.codes.insert(code);
        self.columns.extend(column);
    }

    fn into_violation(self, row_number: usize, record: &RawJournalEntry) -> Violation {
        Violation {
            row_number: Some(row_number),
            voucher_number: record.value(Column::VoucherNumber).map(str::to_string),
            codes: self.codes.into_iter().collect(),
            columns: self.columns.into_iter().collect(),
        }
    }
}

/// Validates the structure of a journal table.
///
/// Produces one violation row per offending record with every reason code
/// it breaks, plus one table-level row when required columns are missing.
/// `FAIL` when anything is flagged. Deterministic and free of state, so
/// validating the same table twice yields the same result.
#[must_use]
pub fn validate(table: &JournalTable) -> RuleResult {
    if table.is_empty() {
        return RuleResult::empty_ledger(RuleId::A01);
    }

    let mut flagged = Vec::new();

    let missing = table.missing_columns(&Column::REQUIRED);
    let columns_missing = !missing.is_empty();
    if columns_missing {
        flagged.push(FlaggedRow::Violation(Violation {
            row_number: None,
            voucher_number: None,
            codes: vec![ViolationCode::MissingColumn],
            columns: missing,
        }));
    }

    let mut issues: Vec<Issues> = table.records().iter().map(|_| Issues::default()).collect();
    let mut voucher_dates: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    let mut seen: HashSet<&RawJournalEntry> = HashSet::with_capacity(table.len());

    for (record, issues) in table.records().iter().zip(issues.iter_mut()) {
        for column in Column::KEY {
            if table.has_column(column) && record.value(column).is_none() {
                issues.add(ViolationCode::MissingValue, Some(column));
            }
        }

        for column in [Column::DebitAmount, Column::CreditAmount] {
            match record.value(column).map(parse_amount) {
                Some(None) => issues.add(ViolationCode::NonNumericAmount, Some(column)),
                Some(Some(amount)) if amount < Decimal::ZERO => {
                    issues.add(ViolationCode::NegativeAmount, Some(column));
                }
                _ => {}
            }
        }

        if let Some(cell) = record.value(Column::EntryDate) {
            match parse_date(cell) {
                Some(date) => {
                    if let Some(voucher) = record.value(Column::VoucherNumber) {
                        voucher_dates.entry(voucher).or_default().insert(date);
                    }
                }
                None => issues.add(ViolationCode::InvalidDate, Some(Column::EntryDate)),
            }
        }

        if record
            .value(Column::InputDate)
            .is_some_and(|cell| parse_date(cell).is_none())
        {
            issues.add(ViolationCode::InvalidDate, Some(Column::InputDate));
        }

        if !seen.insert(record) {
            issues.add(ViolationCode::DuplicateRecord, None);
        }
    }

    // Second pass: every dated row of a voucher spanning several dates.
    for (record, issues) in table.records().iter().zip(issues.iter_mut()) {
        let Some(voucher) = record.value(Column::VoucherNumber) else {
            continue;
        };
        let spans_dates = voucher_dates.get(voucher).is_some_and(|dates| dates.len() > 1);
        let dated = record.value(Column::EntryDate).and_then(parse_date).is_some();
        if spans_dates && dated {
            issues.add(ViolationCode::CrossDateVoucher, Some(Column::EntryDate));
        }
    }

    let mut offending = 0;
    for (index, (record, issues)) in table.records().iter().zip(issues).enumerate() {
        if !issues.codes.is_empty() {
            offending += 1;
            flagged.push(FlaggedRow::Violation(issues.into_violation(index + 1, record)));
        }
    }

    if flagged.is_empty() {
        return RuleResult::pass(
            RuleId::A01,
            format!("All {} records passed structural validation", table.len()),
        );
    }

    let mut summary = format!(
        "{offending} of {} records failed structural validation",
        table.len()
    );
    if columns_missing {
        summary.push_str("; required columns missing");
    }
    RuleResult::new(RuleId::A01, RuleStatus::Fail, summary, flagged)
}

pub(crate) fn evaluate(ctx: &RuleContext<'_>) -> Result<RuleResult, RuleError> {
    Ok(validate(ctx.table))
}
