//! Typed journal entry ledger.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use jet_shared::types::{parse_amount, parse_date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::table::{Column, JournalTable, RawJournalEntry};

/// One typed journal entry line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryRow {
    /// 1-based position of the record in the source table.
    pub row_number: usize,
    /// Posting/effective date.
    pub entry_date: NaiveDate,
    /// Voucher (document) number.
    pub voucher_number: String,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Counterparty code, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_code: Option<String>,
    /// Preparer, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer_id: Option<String>,
    /// Approver, if the source carries approvers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<String>,
    /// System input date, if the source carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_date: Option<NaiveDate>,
}

impl JournalEntryRow {
    /// Creates a row with the mandatory fields.
    #[must_use]
    pub fn new(
        row_number: usize,
        entry_date: NaiveDate,
        voucher_number: impl Into<String>,
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        debit_amount: Decimal,
        credit_amount: Decimal,
    ) -> Self {
        Self {
            row_number,
            entry_date,
            voucher_number: voucher_number.into(),
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit_amount,
            credit_amount,
            counterparty_code: None,
            preparer_id: None,
            approver_id: None,
            input_date: None,
        }
    }

    /// Sets the preparer.
    #[must_use]
    pub fn with_preparer(mut self, preparer_id: impl Into<String>) -> Self {
        self.preparer_id = Some(preparer_id.into());
        self
    }

    /// Sets the approver.
    #[must_use]
    pub fn with_approver(mut self, approver_id: impl Into<String>) -> Self {
        self.approver_id = Some(approver_id.into());
        self
    }

    /// Sets the system input date.
    #[must_use]
    pub fn with_input_date(mut self, input_date: NaiveDate) -> Self {
        self.input_date = Some(input_date);
        self
    }

    /// Sets the counterparty.
    #[must_use]
    pub fn with_counterparty(mut self, counterparty_code: impl Into<String>) -> Self {
        self.counterparty_code = Some(counterparty_code.into());
        self
    }

    /// Net amount in the uniform convention: debit positive, credit negative.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }

    /// Debit and credit totals over rows, `None` on overflow.
    pub fn checked_totals<'a>(rows: impl IntoIterator<Item = &'a Self>) -> Option<(Decimal, Decimal)> {
        rows.into_iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), row| {
                Some((
                    debit.checked_add(row.debit_amount)?,
                    credit.checked_add(row.credit_amount)?,
                ))
            })
    }

    /// Types a raw record. Returns `None` when a key cell is missing or does
    /// not parse.
    #[must_use]
    pub fn from_raw(row_number: usize, raw: &RawJournalEntry) -> Option<Self> {
        let owned = |column: Column| raw.value(column).map(str::to_string);

        Some(Self {
            row_number,
            entry_date: parse_date(raw.value(Column::EntryDate)?)?,
            voucher_number: owned(Column::VoucherNumber)?,
            account_code: owned(Column::AccountCode)?,
            account_name: owned(Column::AccountName).unwrap_or_default(),
            debit_amount: parse_amount(raw.value(Column::DebitAmount)?)?,
            credit_amount: parse_amount(raw.value(Column::CreditAmount)?)?,
            counterparty_code: owned(Column::CounterpartyCode),
            preparer_id: owned(Column::PreparerId),
            approver_id: owned(Column::ApproverId),
            input_date: raw.value(Column::InputDate).and_then(parse_date),
        })
    }

    fn to_raw(&self) -> RawJournalEntry {
        RawJournalEntry {
            entry_date: Some(self.entry_date.to_string()),
            voucher_number: Some(self.voucher_number.clone()),
            account_code: Some(self.account_code.clone()),
            account_name: Some(self.account_name.clone()),
            debit_amount: Some(self.debit_amount.to_string()),
            credit_amount: Some(self.credit_amount.to_string()),
            counterparty_code: self.counterparty_code.clone(),
            preparer_id: self.preparer_id.clone(),
            approver_id: self.approver_id.clone(),
            input_date: self.input_date.map(|date| date.to_string()),
        }
    }
}

/// Typed ledger: the records of a journal table that could be typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    rows: Vec<JournalEntryRow>,
    has_preparer: bool,
    has_approver: bool,
    has_input_date: bool,
    unreadable_input_dates: BTreeSet<usize>,
    skipped: usize,
}

impl Ledger {
    /// Creates a ledger from typed rows.
    ///
    /// The optional preparer, approver and input-date columns count as
    /// present when at least one row carries a value.
    #[must_use]
    pub fn new(rows: Vec<JournalEntryRow>) -> Self {
        let has_preparer = rows.iter().any(|row| row.preparer_id.is_some());
        let has_approver = rows.iter().any(|row| row.approver_id.is_some());
        let has_input_date = rows.iter().any(|row| row.input_date.is_some());
        Self {
            rows,
            has_preparer,
            has_approver,
            has_input_date,
            unreadable_input_dates: BTreeSet::new(),
            skipped: 0,
        }
    }

    /// Types every record of a table, skipping the ones that cannot be typed.
    #[must_use]
    pub fn from_table(table: &JournalTable) -> Self {
        let mut skipped = 0;
        let mut unreadable_input_dates = BTreeSet::new();
        let rows = table
            .records()
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let row = JournalEntryRow::from_raw(index + 1, raw);
                match &row {
                    None => skipped += 1,
                    Some(typed)
                        if typed.input_date.is_none() && raw.value(Column::InputDate).is_some() =>
                    {
                        unreadable_input_dates.insert(typed.row_number);
                    }
                    Some(_) => {}
                }
                row
            })
            .collect();

        Self {
            rows,
            has_preparer: table.has_column(Column::PreparerId),
            has_approver: table.has_column(Column::ApproverId),
            has_input_date: table.has_column(Column::InputDate),
            unreadable_input_dates,
            skipped,
        }
    }

    /// Returns the rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[JournalEntryRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the ledger has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of source records that could not be typed.
    #[must_use]
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }

    /// Returns true if the source carries a preparer column.
    #[must_use]
    pub fn has_preparer_column(&self) -> bool {
        self.has_preparer
    }

    /// Returns true if the source carries an approver column.
    #[must_use]
    pub fn has_approver_column(&self) -> bool {
        self.has_approver
    }

    /// Returns true if the source carries an input-date column.
    #[must_use]
    pub fn has_input_date_column(&self) -> bool {
        self.has_input_date
    }

    /// Returns true when the row's input-date cell holds a value that is not
    /// a date.
    #[must_use]
    pub fn has_unreadable_input_date(&self, row_number: usize) -> bool {
        self.unreadable_input_dates.contains(&row_number)
    }

    /// Groups rows by voucher number, in voucher-number order.
    #[must_use]
    pub fn vouchers(&self) -> BTreeMap<&str, Vec<&JournalEntryRow>> {
        let mut vouchers: BTreeMap<&str, Vec<&JournalEntryRow>> = BTreeMap::new();
        for row in &self.rows {
            vouchers.entry(row.voucher_number.as_str()).or_default().push(row);
        }
        vouchers
    }

    /// Groups rows by account code, in account-code order.
    #[must_use]
    pub fn accounts(&self) -> BTreeMap<&str, Vec<&JournalEntryRow>> {
        let mut accounts: BTreeMap<&str, Vec<&JournalEntryRow>> = BTreeMap::new();
        for row in &self.rows {
            accounts.entry(row.account_code.as_str()).or_default().push(row);
        }
        accounts
    }

    /// Returns the distinct account codes used.
    #[must_use]
    pub fn account_codes(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.account_code.as_str()).collect()
    }
}

impl JournalTable {
    /// Builds a raw table from typed rows.
    ///
    /// The declared columns are the required ones plus counterparty and
    /// preparer; approver and input date are declared when any row has one.
    #[must_use]
    pub fn from_rows(rows: &[JournalEntryRow]) -> Self {
        let mut columns: Vec<Column> = Column::REQUIRED.to_vec();
        columns.extend([Column::CounterpartyCode, Column::PreparerId]);
        if rows.iter().any(|row| row.approver_id.is_some()) {
            columns.push(Column::ApproverId);
        }
        if rows.iter().any(|row| row.input_date.is_some()) {
            columns.push(Column::InputDate);
        }

        Self::new(columns, rows.iter().map(JournalEntryRow::to_raw).collect())
    }
}
