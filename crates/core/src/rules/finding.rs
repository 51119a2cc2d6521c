//! Detail rows attached to rule results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{AccountClass, Column, JournalEntryRow};

/// A01 reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// A required column is not present.
    MissingColumn,
    /// A key column holds no value.
    MissingValue,
    /// An amount does not parse as a number.
    NonNumericAmount,
    /// An amount is negative.
    NegativeAmount,
    /// The entry date is not a valid calendar date.
    InvalidDate,
    /// The voucher's rows carry more than one entry date.
    CrossDateVoucher,
    /// The record repeats an earlier record exactly.
    DuplicateRecord,
}

impl ViolationCode {
    /// Returns the code as written in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingColumn => "MISSING_COLUMN",
            Self::MissingValue => "MISSING_VALUE",
            Self::NonNumericAmount => "NON_NUMERIC_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidDate => "INVALID_DATE",
            Self::CrossDateVoucher => "CROSS_DATE_VOUCHER",
            Self::DuplicateRecord => "DUPLICATE_RECORD",
        }
    }
}

/// One structural violation. `row_number` is `None` for table-level findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 1-based record position.
    pub row_number: Option<usize>,
    /// Voucher number, when the record has one.
    pub voucher_number: Option<String>,
    /// Every reason code the record violates.
    pub codes: Vec<ViolationCode>,
    /// Columns involved.
    pub columns: Vec<Column>,
}

/// Why a ledger row was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryFlag {
    /// Account is marked for abnormal usage.
    AbnormalUsage,
    /// Account is not in the chart of accounts.
    UnknownAccount,
    /// Account was created this period.
    NewAccount,
    /// Account is absent from the opening trial balance.
    NotInOpeningBalance,
    /// Account is seldom used.
    LowFrequency,
    /// Row has no preparer.
    MissingPreparer,
    /// Preparer is not on the roster.
    UnknownPreparer,
    /// Approver is not on the roster.
    UnknownApprover,
    /// Preparer may not post to the account.
    Unauthorized,
    /// Recorded after the fiscal year end into the closed period.
    PostedAfterCutoff,
    /// Effective date is later than the input date.
    EffectiveAfterInput,
    /// Input date cell holds a value that is not a date.
    UnreadableInputDate,
    /// Preparer approved their own voucher.
    SelfApproved,
}

/// A flagged ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedEntry {
    /// Reason.
    pub flag: EntryFlag,
    /// Human-readable detail.
    pub detail: String,
    /// The row.
    pub entry: JournalEntryRow,
}

impl FlaggedEntry {
    /// Flags a row.
    #[must_use]
    pub fn new(flag: EntryFlag, detail: impl Into<String>, entry: &JournalEntryRow) -> Self {
        Self {
            flag,
            detail: detail.into(),
            entry: entry.clone(),
        }
    }
}

/// Debit and credit sums of one voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherTotals {
    /// Voucher number.
    pub voucher_number: String,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
}

/// Roll-forward line of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollForwardLine {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Opening net balance.
    pub opening: Decimal,
    /// Net ledger movement.
    pub movement: Decimal,
    /// `opening + movement`.
    pub computed: Decimal,
    /// Closing net balance as reported.
    pub reported: Decimal,
    /// `computed - reported`.
    pub difference: Decimal,
    /// True when the difference exceeds the tolerance.
    pub flagged: bool,
}

/// Ledger totals of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotal {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Classification, when known.
    pub class: Option<AccountClass>,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub net: Decimal,
    /// Number of ledger rows.
    pub line_count: usize,
}

/// Usage of one rarely used account (B04).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUsage {
    /// Account code.
    pub account_code: String,
    /// Account name as first seen in the ledger.
    pub account_name: String,
    /// Rows posted this period.
    pub ledger_count: u64,
    /// Prior-period postings from the usage history.
    pub historical_count: u64,
    /// `ledger_count + historical_count`.
    pub usage: u64,
}

/// A voucher matching a combination rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationMatch {
    /// Name of the matching rule.
    pub rule_name: String,
    /// Voucher number.
    pub voucher_number: String,
    /// Entry date of the voucher.
    pub entry_date: NaiveDate,
    /// Distinct account codes of the voucher.
    pub account_codes: Vec<String>,
    /// Rows of the voucher.
    pub row_numbers: Vec<usize>,
}

/// One detail row of a rule result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlaggedRow {
    /// A01 structural violation.
    Violation(Violation),
    /// Ledger row with a reason.
    Entry(FlaggedEntry),
    /// Voucher sums (A02).
    Voucher(VoucherTotals),
    /// Reconciliation line (A03).
    RollForward(RollForwardLine),
    /// Account totals (B01).
    AccountTotal(AccountTotal),
    /// Account usage (B04).
    AccountUsage(AccountUsage),
    /// Combination match (B09).
    Combination(CombinationMatch),
}

impl FlaggedRow {
    /// Returns the ledger row when this is an entry finding.
    #[must_use]
    pub fn as_entry(&self) -> Option<&FlaggedEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}
