//! Raw journal entry table as delivered by the ingestion layer.
//!
//! Every cell is an optional string so that structural validation (A01) can
//! see missing and malformed values before anything is typed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Journal entry table column.
///
/// Deserializes from either the English field name or the Korean header
/// used by the source ledger exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Posting/effective date (전표일자).
    #[serde(alias = "전표일자")]
    EntryDate,
    /// Voucher number (전표번호).
    #[serde(alias = "전표번호")]
    VoucherNumber,
    /// Account code (계정코드).
    #[serde(alias = "계정코드")]
    AccountCode,
    /// Account name (계정과목).
    #[serde(alias = "계정과목")]
    AccountName,
    /// Debit amount (차변금액).
    #[serde(alias = "차변금액")]
    DebitAmount,
    /// Credit amount (대변금액).
    #[serde(alias = "대변금액")]
    CreditAmount,
    /// Counterparty code (거래처코드).
    #[serde(alias = "거래처코드")]
    CounterpartyCode,
    /// Preparer (입력사원).
    #[serde(alias = "입력사원")]
    PreparerId,
    /// Approver (승인자).
    #[serde(alias = "승인자")]
    ApproverId,
    /// System input/recording date (입력일자).
    #[serde(alias = "입력일자")]
    InputDate,
}

impl Column {
    /// Every known column.
    pub const ALL: [Self; 10] = [
        Self::EntryDate,
        Self::VoucherNumber,
        Self::AccountCode,
        Self::AccountName,
        Self::DebitAmount,
        Self::CreditAmount,
        Self::CounterpartyCode,
        Self::PreparerId,
        Self::ApproverId,
        Self::InputDate,
    ];

    /// Columns a ledger must carry.
    pub const REQUIRED: [Self; 6] = [
        Self::EntryDate,
        Self::VoucherNumber,
        Self::AccountCode,
        Self::AccountName,
        Self::DebitAmount,
        Self::CreditAmount,
    ];

    /// Columns that must never hold a missing value.
    pub const KEY: [Self; 5] = [
        Self::VoucherNumber,
        Self::AccountCode,
        Self::DebitAmount,
        Self::CreditAmount,
        Self::EntryDate,
    ];

    /// Returns the English field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntryDate => "entry_date",
            Self::VoucherNumber => "voucher_number",
            Self::AccountCode => "account_code",
            Self::AccountName => "account_name",
            Self::DebitAmount => "debit_amount",
            Self::CreditAmount => "credit_amount",
            Self::CounterpartyCode => "counterparty_code",
            Self::PreparerId => "preparer_id",
            Self::ApproverId => "approver_id",
            Self::InputDate => "input_date",
        }
    }

    /// Returns the Korean source header.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::EntryDate => "전표일자",
            Self::VoucherNumber => "전표번호",
            Self::AccountCode => "계정코드",
            Self::AccountName => "계정과목",
            Self::DebitAmount => "차변금액",
            Self::CreditAmount => "대변금액",
            Self::CounterpartyCode => "거래처코드",
            Self::PreparerId => "입력사원",
            Self::ApproverId => "승인자",
            Self::InputDate => "입력일자",
        }
    }

    /// Resolves a header in either naming, ignoring surrounding whitespace.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == header || column.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One untyped journal entry record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawJournalEntry {
    /// Entry date cell.
    #[serde(default, alias = "전표일자", deserialize_with = "cell")]
    pub entry_date: Option<String>,
    /// Voucher number cell.
    #[serde(default, alias = "전표번호", deserialize_with = "cell")]
    pub voucher_number: Option<String>,
    /// Account code cell.
    #[serde(default, alias = "계정코드", deserialize_with = "cell")]
    pub account_code: Option<String>,
    /// Account name cell.
    #[serde(default, alias = "계정과목", deserialize_with = "cell")]
    pub account_name: Option<String>,
    /// Debit amount cell.
    #[serde(default, alias = "차변금액", deserialize_with = "cell")]
    pub debit_amount: Option<String>,
    /// Credit amount cell.
    #[serde(default, alias = "대변금액", deserialize_with = "cell")]
    pub credit_amount: Option<String>,
    /// Counterparty code cell.
    #[serde(default, alias = "거래처코드", deserialize_with = "cell")]
    pub counterparty_code: Option<String>,
    /// Preparer cell.
    #[serde(default, alias = "입력사원", deserialize_with = "cell")]
    pub preparer_id: Option<String>,
    /// Approver cell.
    #[serde(default, alias = "승인자", deserialize_with = "cell")]
    pub approver_id: Option<String>,
    /// Input date cell.
    #[serde(default, alias = "입력일자", deserialize_with = "cell")]
    pub input_date: Option<String>,
}

impl RawJournalEntry {
    fn cell_mut(&mut self, column: Column) -> &mut Option<String> {
        match column {
            Column::EntryDate => &mut self.entry_date,
            Column::VoucherNumber => &mut self.voucher_number,
            Column::AccountCode => &mut self.account_code,
            Column::AccountName => &mut self.account_name,
            Column::DebitAmount => &mut self.debit_amount,
            Column::CreditAmount => &mut self.credit_amount,
            Column::CounterpartyCode => &mut self.counterparty_code,
            Column::PreparerId => &mut self.preparer_id,
            Column::ApproverId => &mut self.approver_id,
            Column::InputDate => &mut self.input_date,
        }
    }

    /// Returns the raw cell for a column.
    #[must_use]
    pub fn cell(&self, column: Column) -> Option<&str> {
        let cell = match column {
            Column::EntryDate => &self.entry_date,
            Column::VoucherNumber => &self.voucher_number,
            Column::AccountCode => &self.account_code,
            Column::AccountName => &self.account_name,
            Column::DebitAmount => &self.debit_amount,
            Column::CreditAmount => &self.credit_amount,
            Column::CounterpartyCode => &self.counterparty_code,
            Column::PreparerId => &self.preparer_id,
            Column::ApproverId => &self.approver_id,
            Column::InputDate => &self.input_date,
        };
        cell.as_deref()
    }

    /// Returns the trimmed cell for a column, or `None` when it is blank.
    #[must_use]
    pub fn value(&self, column: Column) -> Option<&str> {
        self.cell(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Journal entry table: declared columns plus untyped records.
///
/// When deserialized without a `columns` list, every known header that
/// appears in any record is declared, including headers whose values are
/// all null. A key column that is present but empty therefore yields
/// per-record `MISSING_VALUE` violations rather than `MISSING_COLUMN`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JournalTableRepr")]
pub struct JournalTable {
    columns: BTreeSet<Column>,
    records: Vec<RawJournalEntry>,
}

#[derive(Deserialize)]
struct JournalTableRepr {
    #[serde(default)]
    columns: Option<BTreeSet<Column>>,
    #[serde(default)]
    records: Vec<BTreeMap<String, CellRepr>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Cell(#[serde(deserialize_with = "cell")] Option<String>),
    Other(de::IgnoredAny),
}

impl From<JournalTableRepr> for JournalTable {
    fn from(repr: JournalTableRepr) -> Self {
        let mut headers = BTreeSet::new();
        let records = repr
            .records
            .into_iter()
            .map(|fields| {
                let mut record = RawJournalEntry::default();
                for (header, value) in fields {
                    // Unknown headers are ignored.
                    let Some(column) = Column::from_header(&header) else {
                        continue;
                    };
                    headers.insert(column);
                    if let CellRepr::Cell(value) = value {
                        *record.cell_mut(column) = value;
                    }
                }
                record
            })
            .collect();
        Self::new(repr.columns.unwrap_or(headers), records)
    }
}

impl JournalTable {
    /// Creates a table with an explicit column set.
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = Column>, records: Vec<RawJournalEntry>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// Creates a table whose columns are the ones holding at least one value.
    ///
    /// A column that is `None` in every record is treated as absent, so a
    /// required column left entirely empty is reported once as
    /// `MISSING_COLUMN`. Use [`JournalTable::new`] to declare such a column
    /// and get per-record `MISSING_VALUE` violations instead.
    #[must_use]
    pub fn from_records(records: Vec<RawJournalEntry>) -> Self {
        let columns = Column::ALL
            .into_iter()
            .filter(|column| records.iter().any(|record| record.cell(*column).is_some()))
            .collect();
        Self { columns, records }
    }

    /// Returns the declared columns.
    #[must_use]
    pub fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    /// Returns the records in source order.
    #[must_use]
    pub fn records(&self) -> &[RawJournalEntry] {
        &self.records
    }

    /// Returns true if the table declares the column.
    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Returns the columns from `wanted` the table does not declare.
    #[must_use]
    pub fn missing_columns(&self, wanted: &[Column]) -> Vec<Column> {
        wanted
            .iter()
            .copied()
            .filter(|column| !self.has_column(*column))
            .collect()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Accepts strings, numbers, and null for a cell.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CellVisitor;

    impl<'de> Visitor<'de> for CellVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number, or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(CellVisitor)
        }
    }

    deserializer.deserialize_any(CellVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_header_accepts_both_namings() {
        assert_eq!(Column::from_header("전표번호"), Some(Column::VoucherNumber));
        assert_eq!(Column::from_header(" voucher_number "), Some(Column::VoucherNumber));
        assert_eq!(Column::from_header("입력일자"), Some(Column::InputDate));
        assert_eq!(Column::from_header("memo"), None);
    }

    #[test]
    fn test_value_trims_and_drops_blank() {
        let record = RawJournalEntry {
            voucher_number: Some("  V1 ".into()),
            account_code: Some("   ".into()),
            ..RawJournalEntry::default()
        };
        assert_eq!(record.value(Column::VoucherNumber), Some("V1"));
        assert_eq!(record.value(Column::AccountCode), None);
        assert_eq!(record.cell(Column::AccountCode), Some("   "));
        assert_eq!(record.value(Column::EntryDate), None);
    }

    #[test]
    fn test_from_records_infers_columns() {
        let table = JournalTable::from_records(vec![RawJournalEntry {
            voucher_number: Some("V1".into()),
            debit_amount: Some("100".into()),
            ..RawJournalEntry::default()
        }]);
        assert!(table.has_column(Column::VoucherNumber));
        assert!(table.has_column(Column::DebitAmount));
        assert!(!table.has_column(Column::ApproverId));
        assert_eq!(table.missing_columns(&[Column::VoucherNumber, Column::EntryDate]), vec![
            Column::EntryDate
        ]);
    }

    #[test]
    fn test_deserialize_korean_headers_and_numbers() {
        let json = r#"{
            "records": [
                {"전표일자": "2023-01-05", "전표번호": "V1", "계정코드": 1000,
                 "계정과목": "현금", "차변금액": 100.5, "대변금액": 0, "입력사원": null}
            ]
        }"#;
        let table: JournalTable = serde_json::from_str(json).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.value(Column::AccountCode), Some("1000"));
        assert_eq!(record.value(Column::DebitAmount), Some("100.5"));
        assert_eq!(record.value(Column::CreditAmount), Some("0"));
        assert_eq!(record.preparer_id, None);
        assert!(table.has_column(Column::EntryDate));
        assert!(table.has_column(Column::PreparerId));
        assert!(!table.has_column(Column::ApproverId));
    }

    #[test]
    fn test_all_null_key_column_stays_declared() {
        let json = r#"{
            "records": [
                {"entry_date": "2023-01-05", "voucher_number": null, "account_code": "1000",
                 "account_name": "Cash", "debit_amount": "10", "credit_amount": "0", "memo": {"note": "x"}},
                {"entry_date": "2023-01-05", "voucher_number": null, "account_code": "4000",
                 "account_name": "Sales", "debit_amount": "0", "credit_amount": "10"}
            ]
        }"#;
        let table: JournalTable = serde_json::from_str(json).unwrap();
        assert!(table.has_column(Column::VoucherNumber));
        assert!(table.missing_columns(&Column::REQUIRED).is_empty());
        assert_eq!(table.columns().len(), 6);

        let inferred = JournalTable::from_records(table.records().to_vec());
        assert_eq!(inferred.missing_columns(&Column::REQUIRED), vec![Column::VoucherNumber]);
    }

    #[test]
    fn test_deserialize_explicit_columns_kept() {
        let json = r#"{"columns": ["voucher_number", "입력일자"], "records": []}"#;
        let table: JournalTable = serde_json::from_str(json).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column(Column::InputDate));
        assert_eq!(table.columns().len(), 2);
    }
}
