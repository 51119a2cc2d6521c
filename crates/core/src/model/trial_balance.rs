//! Trial balance snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// One account line of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code (계정코드).
    #[serde(alias = "계정코드")]
    pub account_code: String,
    /// Account name (계정과목).
    #[serde(default, alias = "계정과목")]
    pub account_name: String,
    /// Debit balance (차변잔액).
    #[serde(default, alias = "차변잔액")]
    pub debit_balance: Decimal,
    /// Credit balance (대변잔액).
    #[serde(default, alias = "대변잔액")]
    pub credit_balance: Decimal,
}

impl TrialBalanceRow {
    /// Creates a trial balance row.
    #[must_use]
    pub fn new(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        debit_balance: Decimal,
        credit_balance: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit_balance,
            credit_balance,
        }
    }

    /// Net balance: debit positive, credit negative.
    #[must_use]
    pub fn net_balance(&self) -> Decimal {
        self.debit_balance - self.credit_balance
    }
}

/// A trial balance snapshot with unique account codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrialBalanceRow>", into = "Vec<TrialBalanceRow>")]
pub struct TrialBalance {
    rows: Vec<TrialBalanceRow>,
    index: BTreeMap<String, usize>,
}

impl TrialBalance {
    /// Creates a snapshot, trimming account codes.
    ///
    /// # Errors
    ///
    /// Returns an error if an account code is blank or appears twice.
    pub fn new(rows: Vec<TrialBalanceRow>) -> Result<Self, ModelError> {
        let mut index = BTreeMap::new();
        let mut normalized = Vec::with_capacity(rows.len());

        for mut row in rows {
            row.account_code = row.account_code.trim().to_string();
            if row.account_code.is_empty() {
                return Err(ModelError::BlankAccountCode);
            }
            if index.insert(row.account_code.clone(), normalized.len()).is_some() {
                return Err(ModelError::DuplicateAccount(row.account_code));
            }
            normalized.push(row);
        }

        Ok(Self {
            rows: normalized,
            index,
        })
    }

    /// Returns the rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[TrialBalanceRow] {
        &self.rows
    }

    /// Looks up an account.
    #[must_use]
    pub fn get(&self, account_code: &str) -> Option<&TrialBalanceRow> {
        self.index.get(account_code).map(|&i| &self.rows[i])
    }

    /// Returns true if the snapshot lists the account.
    #[must_use]
    pub fn contains(&self, account_code: &str) -> bool {
        self.index.contains_key(account_code)
    }

    /// Net balance of an account, zero when absent.
    #[must_use]
    pub fn net_balance(&self, account_code: &str) -> Decimal {
        self.get(account_code)
            .map_or(Decimal::ZERO, TrialBalanceRow::net_balance)
    }

    /// Returns the account codes in order.
    pub fn account_codes(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Returns the number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the snapshot has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<Vec<TrialBalanceRow>> for TrialBalance {
    type Error = ModelError;

    fn try_from(rows: Vec<TrialBalanceRow>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<TrialBalance> for Vec<TrialBalanceRow> {
    fn from(balance: TrialBalance) -> Self {
        balance.rows
    }
}
