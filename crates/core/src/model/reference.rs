//! Auxiliary reference tables supplied by the caller.
//!
//! All of these are read-only inputs. A rule that needs one that is absent
//! reports `ERROR` instead of passing silently.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue (income) account.
    Revenue,
    /// Expense account.
    Expense,
    /// Anything else (memo, suspense).
    Other,
}

impl AccountClass {
    /// Returns true for income statement classes.
    #[must_use]
    pub fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }
}

/// One chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoaAccount {
    /// Account code.
    pub account_code: String,
    /// Account name.
    #[serde(default)]
    pub account_name: String,
    /// Classification.
    pub class: AccountClass,
    /// Account was created in the current period.
    #[serde(default)]
    pub is_new: bool,
    /// Account is marked for abnormal usage.
    #[serde(default)]
    pub abnormal_usage: bool,
}

impl CoaAccount {
    /// Creates an entry with both flags cleared.
    #[must_use]
    pub fn new(account_code: impl Into<String>, account_name: impl Into<String>, class: AccountClass) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            class,
            is_new: false,
            abnormal_usage: false,
        }
    }

    /// Marks the account as created this period.
    #[must_use]
    pub fn new_this_period(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Marks the account for abnormal usage.
    #[must_use]
    pub fn abnormal(mut self) -> Self {
        self.abnormal_usage = true;
        self
    }
}

/// Chart of accounts keyed by account code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CoaAccount>", into = "Vec<CoaAccount>")]
pub struct ChartOfAccounts {
    accounts: BTreeMap<String, CoaAccount>,
}

impl ChartOfAccounts {
    /// Creates a chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if an account code is blank or appears twice.
    pub fn new(accounts: Vec<CoaAccount>) -> Result<Self, ModelError> {
        let mut map = BTreeMap::new();
        for mut account in accounts {
            account.account_code = account.account_code.trim().to_string();
            if account.account_code.is_empty() {
                return Err(ModelError::BlankAccountCode);
            }
            let code = account.account_code.clone();
            if map.insert(code.clone(), account).is_some() {
                return Err(ModelError::DuplicateChartAccount(code));
            }
        }
        Ok(Self { accounts: map })
    }

    /// Looks up an account.
    #[must_use]
    pub fn get(&self, account_code: &str) -> Option<&CoaAccount> {
        self.accounts.get(account_code)
    }

    /// Returns the number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl TryFrom<Vec<CoaAccount>> for ChartOfAccounts {
    type Error = ModelError;

    fn try_from(accounts: Vec<CoaAccount>) -> Result<Self, Self::Error> {
        Self::new(accounts)
    }
}

impl From<ChartOfAccounts> for Vec<CoaAccount> {
    fn from(chart: ChartOfAccounts) -> Self {
        chart.accounts.into_values().collect()
    }
}

/// HR roster: the people allowed to prepare and approve vouchers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrRoster {
    /// Valid preparer ids.
    #[serde(default)]
    pub preparers: BTreeSet<String>,
    /// Valid approver ids. Empty means approvers are not checked.
    #[serde(default)]
    pub approvers: BTreeSet<String>,
}

impl HrRoster {
    /// Creates a roster.
    #[must_use]
    pub fn new<P, A>(preparers: P, approvers: A) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            preparers: preparers.into_iter().map(Into::into).collect(),
            approvers: approvers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the preparer is on the roster.
    #[must_use]
    pub fn is_valid_preparer(&self, preparer_id: &str) -> bool {
        self.preparers.contains(preparer_id)
    }

    /// Returns true if the approver is on the roster.
    #[must_use]
    pub fn is_valid_approver(&self, approver_id: &str) -> bool {
        self.approvers.contains(approver_id)
    }
}

/// Authorization matrix: preparer → account codes they may post to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationMatrix {
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl AuthorizationMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a preparer access to an account.
    #[must_use]
    pub fn grant(mut self, preparer_id: impl Into<String>, account_code: impl Into<String>) -> Self {
        self.grants
            .entry(preparer_id.into())
            .or_default()
            .insert(account_code.into());
        self
    }

    /// Returns true if the (preparer, account) pair is in the matrix.
    #[must_use]
    pub fn is_authorized(&self, preparer_id: &str, account_code: &str) -> bool {
        self.grants
            .get(preparer_id)
            .is_some_and(|accounts| accounts.contains(account_code))
    }
}

/// Prior-period usage counts per account code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageHistory {
    counts: BTreeMap<String, u64>,
}

impl UsageHistory {
    /// Creates a usage history.
    #[must_use]
    pub fn new(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    /// Historical usage count of an account, zero when unknown.
    #[must_use]
    pub fn count(&self, account_code: &str) -> u64 {
        self.counts.get(account_code).copied().unwrap_or(0)
    }
}

/// A forbidden account combination within one voucher.
///
/// A voucher matches when one row's account starts with a `left` prefix and
/// a different row's account starts with a `right` prefix, no row matches an
/// `excluding` prefix, and the voucher has at most `max_lines` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationRule {
    /// Name reported on matches.
    pub name: String,
    /// Account-code prefixes for the first side.
    pub left: Vec<String>,
    /// Account-code prefixes for the second side.
    pub right: Vec<String>,
    /// Prefixes that, when present, clear the voucher.
    #[serde(default)]
    pub excluding: Vec<String>,
    /// Upper bound on voucher lines, when set.
    #[serde(default)]
    pub max_lines: Option<usize>,
}

impl CombinationRule {
    /// Patterns used when the caller configures none.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        let cash = || vec!["101".to_string(), "102".to_string(), "103".to_string()];
        vec![
            Self {
                name: "cash-to-cash transfer".to_string(),
                left: cash(),
                right: cash(),
                excluding: Vec::new(),
                max_lines: None,
            },
            Self {
                name: "direct asset-liability offset".to_string(),
                left: vec!["1".to_string(), "2".to_string()],
                right: vec!["3".to_string()],
                excluding: vec!["4".to_string(), "5".to_string()],
                max_lines: Some(2),
            },
        ]
    }

    /// Returns true when a voucher with these account codes, one per row,
    /// matches the rule.
    #[must_use]
    pub fn matches(&self, account_codes: &[&str]) -> bool {
        if self.max_lines.is_some_and(|max| account_codes.len() > max) {
            return false;
        }
        let any_prefix = |prefixes: &[String], code: &str| {
            prefixes.iter().any(|prefix| code.starts_with(prefix.as_str()))
        };
        if account_codes.iter().any(|code| any_prefix(&self.excluding, code)) {
            return false;
        }
        account_codes.iter().enumerate().any(|(i, left)| {
            any_prefix(&self.left, left)
                && account_codes
                    .iter()
                    .enumerate()
                    .any(|(j, right)| i != j && any_prefix(&self.right, right))
        })
    }
}

/// Every auxiliary table a run may use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryData {
    /// HR roster (B05).
    #[serde(default)]
    pub hr_roster: Option<HrRoster>,
    /// Authorization matrix (B06).
    #[serde(default)]
    pub authorization_matrix: Option<AuthorizationMatrix>,
    /// Chart of accounts (B01, B02, B03).
    #[serde(default)]
    pub chart_of_accounts: Option<ChartOfAccounts>,
    /// Usage history (B04).
    #[serde(default)]
    pub usage_history: Option<UsageHistory>,
    /// Combination rules (B09). Built-in patterns apply when absent.
    #[serde(default)]
    pub combination_rules: Option<Vec<CombinationRule>>,
}
