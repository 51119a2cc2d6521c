//! The closed rule catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::anomaly::{accounts, combination, timing, users};
use super::context::RuleContext;
use super::error::RuleError;
use super::types::{RuleId, RuleResult};
use super::{balance, rollforward, validation};

/// Input table a rule may depend on besides the journal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTable {
    /// Opening trial balance.
    OpeningTrialBalance,
    /// Closing trial balance.
    ClosingTrialBalance,
    /// HR roster.
    HrRoster,
    /// Authorization matrix.
    AuthorizationMatrix,
    /// Chart of accounts.
    ChartOfAccounts,
    /// Account usage history.
    UsageHistory,
    /// Combination rule list.
    CombinationRules,
}

impl ReferenceTable {
    /// Returns the table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpeningTrialBalance => "opening_trial_balance",
            Self::ClosingTrialBalance => "closing_trial_balance",
            Self::HrRoster => "hr_roster",
            Self::AuthorizationMatrix => "authorization_matrix",
            Self::ChartOfAccounts => "chart_of_accounts",
            Self::UsageHistory => "usage_history",
            Self::CombinationRules => "combination_rules",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule entry point.
pub type Evaluate = fn(&RuleContext<'_>) -> Result<RuleResult, RuleError>;

/// Static description of a catalog rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    /// Rule id.
    pub id: RuleId,
    /// Short label.
    pub label: &'static str,
    /// What the rule flags.
    pub description: &'static str,
    /// Included in every default run.
    pub mandatory: bool,
    /// Tables the rule reads. Optional ones are noted in the description.
    pub requires: &'static [ReferenceTable],
    /// Entry point.
    pub evaluate: Evaluate,
}

/// Every rule, indexed by `RuleId` discriminant.
pub static CATALOG: [RuleMeta; 12] = [
    RuleMeta {
        id: RuleId::A01,
        label: "Data validation",
        description: "Required columns, missing key values, amount and date types, single date per voucher, duplicate records",
        mandatory: true,
        requires: &[],
        evaluate: validation::evaluate,
    },
    RuleMeta {
        id: RuleId::A02,
        label: "Voucher balance",
        description: "Vouchers whose debit and credit totals differ by more than the tolerance",
        mandatory: true,
        requires: &[],
        evaluate: balance::evaluate,
    },
    RuleMeta {
        id: RuleId::A03,
        label: "Trial balance roll-forward",
        description: "Accounts where opening balance plus ledger movement differs from the reported closing balance",
        mandatory: true,
        requires: &[
            ReferenceTable::OpeningTrialBalance,
            ReferenceTable::ClosingTrialBalance,
        ],
        evaluate: rollforward::evaluate,
    },
    RuleMeta {
        id: RuleId::B01,
        label: "Material income statement accounts",
        description: "Revenue and expense accounts whose net movement exceeds the materiality threshold",
        mandatory: false,
        requires: &[ReferenceTable::ChartOfAccounts],
        evaluate: accounts::evaluate_material,
    },
    RuleMeta {
        id: RuleId::B02,
        label: "Abnormal account usage",
        description: "Entries posted to accounts marked for abnormal usage or missing from the chart of accounts",
        mandatory: false,
        requires: &[ReferenceTable::ChartOfAccounts],
        evaluate: accounts::evaluate_abnormal,
    },
    RuleMeta {
        id: RuleId::B03,
        label: "New accounts",
        description: "Entries posted to accounts created this period; either the chart of accounts or the opening trial balance suffices",
        mandatory: false,
        requires: &[
            ReferenceTable::ChartOfAccounts,
            ReferenceTable::OpeningTrialBalance,
        ],
        evaluate: accounts::evaluate_new,
    },
    RuleMeta {
        id: RuleId::B04,
        label: "Seldom used accounts",
        description: "Accounts used fewer times than the low-frequency threshold; usage history is optional",
        mandatory: false,
        requires: &[],
        evaluate: accounts::evaluate_low_frequency,
    },
    RuleMeta {
        id: RuleId::B05,
        label: "Unregistered users",
        description: "Entries whose preparer or approver is missing from the HR roster",
        mandatory: false,
        requires: &[ReferenceTable::HrRoster],
        evaluate: users::evaluate_unregistered,
    },
    RuleMeta {
        id: RuleId::B06,
        label: "Unauthorized postings",
        description: "Entries whose preparer is not authorized for the account",
        mandatory: false,
        requires: &[ReferenceTable::AuthorizationMatrix],
        evaluate: users::evaluate_unauthorized,
    },
    RuleMeta {
        id: RuleId::B07,
        label: "Posting timing",
        description: "Entries recorded after the fiscal year end into the closed period, or effective after their input date",
        mandatory: false,
        requires: &[],
        evaluate: timing::evaluate,
    },
    RuleMeta {
        id: RuleId::B08,
        label: "Self-approval",
        description: "Vouchers approved by their own preparer",
        mandatory: false,
        requires: &[],
        evaluate: users::evaluate_self_approval,
    },
    RuleMeta {
        id: RuleId::B09,
        label: "Unusual account combinations",
        description: "Vouchers whose accounts match a forbidden combination; built-in patterns apply when none are given",
        mandatory: false,
        requires: &[],
        evaluate: combination::evaluate,
    },
];

/// Returns the catalog entry of a rule.
#[must_use]
pub fn meta(id: RuleId) -> &'static RuleMeta {
    &CATALOG[id as usize]
}
