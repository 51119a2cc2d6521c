//! Rule catalog and rule implementations.
//!
//! This module implements the closed JET rule set:
//! - A01 structural validation of the raw journal table
//! - A02 voucher debit/credit balance
//! - A03 trial balance roll-forward
//! - B01 to B09 anomaly rules
//! - The static catalog dispatching `RuleId` to its entry point

pub mod anomaly;
pub mod balance;
pub mod catalog;
pub mod context;
pub mod error;
pub mod finding;
pub mod params;
pub mod rollforward;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod rollforward_props;
#[cfg(test)]
mod validation_props;

pub use balance::{check_balance, voucher_totals};
pub use catalog::{CATALOG, Evaluate, ReferenceTable, RuleMeta};
pub use context::RuleContext;
pub use error::RuleError;
pub use finding::{
    AccountTotal, AccountUsage, CombinationMatch, EntryFlag, FlaggedEntry, FlaggedRow, RollForwardLine,
    Violation, ViolationCode, VoucherTotals,
};
pub use params::RuleParams;
pub use rollforward::{reconcile, roll_forward};
pub use types::{RuleId, RuleResult, RuleStatus, UnknownRuleId};
pub use validation::validate;
