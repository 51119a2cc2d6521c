//! Tabular data model.
//!
//! - Raw journal table (untyped cells, for structural validation)
//! - Typed ledger and journal entry rows
//! - Trial balance snapshots
//! - Auxiliary reference tables

pub mod error;
pub mod ledger;
pub mod reference;
pub mod table;
pub mod trial_balance;

pub use error::ModelError;
pub use ledger::{JournalEntryRow, Ledger};
pub use reference::{
    AccountClass, AuthorizationMatrix, AuxiliaryData, ChartOfAccounts, CoaAccount,
    CombinationRule, HrRoster, UsageHistory,
};
pub use table::{Column, JournalTable, RawJournalEntry};
pub use trial_balance::{TrialBalance, TrialBalanceRow};
