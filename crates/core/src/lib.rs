//! Core journal entry testing logic.
//!
//! This crate contains pure rule logic with ZERO file, network or database
//! dependencies. Callers hand in fully materialized tables and get back one
//! uniform result per rule.
//!
//! # Modules
//!
//! - `model` - Raw journal table, typed ledger, trial balances, reference tables
//! - `rules` - The closed rule catalog: A01 to A03 and B01 to B09
//! - `engine` - Parallel rule evaluation and result aggregation

pub mod engine;
pub mod model;
pub mod rules;

pub use engine::{EngineError, EngineOptions, JetEngine, RunReport, RunRequest, StatusCounts};
pub use model::{
    AuxiliaryData, JournalEntryRow, JournalTable, Ledger, ModelError, TrialBalance,
    TrialBalanceRow,
};
pub use rules::{FlaggedRow, RuleError, RuleId, RuleParams, RuleResult, RuleStatus};
