//! Rule evaluation errors.

use thiserror::Error;

use super::catalog::ReferenceTable;
use super::types::RuleStatus;
use crate::model::Column;

/// Errors that stop a single rule from producing findings.
///
/// None of these abort a run: the engine maps each one to the failing
/// rule's result and keeps evaluating the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The ledger lacks key columns.
    #[error("Ledger is missing key columns: {}", join_columns(missing))]
    Schema {
        /// Missing columns.
        missing: Vec<Column>,
    },

    /// No ledger record could be typed.
    #[error("None of the {records} ledger records could be typed")]
    Type {
        /// Number of records in the table.
        records: usize,
    },

    /// A required auxiliary table was not supplied.
    #[error("Required reference data not supplied: {table}")]
    ReferenceDataMissing {
        /// The missing table.
        table: ReferenceTable,
    },

    /// A parameter is missing or out of range.
    #[error("Invalid parameter {name}: {reason}")]
    Parameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Roll-forward needs both snapshots.
    #[error("Roll-forward requires both trial balances; {missing} not supplied")]
    ReconciliationNotApplicable {
        /// Which snapshot is missing.
        missing: &'static str,
    },

    /// A sum left the range of a decimal.
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),

    /// The rule panicked.
    #[error("Rule evaluation failed: {0}")]
    Internal(String),
}

impl RuleError {
    /// Creates a parameter error.
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Parameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates an overflow error for the named quantity.
    pub fn overflow(what: impl Into<String>) -> Self {
        Self::Overflow(what.into())
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::Type { .. } => "TYPE_ERROR",
            Self::ReferenceDataMissing { .. } => "REFERENCE_DATA_MISSING",
            Self::Parameter { .. } => "PARAMETER_ERROR",
            Self::ReconciliationNotApplicable { .. } => "RECONCILIATION_NOT_APPLICABLE",
            Self::Overflow(_) => "ARITHMETIC_OVERFLOW",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Status reported for a rule that failed with this error.
    #[must_use]
    pub fn result_status(&self) -> RuleStatus {
        match self {
            Self::ReconciliationNotApplicable { .. } => RuleStatus::NotRun,
            _ => RuleStatus::Error,
        }
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| column.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
