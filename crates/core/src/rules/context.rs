//! Shared, read-only inputs handed to every rule.

use super::catalog::ReferenceTable;
use super::error::RuleError;
use super::params::RuleParams;
use crate::model::{
    AuthorizationMatrix, AuxiliaryData, ChartOfAccounts, Column, HrRoster, JournalTable, Ledger,
    TrialBalance,
};

/// Inputs of one run, borrowed by every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Raw journal table.
    pub table: &'a JournalTable,
    /// Typed ledger built from `table`.
    pub ledger: &'a Ledger,
    /// Opening trial balance.
    pub opening: Option<&'a TrialBalance>,
    /// Closing trial balance.
    pub closing: Option<&'a TrialBalance>,
    /// Parameters.
    pub params: &'a RuleParams,
    /// Auxiliary reference tables.
    pub aux: &'a AuxiliaryData,
}

impl<'a> RuleContext<'a> {
    /// Returns the typed ledger once the table is usable by analytical rules.
    ///
    /// An empty table is always usable. Otherwise every key column must be
    /// declared and at least one record must have been typed.
    ///
    /// # Errors
    ///
    /// Returns `Schema` when key columns are missing, `Type` when no record
    /// could be typed.
    pub fn require_ledger(&self) -> Result<&'a Ledger, RuleError> {
        if self.table.is_empty() {
            return Ok(self.ledger);
        }
        let missing = self.table.missing_columns(&Column::KEY);
        if !missing.is_empty() {
            return Err(RuleError::Schema { missing });
        }
        if self.ledger.is_empty() {
            return Err(RuleError::Type {
                records: self.table.len(),
            });
        }
        Ok(self.ledger)
    }

    /// # Errors
    ///
    /// Returns `ReferenceDataMissing` when no chart of accounts was supplied.
    pub fn require_chart_of_accounts(&self) -> Result<&'a ChartOfAccounts, RuleError> {
        self.aux
            .chart_of_accounts
            .as_ref()
            .ok_or(RuleError::ReferenceDataMissing {
                table: ReferenceTable::ChartOfAccounts,
            })
    }

    /// # Errors
    ///
    /// Returns `ReferenceDataMissing` when no HR roster was supplied.
    pub fn require_hr_roster(&self) -> Result<&'a HrRoster, RuleError> {
        self.aux
            .hr_roster
            .as_ref()
            .ok_or(RuleError::ReferenceDataMissing {
                table: ReferenceTable::HrRoster,
            })
    }

    /// # Errors
    ///
    /// Returns `ReferenceDataMissing` when no authorization matrix was supplied.
    pub fn require_authorization_matrix(&self) -> Result<&'a AuthorizationMatrix, RuleError> {
        self.aux
            .authorization_matrix
            .as_ref()
            .ok_or(RuleError::ReferenceDataMissing {
                table: ReferenceTable::AuthorizationMatrix,
            })
    }
}
