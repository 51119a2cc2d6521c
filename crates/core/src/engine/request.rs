//! Run request: everything one engine run reads.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{AuxiliaryData, JournalTable, TrialBalance};
use crate::rules::{RuleId, RuleParams};

/// Inputs of one run. The engine never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Rules to evaluate. Empty selects the mandatory rules.
    #[serde(default)]
    pub selected: BTreeSet<RuleId>,
    /// Journal entry table.
    #[serde(default)]
    pub ledger: JournalTable,
    /// Opening trial balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_tb: Option<TrialBalance>,
    /// Closing trial balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_tb: Option<TrialBalance>,
    /// Rule parameters.
    #[serde(default)]
    pub params: RuleParams,
    /// Auxiliary reference tables.
    #[serde(default)]
    pub aux: AuxiliaryData,
}

impl RunRequest {
    /// Creates a request for the mandatory rules over a journal table.
    #[must_use]
    pub fn new(ledger: JournalTable) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    /// Replaces the rule selection.
    #[must_use]
    pub fn select(mut self, rules: impl IntoIterator<Item = RuleId>) -> Self {
        self.selected = rules.into_iter().collect();
        self
    }

    /// Sets the opening trial balance.
    #[must_use]
    pub fn with_opening(mut self, opening: TrialBalance) -> Self {
        self.opening_tb = Some(opening);
        self
    }

    /// Sets the closing trial balance.
    #[must_use]
    pub fn with_closing(mut self, closing: TrialBalance) -> Self {
        self.closing_tb = Some(closing);
        self
    }

    /// Sets the parameters.
    #[must_use]
    pub fn with_params(mut self, params: RuleParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the auxiliary tables.
    #[must_use]
    pub fn with_aux(mut self, aux: AuxiliaryData) -> Self {
        self.aux = aux;
        self
    }

    /// The rules this request runs, in catalog order.
    #[must_use]
    pub fn selected_rules(&self) -> BTreeSet<RuleId> {
        if self.selected.is_empty() {
            RuleId::mandatory()
        } else {
            self.selected.clone()
        }
    }
}
