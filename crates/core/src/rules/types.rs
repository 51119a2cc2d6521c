//! Rule identifiers, statuses and results.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{self, RuleMeta};
use super::error::RuleError;
use super::finding::FlaggedRow;

/// Identifier of a catalog rule.
///
/// Ordering follows the catalog: mandatory rules first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    /// Structural validation.
    A01,
    /// Voucher debit/credit balance.
    A02,
    /// Trial balance roll-forward.
    A03,
    /// Material income statement accounts.
    B01,
    /// Abnormal account usage.
    B02,
    /// Newly created accounts.
    B03,
    /// Seldom used accounts.
    B04,
    /// Unregistered users.
    B05,
    /// Unauthorized postings.
    B06,
    /// Posting timing anomalies.
    B07,
    /// Self-approved vouchers.
    B08,
    /// Unusual account combinations.
    B09,
}

impl RuleId {
    /// Every rule, in catalog order.
    pub const ALL: [Self; 12] = [
        Self::A01,
        Self::A02,
        Self::A03,
        Self::B01,
        Self::B02,
        Self::B03,
        Self::B04,
        Self::B05,
        Self::B06,
        Self::B07,
        Self::B08,
        Self::B09,
    ];

    /// Returns the rule id as written in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A01 => "A01",
            Self::A02 => "A02",
            Self::A03 => "A03",
            Self::B01 => "B01",
            Self::B02 => "B02",
            Self::B03 => "B03",
            Self::B04 => "B04",
            Self::B05 => "B05",
            Self::B06 => "B06",
            Self::B07 => "B07",
            Self::B08 => "B08",
            Self::B09 => "B09",
        }
    }

    /// Returns true for the A-series rules that every run should include.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(self, Self::A01 | Self::A02 | Self::A03)
    }

    /// The mandatory rule set.
    #[must_use]
    pub fn mandatory() -> BTreeSet<Self> {
        Self::ALL.into_iter().filter(|id| id.is_mandatory()).collect()
    }

    /// Returns the catalog entry for this rule.
    #[must_use]
    pub fn meta(self) -> &'static RuleMeta {
        catalog::meta(self)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown rule id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rule id: {0}")]
pub struct UnknownRuleId(pub String);

impl FromStr for RuleId {
    type Err = UnknownRuleId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRuleId(s.to_string()))
    }
}

/// Outcome status of one rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    /// Nothing flagged.
    Pass,
    /// Findings that need review.
    Warn,
    /// The input failed a precondition check.
    Fail,
    /// The rule could not be evaluated.
    Error,
    /// The rule was skipped because its inputs were not supplied.
    NotRun,
    /// The rule does not apply to this input.
    NotApplicable,
}

impl RuleStatus {
    /// Returns the status as written in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
            Self::NotRun => "NOT_RUN",
            Self::NotApplicable => "NOT_APPLICABLE",
        }
    }

    /// Returns true for statuses that carry findings.
    #[must_use]
    pub const fn is_finding(self) -> bool {
        matches!(self, Self::Warn | Self::Fail)
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform result of one rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Rule that produced the result.
    pub rule_id: RuleId,
    /// Outcome status.
    pub status: RuleStatus,
    /// Human-readable summary.
    pub summary: String,
    /// Detail rows, in a deterministic order.
    pub flagged_rows: Vec<FlaggedRow>,
    /// Informational marker attached by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat: Option<String>,
}

impl RuleResult {
    /// Creates a result.
    #[must_use]
    pub fn new(
        rule_id: RuleId,
        status: RuleStatus,
        summary: impl Into<String>,
        flagged_rows: Vec<FlaggedRow>,
    ) -> Self {
        Self {
            rule_id,
            status,
            summary: summary.into(),
            flagged_rows,
            caveat: None,
        }
    }

    /// Creates a passing result with no flagged rows.
    #[must_use]
    pub fn pass(rule_id: RuleId, summary: impl Into<String>) -> Self {
        Self::new(rule_id, RuleStatus::Pass, summary, Vec::new())
    }

    /// Passing result for a ledger without rows.
    #[must_use]
    pub fn empty_ledger(rule_id: RuleId) -> Self {
        Self::pass(rule_id, "Ledger is empty, nothing to evaluate")
    }

    /// `on_finding` when any row is flagged, `PASS` otherwise.
    #[must_use]
    pub fn from_findings(
        rule_id: RuleId,
        on_finding: RuleStatus,
        summary: impl Into<String>,
        flagged_rows: Vec<FlaggedRow>,
    ) -> Self {
        let status = if flagged_rows.is_empty() {
            RuleStatus::Pass
        } else {
            on_finding
        };
        Self::new(rule_id, status, summary, flagged_rows)
    }

    /// Creates a not-applicable result.
    #[must_use]
    pub fn not_applicable(rule_id: RuleId, reason: impl Into<String>) -> Self {
        Self::new(rule_id, RuleStatus::NotApplicable, reason, Vec::new())
    }

    /// Maps a rule error to its result.
    #[must_use]
    pub fn from_error(rule_id: RuleId, error: &RuleError) -> Self {
        Self::new(
            rule_id,
            error.result_status(),
            format!("{}: {error}", error.error_code()),
            Vec::new(),
        )
    }

    /// Attaches a caveat.
    #[must_use]
    pub fn with_caveat(mut self, caveat: impl Into<String>) -> Self {
        self.caveat = Some(caveat.into());
        self
    }

    /// Number of flagged rows.
    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.flagged_rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A01", RuleId::A01)]
    #[case("b07", RuleId::B07)]
    #[case(" B09 ", RuleId::B09)]
    fn test_parse_rule_id(#[case] input: &str, #[case] expected: RuleId) {
        assert_eq!(input.parse::<RuleId>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_rule_id() {
        assert_eq!(
            "C01".parse::<RuleId>().unwrap_err(),
            UnknownRuleId("C01".into())
        );
    }

    #[test]
    fn test_mandatory_set() {
        let mandatory = RuleId::mandatory();
        assert_eq!(mandatory.len(), 3);
        assert!(mandatory.contains(&RuleId::A03));
        assert!(!mandatory.contains(&RuleId::B01));
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&RuleStatus::NotApplicable).unwrap(),
            "\"NOT_APPLICABLE\""
        );
        assert_eq!(RuleStatus::NotRun.to_string(), "NOT_RUN");
    }

    #[test]
    fn test_from_findings_status() {
        let pass = RuleResult::from_findings(RuleId::B02, RuleStatus::Warn, "none", Vec::new());
        assert_eq!(pass.status, RuleStatus::Pass);
    }

    #[test]
    fn test_from_error_maps_status() {
        let result = RuleResult::from_error(
            RuleId::A03,
            &RuleError::ReconciliationNotApplicable {
                missing: "closing trial balance",
            },
        );
        assert_eq!(result.status, RuleStatus::NotRun);
        assert!(result.summary.starts_with("RECONCILIATION_NOT_APPLICABLE"));
    }
}
