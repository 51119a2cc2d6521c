//! Result aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::{RuleId, RuleResult, RuleStatus};

/// Caveat attached to every other result when A01 fails.
pub const VALIDATION_CAVEAT: &str = "informational only: A01 validation failed";

/// Number of results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// `PASS` results.
    pub pass: usize,
    /// `WARN` results.
    pub warn: usize,
    /// `FAIL` results.
    pub fail: usize,
    /// `ERROR` results.
    pub error: usize,
    /// `NOT_RUN` results.
    pub not_run: usize,
    /// `NOT_APPLICABLE` results.
    pub not_applicable: usize,
}

impl StatusCounts {
    fn record(&mut self, status: RuleStatus) {
        let slot = match status {
            RuleStatus::Pass => &mut self.pass,
            RuleStatus::Warn => &mut self.warn,
            RuleStatus::Fail => &mut self.fail,
            RuleStatus::Error => &mut self.error,
            RuleStatus::NotRun => &mut self.not_run,
            RuleStatus::NotApplicable => &mut self.not_applicable,
        };
        *slot += 1;
    }
}

/// Aggregated outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Whether A01 passed on the input.
    pub validation_passed: bool,
    /// Results keyed by rule, in catalog order.
    pub results: BTreeMap<RuleId, RuleResult>,
}

impl RunReport {
    /// Builds the report from per-rule results.
    ///
    /// When validation did not pass, every result other than A01 carries
    /// [`VALIDATION_CAVEAT`].
    #[must_use]
    pub fn aggregate(
        run_id: Uuid,
        validation_passed: bool,
        results: impl IntoIterator<Item = RuleResult>,
    ) -> Self {
        let results = results
            .into_iter()
            .map(|result| {
                let result = if validation_passed || result.rule_id == RuleId::A01 {
                    result
                } else {
                    result.with_caveat(VALIDATION_CAVEAT)
                };
                (result.rule_id, result)
            })
            .collect();

        Self {
            run_id,
            generated_at: Utc::now(),
            validation_passed,
            results,
        }
    }

    /// Result of one rule, if it was selected.
    #[must_use]
    pub fn result(&self, rule_id: RuleId) -> Option<&RuleResult> {
        self.results.get(&rule_id)
    }

    /// Counts results per status.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in self.results.values() {
            counts.record(result.status);
        }
        counts
    }

    /// True when any rule reported findings.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.results.values().any(|result| result.status.is_finding())
    }
}
