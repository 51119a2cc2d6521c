//! Rule parameters.

use chrono::NaiveDate;
use jet_shared::config::{EngineConfig, ParameterDefaults};
use jet_shared::types::Tolerance;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RuleError;

/// Tunable rule parameters. Unset values resolve to built-in defaults,
/// except the fiscal year end which has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParams {
    /// A02 voucher balance tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_tolerance: Option<Decimal>,
    /// A03 roll-forward tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollforward_tolerance: Option<Decimal>,
    /// B01 materiality threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materiality_threshold: Option<Decimal>,
    /// B04 usage threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_frequency_threshold: Option<i64>,
    /// B07 posting cutoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_end_date: Option<NaiveDate>,
}

impl RuleParams {
    /// Default voucher balance tolerance: exact.
    pub const DEFAULT_BALANCE_TOLERANCE: Decimal = Decimal::ZERO;
    /// Default roll-forward tolerance (0.01).
    pub const DEFAULT_ROLLFORWARD_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
    /// Default materiality threshold.
    pub const DEFAULT_MATERIALITY_THRESHOLD: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
    /// Default usage threshold.
    pub const DEFAULT_LOW_FREQUENCY_THRESHOLD: i64 = 5;

    /// Sets the voucher balance tolerance.
    #[must_use]
    pub fn with_balance_tolerance(mut self, tolerance: Decimal) -> Self {
        self.balance_tolerance = Some(tolerance);
        self
    }

    /// Sets the roll-forward tolerance.
    #[must_use]
    pub fn with_rollforward_tolerance(mut self, tolerance: Decimal) -> Self {
        self.rollforward_tolerance = Some(tolerance);
        self
    }

    /// Sets the materiality threshold.
    #[must_use]
    pub fn with_materiality_threshold(mut self, threshold: Decimal) -> Self {
        self.materiality_threshold = Some(threshold);
        self
    }

    /// Sets the usage threshold.
    #[must_use]
    pub fn with_low_frequency_threshold(mut self, threshold: i64) -> Self {
        self.low_frequency_threshold = Some(threshold);
        self
    }

    /// Sets the fiscal year end.
    #[must_use]
    pub fn with_fiscal_year_end(mut self, date: NaiveDate) -> Self {
        self.fiscal_year_end_date = Some(date);
        self
    }

    /// Fills unset values from configuration.
    pub fn apply_defaults(&mut self, engine: &EngineConfig, defaults: &ParameterDefaults) {
        self.balance_tolerance.get_or_insert(engine.balance_tolerance);
        self.rollforward_tolerance
            .get_or_insert(engine.rollforward_tolerance);
        self.materiality_threshold
            .get_or_insert(defaults.materiality_threshold);
        self.low_frequency_threshold
            .get_or_insert(defaults.low_frequency_threshold);
        if self.fiscal_year_end_date.is_none() {
            self.fiscal_year_end_date = defaults.fiscal_year_end_date;
        }
    }

    /// Resolved voucher balance tolerance.
    ///
    /// # Errors
    ///
    /// Returns a parameter error when the tolerance is negative.
    pub fn balance_tolerance(&self) -> Result<Tolerance, RuleError> {
        resolve_tolerance(
            "balance_tolerance",
            self.balance_tolerance
                .unwrap_or(Self::DEFAULT_BALANCE_TOLERANCE),
        )
    }

    /// Resolved roll-forward tolerance.
    ///
    /// # Errors
    ///
    /// Returns a parameter error when the tolerance is negative.
    pub fn rollforward_tolerance(&self) -> Result<Tolerance, RuleError> {
        resolve_tolerance(
            "rollforward_tolerance",
            self.rollforward_tolerance
                .unwrap_or(Self::DEFAULT_ROLLFORWARD_TOLERANCE),
        )
    }

    /// Resolved materiality threshold.
    ///
    /// # Errors
    ///
    /// Returns a parameter error when the threshold is negative.
    pub fn materiality_threshold(&self) -> Result<Decimal, RuleError> {
        let value = self
            .materiality_threshold
            .unwrap_or(Self::DEFAULT_MATERIALITY_THRESHOLD);
        if value < Decimal::ZERO {
            return Err(RuleError::parameter(
                "materiality_threshold",
                format!("must not be negative, got {value}"),
            ));
        }
        Ok(value)
    }

    /// Resolved usage threshold.
    ///
    /// # Errors
    ///
    /// Returns a parameter error when the threshold is negative.
    pub fn low_frequency_threshold(&self) -> Result<u64, RuleError> {
        let value = self
            .low_frequency_threshold
            .unwrap_or(Self::DEFAULT_LOW_FREQUENCY_THRESHOLD);
        u64::try_from(value).map_err(|_| {
            RuleError::parameter(
                "low_frequency_threshold",
                format!("must not be negative, got {value}"),
            )
        })
    }

    /// Fiscal year end.
    ///
    /// # Errors
    ///
    /// Returns a parameter error when no fiscal year end was given.
    pub fn fiscal_year_end_date(&self) -> Result<NaiveDate, RuleError> {
        self.fiscal_year_end_date
            .ok_or_else(|| RuleError::parameter("fiscal_year_end_date", "is required"))
    }
}

fn resolve_tolerance(name: &'static str, value: Decimal) -> Result<Tolerance, RuleError> {
    Tolerance::new(value)
        .ok_or_else(|| RuleError::parameter(name, format!("must not be negative, got {value}")))
}
