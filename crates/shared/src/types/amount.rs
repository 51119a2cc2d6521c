//! Amount parsing and tolerance comparison.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses a ledger amount cell.
///
/// Accepts surrounding whitespace, thousands separators (`1,234.50`),
/// accounting negatives (`(100)`) and scientific notation. Returns `None`
/// for blank or non-numeric cells.
#[must_use]
pub fn parse_amount(cell: &str) -> Option<Decimal> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negate, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };

    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;

    Some(if negate { -value } else { value })
}

/// Non-negative absolute tolerance for amount comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance(Decimal);

impl Tolerance {
    /// Exact comparison.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a tolerance, rejecting negative values.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value < Decimal::ZERO {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the tolerance value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true when `|difference|` is strictly greater than the tolerance.
    #[must_use]
    pub fn is_exceeded_by(self, difference: Decimal) -> bool {
        difference.abs() > self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
