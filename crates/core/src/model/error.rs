//! Data model invariant errors.

use thiserror::Error;

/// Errors raised when an input table violates a data model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An account code appears twice in one trial balance snapshot.
    #[error("Duplicate account code in trial balance: {0}")]
    DuplicateAccount(String),

    /// An account code appears twice in the chart of accounts.
    #[error("Duplicate account code in chart of accounts: {0}")]
    DuplicateChartAccount(String),

    /// An account code is blank.
    #[error("Account code must not be blank")]
    BlankAccountCode,
}

impl ModelError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::DuplicateChartAccount(_) => "DUPLICATE_CHART_ACCOUNT",
            Self::BlankAccountCode => "BLANK_ACCOUNT_CODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ModelError::DuplicateAccount("1000".into()).error_code(),
            "DUPLICATE_ACCOUNT"
        );
        assert_eq!(ModelError::BlankAccountCode.error_code(), "BLANK_ACCOUNT_CODE");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ModelError::DuplicateAccount("1000".into()).to_string(),
            "Duplicate account code in trial balance: 1000"
        );
    }
}
