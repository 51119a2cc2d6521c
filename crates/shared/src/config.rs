//! Application configuration management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine execution configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Default rule parameters, used when a run request leaves them unset.
    #[serde(default)]
    pub parameters: ParameterDefaults,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine execution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Voucher balance tolerance (A02). Exact comparison by default.
    #[serde(default)]
    pub balance_tolerance: Decimal,
    /// Roll-forward tolerance (A03).
    #[serde(default = "default_rollforward_tolerance")]
    pub rollforward_tolerance: Decimal,
    /// Evaluate selected rules concurrently.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Size of a dedicated worker pool. Uses the global pool when unset.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: Decimal::ZERO,
            rollforward_tolerance: default_rollforward_tolerance(),
            parallel: default_parallel(),
            worker_threads: None,
        }
    }
}

fn default_rollforward_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_parallel() -> bool {
    true
}

/// Default rule parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDefaults {
    /// Materiality threshold for income statement accounts (B01).
    #[serde(default = "default_materiality_threshold")]
    pub materiality_threshold: Decimal,
    /// Usage count below which an account is considered seldom used (B04).
    #[serde(default = "default_low_frequency_threshold")]
    pub low_frequency_threshold: i64,
    /// Fiscal year end used as the posting cutoff (B07).
    #[serde(default)]
    pub fiscal_year_end_date: Option<NaiveDate>,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            materiality_threshold: default_materiality_threshold(),
            low_frequency_threshold: default_low_frequency_threshold(),
            fiscal_year_end_date: None,
        }
    }
}

fn default_materiality_threshold() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn default_low_frequency_threshold() -> i64 {
    5
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "jet=info,jet_core=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("JET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "JET__ENGINE__BALANCE_TOLERANCE",
                "JET__ENGINE__ROLLFORWARD_TOLERANCE",
                "JET__ENGINE__PARALLEL",
                "JET__PARAMETERS__LOW_FREQUENCY_THRESHOLD",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.engine.balance_tolerance, Decimal::ZERO);
                assert_eq!(config.engine.rollforward_tolerance, dec!(0.01));
                assert!(config.engine.parallel);
                assert_eq!(config.engine.worker_threads, None);
                assert_eq!(config.parameters.materiality_threshold, dec!(1000000));
                assert_eq!(config.parameters.low_frequency_threshold, 5);
                assert_eq!(config.logging.filter, "jet=info,jet_core=info");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("JET__ENGINE__PARALLEL", Some("false")),
                ("JET__PARAMETERS__LOW_FREQUENCY_THRESHOLD", Some("3")),
                ("JET__PARAMETERS__FISCAL_YEAR_END_DATE", Some("2023-12-31")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(!config.engine.parallel);
                assert_eq!(config.parameters.low_frequency_threshold, 3);
                assert_eq!(
                    config.parameters.fiscal_year_end_date,
                    NaiveDate::from_ymd_opt(2023, 12, 31)
                );
            },
        );
    }

    #[test]
    fn test_engine_config_default() {
        let engine = EngineConfig::default();
        assert_eq!(engine.balance_tolerance, Decimal::ZERO);
        assert_eq!(engine.rollforward_tolerance, dec!(0.01));
        assert!(engine.parallel);
    }
}
