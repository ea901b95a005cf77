use crate::error::ConfigError;
use analytics::{MAX_PROJECTION_YEARS, ReportParams};
use core_types::{DEFAULT_DATE_FORMATS, Granularity};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerSettings,
    pub reports: ReportSettings,
    pub portfolio: PortfolioSettings,
    pub projection: ProjectionSettings,
    pub logging: LoggingSettings,
}

/// Where the trade ledger lives and how its dates are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// The CSV file holding one row per lot.
    pub path: PathBuf,
    /// `chrono` formats tried in order when reading a date cell.
    pub date_formats: Vec<String>,
}

/// Parameters shared by the composed reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub granularity: Granularity,
    /// Size of every leaderboard.
    pub top_n: usize,
    /// Number of strategies listed in each breakdown.
    pub strategy_top_k: usize,
    /// Number of rows in the recent exits list.
    pub recent_n: usize,
    /// Tags that are not strategies and are left out of the activity view.
    pub excluded_strategy_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    /// The capital baseline that P/L is measured against.
    pub initial_capital: Decimal,
}

/// Defaults for the growth projection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub annual_return_pct: Decimal,
    pub years: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("trade_data.csv"),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        let params = ReportParams::default();
        Self {
            granularity: params.granularity,
            top_n: params.top_n,
            strategy_top_k: params.strategy_top_k,
            recent_n: params.recent_n,
            excluded_strategy_tags: params.excluded_strategy_tags,
        }
    }
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            initial_capital: ReportParams::default().initial_capital,
        }
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            annual_return_pct: Decimal::from(20),
            years: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks the values the loader cannot enforce through types alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.portfolio.initial_capital.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "portfolio.initial_capital must not be negative, got {}",
                self.portfolio.initial_capital
            )));
        }
        if self.ledger.date_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "ledger.date_formats must list at least one format".to_string(),
            ));
        }
        if self.projection.years == 0 || self.projection.years > MAX_PROJECTION_YEARS {
            return Err(ConfigError::ValidationError(format!(
                "projection.years must be between 1 and {MAX_PROJECTION_YEARS}, got {}",
                self.projection.years
            )));
        }
        if self.projection.annual_return_pct.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "projection.annual_return_pct must not be negative, got {}",
                self.projection.annual_return_pct
            )));
        }
        Ok(())
    }

    /// The analytics parameters described by this configuration.
    pub fn report_params(&self) -> ReportParams {
        ReportParams {
            granularity: self.reports.granularity,
            top_n: self.reports.top_n,
            strategy_top_k: self.reports.strategy_top_k,
            recent_n: self.reports.recent_n,
            initial_capital: self.portfolio.initial_capital,
            excluded_strategy_tags: self.reports.excluded_strategy_tags.clone(),
        }
    }
}
