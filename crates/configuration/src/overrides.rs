use crate::settings::Config;
use core_types::Granularity;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Command-line values that take precedence over the loaded configuration.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReportOverrides {
    /// Ledger CSV file to read.
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Period width for bucketed reports.
    #[arg(long, global = true, value_enum)]
    pub granularity: Option<Granularity>,

    /// Number of rows in each leaderboard.
    #[arg(long = "top", global = true)]
    pub top_n: Option<usize>,

    /// Capital baseline used for the P/L percentage.
    #[arg(long, global = true)]
    pub initial_capital: Option<Decimal>,
}

impl ReportOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ledger) = &self.ledger {
            config.ledger.path = ledger.clone();
        }
        if let Some(granularity) = self.granularity {
            config.reports.granularity = granularity;
        }
        if let Some(top_n) = self.top_n {
            config.reports.top_n = top_n;
        }
        if let Some(initial_capital) = self.initial_capital {
            config.portfolio.initial_capital = initial_capital;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_given_values_override() {
        let mut config = Config::default();
        let overrides = ReportOverrides {
            granularity: Some(Granularity::Yearly),
            initial_capital: Some(dec!(42)),
            ..ReportOverrides::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.reports.granularity, Granularity::Yearly);
        assert_eq!(config.portfolio.initial_capital, dec!(42));
        assert_eq!(config.reports.top_n, 5);
        assert_eq!(config.ledger.path, PathBuf::from("trade_data.csv"));
    }
}
