use crate::aggregator::{CategoryTotal, SymbolSummary};
use core_types::{BucketKey, DerivedRecord, Granularity};
use rust_decimal::Decimal;
use serde::Serialize;

/// Caller-supplied knobs for the composed reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    pub granularity: Granularity,
    /// Size of every leaderboard.
    pub top_n: usize,
    /// Number of strategies in each breakdown list.
    pub strategy_top_k: usize,
    /// Number of rows in the recency report.
    pub recent_n: usize,
    /// Externally supplied capital baseline for the P/L percentage.
    pub initial_capital: Decimal,
    /// Tags left out of the "most active" strategy view.
    pub excluded_strategy_tags: Vec<String>,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            granularity: Granularity::Monthly,
            top_n: 5,
            strategy_top_k: 4,
            recent_n: 10,
            initial_capital: Decimal::from(1_000_000),
            excluded_strategy_tags: vec!["AVG".to_string(), "LONG".to_string()],
        }
    }
}

/// Portfolio-wide totals.
///
/// All percentages are 0 when their denominator is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    // I. Counts
    pub total_trades: usize,
    pub open_trades: usize,
    pub partially_booked_trades: usize,
    pub fully_booked_trades: usize,
    /// Lots with any quantity still held (open plus partially booked).
    pub active_trades: usize,

    // II. Capital
    pub realized_pl: Decimal,
    /// Sum of `remaining_balance`.
    pub capital_deployed: Decimal,
    /// Sum of `invested_amount`.
    pub total_invested: Decimal,
    pub initial_capital: Decimal,

    // III. Ratios
    pub pl_pct_of_deployed: Decimal,
    pub pl_pct_of_invested: Decimal,
    pub pl_pct_of_initial_capital: Decimal,
    pub average_return_pct: Decimal,
}

impl PortfolioSummary {
    /// A zeroed summary for the given baseline.
    pub fn empty(initial_capital: Decimal) -> Self {
        Self {
            total_trades: 0,
            open_trades: 0,
            partially_booked_trades: 0,
            fully_booked_trades: 0,
            active_trades: 0,
            realized_pl: Decimal::ZERO,
            capital_deployed: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            initial_capital,
            pl_pct_of_deployed: Decimal::ZERO,
            pl_pct_of_invested: Decimal::ZERO,
            pl_pct_of_initial_capital: Decimal::ZERO,
            average_return_pct: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyActivity {
    pub strategy_tag: String,
    pub trades: usize,
    pub active_trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyBreakdown {
    /// By lot count, designated non-strategy tags excluded.
    pub most_active: Vec<StrategyActivity>,
    /// By summed realized P/L, every tag included.
    pub most_profitable: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodProfitRow {
    pub bucket: BucketKey,
    pub realized_pl: Decimal,
    pub cumulative_pl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodProfitReport {
    pub granularity: Granularity,
    pub rows: Vec<PeriodProfitRow>,
}

impl PeriodProfitReport {
    /// The last cumulative value, or 0 for an empty report.
    pub fn total(&self) -> Decimal {
        self.rows
            .last()
            .map(|row| row.cumulative_pl)
            .unwrap_or(Decimal::ZERO)
    }
}

/// One period of the activity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRow {
    pub bucket: BucketKey,
    /// Lots entered in the period.
    pub opened: u64,
    /// Lots entered in the period that still hold quantity.
    pub still_open: u64,
    /// Lots with an exit recorded in the period.
    pub booked: u64,
    pub cumulative_opened: u64,
    pub cumulative_still_open: u64,
    pub cumulative_booked: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeActivityReport {
    pub granularity: Granularity,
    pub rows: Vec<ActivityRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboards {
    pub fastest: Vec<DerivedRecord>,
    pub slowest: Vec<DerivedRecord>,
    pub top_by_profit: Vec<SymbolSummary>,
    pub top_by_return_pct: Vec<SymbolSummary>,
}

/// Every named report for one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradebookReport {
    pub summary: PortfolioSummary,
    pub strategies: StrategyBreakdown,
    pub period_profit: PeriodProfitReport,
    pub yearly_profit: PeriodProfitReport,
    pub activity: TradeActivityReport,
    pub leaderboards: Leaderboards,
    pub recent_exits: Vec<DerivedRecord>,
}
