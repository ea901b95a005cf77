use crate::aggregator::{
    Reduction, aggregate, group_by_category, left_join_fill, running_total, time_bucket,
};
use crate::ranker::{self, SymbolMetric};
use crate::report::{
    ActivityRow, Leaderboards, PeriodProfitReport, PeriodProfitRow, PortfolioSummary,
    ReportParams, StrategyActivity, StrategyBreakdown, TradeActivityReport, TradebookReport,
};
use core_types::{Classification, DateField, DerivedRecord, Granularity, RankDirection};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// A stateless assembler of the named reports.
///
/// Every method is a pure function of the records and its parameters.
#[derive(Debug, Default)]
pub struct SummaryComposer {}

impl SummaryComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every report in one pass over the caller's parameters.
    pub fn compose(&self, records: &[DerivedRecord], params: &ReportParams) -> TradebookReport {
        debug!(
            records = records.len(),
            granularity = %params.granularity,
            top_n = params.top_n,
            "Composing tradebook report."
        );

        TradebookReport {
            summary: self.portfolio_summary(records, params.initial_capital),
            strategies: self.strategy_breakdown(
                records,
                params.strategy_top_k,
                &params.excluded_strategy_tags,
            ),
            period_profit: self.period_profit(records, params.granularity),
            yearly_profit: self.period_profit(records, Granularity::Yearly),
            activity: self.trade_activity(records, params.granularity),
            leaderboards: self.leaderboards(records, params.top_n),
            recent_exits: self.recent_exits(records, params.recent_n),
        }
    }

    /// Counts, realized P/L and the P/L percentages against the three capital bases.
    pub fn portfolio_summary(
        &self,
        records: &[DerivedRecord],
        initial_capital: Decimal,
    ) -> PortfolioSummary {
        let mut summary = PortfolioSummary::empty(initial_capital);

        if records.is_empty() {
            return summary;
        }

        summary.total_trades = records.len();
        let mut return_sum = Decimal::ZERO;

        for derived in records {
            match derived.classification() {
                Classification::Open => summary.open_trades += 1,
                Classification::PartiallyBooked => summary.partially_booked_trades += 1,
                Classification::FullyBooked => summary.fully_booked_trades += 1,
            }
            if derived.record.is_active() {
                summary.active_trades += 1;
            }

            summary.realized_pl = summary.realized_pl.saturating_add(derived.realized_pl);
            summary.capital_deployed =
                summary.capital_deployed.saturating_add(derived.remaining_balance);
            summary.total_invested = summary.total_invested.saturating_add(derived.invested_amount);
            return_sum = return_sum.saturating_add(derived.return_pct);
        }

        summary.pl_pct_of_deployed = percentage_of(summary.realized_pl, summary.capital_deployed);
        summary.pl_pct_of_invested = percentage_of(summary.realized_pl, summary.total_invested);
        summary.pl_pct_of_initial_capital = percentage_of(summary.realized_pl, initial_capital);
        summary.average_return_pct = return_sum / Decimal::from(records.len());

        summary
    }

    /// The `top_k` most active strategies (excluded tags left out) and the
    /// `top_k` most profitable ones (all tags).
    pub fn strategy_breakdown(
        &self,
        records: &[DerivedRecord],
        top_k: usize,
        excluded_tags: &[String],
    ) -> StrategyBreakdown {
        let strategic: Vec<&DerivedRecord> = records
            .iter()
            .filter(|d| !excluded_tags.iter().any(|tag| *tag == d.record.strategy_tag))
            .collect();

        let by_count = group_by_category(
            &strategic,
            |d| d.record.strategy_tag.as_str(),
            |_| Decimal::ONE,
        );
        let by_active = group_by_category(
            &strategic,
            |d| d.record.strategy_tag.as_str(),
            |d| {
                if d.record.is_active() {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            },
        );

        let most_active = by_count
            .into_iter()
            .take(top_k)
            .map(|group| {
                let active_trades = by_active
                    .iter()
                    .find(|a| a.category == group.category)
                    .and_then(|a| a.total.to_usize())
                    .unwrap_or(0);
                StrategyActivity {
                    strategy_tag: group.category,
                    trades: group.count,
                    active_trades,
                }
            })
            .collect();

        let mut most_profitable =
            group_by_category(records, |d| d.record.strategy_tag.as_str(), |d| d.realized_pl);
        most_profitable.truncate(top_k);

        StrategyBreakdown {
            most_active,
            most_profitable,
        }
    }

    /// Realized P/L per exit period, with its running total.
    pub fn period_profit(
        &self,
        records: &[DerivedRecord],
        granularity: Granularity,
    ) -> PeriodProfitReport {
        let per_period = aggregate(
            records,
            time_bucket(granularity, DateField::Exit),
            |d| d.realized_pl,
            Reduction::Sum,
        );
        let cumulative = running_total(&per_period);

        let rows = per_period
            .into_iter()
            .zip(cumulative)
            .map(|((bucket, realized_pl), (_, cumulative_pl))| PeriodProfitRow {
                bucket,
                realized_pl,
                cumulative_pl,
            })
            .collect();

        PeriodProfitReport { granularity, rows }
    }

    /// Opened, still-open and booked counts per period, aligned on the union of
    /// their periods with missing counts filled as 0.
    pub fn trade_activity(
        &self,
        records: &[DerivedRecord],
        granularity: Granularity,
    ) -> TradeActivityReport {
        let by_entry = time_bucket(granularity, DateField::Entry);
        let one = |_: &DerivedRecord| Decimal::ONE;

        let opened = aggregate(records, &by_entry, one, Reduction::Count);
        let still_open = aggregate(
            records,
            |d: &DerivedRecord| if d.record.is_active() { by_entry(d) } else { None },
            one,
            Reduction::Count,
        );
        let booked = aggregate(
            records,
            time_bucket(granularity, DateField::Exit),
            one,
            Reduction::Count,
        );

        let table = left_join_fill(&[opened.as_slice(), still_open.as_slice(), booked.as_slice()]);

        let mut cumulative = [0u64; 3];
        let rows = table
            .into_iter()
            .map(|(bucket, counts)| {
                let counts: Vec<u64> = counts.iter().map(|c| c.to_u64().unwrap_or(0)).collect();
                for (running, count) in cumulative.iter_mut().zip(&counts) {
                    *running += count;
                }
                ActivityRow {
                    bucket,
                    opened: counts[0],
                    still_open: counts[1],
                    booked: counts[2],
                    cumulative_opened: cumulative[0],
                    cumulative_still_open: cumulative[1],
                    cumulative_booked: cumulative[2],
                }
            })
            .collect();

        TradeActivityReport { granularity, rows }
    }

    pub fn leaderboards(&self, records: &[DerivedRecord], n: usize) -> Leaderboards {
        Leaderboards {
            fastest: ranker::fastest(records, n),
            slowest: ranker::slowest(records, n),
            top_by_profit: ranker::top_symbols(
                records,
                SymbolMetric::TotalPl,
                n,
                RankDirection::Max,
            ),
            top_by_return_pct: ranker::top_symbols(
                records,
                SymbolMetric::MeanReturnPct,
                n,
                RankDirection::Max,
            ),
        }
    }

    pub fn recent_exits(&self, records: &[DerivedRecord], n: usize) -> Vec<DerivedRecord> {
        ranker::most_recent_exits(records, n)
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0 or the ratio is out of range.
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
