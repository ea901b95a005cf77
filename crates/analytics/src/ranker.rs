use crate::aggregator::{SymbolSummary, group_by_symbol};
use core_types::{DerivedRecord, RankDirection};
use rust_decimal::Decimal;
use std::cmp::Reverse;

/// Selects at most `n` items ordered by `key_fn`.
///
/// Equal keys keep their input order, so the result is fully determined by the
/// input sequence. `n` larger than the input is clamped; `n == 0` yields an
/// empty result.
pub fn top_n<T, K, F>(items: &[T], key_fn: F, n: usize, direction: RankDirection) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<&T> = items.iter().collect();
    // `sort_by_cached_key` is stable and evaluates each key once.
    match direction {
        RankDirection::Max => ranked.sort_by_cached_key(|item| Reverse(key_fn(*item))),
        RankDirection::Min => ranked.sort_by_cached_key(|item| key_fn(*item)),
    }
    ranked.truncate(n);
    ranked
}

/// Lots with a real duration: still-open and same-day lots (and negative
/// durations from bad dates) are not eligible for duration rankings.
fn with_duration(records: &[DerivedRecord]) -> Vec<DerivedRecord> {
    records
        .iter()
        .filter(|d| d.holding_days > 0)
        .cloned()
        .collect()
}

/// The `n` lots that were closed in the fewest days.
pub fn fastest(records: &[DerivedRecord], n: usize) -> Vec<DerivedRecord> {
    let eligible = with_duration(records);
    top_n(&eligible, |d| d.holding_days, n, RankDirection::Min)
        .into_iter()
        .cloned()
        .collect()
}

/// The `n` lots that took the most days to close.
pub fn slowest(records: &[DerivedRecord], n: usize) -> Vec<DerivedRecord> {
    let eligible = with_duration(records);
    top_n(&eligible, |d| d.holding_days, n, RankDirection::Max)
        .into_iter()
        .cloned()
        .collect()
}

/// Symbol-level metric used to rank grouped rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolMetric {
    TotalPl,
    MeanReturnPct,
}

impl SymbolMetric {
    fn value(&self, summary: &SymbolSummary) -> Decimal {
        match self {
            SymbolMetric::TotalPl => summary.total_pl,
            SymbolMetric::MeanReturnPct => summary.mean_return_pct,
        }
    }
}

/// Groups lots per symbol first, then ranks the symbol rows.
pub fn top_symbols(
    records: &[DerivedRecord],
    metric: SymbolMetric,
    n: usize,
    direction: RankDirection,
) -> Vec<SymbolSummary> {
    let grouped = group_by_symbol(records);
    top_n(&grouped, |s| metric.value(s), n, direction)
        .into_iter()
        .cloned()
        .collect()
}

/// Lots with an exit date, latest exit first.
pub fn most_recent_exits(records: &[DerivedRecord], n: usize) -> Vec<DerivedRecord> {
    let exited: Vec<&DerivedRecord> = records
        .iter()
        .filter(|d| d.record.exit_date.is_some())
        .collect();
    top_n(&exited, |d| d.record.exit_date, n, RankDirection::Max)
        .into_iter()
        .map(|d| (*d).clone())
        .collect()
}
