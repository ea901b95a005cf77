use core_types::{BucketKey, DateField, DerivedRecord, Granularity};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// How the metric values that fall into one bucket are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Monetary metrics.
    Sum,
    /// Activity metrics; the metric value itself is ignored.
    Count,
    /// Percentage metrics.
    Mean,
}

/// Groups `records` by `bucket_fn` and reduces `metric_fn` within each group.
///
/// Records for which `bucket_fn` returns `None` are left out entirely rather
/// than collected under a placeholder bucket. The output is sorted ascending
/// by key.
pub fn aggregate<T, K, B, M>(
    records: &[T],
    bucket_fn: B,
    metric_fn: M,
    reduction: Reduction,
) -> Vec<(K, Decimal)>
where
    K: Ord,
    B: Fn(&T) -> Option<K>,
    M: Fn(&T) -> Decimal,
{
    let mut buckets: BTreeMap<K, (Decimal, usize)> = BTreeMap::new();

    for record in records {
        let Some(key) = bucket_fn(record) else {
            continue;
        };
        let entry = buckets.entry(key).or_insert((Decimal::ZERO, 0));
        if reduction != Reduction::Count {
            entry.0 = entry.0.saturating_add(metric_fn(record));
        }
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(key, (sum, count))| {
            let value = match reduction {
                Reduction::Sum => sum,
                Reduction::Count => Decimal::from(count),
                // A bucket only exists once something landed in it.
                Reduction::Mean => sum / Decimal::from(count),
            };
            (key, value)
        })
        .collect()
}

/// A bucketing function that truncates the chosen date of a record.
pub fn time_bucket(
    granularity: Granularity,
    field: DateField,
) -> impl Fn(&DerivedRecord) -> Option<BucketKey> {
    move |derived| {
        let date = match field {
            DateField::Entry => derived.record.entry_date,
            DateField::Exit => derived.record.exit_date,
        };
        date.map(|d| granularity.truncate(d))
    }
}

/// Prefix sums over an already ordered series. The order is taken as given.
pub fn running_total<K: Clone>(series: &[(K, Decimal)]) -> Vec<(K, Decimal)> {
    let mut total = Decimal::ZERO;
    series
        .iter()
        .map(|(key, value)| {
            total = total.saturating_add(*value);
            (key.clone(), total)
        })
        .collect()
}

/// Aligns several keyed series into one table.
///
/// The union of all keys forms the rows, in ascending order. Each row holds
/// one value per input series, with `0` wherever a series has no entry for
/// that key.
pub fn left_join_fill<K: Ord + Clone>(series: &[&[(K, Decimal)]]) -> Vec<(K, Vec<Decimal>)> {
    let mut table: BTreeMap<K, Vec<Decimal>> = BTreeMap::new();

    for (column, values) in series.iter().enumerate() {
        for (key, value) in values.iter() {
            let row = table
                .entry(key.clone())
                .or_insert_with(|| vec![Decimal::ZERO; series.len()]);
            row[column] += *value;
        }
    }

    table.into_iter().collect()
}

/// The total of a metric and the number of records within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

/// Sums a metric per category, largest total first.
///
/// Equal totals keep the order in which their categories were first seen.
pub fn group_by_category<T, C, M>(records: &[T], category_fn: C, metric_fn: M) -> Vec<CategoryTotal>
where
    C: Fn(&T) -> &str,
    M: Fn(&T) -> Decimal,
{
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let category = category_fn(record);
        let slot = match index.get(category) {
            Some(&slot) => slot,
            None => {
                index.insert(category.to_string(), groups.len());
                groups.push(CategoryTotal {
                    category: category.to_string(),
                    total: Decimal::ZERO,
                    count: 0,
                });
                groups.len() - 1
            }
        };
        groups[slot].total = groups[slot].total.saturating_add(metric_fn(record));
        groups[slot].count += 1;
    }

    // `sort_by` is stable, which gives the first-seen tie-break.
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Per-symbol reduction used for symbol-level leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSummary {
    pub symbol: String,
    pub lots: usize,
    pub total_pl: Decimal,
    pub mean_return_pct: Decimal,
    pub mean_entry_price: Decimal,
    /// Mean over lots that have an exit price; absent when none do.
    pub mean_exit_price: Option<Decimal>,
}

/// Reduces lots to one row per symbol, in first-seen order.
pub fn group_by_symbol(records: &[DerivedRecord]) -> Vec<SymbolSummary> {
    struct Acc {
        symbol: String,
        lots: usize,
        total_pl: Decimal,
        return_sum: Decimal,
        entry_sum: Decimal,
        exit_sum: Decimal,
        exits: usize,
    }

    let mut groups: Vec<Acc> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for derived in records {
        let symbol = derived.record.symbol.as_str();
        let slot = *index.entry(symbol).or_insert_with(|| {
            groups.push(Acc {
                symbol: symbol.to_string(),
                lots: 0,
                total_pl: Decimal::ZERO,
                return_sum: Decimal::ZERO,
                entry_sum: Decimal::ZERO,
                exit_sum: Decimal::ZERO,
                exits: 0,
            });
            groups.len() - 1
        });

        let acc = &mut groups[slot];
        acc.lots += 1;
        acc.total_pl = acc.total_pl.saturating_add(derived.realized_pl);
        acc.return_sum = acc.return_sum.saturating_add(derived.return_pct);
        acc.entry_sum = acc.entry_sum.saturating_add(derived.record.entry_price);
        if let Some(exit) = derived.record.exit_price {
            acc.exit_sum = acc.exit_sum.saturating_add(exit);
            acc.exits += 1;
        }
    }

    groups
        .into_iter()
        .map(|acc| {
            let lots = Decimal::from(acc.lots);
            SymbolSummary {
                symbol: acc.symbol,
                lots: acc.lots,
                total_pl: acc.total_pl,
                mean_return_pct: acc.return_sum / lots,
                mean_entry_price: acc.entry_sum / lots,
                mean_exit_price: (acc.exits > 0).then(|| acc.exit_sum / Decimal::from(acc.exits)),
            }
        })
        .collect()
}
