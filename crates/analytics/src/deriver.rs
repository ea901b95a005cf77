use core_types::{DerivedRecord, TradeRecord};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Computes every derived field of a single lot.
///
/// The result depends on the raw fields only, so deriving an already derived
/// record reproduces the same values. An amount that does not fit in a
/// `Decimal` is reported as 0 and the record is marked as overflowed.
pub fn derive_record(record: &TradeRecord) -> DerivedRecord {
    let mut overflowed = false;
    let entry = record.entry_price;

    let invested_amount = or_zero(entry.checked_mul(record.entry_quantity), &mut overflowed);
    let remaining_balance =
        or_zero(entry.checked_mul(record.remaining_quantity), &mut overflowed);

    // Nothing is realized until an exit price exists.
    let realized_pl = match record.exit_price {
        Some(exit) => {
            let closed = record.entry_quantity.checked_sub(record.remaining_quantity);
            let pl = exit
                .checked_sub(entry)
                .zip(closed)
                .and_then(|(diff, closed)| diff.checked_mul(closed));
            or_zero(pl, &mut overflowed)
        }
        None => Decimal::ZERO,
    };

    let return_pct = match record.exit_price {
        Some(exit) if entry > Decimal::ZERO => {
            let pct = exit
                .checked_sub(entry)
                .and_then(|diff| diff.checked_div(entry))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
            or_zero(pct, &mut overflowed)
        }
        _ => Decimal::ZERO,
    };

    let holding_days = match (record.entry_date, record.exit_date) {
        (Some(entry), Some(exit)) => exit.signed_duration_since(entry).num_days(),
        _ => 0,
    };

    DerivedRecord {
        record: record.clone(),
        invested_amount,
        remaining_balance,
        realized_pl,
        return_pct,
        holding_days,
        overflowed,
    }
}

fn or_zero(value: Option<Decimal>, overflowed: &mut bool) -> Decimal {
    value.unwrap_or_else(|| {
        *overflowed = true;
        Decimal::ZERO
    })
}

/// Derives a whole batch, preserving input order.
///
/// Anomalous rows are logged and passed through with their degraded values;
/// they never abort the batch.
pub fn derive_records(records: &[TradeRecord]) -> Vec<DerivedRecord> {
    let derived: Vec<DerivedRecord> = records.iter().map(derive_record).collect();

    let mut flagged = 0usize;
    for (index, record) in derived.iter().enumerate() {
        let issues = record.issues();
        if issues.is_empty() {
            continue;
        }
        flagged += 1;
        for issue in issues {
            warn!(
                row = index,
                symbol = %record.record.symbol,
                %issue,
                "Trade record flagged during derivation."
            );
        }
    }

    debug!(records = derived.len(), flagged, "Derived trade records.");
    derived
}

/// Recomputes derived fields from the raw fields of previously derived records.
pub fn rederive(records: &[DerivedRecord]) -> Vec<DerivedRecord> {
    records.iter().map(|d| derive_record(&d.record)).collect()
}
