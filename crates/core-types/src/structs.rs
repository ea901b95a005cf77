use crate::enums::{Classification, RecordIssue};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position lot: a single entry and its (possibly partial) exit snapshot.
///
/// A partial close overwrites `exit_price`/`exit_date`; there is one exit
/// snapshot per lot, not one per close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    /// "AVG", "LONG" or a free-form strategy name.
    pub strategy_tag: String,
    pub entry_price: Decimal,
    pub entry_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub entry_date: Option<NaiveDate>,
    pub exit_price: Option<Decimal>,
    pub exit_date: Option<NaiveDate>,
}

impl TradeRecord {
    /// A freshly opened lot: nothing closed, no exit snapshot.
    pub fn open(
        symbol: impl Into<String>,
        strategy_tag: impl Into<String>,
        entry_price: Decimal,
        entry_quantity: Decimal,
        entry_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy_tag: strategy_tag.into(),
            entry_price,
            entry_quantity,
            remaining_quantity: entry_quantity,
            entry_date,
            exit_price: None,
            exit_date: None,
        }
    }

    /// Quantity already closed.
    pub fn closed_quantity(&self) -> Decimal {
        self.entry_quantity - self.remaining_quantity
    }

    /// Booking state. Out-of-range quantities are classified by the nearest
    /// bound: nothing remaining is fully booked, everything (or more) remaining
    /// is open.
    pub fn classification(&self) -> Classification {
        if self.remaining_quantity <= Decimal::ZERO {
            Classification::FullyBooked
        } else if self.remaining_quantity >= self.entry_quantity {
            Classification::Open
        } else {
            Classification::PartiallyBooked
        }
    }

    /// True while any quantity is still held (open or partially booked).
    pub fn is_active(&self) -> bool {
        self.remaining_quantity > Decimal::ZERO
    }

    pub fn quantities_in_range(&self) -> bool {
        self.entry_quantity >= Decimal::ZERO
            && self.remaining_quantity >= Decimal::ZERO
            && self.remaining_quantity <= self.entry_quantity
    }
}

/// A `TradeRecord` together with every field derived from it.
///
/// The derived fields are a pure function of `record`; they are recomputed,
/// never edited independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: TradeRecord,
    pub invested_amount: Decimal,
    pub remaining_balance: Decimal,
    pub realized_pl: Decimal,
    pub return_pct: Decimal,
    /// Whole days between entry and exit; zero when either date is absent and
    /// negative when the exit precedes the entry.
    pub holding_days: i64,
    /// Set when a derived amount exceeded `Decimal` range and was reported as 0.
    #[serde(skip)]
    pub overflowed: bool,
}

impl DerivedRecord {
    pub fn classification(&self) -> Classification {
        self.record.classification()
    }

    /// Recoverable anomalies on this record. Nothing here changes any value.
    pub fn issues(&self) -> Vec<RecordIssue> {
        let mut issues = Vec::new();
        let record = &self.record;

        if record.entry_price <= Decimal::ZERO {
            issues.push(RecordIssue::NonPositiveEntryPrice);
        }
        if !record.quantities_in_range() {
            issues.push(RecordIssue::QuantityOutOfRange);
        }
        if self.holding_days < 0 {
            issues.push(RecordIssue::NegativeHoldingPeriod);
        }
        if record.exit_price.is_some() && record.exit_date.is_none() {
            issues.push(RecordIssue::MissingExitDate);
        }
        if self.overflowed {
            issues.push(RecordIssue::ArithmeticOverflow);
        }

        issues
    }
}
