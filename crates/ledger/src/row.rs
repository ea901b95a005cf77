use chrono::NaiveDate;
use core_types::{DerivedRecord, TradeRecord, parse_date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

const WRITE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One line of the ledger file.
///
/// Every cell is kept as text so that malformed values can be handled per
/// field instead of failing the whole row at the CSV layer. The aliases
/// accept the legacy column names of older ledger files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerRow {
    #[serde(alias = "script_name")]
    pub symbol: String,
    #[serde(alias = "trade_base")]
    pub strategy_tag: String,
    #[serde(alias = "price_in")]
    pub entry_price: String,
    #[serde(alias = "quantity_in")]
    pub entry_quantity: String,
    #[serde(alias = "quantity_left")]
    pub remaining_quantity: String,
    #[serde(alias = "date_in")]
    pub entry_date: String,
    #[serde(alias = "amount_in")]
    pub invested_amount: String,
    #[serde(alias = "balance_left")]
    pub remaining_balance: String,
    #[serde(alias = "date_out")]
    pub exit_date: String,
    #[serde(alias = "price_out")]
    pub exit_price: String,
    #[serde(alias = "P/L (INR)")]
    pub realized_pl: String,
    #[serde(alias = "P/L in %")]
    pub return_pct: String,
    #[serde(alias = "days_taken")]
    pub holding_days: String,
}

impl LedgerRow {
    /// Column names in file order.
    pub const HEADERS: [&'static str; 13] = [
        "symbol",
        "strategy_tag",
        "entry_price",
        "entry_quantity",
        "remaining_quantity",
        "entry_date",
        "invested_amount",
        "remaining_balance",
        "exit_date",
        "exit_price",
        "realized_pl",
        "return_pct",
        "holding_days",
    ];

    /// True for rows with no raw values at all, as left behind by editors.
    pub fn is_blank(&self) -> bool {
        [
            &self.symbol,
            &self.strategy_tag,
            &self.entry_price,
            &self.entry_quantity,
            &self.remaining_quantity,
            &self.entry_date,
            &self.exit_date,
            &self.exit_price,
        ]
        .iter()
        .all(|cell| cell.trim().is_empty())
    }

    /// Reads the raw columns into a `TradeRecord`; derived columns are ignored.
    ///
    /// A blank `remaining_quantity` means nothing has been closed yet.
    pub fn to_record<S: AsRef<str>>(&self, date_formats: &[S]) -> Result<TradeRecord, String> {
        let entry_price = required_decimal("entry_price", &self.entry_price)?;
        let entry_quantity = required_decimal("entry_quantity", &self.entry_quantity)?;
        let remaining_quantity = optional_decimal("remaining_quantity", &self.remaining_quantity)?
            .unwrap_or(entry_quantity);
        let exit_price = optional_decimal("exit_price", &self.exit_price)?;

        Ok(TradeRecord {
            symbol: self.symbol.trim().to_string(),
            strategy_tag: self.strategy_tag.trim().to_string(),
            entry_price,
            entry_quantity,
            remaining_quantity,
            entry_date: lenient_date("entry_date", &self.symbol, &self.entry_date, date_formats),
            exit_price,
            exit_date: lenient_date("exit_date", &self.symbol, &self.exit_date, date_formats),
        })
    }

    /// Writes raw and derived columns of a record.
    pub fn from_derived(derived: &DerivedRecord) -> Self {
        let record = &derived.record;
        Self {
            symbol: record.symbol.clone(),
            strategy_tag: record.strategy_tag.clone(),
            entry_price: record.entry_price.to_string(),
            entry_quantity: record.entry_quantity.to_string(),
            remaining_quantity: record.remaining_quantity.to_string(),
            entry_date: format_date(record.entry_date),
            invested_amount: derived.invested_amount.to_string(),
            remaining_balance: derived.remaining_balance.to_string(),
            exit_date: format_date(record.exit_date),
            exit_price: record.exit_price.map(|p| p.to_string()).unwrap_or_default(),
            realized_pl: derived.realized_pl.to_string(),
            return_pct: derived.return_pct.normalize().to_string(),
            holding_days: derived.holding_days.to_string(),
        }
    }

    /// Restores date cells of `source` that were blanked because they could
    /// not be parsed.
    pub fn keep_unread_dates(mut self, source: &LedgerRow) -> Self {
        if self.entry_date.is_empty() {
            self.entry_date = source.entry_date.clone();
        }
        if self.exit_date.is_empty() {
            self.exit_date = source.exit_date.clone();
        }
        self
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn required_decimal(column: &str, cell: &str) -> Result<Decimal, String> {
    optional_decimal(column, cell)?.ok_or_else(|| format!("{column} is empty"))
}

fn optional_decimal(column: &str, cell: &str) -> Result<Option<Decimal>, String> {
    let text = cell.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    parse_decimal(text)
        .map(Some)
        .ok_or_else(|| format!("{column} '{text}' is not a number"))
}

fn lenient_date<S: AsRef<str>>(
    column: &str,
    symbol: &str,
    cell: &str,
    date_formats: &[S],
) -> Option<NaiveDate> {
    let parsed = parse_date(cell, date_formats);
    if parsed.is_none() && !cell.trim().is_empty() && !cell.trim().eq_ignore_ascii_case("nat") {
        warn!(column, symbol, value = cell, "Unrecognised date treated as absent.");
    }
    parsed
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(WRITE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
