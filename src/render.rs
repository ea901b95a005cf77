//! Terminal tables for the composed reports.

use analytics::{
    Leaderboards, PeriodProfitReport, PortfolioSummary, ProjectionPoint, StrategyBreakdown,
    SymbolSummary, TradeActivityReport, TradebookReport,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::DerivedRecord;
use rust_decimal::Decimal;

/// Amounts and percentages are shown to two places.
fn money(value: Decimal) -> String {
    value.round_dp(2).normalize().to_string()
}

fn number(value: Decimal) -> Cell {
    Cell::new(money(value)).set_alignment(CellAlignment::Right)
}

fn count(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn titled(title: &str, table: Table) -> String {
    format!("{title}\n{table}")
}

pub fn summary_table(summary: &PortfolioSummary) -> String {
    let mut t = table(vec!["Metric", "Value"]);
    t.add_row(vec![Cell::new("Total trades"), count(summary.total_trades)]);
    t.add_row(vec![Cell::new("Open"), count(summary.open_trades)]);
    t.add_row(vec![
        Cell::new("Partially booked"),
        count(summary.partially_booked_trades),
    ]);
    t.add_row(vec![
        Cell::new("Fully booked"),
        count(summary.fully_booked_trades),
    ]);
    t.add_row(vec![Cell::new("Still holding"), count(summary.active_trades)]);
    t.add_row(vec![Cell::new("Realized P/L"), number(summary.realized_pl)]);
    t.add_row(vec![
        Cell::new("Capital deployed"),
        number(summary.capital_deployed),
    ]);
    t.add_row(vec![Cell::new("Total invested"), number(summary.total_invested)]);
    t.add_row(vec![
        Cell::new("Initial capital"),
        number(summary.initial_capital),
    ]);
    t.add_row(vec![
        Cell::new("P/L % of deployed"),
        number(summary.pl_pct_of_deployed),
    ]);
    t.add_row(vec![
        Cell::new("P/L % of invested"),
        number(summary.pl_pct_of_invested),
    ]);
    t.add_row(vec![
        Cell::new("P/L % of initial capital"),
        number(summary.pl_pct_of_initial_capital),
    ]);
    t.add_row(vec![
        Cell::new("Average return %"),
        number(summary.average_return_pct),
    ]);
    titled("Portfolio", t)
}

pub fn strategy_tables(breakdown: &StrategyBreakdown) -> String {
    let mut active = table(vec!["Strategy", "Trades", "Still holding"]);
    for row in &breakdown.most_active {
        active.add_row(vec![
            Cell::new(&row.strategy_tag),
            count(row.trades),
            count(row.active_trades),
        ]);
    }

    let mut profitable = table(vec!["Strategy", "Trades", "Realized P/L"]);
    for row in &breakdown.most_profitable {
        profitable.add_row(vec![
            Cell::new(&row.category),
            count(row.count),
            number(row.total),
        ]);
    }

    format!(
        "{}\n\n{}",
        titled("Most active strategies", active),
        titled("Most profitable strategies", profitable)
    )
}

pub fn period_table(report: &PeriodProfitReport) -> String {
    let mut t = table(vec!["Period", "Realized P/L", "Cumulative"]);
    for row in &report.rows {
        t.add_row(vec![
            Cell::new(&row.bucket),
            number(row.realized_pl),
            number(row.cumulative_pl),
        ]);
    }
    titled(&format!("Profit by period ({})", report.granularity), t)
}

pub fn activity_table(report: &TradeActivityReport) -> String {
    let mut t = table(vec![
        "Period",
        "Opened",
        "Still open",
        "Booked",
        "Cum. opened",
        "Cum. still open",
        "Cum. booked",
    ]);
    for row in &report.rows {
        t.add_row(vec![
            Cell::new(&row.bucket),
            count(row.opened),
            count(row.still_open),
            count(row.booked),
            count(row.cumulative_opened),
            count(row.cumulative_still_open),
            count(row.cumulative_booked),
        ]);
    }
    titled(&format!("Trade activity ({})", report.granularity), t)
}

pub fn records_table(title: &str, records: &[DerivedRecord]) -> String {
    let mut t = table(vec![
        "Symbol",
        "Strategy",
        "Entry",
        "Exit",
        "Entry date",
        "Exit date",
        "Days",
        "P/L",
        "Return %",
        "Status",
    ]);
    for d in records {
        let r = &d.record;
        t.add_row(vec![
            Cell::new(&r.symbol),
            Cell::new(&r.strategy_tag),
            number(r.entry_price),
            r.exit_price.map(number).unwrap_or_else(|| Cell::new("-")),
            Cell::new(date_or_dash(r.entry_date)),
            Cell::new(date_or_dash(r.exit_date)),
            count(d.holding_days),
            number(d.realized_pl),
            number(d.return_pct),
            Cell::new(d.classification()),
        ]);
    }
    titled(title, t)
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn symbols_table(title: &str, rows: &[SymbolSummary]) -> String {
    let mut t = table(vec![
        "Symbol",
        "Lots",
        "Total P/L",
        "Mean return %",
        "Mean entry",
        "Mean exit",
    ]);
    for row in rows {
        t.add_row(vec![
            Cell::new(&row.symbol),
            count(row.lots),
            number(row.total_pl),
            number(row.mean_return_pct),
            number(row.mean_entry_price),
            row.mean_exit_price
                .map(number)
                .unwrap_or_else(|| Cell::new("-")),
        ]);
    }
    titled(title, t)
}

pub fn leaderboard_tables(boards: &Leaderboards) -> String {
    [
        records_table("Fastest trades", &boards.fastest),
        records_table("Slowest trades", &boards.slowest),
        symbols_table("Top symbols by P/L", &boards.top_by_profit),
        symbols_table("Top symbols by return %", &boards.top_by_return_pct),
    ]
    .join("\n\n")
}

pub fn projection_table(points: &[ProjectionPoint]) -> String {
    let mut t = table(vec!["Year", "Amount"]);
    for point in points {
        t.add_row(vec![count(point.year), number(point.amount)]);
    }
    titled("Growth projection", t)
}

pub fn full_report(report: &TradebookReport) -> String {
    [
        summary_table(&report.summary),
        strategy_tables(&report.strategies),
        period_table(&report.period_profit),
        period_table(&report.yearly_profit),
        activity_table(&report.activity),
        leaderboard_tables(&report.leaderboards),
        records_table("Recent exits", &report.recent_exits),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::project_growth;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_two_places() {
        assert_eq!(money(dec!(12.3456)), "12.35");
        assert_eq!(money(dec!(20.00)), "20");
        assert_eq!(money(Decimal::ZERO), "0");
    }

    #[test]
    fn test_projection_table_lists_every_year() {
        let points = project_growth(dec!(100), dec!(10), 3).unwrap();
        let text = projection_table(&points);
        assert!(text.starts_with("Growth projection"));
        assert!(text.contains("110"));
        assert!(text.contains("121"));
    }

    #[test]
    fn test_empty_summary_renders() {
        let text = summary_table(&PortfolioSummary::empty(dec!(1000)));
        assert!(text.contains("Initial capital"));
        assert!(text.contains("1000"));
    }
}
