//! # Tradebook Analytics Engine
//!
//! Turns raw position lots into derived records, and derived records into
//! time-bucketed, grouped and ranked reports.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files, terminals
//!   or configuration sources. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every entry point takes an immutable slice of records plus
//!   caller parameters and returns a freshly built value. Nothing is cached between calls,
//!   so the same input always produces the same report.
//! - **Degrade, don't fail:** Bad rows, empty inputs, zero denominators and amounts outside
//!   `Decimal` range produce zeroed or empty outputs. Only invalid caller parameters and an
//!   out-of-range projection (see `projection`) are errors.
//!
//! ## Data flow
//!
//! raw records -> `deriver` -> derived records -> {`aggregator`, `ranker`} -> `composer`

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod composer;
pub mod deriver;
pub mod error;
pub mod projection;
pub mod ranker;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{CategoryTotal, Reduction, SymbolSummary};
pub use composer::SummaryComposer;
pub use deriver::{derive_record, derive_records, rederive};
pub use error::AnalyticsError;
pub use projection::{MAX_PROJECTION_YEARS, ProjectionPoint, project_growth};
pub use ranker::SymbolMetric;
pub use report::{
    ActivityRow, Leaderboards, PeriodProfitReport, PeriodProfitRow, PortfolioSummary,
    ReportParams, StrategyActivity, StrategyBreakdown, TradeActivityReport, TradebookReport,
};
