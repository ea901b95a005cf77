use analytics::{SummaryComposer, derive_records, project_growth};
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, ReportOverrides, init_tracing, load_config};
use core_types::DerivedRecord;
use ledger::LedgerRepository;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};

mod render;

/// The main entry point for the Tradebook reporting tool.
fn main() {
    // A .env file is optional; it may carry TRADEBOOK__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Derives P/L columns for a trade ledger and reports on them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file; defaults to ./tradebook.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ReportOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute every derived column and rewrite the ledger file.
    Derive,
    /// Portfolio totals and strategy breakdown.
    Summary,
    /// Realized P/L per period with a running total.
    Periods,
    /// Lots opened, still open and booked per period.
    Activity,
    /// Fastest and slowest trades, top symbols by P/L and by return.
    Leaderboard,
    /// Most recently exited lots.
    Recent {
        /// Number of lots to list; defaults to `reports.recent_n`.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Every report at once.
    Report {
        /// Print the report as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// Compound growth of an initial amount.
    Project {
        /// Starting amount; defaults to `portfolio.initial_capital`.
        #[arg(long)]
        initial: Option<Decimal>,
        /// Annual return in percent; defaults to `projection.annual_return_pct`.
        #[arg(long)]
        rate: Option<Decimal>,
        /// Number of yearly points; defaults to `projection.years`.
        #[arg(long)]
        years: Option<u32>,
    },
}

// ==============================================================================
// Command Dispatch
// ==============================================================================

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.overrides.apply(&mut config);
    config.validate().context("Invalid configuration after overrides")?;

    // Held until exit so the file appender flushes.
    let _guard = init_tracing(&config.logging).context("Failed to initialise logging")?;

    let composer = SummaryComposer::new();
    let params = config.report_params();

    match cli.command {
        Commands::Derive => handle_derive(&config)?,
        Commands::Summary => {
            let records = load_derived(&config)?;
            let summary = composer.portfolio_summary(&records, params.initial_capital);
            let strategies = composer.strategy_breakdown(
                &records,
                params.strategy_top_k,
                &params.excluded_strategy_tags,
            );
            println!("{}", render::summary_table(&summary));
            println!("{}", render::strategy_tables(&strategies));
        }
        Commands::Periods => {
            let records = load_derived(&config)?;
            let report = composer.period_profit(&records, params.granularity);
            println!("{}", render::period_table(&report));
        }
        Commands::Activity => {
            let records = load_derived(&config)?;
            let report = composer.trade_activity(&records, params.granularity);
            println!("{}", render::activity_table(&report));
        }
        Commands::Leaderboard => {
            let records = load_derived(&config)?;
            let boards = composer.leaderboards(&records, params.top_n);
            println!("{}", render::leaderboard_tables(&boards));
        }
        Commands::Recent { limit } => {
            let records = load_derived(&config)?;
            let recent = composer.recent_exits(&records, limit.unwrap_or(params.recent_n));
            println!("{}", render::records_table("Recent exits", &recent));
        }
        Commands::Report { json } => {
            let records = load_derived(&config)?;
            let report = composer.compose(&records, &params);
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .context("Failed to serialise report")?;
                println!("{text}");
            } else {
                println!("{}", render::full_report(&report));
            }
        }
        Commands::Project {
            initial,
            rate,
            years,
        } => {
            let points = project_growth(
                initial.unwrap_or(config.portfolio.initial_capital),
                rate.unwrap_or(config.projection.annual_return_pct),
                years.unwrap_or(config.projection.years),
            )?;
            println!("{}", render::projection_table(&points));
        }
    }

    Ok(())
}

fn repository(config: &Config) -> LedgerRepository {
    LedgerRepository::new(&config.ledger.path, config.ledger.date_formats.clone())
}

/// Loads the ledger and recomputes its derived columns.
fn load_derived(config: &Config) -> anyhow::Result<Vec<DerivedRecord>> {
    let repo = repository(config);
    let ledger = repo
        .load()
        .with_context(|| format!("Failed to read ledger {}", repo.path().display()))?;
    Ok(derive_records(&ledger.records()))
}

fn handle_derive(config: &Config) -> anyhow::Result<()> {
    let repo = repository(config);
    if !repo.path().exists() {
        warn!(path = %repo.path().display(), "No ledger to derive.");
        return Ok(());
    }

    let ledger = repo
        .load()
        .with_context(|| format!("Failed to read ledger {}", repo.path().display()))?;
    let derived = derive_records(&ledger.records());
    repo.save(&ledger, &derived)
        .with_context(|| format!("Failed to write ledger {}", repo.path().display()))?;

    let kept: Vec<u64> = ledger.unreadable().map(|entry| entry.line).collect();
    info!(records = derived.len(), unreadable = kept.len(), "Derived columns refreshed.");
    println!(
        "Rewrote {} lot(s) in {}",
        derived.len(),
        repo.path().display()
    );
    if !kept.is_empty() {
        warn!(lines = ?kept, "Unreadable ledger rows written back unchanged.");
        println!("Kept {} unreadable row(s) unchanged at lines {kept:?}", kept.len());
    }
    Ok(())
}
