use analytics::AnalyticsEngine;
use analyzer::{Analyzer, BacktestResult};
use anyhow::Result;
use clap::{Parser, Subcommand};
use configuration::Config;
use serde::Serialize;
use std::path::PathBuf;

mod input;
mod render;

/// The main entry point for the Meridian analytics tool.
fn main() -> Result<()> {
    // Load MERIDIAN_* overrides from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Metrics(args) => handle_metrics(args, cli.json),
        Commands::Regimes(args) => handle_regimes(args, &config, cli.json),
        Commands::Compare(args) => handle_compare(args, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics and ranking for trading strategy runs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./meridian.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a list of executions.
    Metrics(MetricsArgs),
    /// Break execution performance down by market regime.
    Regimes(RegimesArgs),
    /// Validate, rank and correlate several backtest results.
    Compare(CompareArgs),
}

#[derive(Parser)]
struct MetricsArgs {
    /// JSON array of execution rows.
    #[arg(long)]
    executions: PathBuf,
}

#[derive(Parser)]
struct RegimesArgs {
    /// JSON array of execution rows.
    #[arg(long)]
    executions: PathBuf,

    /// JSON array of regime-change events.
    #[arg(long)]
    events: PathBuf,

    /// Additional regime names to always report, on top of the configured ones.
    #[arg(long = "known", value_delimiter = ',')]
    known: Vec<String>,
}

#[derive(Parser)]
struct CompareArgs {
    /// JSON array of backtest result bundles.
    #[arg(long)]
    results: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_metrics(args: MetricsArgs, json: bool) -> Result<()> {
    let executions = input::load_executions(&args.executions)?;
    tracing::info!(executions = executions.len(), "Computing execution metrics.");

    let metrics = AnalyticsEngine::new().compute_metrics(&executions);

    if json {
        return print_json(&metrics);
    }
    println!("{}", render::metrics_table(&metrics));
    Ok(())
}

fn handle_regimes(args: RegimesArgs, config: &Config, json: bool) -> Result<()> {
    let executions = input::load_executions(&args.executions)?;
    let events = input::load_regime_events(&args.events)?;

    let mut known_types = config.regimes.known_types.clone();
    known_types.extend(args.known);

    let periods = regime::build_periods(&events);
    tracing::info!(
        executions = executions.len(),
        periods = periods.len(),
        known_types = known_types.len(),
        "Computing regime performance."
    );

    let performance = regime::regime_performance(&executions, &periods, &known_types);

    if json {
        return print_json(&performance);
    }
    println!("{}", render::regimes_table(&performance));
    Ok(())
}

fn handle_compare(args: CompareArgs, json: bool) -> Result<()> {
    let results: Vec<BacktestResult> = input::read_json(&args.results)?;
    tracing::info!(runs = results.len(), "Comparing backtest results.");

    let report = Analyzer::new().compare(&results);

    if json {
        return print_json(&report);
    }

    let problems = render::validation_lines(&report);
    if !problems.is_empty() {
        println!("Excluded from comparison:");
        for problem in &problems {
            println!("  - {}", problem);
        }
        println!();
    }

    println!("Ranking");
    println!("{}", render::ranking_table(&report.ranking));
    println!("\nBest in class");
    println!("{}", render::best_in_class_table(&report.ranking));
    println!("\nRisk profile");
    println!("{}", render::risk_table(&report));
    println!("\nReturn correlation");
    println!("{}", render::correlation_table(&report));
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
