//! medcast Reference Dashboard — Demo CLI
//!
//! Generates the synthetic hospital dataset once, then answers one dashboard
//! query, one JSON request, or runs the canned scenarios against it.
//!
//! Usage:
//!   cargo run -p medcast-demo -- query --medication "Meropenem 1g" --days 7
//!   cargo run -p medcast-demo -- --seed 42 query --stat median --json
//!   cargo run -p medcast-demo -- request request.json --strict
//!   cargo run -p medcast-demo -- medications
//!   cargo run -p medcast-demo -- roster
//!   cargo run -p medcast-demo -- run-scenarios

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use medcast_config::MedcastConfig;
use medcast_contracts::{
    chart::Dashboard,
    error::{MedcastError, MedcastResult},
    query::ForecastQuery,
};
use medcast_core::stats;
use medcast_ref_hospital::{
    scenarios::{comorbidity_sweep, meropenem_forecast, unknown_medication},
    Session,
};
use medcast_validate::{known_medication_rule, RequestValidator};

// ── CLI definition ────────────────────────────────────────────────────────────

/// medcast — medication consumption and forecast dashboard.
///
/// Every command runs against one freshly generated synthetic dataset.
/// Pass `--seed` to make the dataset and the forecast reproducible.
#[derive(Parser)]
#[command(
    name = "medcast-demo",
    about = "medcast medication consumption dashboard demo",
    long_about = "Generates a synthetic hospital dataset and computes medication\n\
                  consumption charts, moving averages, and comorbidity-scaled forecasts."
)]
struct Cli {
    /// TOML configuration file. Defaults to the embedded configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the dataset and the forecaster. Overrides `[generator] seed`.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the dashboard for one set of control values.
    Query(QueryArgs),
    /// Validate a JSON request file and compute its dashboard.
    Request {
        /// Path to the JSON request.
        file: PathBuf,
        /// Reject medications that are not in the catalog.
        #[arg(long)]
        strict: bool,
        /// Print the dashboard as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the medication catalog.
    Medications,
    /// Print roster size and population comorbidity statistics.
    Roster,
    /// Run the three reference scenarios in sequence.
    RunScenarios,
}

/// Control values; any flag left out falls back to the configured default.
#[derive(clap::Args)]
struct QueryArgs {
    #[arg(long)]
    medication: Option<String>,
    /// Forecast horizon in days (1–30).
    #[arg(long)]
    days: Option<u32>,
    /// Moving-average window: 3, 7, 14 or 30.
    #[arg(long)]
    window: Option<u32>,
    /// Comorbidity metric: mean or median.
    #[arg(long)]
    stat: Option<String>,
    /// Predicted comorbidity score (0–10).
    #[arg(long)]
    predicted: Option<f64>,
    /// Print the dashboard as JSON.
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    /// Overlay the given flags on `defaults`, re-validating every value.
    fn resolve(&self, defaults: &ForecastQuery) -> MedcastResult<ForecastQuery> {
        let stat = self
            .stat
            .clone()
            .unwrap_or_else(|| defaults.comorbidity_stat.to_string());
        ForecastQuery::from_raw(
            self.medication
                .clone()
                .unwrap_or_else(|| defaults.medication.clone()),
            self.days.unwrap_or(defaults.forecast_days.days()),
            self.window.unwrap_or(u32::from(defaults.ma_window)),
            &stat,
            self.predicted
                .unwrap_or(defaults.predicted_comorbidity.score()),
        )
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> MedcastResult<()> {
    let session = start_session(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Command::Query(args) => {
            let query = args.resolve(&session.default_query()?)?;
            let dashboard = session.compute(&query)?;
            print_dashboard(&dashboard, args.json)
        }
        Command::Request { file, strict, json } => {
            let dashboard = run_request(&session, &file, strict)?;
            print_dashboard(&dashboard, json)
        }
        Command::Medications => {
            print_medications(&session);
            Ok(())
        }
        Command::Roster => {
            print_roster(&session);
            Ok(())
        }
        Command::RunScenarios => run_scenarios(&session),
    }
}

fn start_session(config_path: Option<&Path>, seed: Option<u64>) -> MedcastResult<Session> {
    let mut config = MedcastConfig::load(config_path)?;
    if seed.is_some() {
        config.generator.seed = seed;
    }
    config.validate()?;
    debug!(config = ?config_path, seed = ?config.generator.seed, "configuration loaded");
    Session::start(config)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_request(session: &Session, file: &Path, strict: bool) -> MedcastResult<Dashboard> {
    let text = std::fs::read_to_string(file)?;
    let request: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| MedcastError::out_of_range("request", e.to_string()))?;

    let mut validator = RequestValidator::new();
    if strict {
        validator.register_rule("known-medication", known_medication_rule(session.dataset().catalog()));
    }
    let query = validator.parse(&request)?;
    session.compute(&query)
}

fn run_scenarios(session: &Session) -> MedcastResult<()> {
    print_banner();
    meropenem_forecast::run_scenario(session)?;
    unknown_medication::run_scenario(session)?;
    comorbidity_sweep::run_scenario(session)?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn print_medications(session: &Session) {
    let catalog = session.dataset().catalog();
    println!("{} medication(s):", catalog.len());
    for entry in catalog.entries() {
        let events = session.dataset().events_for(&entry.name).count();
        println!("  {:<24} dose {:>7}  {:>4} event(s)", entry.name, entry.dose, events);
    }
}

fn print_roster(session: &Session) {
    let scores = session.dataset().comorbidity_scores();
    println!("Patients:           {}", scores.len());
    println!("Events:             {}", session.dataset().events().len());
    println!(
        "Comorbidity mean:   {:.2}",
        stats::mean(&scores).unwrap_or_default()
    );
    println!(
        "Comorbidity median: {:.2}",
        stats::median(&scores).unwrap_or_default()
    );
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_dashboard(dashboard: &Dashboard, json: bool) -> MedcastResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(dashboard)?);
        return Ok(());
    }

    let chart = &dashboard.chart;
    println!();
    println!("{}", chart.title);
    println!("{}", "=".repeat(chart.title.len()));
    println!("x: {}   y: {}", chart.x_label, chart.y_label);
    for series in chart.series() {
        println!();
        println!("{} ({} point(s))", series.name, series.len());
        for point in &series.points {
            println!("  {}  {:>10.2}", point.date, point.value);
        }
    }
    println!();
    println!("{}", dashboard.summary);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("medcast — Medication Consumption Dashboard");
    println!("Reference Scenarios");
    println!("==========================================");
    println!();
    println!("Pipeline per query:");
    println!("  [1] Filter events by medication, sum doses per date");
    println!("  [2] Trailing moving average over the selected window");
    println!("  [3] Population comorbidity mean or median");
    println!("  [4] Uniform draws in [mean, max] of daily totals, one per forecast day");
    println!("  [5] Scale each draw by predicted comorbidity / 5");
    println!();
}
