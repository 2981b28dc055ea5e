//! AlumniTrace - graduate employability dashboard
//!
//! A CLI tool that loads graduate records from the analytics backend,
//! filters them by program and employer, and renders KPIs, top-N charts
//! and an employer x department matrix.
//!
//! Exit codes:
//!   0 - Success (including a fallback to sample data)
//!   1 - Runtime error (config, load failure with --no-fallback, output, etc.)
//!   130 - Load cancelled with Ctrl-C

mod analysis;
mod cli;
mod client;
mod config;
mod filter;
mod loader;
mod models;
mod normalize;
mod report;
mod sample;
mod state;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{FetchError, GraduatesClient};
use config::{Config, SelectionConfig};
use indicatif::{ProgressBar, ProgressStyle};
use loader::{Fallback, LoadOutcome, LoadTask, Loaded, Source};
use models::{GraduateRecord, Report, ReportMetadata, Selection};
use state::{DashboardStore, DeriveOptions};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("AlumniTrace v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            let code = match e.downcast_ref::<FetchError>() {
                Some(FetchError::Cancelled) => 130,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}

/// Handle --init-config: generate a default .alumnitrace.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  .alumnitrace.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .alumnitrace.toml")?;

    println!("✅ Created .alumnitrace.toml with default settings.");
    println!("   Edit it to change the backend URL, chart cutoffs and sample data.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report written to stdout stays clean. `RUST_LOG`
/// takes precedence over -v/-q.
fn init_logging(args: &Args) {
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load data, derive the dashboard and write the report.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let source = build_source(&args, &config)?;
    let fallback = config.sample.fallback.then_some(Fallback {
        size: config.sample.size,
        seed: config.sample.seed,
    });

    let loaded = load_records(source, fallback, args.quiet).await?;
    if let Some(error) = loaded.origin.error() {
        if !args.quiet {
            eprintln!("⚠️  No se pudo conectar al backend: {}", error);
            eprintln!("   Mostrando {} registros de ejemplo.", loaded.records.len());
        }
    }

    let records_loaded = loaded.records.len();
    let options = DeriveOptions {
        empty: config.selection.empty_policy(),
        charts: config.charts.clone(),
        matrix: config.matrix,
    };
    debug!(
        "Charts: industry top {} ({}), employer top {} ({}), role top {} ({}), department top {} ({})",
        options.charts.industry.top_n,
        options.charts.industry.missing,
        options.charts.employer.top_n,
        options.charts.employer.missing,
        options.charts.role.top_n,
        options.charts.role.missing,
        options.charts.department.top_n,
        options.charts.department.missing,
    );

    let mut store = DashboardStore::new(loaded.records, Selection::default(), options);

    if args.list_careers {
        print_careers(store.records());
        return Ok(());
    }

    // The report renders whatever the store last published.
    let mut view = store.subscribe();
    apply_selection(&mut store, &config.selection, &args);
    debug!("Selection applied: {:?}", store.selection());
    let dashboard = view.borrow_and_update().clone();
    if dashboard.kpis.total == 0 {
        warn!("The current selection matches no records");
    }

    let report = Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            origin: loaded.origin,
            records_loaded,
        },
        dashboard: (*dashboard).clone(),
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                eprintln!("✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    info!(
        "Dashboard: {} graduates, {:.1}% employed in first year",
        report.dashboard.kpis.total, report.dashboard.kpis.employment_rate
    );
    Ok(())
}

/// Replay the configured selection onto the store, as the sidebar would.
fn apply_selection(store: &mut DashboardStore, selection: &SelectionConfig, args: &Args) {
    let careers: BTreeSet<&str> = selection.careers.iter().map(String::as_str).collect();
    if args.all_careers {
        store.select_all_careers();
    } else if careers.len() == 1 {
        store.select_only_career(careers.first().copied());
    } else {
        for career in careers {
            store.toggle_career(career);
        }
    }

    if args.any_company {
        store.clear_company();
    } else if selection.company.is_some() {
        store.set_company(selection.company.clone());
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Pick the record source: a local file when given, otherwise the backend.
fn build_source(args: &Args, config: &Config) -> Result<Source> {
    if let Some(ref input) = args.input {
        return Ok(Source::File(input.clone()));
    }

    let timeout = config.api.timeout_seconds.map(Duration::from_secs);
    let client = GraduatesClient::new(config.api.graduates_url(), timeout)
        .context("Failed to create HTTP client")?;
    Ok(Source::Http(client))
}

/// Run the single load, showing a spinner and honouring Ctrl-C.
async fn load_records(source: Source, fallback: Option<Fallback>, quiet: bool) -> Result<Loaded> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(report::LOADING_MESSAGE);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let task = LoadTask::spawn(source, fallback);
    let cancel = task.cancel_handle();

    let outcome = tokio::select! {
        outcome = task.finish() => outcome,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            LoadOutcome::Cancelled
        }
    };
    spinner.finish_and_clear();

    match outcome {
        LoadOutcome::Ready(loaded) => Ok(loaded),
        LoadOutcome::Failed(e) => Err(e).context("Failed to load graduate records"),
        LoadOutcome::Cancelled => Err(FetchError::Cancelled.into()),
    }
}

/// Handle --list-careers: catalogue plus programs found in the data.
fn print_careers(records: &[GraduateRecord]) {
    let refs: Vec<&GraduateRecord> = records.iter().collect();
    let counts = analysis::career_counts(&refs);
    print!("{}", report::generate_career_list(&sample::CAREERS, &counts));
}
