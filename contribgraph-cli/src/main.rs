//! contribgraph CLI - render a GitHub-style contribution graph page from JSON data

#![deny(warnings)]

// Global invariants enforced:
// - Flags override environment and .env values, key by key
// - Any configuration or data error exits non-zero with nothing written

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use contribgraph_core::{load_data, render_tooltip, GraphConfig, RawConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Parser)]
#[command(name = "contribgraph")]
#[command(about = "Render a GitHub-style contribution graph page from JSON activity data")]
#[command(version = env!("CONTRIBGRAPH_VERSION"))]
struct Cli {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML page
    Generate {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Validate configuration and data without writing anything
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the tooltip markup shown for a day cell
    Tooltip {
        /// Day cell date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Day cell events payload, e.g. '[["Math",2]]'
        #[arg(long, default_value = "[]")]
        events: String,
    },
}

/// Configuration flags; each one overrides its environment key
#[derive(Args)]
struct ConfigArgs {
    /// Dotenv file to load (default: .env if present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Page title (TITLE)
    #[arg(long)]
    title: Option<String>,

    /// Page description (DESCRIPTION)
    #[arg(long)]
    description: Option<String>,

    /// Path to the JSON data file (JSON_FILE_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Calendar year to render (YEAR)
    #[arg(long)]
    year: Option<String>,

    /// First day of the week: monday or sunday (START_DAY)
    #[arg(long)]
    start_day: Option<String>,

    /// Output HTML file (OUTPUT_PATH)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ConfigArgs {
    fn overrides(&self) -> RawConfig {
        RawConfig {
            title: self.title.clone(),
            description: self.description.clone(),
            data_path: self.data.as_ref().map(|p| p.display().to_string()),
            year: self.year.clone(),
            start_day: self.start_day.clone(),
            output_path: self.output.as_ref().map(|p| p.display().to_string()),
        }
    }

    /// Load the env file, then resolve environment keys with flag overrides
    fn resolve(&self) -> anyhow::Result<GraphConfig> {
        load_env_file(self.env_file.as_deref())?;
        let config = RawConfig::from_env()
            .merge(self.overrides())
            .resolve()
            .context("failed to load configuration")?;

        info!(
            title = %config.title,
            year = config.year,
            start_day = %config.week_start,
            "configuration loaded"
        );
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { config } => {
            let config = config.resolve()?;
            let summary = contribgraph_core::run(&config).with_context(|| {
                format!(
                    "failed to generate page from {}",
                    config.data_path.display()
                )
            })?;
            eprintln!(
                "{} days, {} active, {} events",
                summary.days, summary.active_days, summary.total_occurrences
            );
            println!("HTML generated: {}", summary.output_path.display());
        }
        Commands::Validate { config } => {
            let config = config.resolve()?;
            let data = load_data(&config.data_path, config.year)
                .with_context(|| format!("invalid data file: {}", config.data_path.display()))?;
            let occurrences: usize = data.days.values().map(Vec::len).sum();
            println!("Config valid: year {}, week starts {}", config.year, config.week_start);
            println!(
                "Data valid: {} event types, {} dates, {} occurrences",
                data.catalog.len(),
                data.days.len(),
                occurrences
            );
        }
        Commands::Tooltip { date, events } => {
            println!("{}", render_tooltip(&date, &events).to_html());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load a dotenv file into the process environment
///
/// Variables already set in the environment are kept. A missing default
/// `.env` is fine; a missing explicit file is an error.
fn load_env_file(explicit: Option<&Path>) -> anyhow::Result<()> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file: {}", path.display()))?;
            info!(path = %path.display(), "env file loaded");
        }
        None => {
            let path = Path::new(DEFAULT_ENV_FILE);
            if path.exists() {
                dotenvy::from_path(path)
                    .with_context(|| format!("failed to load env file: {}", path.display()))?;
                info!(path = %path.display(), "env file loaded");
            }
        }
    }
    Ok(())
}
