//! elpris-page CLI
//!
//! Runs the dashboard page behavior headlessly and exposes the formatters:
//! - Drive auto-refresh against the dashboard server
//! - Replay captured HTMX events through the lifecycle logger
//! - Format prices and date-times the Danish way
//! - Generate and check configuration

use anyhow::Context;
use clap::{Parser, Subcommand};
use elpris_page::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "elpris-page")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Page behavior for the Danish electricity price dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the page controller until interrupted
    Run {
        /// Override the refresh interval (seconds)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Trigger one refresh pass immediately after start
        #[arg(long)]
        refresh_now: bool,
    },

    /// Read JSON-lines page events from stdin and log request lifecycle lines
    Observe,

    /// Format a price as Danish kroner
    FormatPrice {
        /// Amount, e.g. 1234.5
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Format a date-time the Danish way
    FormatDatetime {
        /// RFC 3339 or ISO 8601 date-time, e.g. 2024-01-15T09:05:00Z
        input: String,
        /// Display zone (Europe/Copenhagen, UTC, +01:00)
        #[arg(short, long)]
        timezone: Option<String>,
    },

    /// Check the config and list refresh-eligible elements
    Check,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            interval,
            refresh_now,
        } => {
            let config = setup(cli.config.as_deref())?;
            run(config, interval, refresh_now).await?;
        }
        Commands::Observe => {
            setup(cli.config.as_deref())?;
            observe().await?;
        }
        Commands::FormatPrice { amount } => {
            println!("{}", format_price_str(&amount)?);
        }
        Commands::FormatDatetime { input, timezone } => {
            let zone = match timezone {
                Some(tz) => tz.parse::<DisplayZone>()?,
                None => setup(cli.config.as_deref())?.format.zone()?,
            };
            println!("{}", DateTimeFormatter::new(zone).format(input)?);
        }
        Commands::Check => {
            let config = setup(cli.config.as_deref())?;
            check(&config);
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing config to {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Load and validate the config, then initialize logging from it
fn setup(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = load_config(path)?;
    init_logging(&config.logging);
    Ok(config)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.validate()?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "elpris_page={level},htmx={level}",
            level = logging.level
        ))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(config: Config, interval: Option<u64>, refresh_now: bool) -> anyhow::Result<()> {
    tracing::info!("elpris-page v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dashboard: {}", config.page.base_url);

    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.page.refresh_interval());

    let events = EventBus::default();
    let trigger = HttpTrigger::new(
        &config.page.base_url,
        Duration::from_secs(config.http.request_timeout_secs),
        events.clone(),
    )?;

    let document = PageDocument::from_config(&config.page.elements);
    tracing::info!(
        "Page has {} elements, {} refresh-eligible",
        document.len(),
        document.refresh_targets().len()
    );

    let controller = PageController::new(document, Arc::new(trigger), events, interval);
    controller.start().await?;
    controller.dispatch(PageEvent::dom_content_loaded()).await?;

    if refresh_now {
        let triggered = controller.refresh_now().await?;
        tracing::info!("Triggered {} elements", triggered);
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    tracing::info!("Shutting down...");
    controller.shutdown().await;

    let stats = controller.stats().await;
    let summary = serde_json::to_string(&stats)?;
    tracing::info!(
        stats = %summary,
        "Logged {} lifecycle lines, {} triggers failed",
        stats.lines_logged,
        stats.refresh.failed
    );
    Ok(())
}

async fn observe() -> anyhow::Result<()> {
    let logger = LifecycleLogger::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seen = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match PageEvent::from_json(line) {
            Ok(event) => {
                seen += 1;
                logger.observe(&event);
            }
            Err(e) => tracing::warn!("Skipping malformed event: {}", e),
        }
    }

    tracing::info!(
        "Observed {} events, logged {} lifecycle lines",
        seen,
        logger.lines_logged()
    );
    Ok(())
}

fn check(config: &Config) {
    let document = PageDocument::from_config(&config.page.elements);

    println!("Dashboard:        {}", config.page.base_url);
    println!("Refresh interval: {}s", config.page.refresh_interval_secs);
    println!("Timezone:         {}", config.format.timezone);
    println!();
    println!("{:<24} {:<32} {}", "ELEMENT", "HX-GET", "AUTO-REFRESH");
    for element in document.elements() {
        let refresh = if element.is_refresh_eligible() {
            "yes"
        } else if element.has_attribute(elpris_page::page::AUTO_REFRESH_ATTR) {
            "marked, no hx-get"
        } else {
            "no"
        };
        println!(
            "{:<24} {:<32} {}",
            element.id,
            element.fetch_path().unwrap_or("-"),
            refresh
        );
    }
}
