//! dini-monitor CLI
//!
//! Local entry point for the bulletin monitor. `watch` runs the polling
//! loop; `once` runs a single cycle and prints the snapshot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dini_monitor::{
    error::Result,
    models::Config,
    pipeline::{self, LogAnnouncer},
};

/// dini-monitor - BMKG Early Warning Monitor
#[derive(Parser, Debug)]
#[command(
    name = "dini-monitor",
    version,
    about = "Monitors the BMKG early-warning bulletin for West Kalimantan"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the bulletin on an interval and announce level transitions
    Watch {
        /// Override the poll interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Run a single fetch-parse-classify cycle and print the snapshot
    Once {
        /// Print the snapshot as JSON instead of a readable summary
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// On Unix, SIGHUP acts as the manual refresh trigger while watching.
#[cfg(unix)]
fn spawn_refresh_on_sighup(handle: pipeline::RefreshHandle) {
    tokio::spawn(async move {
        let Ok(mut hangup) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
        else {
            return;
        };
        while hangup.recv().await.is_some() {
            if !handle.request() {
                log::debug!("Refresh diabaikan: siklus masih berjalan");
            }
        }
    });
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Watch { interval_ms } => {
            if let Some(interval) = interval_ms {
                config.monitor.poll_interval_ms = interval;
            }
            config.validate()?;

            let (handle, refresh) = pipeline::refresh_channel();
            #[cfg(unix)]
            spawn_refresh_on_sighup(handle.clone());
            // Dropping the last handle closes the channel and stops the loop
            let _keep_refresh_open = handle;

            pipeline::run_watch(&config, &LogAnnouncer, refresh).await?;
        }

        Command::Once { json } => {
            config.validate()?;

            let mut ctx = pipeline::CycleContext::new(&config)?;
            let report = pipeline::run_cycle(&mut ctx).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.snapshot)?);
            } else {
                println!("Status Koneksi: {}", report.status);
                println!("Level: {}", report.level.as_str());
                println!(
                    "{} {} s/d {}",
                    ctx.snapshot.date, ctx.snapshot.time, ctx.snapshot.valid_until
                );
                println!("{}", ctx.snapshot.summary);
                for area in &ctx.snapshot.areas {
                    println!(
                        "  [{}] {} ({:.2}, {:.2}): {}",
                        match area.tier {
                            dini_monitor::models::SeverityTier::Critical => "AWAS",
                            dini_monitor::models::SeverityTier::Advisory => "WASPADA",
                        },
                        area.region,
                        area.coordinate.0,
                        area.coordinate.1,
                        area.districts.join(", ")
                    );
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "Config OK ({} endpoint(s), target {})",
                config.endpoints.len(),
                config.monitor.target_url
            );
        }
    }

    Ok(())
}
