//! # UR Primary Client
//!
//! Record the primary-interface status stream of a Universal Robots controller.
//!
//! Connects to the controller, optionally uploads a URScript program, then
//! writes every decoded package to a bounded per-type log and, when enabled,
//! to the custom report built from `watch_list.txt`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use ur_primary_client::config::Config;
use ur_primary_client::source::PackageStream;
use ur_primary_client::writer::Dispatcher;

/// Diagnostics file inside the output directory
const LOG_FILE_NAME: &str = "client.log";

/// Client for receiving robot data
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// IP address or host name of the robot
    #[arg(short, long)]
    ip_address: Option<String>,

    /// Primary interface port
    #[arg(short, long)]
    port: Option<u16>,

    /// Maximum number of packages kept per type and rows in the custom report
    #[arg(short, long)]
    max_reports: Option<usize>,

    /// Generate the custom report from the watch list
    #[arg(short, long)]
    custom_report: bool,

    /// Directory receiving the log files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Watch list file for the custom report
    #[arg(short, long)]
    watch_list: Option<PathBuf>,

    /// URScript program to send after connecting
    #[arg(short, long)]
    script: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(host) = self.ip_address {
            config.connection.host = host;
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(script) = self.script {
            config.connection.script = Some(script);
        }
        if let Some(max_reports) = self.max_reports {
            config.writer.max_reports = max_reports;
        }
        if self.custom_report {
            config.writer.custom_report = true;
        }
        if let Some(output_dir) = self.output_dir {
            config.writer.output_dir = output_dir;
        }
        if let Some(watch_list) = self.watch_list {
            config.writer.watch_list = watch_list;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Send log events to `<output_dir>/client.log`; stdout carries the progress line.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.writer.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.writer.output_dir.display())
    })?;

    let appender = tracing_appender::rolling::never(&config.writer.output_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    // Fatal before any file is created or connection attempted
    let watch_list = config.writer.load_watch_list()?;

    let _guard = init_logging(&config)?;
    info!("UR primary client v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut dispatcher = Dispatcher::new(&config.writer, watch_list)?;

    let mut stream = PackageStream::connect(
        &config.connection.host,
        config.connection.port,
        Duration::from_millis(config.connection.timeout_ms),
    )
    .await?;

    if let Some(path) = &config.connection.script {
        let script = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        stream.send_script(&script).await?;
    }

    loop {
        tokio::select! {
            package = stream.next_package() => {
                match package? {
                    Some(package) => {
                        dispatcher.dispatch(&package)?;
                    }
                    None => {
                        info!("Controller closed the connection");
                        break;
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    // Finish the progress line
    println!();
    info!(
        "Received {} packages ({} of unknown type)",
        stream.received(),
        dispatcher.unknown_count()
    );

    Ok(())
}
