//! # bar-status
//!
//! Writes a status line to stdout for i3bar, lemonbar or dzen2.
//!
//! - **[`bar_status::config`]**: which widgets run and which format is written.
//! - **[`bar_status::lifecycle`]**: the [`Status`] orchestrator and signal handling.
//!
//! Signals: `SIGINT`/`SIGTERM` shut the bar down; `SIGUSR1` suspends output and
//! `SIGUSR2` resumes it (these are advertised in the i3bar header).

use bar_status::config::{BarConfig, OutputFormat};
use bar_status::lifecycle::{forward_os_signals, lifecycle_channel, setup_tracing, Status};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "bar-status", version, about = "Status line generator for i3bar, lemonbar and dzen2")]
struct Args {
    /// JSON widget configuration; the built-in widgets are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the output format from the configuration
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    setup_tracing(&args.log_level);

    let mut config = match &args.config {
        Some(path) => BarConfig::load(path).map_err(|e| e.to_string())?,
        None => BarConfig::default(),
    };
    if let Some(format) = args.format {
        config.output.format = format;
    }
    info!(format = ?config.output.format, widgets = config.widgets.len(), "Starting bar");

    let generators = config.build().map_err(|e| e.to_string())?;

    let (handle, signals) = lifecycle_channel();
    let _forwarder = forward_os_signals(handle).map_err(|e| e.to_string())?;

    let mut status = Status::new(config.sink(std::io::stdout()));
    for generator in generators {
        status.register(generator).map_err(|e| e.to_string())?;
    }

    match status.start(signals).await {
        Ok(report) => {
            info!(
                producers = report.producers,
                acknowledged = report.acknowledged,
                "Bar stopped"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Bar stopped with an error");
            Err(e.to_string())
        }
    }
}
