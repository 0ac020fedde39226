//! sysmon - host resource snapshot for Linux.
//!
//! Reports hostname, uptime, CPU and memory utilization read from /proc,
//! either once or continuously until interrupted.

mod display;
mod logging;
mod metrics;
mod parse;
mod runner;
mod sampler;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use metrics::{MetricsReader, ProcRoot};
use sampler::{SystemSampler, SystemSnapshot};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Monitor system resources
#[derive(Parser, Debug)]
#[command(name = "sysmon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Run in continuous mode with N second interval
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "2",
        allow_negative_numbers = true,
        value_parser = parse::parse_interval
    )]
    continuous: Option<f64>,

    /// Print each sample as a JSON object instead of the text report
    #[arg(long)]
    json: bool,

    /// Directory to probe for the proc tree (a `host/proc` mount below it wins)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

/// Writes snapshots to stdout in the selected format.
struct Printer {
    json: bool,
    separate: bool,
}

impl Printer {
    fn print(&self, snapshot: &SystemSnapshot) -> Result<()> {
        let rendered = if self.json {
            display::render_json(snapshot, Utc::now())?
        } else {
            display::render_report(snapshot, &Local::now())
        };

        let mut out = io::stdout().lock();
        writeln!(out, "{}", rendered)?;
        if self.separate && !self.json {
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("Failed to listen for SIGINT")?;
            Ok("SIGINT")
        }
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    Ok("Ctrl+C")
}

async fn run_continuous(mut sampler: SystemSampler, interval: f64, printer: Printer) {
    let token = CancellationToken::new();

    let signal_token = token.clone();
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(name) => {
                eprintln!("\nReceived {}, shutting down...", name);
                info!(signal = name, "shutdown requested");
            }
            Err(e) => warn!(error = %e, "signal handling unavailable, stopping"),
        }
        signal_token.cancel();
    });

    eprintln!("Starting continuous monitoring (Ctrl+C to stop)...");
    runner::run(
        &mut sampler,
        interval,
        |snapshot| {
            if let Err(e) = printer.print(snapshot) {
                warn!(error = %e, "failed to write snapshot, stopping");
                token.cancel();
            }
        },
        &token,
    )
    .await;
    eprintln!("Monitoring stopped.");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init()?;

    let root = match args.root {
        Some(ref dir) => ProcRoot::detect_under(dir),
        None => ProcRoot::detect(),
    };
    let mut sampler = SystemSampler::new(MetricsReader::new(root));

    match args.continuous {
        Some(interval) => {
            let printer = Printer {
                json: args.json,
                separate: true,
            };
            run_continuous(sampler, interval, printer).await;
        }
        None => {
            let printer = Printer {
                json: args.json,
                separate: false,
            };
            printer
                .print(&sampler.sample())
                .context("Failed to write report")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("sysmon").chain(argv.iter().copied()))
    }

    #[test]
    fn no_arguments_is_one_shot() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.continuous, None);
        assert!(!args.json);
    }

    #[test]
    fn continuous_defaults_to_two_seconds() {
        assert_eq!(parse(&["-c"]).unwrap().continuous, Some(2.0));
        assert_eq!(parse(&["--continuous"]).unwrap().continuous, Some(2.0));
    }

    #[test]
    fn continuous_accepts_interval() {
        assert_eq!(parse(&["--continuous", "5"]).unwrap().continuous, Some(5.0));
        assert_eq!(parse(&["-c", "0.5"]).unwrap().continuous, Some(0.5));
    }

    #[test]
    fn invalid_intervals_are_rejected() {
        assert!(parse(&["-c", "-1"]).is_err());
        assert!(parse(&["-c", "0"]).is_err());
        assert!(parse(&["-c", "abc"]).is_err());
    }

    #[test]
    fn unknown_option_is_an_error() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_is_informational() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}
