// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jobq - interactive local job scheduler

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod input;
mod output;
mod session;

use output::OutputFormat;

use anyhow::{Context, Result};
use clap::Parser;
use jobq_engine::{
    log_paths, Scheduler, SchedulerConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_QUEUE_CAPACITY,
};
use session::{Session, SessionEnd};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "jobq",
    version,
    about = "Queue shell commands and run a bounded number of them at once"
)]
struct Cli {
    /// Maximum number of jobs running at once (clamped to 1..=8)
    #[arg(allow_negative_numbers = true, value_parser = parse_concurrency)]
    concurrency: i64,

    /// Directory receiving <id>.out, <id>.err and jobq.log [env: JOBQ_OUTPUT_DIR]
    #[arg(long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum number of jobs waiting to run
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Maximum number of jobs accepted per session
    #[arg(long, value_name = "N", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// On end of input, let queued and running jobs finish instead of killing them
    #[arg(long)]
    drain: bool,

    /// Suppress the banner and prompt
    #[arg(short, long)]
    quiet: bool,

    /// Report format for showjobs and submithistory
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    output: OutputFormat,
}

/// Parse an integer, saturating values beyond the `i64` range so they clamp
/// like any other out-of-range concurrency.
fn parse_concurrency(value: &str) -> Result<i64, String> {
    match value.parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(e.to_string()),
        },
    }
}

#[cfg(test)]
fn cli_command() -> clap::Command {
    use clap::CommandFactory;
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", format_error(&e));
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn resolve_output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(env::output_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let output_dir = resolve_output_dir(cli.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let _log_guard = setup_logging(&output_dir)?;

    let config = SchedulerConfig::new(cli.concurrency, &output_dir)
        .queue_capacity(cli.queue_capacity)
        .history_capacity(cli.history_capacity);
    let mut scheduler = Scheduler::start(config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let end = Session::new(&mut scheduler, cli.output, cli.quiet)
        .run(stdin, &mut std::io::stdout(), &mut std::io::stderr())
        .await?;

    let counts = scheduler.registry().counts();
    tracing::info!(
        waiting = counts.waiting,
        working = counts.working,
        complete = counts.complete,
        "end of input"
    );

    match end {
        SessionEnd::SchedulerStopped(result) => {
            result?;
            Ok(())
        }
        SessionEnd::EndOfInput if cli.drain => {
            scheduler.drain().await?;
            tracing::info!("session ended, all jobs drained");
            Ok(())
        }
        SessionEnd::EndOfInput => {
            scheduler.shutdown().await?;
            tracing::info!("session ended");
            Ok(())
        }
    }
}

fn setup_logging(output_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = log_paths::scheduler_log_path(output_dir);
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_paths::SCHEDULER_LOG_FILE)
        .build(output_dir)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
