// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of `showjobs` and `submithistory` reports.

use chrono::TimeZone;
use clap::ValueEnum;
use jobq_core::{format_elapsed, format_timestamp, Job};
use std::fmt::{Display, Write};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render jobs that have not finished yet.
pub fn format_active(jobs: &[Job], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(jobs),
        OutputFormat::Text => Ok(format_active_text(jobs)),
    }
}

/// Render finished jobs, with timestamps shown in `tz`.
pub fn format_history<Tz>(jobs: &[Job], format: OutputFormat, tz: &Tz) -> anyhow::Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match format {
        OutputFormat::Json => format_json(jobs),
        OutputFormat::Text => Ok(format_history_text(jobs, tz)),
    }
}

fn format_json(jobs: &[Job]) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(jobs)?;
    out.push('\n');
    Ok(out)
}

pub fn format_active_text(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No active jobs\n".to_string();
    }
    let mut out = String::new();
    for job in jobs {
        let _ = writeln!(out, "Job ID: {}", job.id);
        let _ = writeln!(out, "Command: {}", job.command);
        let _ = writeln!(out, "Status: {}", job.status);
        out.push('\n');
    }
    out
}

pub fn format_history_text<Tz>(jobs: &[Job], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if jobs.is_empty() {
        return "No completed jobs\n".to_string();
    }
    let stamp = |at: Option<chrono::DateTime<chrono::Utc>>| match at {
        Some(at) => format_timestamp(&at.with_timezone(tz)),
        None => "-".to_string(),
    };

    let mut out = String::new();
    for job in jobs {
        let _ = writeln!(out, "Job ID: {}", job.id);
        match job.pid {
            Some(pid) => {
                let _ = writeln!(out, "Process ID: {}", pid);
            }
            None => out.push_str("Process ID: -\n"),
        }
        let _ = writeln!(out, "Command: {}", job.command);
        match &job.outcome {
            Some(outcome) => {
                let _ = writeln!(out, "Exit Status: {}", outcome);
            }
            None => out.push_str("Exit Status: -\n"),
        }
        let _ = writeln!(out, "Start Time: {}", stamp(job.started_at));
        let _ = writeln!(out, "Stop Time: {}", stamp(job.finished_at));
        let elapsed = job
            .elapsed_secs()
            .map_or_else(|| "-".to_string(), format_elapsed);
        let _ = writeln!(out, "Elapsed: {}", elapsed);
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
