// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive operator session: reads commands line by line and drives the
//! scheduler until end of input.

use std::borrow::Cow;
use std::io::Write;

use anyhow::{Context, Result};
use jobq_core::Job;
use jobq_engine::{Scheduler, SchedulerError, SubmitError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::input::{parse_line, InputCommand};
use crate::output::{self, OutputFormat};

pub const SUBMIT_USAGE: &str = "usage: submit COMMAND [ARGS]";

/// Why a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Input was exhausted
    EndOfInput,
    /// The dispatcher exited while the operator was still connected
    SchedulerStopped(Result<(), SchedulerError>),
}

pub struct Session<'a> {
    scheduler: &'a mut Scheduler,
    format: OutputFormat,
    quiet: bool,
}

impl<'a> Session<'a> {
    pub fn new(scheduler: &'a mut Scheduler, format: OutputFormat, quiet: bool) -> Self {
        Self {
            scheduler,
            format,
            quiet,
        }
    }

    /// Process input lines until end of input or until the scheduler stops.
    ///
    /// Lines are raw bytes; invalid UTF-8 is replaced rather than rejected.
    pub async fn run<R, O, E>(
        &mut self,
        mut input: R,
        out: &mut O,
        err: &mut E,
    ) -> Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        E: Write,
    {
        if !self.quiet {
            self.banner(out)?;
        }

        let mut buf = Vec::new();
        loop {
            if !self.quiet {
                write!(out, "> ")?;
            }
            out.flush()?;

            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => read.context("failed to read input")?,
                result = self.scheduler.stopped() => {
                    return Ok(SessionEnd::SchedulerStopped(result));
                }
            };
            if read == 0 {
                if !self.quiet {
                    writeln!(out)?;
                }
                return Ok(SessionEnd::EndOfInput);
            }

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                tracing::warn!(bytes = read, "input line is not valid UTF-8");
            }
            self.handle(&line, out, err)?;
        }
    }

    fn handle<O: Write, E: Write>(&self, line: &str, out: &mut O, err: &mut E) -> Result<()> {
        match parse_line(line) {
            InputCommand::Empty => {}
            InputCommand::Submit(command) => self.submit(&command, out, err)?,
            InputCommand::ShowJobs => {
                let jobs: Vec<Job> = self.scheduler.registry().active().iter().collect();
                out.write_all(output::format_active(&jobs, self.format)?.as_bytes())?;
            }
            InputCommand::SubmitHistory => {
                let jobs: Vec<Job> = self.scheduler.registry().history().iter().collect();
                let report = output::format_history(&jobs, self.format, &chrono::Local)?;
                out.write_all(report.as_bytes())?;
            }
            InputCommand::Help => self.banner(out)?,
            InputCommand::Unknown(keyword) => {
                tracing::debug!(keyword = %keyword, "unknown command");
                writeln!(err, "unknown command: {}", keyword)?;
            }
        }
        Ok(())
    }

    fn submit<O: Write, E: Write>(&self, command: &str, out: &mut O, err: &mut E) -> Result<()> {
        match self.scheduler.submit(command) {
            Ok(id) => writeln!(out, "Added job {} to the job queue", id)?,
            Err(SubmitError::CapacityExceeded { .. }) => {
                writeln!(out, "Job history full; restart the program to schedule more")?
            }
            Err(SubmitError::QueueFull { .. }) => {
                writeln!(out, "Job queue full; try again after more jobs complete")?
            }
            Err(SubmitError::EmptyCommand) => writeln!(out, "{}", SUBMIT_USAGE)?,
            Err(e) => writeln!(err, "Error: {}", e)?,
        }
        Ok(())
    }

    fn banner<O: Write>(&self, out: &mut O) -> Result<()> {
        write!(
            out,
            "Concurrency: {}\n\n\
             Enter `submit COMMAND [ARGS]` to create and run a job.\n\
             Enter `showjobs` to list all jobs that are currently waiting or working.\n\
             Enter `submithistory` to list all jobs that were completed during the current session.\n\
             Enter `help` to show this message again.\n\
             Enter `Ctrl+D` to exit.\n\n",
            self.scheduler.stats().concurrency
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
