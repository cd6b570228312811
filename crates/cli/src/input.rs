// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of operator input lines.

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// `submit <command>`; the command may be empty
    Submit(String),
    /// `showjobs`
    ShowJobs,
    /// `submithistory`
    SubmitHistory,
    /// `help`
    Help,
    /// Blank line
    Empty,
    /// Anything else, carrying the unrecognized keyword
    Unknown(String),
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Parse a line. The keyword is the first whitespace-separated token; for
/// `submit`, everything after the keyword (minus leading whitespace) is the
/// command, kept verbatim.
pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim_start_matches(is_space);
    let (keyword, rest) = match line.find(is_space) {
        Some(at) => (&line[..at], &line[at..]),
        None => (line, ""),
    };
    match keyword {
        "" => InputCommand::Empty,
        "submit" => InputCommand::Submit(rest.trim_matches(is_space).to_string()),
        "showjobs" => InputCommand::ShowJobs,
        "submithistory" => InputCommand::SubmitHistory,
        "help" => InputCommand::Help,
        other => InputCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
