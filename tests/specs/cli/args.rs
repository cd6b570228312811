//! Command-line argument specs
//!
//! Verify concurrency parsing, clamping, and option handling.

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage: jobq [OPTIONS] <CONCURRENCY>");
}

#[test]
fn missing_concurrency_is_a_usage_error() {
    let temp = Project::empty();
    temp.jobq()
        .exits(2)
        .stderr_has("<CONCURRENCY>");
}

#[test]
fn non_integer_concurrency_is_a_usage_error() {
    let temp = Project::empty();
    temp.jobq()
        .args(&["lots"])
        .exits(2)
        .stderr_has("invalid value 'lots'");

    // The scheduler never started, so nothing was written
    assert!(!temp.path().join("jobq.log").exists());
}

#[test]
fn concurrency_above_range_is_clamped() {
    let temp = Project::empty();
    temp.jobq()
        .args(&["20"])
        .passes()
        .stdout_has("Concurrency: 8\n");
}

#[test]
fn concurrency_beyond_integer_range_is_clamped() {
    let temp = Project::empty();
    temp.jobq()
        .args(&["99999999999999999999"])
        .passes()
        .stdout_has("Concurrency: 8\n");
}

#[test]
fn negative_concurrency_is_clamped() {
    let temp = Project::empty();
    temp.jobq()
        .args(&["-3"])
        .passes()
        .stdout_has("Concurrency: 1\n");
}

#[test]
fn end_of_input_exits_cleanly() {
    let temp = Project::empty();
    temp.jobq().args(&["--quiet", "2"]).passes().stdout_eq("");
}

#[test]
fn output_dir_is_created() {
    let temp = Project::empty();
    temp.jobq()
        .args(&["--quiet", "--drain", "--output-dir", "out/jobs", "1"])
        .stdin(&["submit echo routed"])
        .passes();

    assert_eq!(temp.read("out/jobs/0.out"), "routed\n");
    assert!(temp.path().join("out/jobs/jobq.log").exists());
    assert!(!temp.path().join("0.out").exists());
}

#[test]
fn output_dir_from_environment() {
    let temp = Project::empty();
    temp.jobq()
        .env("JOBQ_OUTPUT_DIR", temp.path().join("from-env"))
        .args(&["--quiet", "--drain", "1"])
        .stdin(&["submit echo env"])
        .passes();

    assert_eq!(temp.read("from-env/0.out"), "env\n");
}

#[test]
fn output_dir_flag_beats_environment() {
    let temp = Project::empty();
    temp.jobq()
        .env("JOBQ_OUTPUT_DIR", temp.path().join("from-env"))
        .args(&["--quiet", "--drain", "--output-dir", "from-flag", "1"])
        .stdin(&["submit echo flag"])
        .passes();

    assert_eq!(temp.read("from-flag/0.out"), "flag\n");
    assert!(!temp.path().join("from-env").exists());
}

#[test]
fn unwritable_log_file_is_fatal() {
    let temp = Project::empty();
    temp.file("blocker", "not a directory");
    temp.jobq()
        .args(&["--output-dir", "blocker", "1"])
        .exits(1)
        .stderr_has("Error: failed to create");
}
