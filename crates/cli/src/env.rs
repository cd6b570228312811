// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Output directory override: JOBQ_OUTPUT_DIR (used when `--output-dir` is absent)
pub fn output_dir() -> Option<PathBuf> {
    std::env::var("JOBQ_OUTPUT_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
