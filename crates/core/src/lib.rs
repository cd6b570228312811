// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jobq-core: Job model shared by the jobq engine and CLI

pub mod job;
pub mod time_fmt;

pub use job::{Job, JobId, JobOutcome, JobStatus};
pub use time_fmt::{format_elapsed, format_timestamp};
