// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal status of a captured process.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use nix::sys::signal::Signal;

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitResult {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Signal number, if the process was terminated by a signal.
    pub signal: Option<i32>,
    /// Wall-clock time from spawn until the process was reaped.
    pub duration: Duration,
}

impl ExitResult {
    pub(crate) fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self { code: status.code(), signal: status.signal(), duration }
    }

    /// True only for a normal exit with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Duration in whole milliseconds, saturating at `u64::MAX`.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for ExitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit status {code}"),
            (None, Some(signo)) => match Signal::try_from(signo) {
                Ok(signal) => write!(f, "terminated by {}", signal.as_str()),
                Err(_) => write!(f, "terminated by signal {signo}"),
            },
            (None, None) => f.write_str("terminated abnormally"),
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
