// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture error types.

use crate::result::ExitResult;

/// Errors returned by [`Command::output`](crate::Command::output) and
/// [`Command::combined_output`](crate::Command::combined_output).
///
/// Only [`ExecError::Exited`] carries captured output; every other variant
/// means no output is available.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The capture pipe or its drain thread could not be set up.
    #[error("failed to set up output capture: {source}")]
    Pipe { source: std::io::Error },

    /// Program not found, not executable, or could not be spawned.
    #[error("failed to start `{program}`: {source}")]
    Start {
        program: String,
        source: std::io::Error,
    },

    /// The OS could not report the child's termination status.
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    /// The child ran but did not exit successfully.
    #[error("`{program}` failed: {status}")]
    Exited {
        program: String,
        status: ExitResult,
        output: Vec<u8>,
    },

    /// Another thread is capturing output from this command right now.
    #[error("`{program}` is already capturing output")]
    Busy { program: String },

    /// This command has already been run; commands are single-use.
    #[error("`{program}` has already been run")]
    AlreadyRun { program: String },
}

impl ExecError {
    /// Output captured before a non-successful exit.
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            ExecError::Exited { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Consume the error, returning any captured output.
    pub fn into_output(self) -> Option<Vec<u8>> {
        match self {
            ExecError::Exited { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Exit status of a child that ran to completion.
    pub fn exit_result(&self) -> Option<&ExitResult> {
        match self {
            ExecError::Exited { status, .. } => Some(status),
            _ => None,
        }
    }

    /// True when nothing was launched because setup failed.
    pub fn is_setup(&self) -> bool {
        matches!(self, ExecError::Pipe { .. } | ExecError::Start { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
