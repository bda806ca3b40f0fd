// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command specification and buffered output capture.

use std::fmt;
use std::io::{self, PipeWriter};
use std::os::unix::process::CommandExt;
use std::process::{self, Child, ExitStatus, Stdio};
use std::time::Instant;

use parking_lot::Mutex;

use crate::drain::Drain;
use crate::error::ExecError;
use crate::result::ExitResult;

/// Which child streams feed the capture pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Standard output only; standard error is inherited from the caller.
    Stdout,
    /// Standard output and standard error through the same pipe, interleaved
    /// as the OS delivers them.
    Combined,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Stdout => f.write_str("stdout"),
            CaptureMode::Combined => f.write_str("combined"),
        }
    }
}

/// Lifecycle of a command's single execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No capture has been attempted yet.
    #[default]
    Unstarted,
    /// The child is running.
    Started,
    /// The capture pipe could not be set up or the program could not be spawned.
    StartFailed,
    /// The child was reaped.
    Exited { success: bool },
    /// The OS could not report the child's status.
    WaitFailed,
}

/// Capture pipe ends: the running drain, the stdout writer, and the stderr
/// writer in combined mode.
type PipeEnds = (Drain, PipeWriter, Option<PipeWriter>);

/// OS operations a capture depends on, swappable in tests.
#[derive(Clone, Copy)]
struct Os {
    open_pipe: fn(CaptureMode) -> io::Result<PipeEnds>,
    wait: fn(&mut Child) -> io::Result<ExitStatus>,
}

impl Os {
    const SYSTEM: Os = Os { open_pipe, wait: Child::wait };
}

#[derive(Debug, Default)]
struct ExecutionHandle {
    state: RunState,
    pid: Option<u32>,
    exit: Option<ExitResult>,
}

/// An external program to run once, with its output buffered in memory.
///
/// A `Command` supports exactly one call to [`output`](Command::output) or
/// [`combined_output`](Command::combined_output). It does not wait for
/// grandchildren: the call returns once the direct child exits, even if a
/// background descendant still holds the output pipe.
#[derive(Debug)]
pub struct Command {
    program: String,
    argv: Vec<String>,
    running: Mutex<()>,
    handle: Mutex<ExecutionHandle>,
}

/// Shorthand for [`Command::new`].
pub fn command<I, S>(program: impl Into<String>, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Command::new(program, args)
}

impl Command {
    /// Build a command whose argument vector is `[program, args...]`.
    ///
    /// The program is not looked up until the command runs.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        let argv = std::iter::once(program.clone()).chain(args.into_iter().map(Into::into));
        Self::with_argv(program, argv.collect())
    }

    /// Build a command with no arguments.
    pub fn without_args(program: impl Into<String>) -> Self {
        Self::new(program, std::iter::empty::<String>())
    }

    /// Build a command from a full argument vector, where `argv[0]` is what
    /// the child sees as its own name and may differ from `program`.
    ///
    /// An empty `argv` is treated as `[program]`.
    pub fn from_argv<I, S>(program: impl Into<String>, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        let mut argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            argv.push(program.clone());
        }
        Self::with_argv(program, argv)
    }

    fn with_argv(program: String, argv: Vec<String>) -> Self {
        Self {
            program,
            argv,
            running: Mutex::new(()),
            handle: Mutex::new(ExecutionHandle::default()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector, including `argv[0]`.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Arguments after `argv[0]`.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn state(&self) -> RunState {
        self.handle.lock().state
    }

    /// Process id of the child, once started.
    pub fn pid(&self) -> Option<u32> {
        self.handle.lock().pid
    }

    /// Exit status of the child, once reaped.
    pub fn exit_result(&self) -> Option<ExitResult> {
        self.handle.lock().exit
    }

    /// Run the command and return its standard output.
    pub fn output(&self) -> Result<Vec<u8>, ExecError> {
        self.capture(CaptureMode::Stdout)
    }

    /// Run the command and return its standard output and standard error
    /// merged into one buffer.
    pub fn combined_output(&self) -> Result<Vec<u8>, ExecError> {
        self.capture(CaptureMode::Combined)
    }

    /// Run the command to completion, capturing the streams selected by `mode`.
    ///
    /// Blocks until the child exits; there is no timeout. On a non-successful
    /// exit the captured output is returned inside [`ExecError::Exited`]. A
    /// wait failure discards whatever was captured.
    pub fn capture(&self, mode: CaptureMode) -> Result<Vec<u8>, ExecError> {
        self.capture_with(mode, Os::SYSTEM)
    }

    fn capture_with(&self, mode: CaptureMode, os: Os) -> Result<Vec<u8>, ExecError> {
        let Some(_running) = self.running.try_lock() else {
            return Err(ExecError::Busy { program: self.program.clone() });
        };
        if self.state() != RunState::Unstarted {
            return Err(ExecError::AlreadyRun { program: self.program.clone() });
        }

        let span = tracing::info_span!(
            "exec.cmd",
            cmd = %self.program,
            args = ?self.args(),
            %mode,
            pid = tracing::field::Empty,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );
        let _enter = span.enter();

        let (drain, stdout, stderr) = match (os.open_pipe)(mode) {
            Ok(pipe) => pipe,
            Err(source) => {
                self.set_state(RunState::StartFailed);
                return Err(ExecError::Pipe { source });
            }
        };

        let start = Instant::now();
        let mut child = match self.spawn(stdout, stderr) {
            Ok(child) => child,
            Err(source) => {
                tracing::debug!(error = %source, "failed to start");
                self.set_state(RunState::StartFailed);
                return Err(ExecError::Start { program: self.program.clone(), source });
            }
        };

        let pid = child.id();
        span.record("pid", pid);
        tracing::debug!(pid, "started");
        {
            let mut handle = self.handle.lock();
            handle.state = RunState::Started;
            handle.pid = Some(pid);
        }

        let status = match (os.wait)(&mut child) {
            Ok(status) => status,
            Err(source) => {
                self.set_state(RunState::WaitFailed);
                return Err(ExecError::Wait { program: self.program.clone(), source });
            }
        };

        let exit = ExitResult::from_status(status, start.elapsed());
        span.record("exit_code", exit.code.unwrap_or(-1));
        span.record("duration_ms", exit.duration_ms());
        {
            let mut handle = self.handle.lock();
            handle.state = RunState::Exited { success: exit.success() };
            handle.exit = Some(exit);
        }

        let output = drain.finish();
        tracing::debug!(status = %exit, bytes = output.len(), "exited");

        if !exit.success() {
            return Err(ExecError::Exited { program: self.program.clone(), status: exit, output });
        }
        Ok(output)
    }

    /// Spawn the child with stdin inherited and the given write ends attached.
    ///
    /// The `process::Command` holding the parent's copies of the write ends is
    /// dropped before this returns, on success and failure alike.
    fn spawn(&self, stdout: PipeWriter, stderr: Option<PipeWriter>) -> io::Result<Child> {
        let mut cmd = process::Command::new(&self.program);
        if let Some(arg0) = self.argv.first() {
            cmd.arg0(arg0);
        }
        cmd.args(self.args()).stdin(Stdio::inherit()).stdout(stdout);
        match stderr {
            Some(writer) => cmd.stderr(writer),
            None => cmd.stderr(Stdio::inherit()),
        };
        cmd.spawn()
    }

    fn set_state(&self, state: RunState) {
        self.handle.lock().state = state;
    }
}

/// Create the capture pipe, start draining it, and return the write end(s)
/// the child should receive.
fn open_pipe(mode: CaptureMode) -> io::Result<PipeEnds> {
    let (reader, writer) = io::pipe()?;
    let stderr = match mode {
        CaptureMode::Stdout => None,
        CaptureMode::Combined => Some(writer.try_clone()?),
    };
    let drain = Drain::spawn(reader)?;
    Ok((drain, writer, stderr))
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
