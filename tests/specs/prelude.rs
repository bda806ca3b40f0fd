//! Shared helpers for specs.

#![allow(dead_code)]

pub use bufexec::{command, CaptureMode, Command, ExecError, RunState};
pub use std::time::{Duration, Instant};

/// `/bin/sh -c <script>`
pub fn sh(script: &str) -> Command {
    command("/bin/sh", ["-c", script])
}

/// Captured bytes as text, for readable diffs.
pub fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Run `f` and return its result with the wall-clock time it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}
