// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bufexec: run a program once and collect its output in memory.
//!
//! Output is buffered, never streamed. The call returns when the direct child
//! exits; background grandchildren that keep the output pipe open are not
//! waited for.
//!
//! ```no_run
//! let out = bufexec::Command::without_args("date").output()?;
//! println!("The date is {}", String::from_utf8_lossy(&out));
//! # Ok::<(), bufexec::ExecError>(())
//! ```
//!
//! A non-zero exit still yields the output captured so far:
//!
//! ```
//! let err = bufexec::command("/bin/sh", ["-c", "echo partial; exit 1"])
//!     .combined_output()
//!     .unwrap_err();
//! assert_eq!(err.output(), Some(&b"partial\n"[..]));
//! ```

mod command;
mod drain;
mod error;
mod result;

pub use command::{command, CaptureMode, Command, RunState};
pub use error::ExecError;
pub use result::ExitResult;
