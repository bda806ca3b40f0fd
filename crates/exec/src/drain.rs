// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background copy from the capture pipe into the output buffer.
//!
//! The drain thread reads until the pipe reports end-of-file. A grandchild
//! that inherited the write end can hold the pipe open long after the direct
//! child exited, so the thread also watches a stop pipe. Closing the stop pipe
//! tells the thread to take whatever is already queued and return without
//! waiting for end-of-file.

use std::io::{self, PipeReader, PipeWriter, Read};
use std::os::fd::AsFd;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use parking_lot::Mutex;

const CHUNK_SIZE: usize = 8 * 1024;

/// A running drain thread.
///
/// Dropping a `Drain` stops and joins the thread, so early returns never
/// leave it behind.
pub(crate) struct Drain {
    buffer: Arc<Mutex<Vec<u8>>>,
    stop: Option<PipeWriter>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl Drain {
    /// Start copying from `reader` on a new thread.
    pub(crate) fn spawn(reader: PipeReader) -> io::Result<Self> {
        let (stop_reader, stop_writer) = io::pipe()?;
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let handle = thread::Builder::new()
            .name("bufexec-drain".to_string())
            .spawn(move || copy_until_stopped(reader, stop_reader, &sink))?;
        Ok(Self { buffer, stop: Some(stop_writer), handle: Some(handle) })
    }

    /// Stop the thread once the pipe is empty, join it, and take the buffer.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.stop_and_join();
        std::mem::take(&mut *self.buffer.lock())
    }

    fn stop_and_join(&mut self) {
        drop(self.stop.take());
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "output drain stopped on read error"),
            Err(_) => tracing::warn!("output drain thread panicked"),
        }
    }
}

impl Drop for Drain {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Copy `reader` into `sink` until end-of-file, or until `stop` closes and
/// the queued bytes have been taken.
fn copy_until_stopped(
    mut reader: PipeReader,
    stop: PipeReader,
    sink: &Mutex<Vec<u8>>,
) -> io::Result<()> {
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let (readable, stopped) = wait_ready(&reader, &stop)?;
        if stopped && !readable {
            return drain_queued(&mut reader, &mut chunk, sink);
        }
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => sink.lock().extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Block until either pipe has something to report.
///
/// Returns `(reader_ready, stop_ready)`. Hang-up and error conditions count
/// as ready so the following read observes them.
fn wait_ready(reader: &PipeReader, stop: &PipeReader) -> io::Result<(bool, bool)> {
    let mut fds = [
        PollFd::new(reader.as_fd(), PollFlags::POLLIN),
        PollFd::new(stop.as_fd(), PollFlags::POLLIN),
    ];
    loop {
        match poll(&mut fds, PollTimeout::NONE) {
            Ok(_) => break,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    let ready = |fd: &PollFd<'_>| fd.revents().is_some_and(|r| !r.is_empty());
    Ok((ready(&fds[0]), ready(&fds[1])))
}

/// Take everything already queued in the pipe without waiting for writers.
fn drain_queued(
    reader: &mut PipeReader,
    chunk: &mut [u8],
    sink: &Mutex<Vec<u8>>,
) -> io::Result<()> {
    while has_queued(reader)? {
        match reader.read(chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => sink.lock().extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Non-blocking readiness check: data queued, or every writer gone.
fn has_queued(reader: &PipeReader) -> io::Result<bool> {
    let mut fds = [PollFd::new(reader.as_fd(), PollFlags::POLLIN)];
    loop {
        match poll(&mut fds, PollTimeout::ZERO) {
            Ok(_) => return Ok(fds[0].revents().is_some_and(|r| !r.is_empty())),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
