//! Combined stdout/stderr capture specs.

use similar_asserts::assert_eq;

use crate::prelude::*;

#[test]
fn stdout_and_stderr_share_one_buffer() {
    let out = sh("echo stdout; echo 1>&2 stderr").combined_output().unwrap();
    assert_eq!(text(&out), "stdout\nstderr\n");
}

#[test]
fn interleaving_follows_write_order() {
    let out = sh("echo 1; echo 2 >&2; echo 3; echo 4 >&2").combined_output().unwrap();
    assert_eq!(text(&out), "1\n2\n3\n4\n");
}

#[test]
fn stderr_only_program_is_captured() {
    let out = sh("echo only-err >&2").capture(CaptureMode::Combined).unwrap();
    assert_eq!(text(&out), "only-err\n");
}
