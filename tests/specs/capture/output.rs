//! Standard-output capture specs.

use similar_asserts::assert_eq;

use crate::prelude::*;

#[test]
fn echo_is_captured_exactly() {
    let out = sh("echo 'stdout'").output().unwrap();
    assert_eq!(text(&out), "stdout\n");
}

#[test]
fn stderr_is_not_captured() {
    let out = sh("echo stdout; echo 1>&2 stderr").output().unwrap();
    assert_eq!(text(&out), "stdout\n");
}

#[test]
fn program_is_resolved_from_path() {
    let out = command("echo", ["resolved"]).output().unwrap();
    assert_eq!(text(&out), "resolved\n");
}

#[test]
fn arguments_are_not_shell_interpreted() {
    let out = command("/bin/echo", ["$HOME", "a;b", "*"]).output().unwrap();
    assert_eq!(text(&out), "$HOME a;b *\n");
}

#[test]
fn long_running_writer_returns_after_exit() {
    let (result, elapsed) = timed(|| sh("echo outputA; sleep 0.2; echo outputB").output());

    assert_eq!(text(&result.unwrap()), "outputA\noutputB\n");
    assert!(elapsed >= Duration::from_millis(200), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(1), "returned late: {elapsed:?}");
}

#[test]
fn binary_output_is_preserved() {
    let out = sh("printf '\\000\\377\\n'").output().unwrap();
    assert_eq!(out, vec![0x00, 0xff, b'\n']);
}
