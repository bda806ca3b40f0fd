//! Failure specs: start errors, non-success exits, single use.

use similar_asserts::assert_eq;

use crate::prelude::*;

#[test]
fn nonzero_exit_returns_output_with_error() {
    for mode in [CaptureMode::Stdout, CaptureMode::Combined] {
        let err = sh("echo before-failure; exit 7").capture(mode).unwrap_err();
        assert!(!err.is_setup());
        assert_eq!(err.exit_result().and_then(|s| s.code), Some(7));
        assert_eq!(text(err.output().unwrap_or_default()), "before-failure\n");
        assert_eq!(err.to_string(), "`/bin/sh` failed: exit status 7");
    }
}

#[test]
fn nonzero_exit_without_output_has_empty_buffer() {
    let err = command("/bin/false", Vec::<String>::new()).output().unwrap_err();
    assert_eq!(err.output(), Some(&b""[..]));
}

#[test]
fn missing_program_fails_fast_without_output() {
    let (result, elapsed) = timed(|| command("./no-such-program-bufexec", ["x"]).output());

    let err = result.unwrap_err();
    assert!(err.is_setup(), "got: {err:?}");
    assert!(err.output().is_none());
    assert!(elapsed < Duration::from_secs(2), "start failure hung: {elapsed:?}");
}

#[test]
fn command_is_single_use() {
    let cmd = sh("true");
    cmd.output().unwrap();
    assert!(matches!(cmd.output(), Err(ExecError::AlreadyRun { .. })));
    assert_eq!(cmd.state(), RunState::Exited { success: true });
}
