// tests/process_agent_tests.rs
//! Dongles CLI agent driven through throwaway shell scripts
//!
//! Kept as a single test: exec'ing a freshly written script while another
//! test thread forks can fail with ETXTBSY.
#![cfg(unix)]

mod support;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use keydb_migrate::{
    AgentError, AgentMode, AgentSettings, CryptoAgent, EmulatorMode, ProcessAgent,
    RecordTransform,
};
use support::root_handle;
use tempfile::tempdir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn process_agent_contract() {
    let dir = tempdir().unwrap();
    let root = root_handle(&[("root", "k")]);
    let args_file = dir.path().join("args.txt");

    // Echoes the payload back base64-encoded and records its arguments
    let echo = write_script(
        dir.path(),
        "echo-cli",
        &format!("echo \"$@\" > '{}'\nbase64", args_file.display()),
    );
    let agent = ProcessAgent::new(AgentSettings {
        mode: AgentMode::Emulator(EmulatorMode::Dev),
        cli_path: echo.clone(),
    });

    let out = agent.sign(b"hello dongle", &root).unwrap();
    assert_eq!(out, b"hello dongle");
    let args = fs::read_to_string(&args_file).unwrap();
    let expected = format!(
        "--emulator dev sign --root-key {}",
        root.material_hex().expose_secret()
    );
    assert_eq!(args.trim(), expected);

    // Hardware mode passes no emulator flags
    let agent = ProcessAgent::new(AgentSettings {
        mode: AgentMode::Hardware,
        cli_path: echo,
    });
    let big = vec![0xA5u8; 4096];
    assert_eq!(agent.apply(RecordTransform::Encrypt, &big, &root).unwrap(), big);
    let args = fs::read_to_string(&args_file).unwrap();
    assert!(args.starts_with("encrypt --root-key "));

    // Payload far beyond a pipe buffer while the agent streams its output
    let huge: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let out = agent.sign(&huge, &root).unwrap();
    assert_eq!(out.len(), huge.len());
    assert!(out == huge, "large payload did not round-trip");

    // Non-zero exit surfaces stderr
    let failing = write_script(
        dir.path(),
        "failing-cli",
        "cat > /dev/null\necho 'dongle not found' >&2\nexit 3",
    );
    let agent = ProcessAgent::new(AgentSettings {
        mode: AgentMode::Hardware,
        cli_path: failing,
    });
    match agent.sign(b"x", &root) {
        Err(AgentError::Rejected {
            operation,
            status,
            stderr,
        }) => {
            assert_eq!(operation, RecordTransform::Sign);
            assert_eq!(status, "3");
            assert_eq!(stderr, "dongle not found");
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // Output that is not base64
    let garbage = write_script(dir.path(), "garbage-cli", "cat > /dev/null\necho '%%%'");
    let agent = ProcessAgent::new(AgentSettings {
        mode: AgentMode::Hardware,
        cli_path: garbage,
    });
    assert!(matches!(
        agent.encrypt(b"x", &root),
        Err(AgentError::MalformedOutput(_))
    ));

    // Missing binary
    let agent = ProcessAgent::new(AgentSettings {
        mode: AgentMode::Hardware,
        cli_path: dir.path().join("no-such-cli"),
    });
    assert!(matches!(
        agent.sign(b"x", &root),
        Err(AgentError::Spawn { .. })
    ));
}
