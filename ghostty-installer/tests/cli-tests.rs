use std::process::{Command, Output, Stdio};

use temp_dir::TempDir;

static BIN: &str = env!("CARGO_BIN_EXE_ghostty-installer");

fn format_outputs(output: &Output) -> String {
    let stdout = std::str::from_utf8(&output.stdout).unwrap();
    let stderr = std::str::from_utf8(&output.stderr).unwrap();
    format!("stdout:\n{stdout}\nstderr:\n{stderr}")
}

#[test]
fn test_version() {
    let output = Command::new(BIN)
        .arg("-V")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(output.status.success(), "{}", stderr);
    assert_eq!(stderr, "");

    let (name, ver) = stdout.split_once(' ').unwrap();
    assert_eq!(name, "ghostty-installer");
    let mut ver_parts = ver.trim().split('.');
    ver_parts.next().unwrap().parse::<u8>().unwrap();
    ver_parts.next().unwrap().parse::<u8>().unwrap();
    ver_parts.next().unwrap().parse::<u8>().unwrap();
    assert!(ver_parts.next().is_none());
}

#[test]
fn test_help_lists_every_flag() {
    let output = Command::new(BIN)
        .arg("--help")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", format_outputs(&output));
    let stdout = String::from_utf8(output.stdout).unwrap();
    for flag in [
        "--uninstall",
        "--container",
        "--zig-version",
        "--no-cache",
        "--pull-always",
        "--skip-signature",
        "--skip-build",
        "--work-dir",
        "--output-format",
    ] {
        assert!(stdout.contains(flag), "missing {flag} in:\n{stdout}");
    }
}

#[test]
fn test_container_without_podman_fails_early() {
    let scratch = TempDir::new().unwrap();
    let empty_path = scratch.child("bin");
    std::fs::create_dir_all(&empty_path).unwrap();
    let work = scratch.child("work");
    std::fs::create_dir_all(&work).unwrap();
    std::fs::write(work.join("Containerfile"), "FROM fedora:42\n").unwrap();

    let output = Command::new(BIN)
        .arg("--container")
        .arg("--no-cache")
        .arg("--work-dir")
        .arg(&work)
        .arg("--output-format=json")
        .env("PATH", &empty_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(!output.status.success(), "{}", format_outputs(&output));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let message = report["error"]["message"].as_str().unwrap();
    assert!(message.contains("podman is not installed"), "{message}");

    // nothing but the Containerfile we put there
    let leftovers: Vec<_> = std::fs::read_dir(&work).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_unknown_output_format_is_rejected() {
    let output = Command::new(BIN)
        .arg("--output-format=yaml")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(!output.status.success());
    insta::assert_snapshot!(
        String::from_utf8(output.stderr).unwrap().lines().next().unwrap(),
        @"error: invalid value 'yaml' for '--output-format <OUTPUT_FORMAT>'"
    );
}

#[test]
fn test_zero_http_timeout_is_rejected() {
    let output = Command::new(BIN)
        .arg("--http-timeout=0")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.starts_with("error: invalid value '0' for '--http-timeout <HTTP_TIMEOUT>'"),
        "{stderr}"
    );
    assert!(output.stdout.is_empty());
}
