use std::os::unix::fs::PermissionsExt;

use axoasset::LocalAsset;
use camino::Utf8Path;

use super::mock::*;
use crate::build::container::{image_build_invocation, ContainerBuild, ContainerState};
use crate::errors::InstallerError;
use crate::process::Invocation;
use crate::reporter::EventLevel;

fn podman_works(invocation: &Invocation) -> crate::errors::InstallerResult<crate::process::ToolOutput> {
    if invocation.subcommand() == Some("cp") {
        podman_cp(invocation);
    }
    Ok(ok())
}

fn with_containerfile(ws: &TestWorkspace) {
    ws.write(&ws.ctx.containerfile(), b"FROM fedora:42\n");
}

#[test]
fn image_build_command_line() {
    let invocation = image_build_invocation(Utf8Path::new("/work"), "1.2.0", "0.14.1", true);
    insta::assert_snapshot!(invocation.to_string(), @"podman build --no-cache -t ghostty-builder:1.2.0 --build-arg GHOSTTY_VERSION=1.2.0 --build-arg ZIG_VERSION=0.14.1 -f Containerfile .");
    assert_eq!(invocation.current_dir.as_deref(), Some(Utf8Path::new("/work")));

    let cached = image_build_invocation(Utf8Path::new("/work"), "1.2.0", "0.14.1", false);
    assert!(!cached.args.iter().any(|a| a == "--no-cache"));
}

#[test]
fn missing_podman_fails_before_any_build() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    let runner = FakeRunner::new(|i| not_installed(&i.program));
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, true);
    let err = build.run().unwrap_err();

    assert!(matches!(err, InstallerError::PodmanMissing), "{err:?}");
    assert_eq!(build.state(), ContainerState::ImageMissing);
    assert!(!runner.ran("podman", "build"));
    assert!(!runner.ran("podman", "create"));
}

#[test]
fn missing_containerfile_fails_before_any_build() {
    let ws = TestWorkspace::new();
    let runner = FakeRunner::all_succeed();
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, false);
    let err = build.run().unwrap_err();

    assert!(matches!(err, InstallerError::ContainerfileMissing { .. }), "{err:?}");
    assert!(runner.ran("podman", "--version"));
    assert!(!runner.ran("podman", "build"));
}

#[test]
fn artifacts_are_copied_out_and_installed() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    let runner = FakeRunner::new(podman_works);
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, false);
    let outcome = build.run().unwrap();

    assert_eq!(build.state(), ContainerState::InstanceDestroyed);
    assert_eq!(outcome.image, "ghostty-builder:1.2.0");
    assert!(outcome.container.starts_with("ghostty-extract-"));
    assert!(outcome.descriptors.app_desktop.is_installed());
    assert!(outcome.descriptors.service_menu.is_installed());

    let installed = ws.ctx.installed();
    let mode = std::fs::metadata(&installed.binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);

    let created = runner.calls_to("podman", "create");
    assert_eq!(created[0].args, ["create", "--name", outcome.container.as_str(), "ghostty-builder:1.2.0"]);
    let copies = runner.calls_to("podman", "cp");
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[1].args[1], format!("{}:/build/ghostty-1.2.0/dist", outcome.container));
    let removed = runner.calls_to("podman", "rm");
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].args[1], outcome.container);

    // the scratch dir the artifacts went through is gone
    let scratch = Utf8Path::new(&copies[0].args[2]).parent().unwrap();
    assert!(!scratch.exists());
    assert!(reporter.saw(EventLevel::Success, "Container removed"));
}

#[test]
fn failed_copy_still_removes_container() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    let runner = FakeRunner::new(|i| match i.subcommand() {
        Some("cp") => Ok(fail("Error: no such file /build/output/bin/ghostty")),
        _ => Ok(ok()),
    });
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, false);
    let err = build.run().unwrap_err();

    match err {
        InstallerError::ContainerStep { step, output } => {
            assert_eq!(step, "extract binary");
            assert!(output.contains("no such file"));
        }
        other => panic!("expected ContainerStep, got {other:?}"),
    }
    assert_eq!(build.state(), ContainerState::InstanceDestroyed);
    let created = runner.calls_to("podman", "create");
    let removed = runner.calls_to("podman", "rm");
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].args[1], created[0].args[2]);
    assert!(!ws.ctx.installed().binary.exists());

    // the scratch dir is cleaned up on the failure path too
    let copies = runner.calls_to("podman", "cp");
    let scratch = Utf8Path::new(&copies[0].args[2]).parent().unwrap();
    assert!(!scratch.as_str().is_empty());
    assert!(!scratch.exists());
}

#[test]
fn failed_install_after_copy_still_cleans_up() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    // a directory squatting on the binary's path makes the install step fail
    LocalAsset::create_dir_all(ws.ctx.installed().binary.join("in-the-way")).unwrap();
    let runner = FakeRunner::new(podman_works);
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, false);
    build.run().unwrap_err();

    assert_eq!(build.state(), ContainerState::InstanceDestroyed);
    assert_eq!(runner.calls_to("podman", "rm").len(), 1);
    let copies = runner.calls_to("podman", "cp");
    assert_eq!(copies.len(), 2);
    let scratch = Utf8Path::new(&copies[0].args[2]).parent().unwrap();
    assert!(!scratch.exists());
}

#[test]
fn failed_create_leaves_nothing_to_remove() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    let runner = FakeRunner::new(|i| match i.subcommand() {
        Some("create") => Ok(fail("Error: no space left on device")),
        _ => Ok(ok()),
    });
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, false);
    let err = build.run().unwrap_err();

    assert!(matches!(err, InstallerError::ContainerStep { ref step, .. } if step == "create container"), "{err:?}");
    assert_eq!(build.state(), ContainerState::ImageBuilt);
    assert!(!runner.ran("podman", "rm"));
    assert!(!runner.ran("podman", "cp"));
}

#[test]
fn failed_image_build_creates_nothing() {
    let ws = TestWorkspace::new();
    with_containerfile(&ws);
    let runner = FakeRunner::new(|i| match i.subcommand() {
        Some("build") => Ok(fail("Error: building at STEP \"RUN zig build\": exit status 1")),
        _ => Ok(ok()),
    });
    let reporter = RecordingReporter::new();

    let mut build = ContainerBuild::new(&runner, &reporter, &ws.ctx, APP_VER, ZIG_VER, true);
    let err = build.run().unwrap_err();

    assert!(matches!(err, InstallerError::ContainerStep { .. }), "{err:?}");
    assert_eq!(build.state(), ContainerState::ImageMissing);
    assert!(!runner.ran("podman", "create"));
    assert!(!runner.ran("podman", "rm"));
    assert!(reporter.saw(EventLevel::Info, "Using --no-cache"));
}
