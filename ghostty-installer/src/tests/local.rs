use camino::Utf8Path;

use super::mock::*;
use crate::acquire::Acquisition;
use crate::build::local::{build_invocation, build_local};
use crate::config::ToolchainDescriptor;
use crate::errors::InstallerError;
use crate::reporter::EventLevel;
use crate::toolchain::{setup_toolchain, ToolchainSetup};
use crate::workspace::WorkspaceContext;

fn toolchain() -> ToolchainDescriptor {
    ToolchainDescriptor::new(ZIG_VER, ZIG_ARCH)
}

#[test]
fn toolchain_url_follows_release_layout() {
    insta::assert_snapshot!(toolchain().archive_url, @"https://ziglang.org/download/0.14.1/zig-x86_64-linux-0.14.1.tar.xz");
    assert_eq!(
        ToolchainDescriptor::new("0.13.0", "aarch64").extracted_dir_name(),
        "zig-aarch64-linux-0.13.0"
    );
}

#[test]
fn toolchain_is_flattened_and_tidied() {
    let ws = TestWorkspace::new();
    let zig = toolchain();
    let fetcher = FakeFetcher::new().serve(zig.archive_url.clone(), toolchain_tarball(&ws, &zig));
    let reporter = RecordingReporter::new();
    let layout = ws.ctx.toolchain(&zig);

    let setup = setup_toolchain(&fetcher, &reporter, &zig, &layout, false).unwrap();

    assert_eq!(setup, ToolchainSetup::Installed(Acquisition::Downloaded));
    assert!(layout.binary.is_file());
    assert!(layout.lib.join("std").join("std.zig").is_file());
    assert!(!layout.extracted.exists());
    assert!(!layout.archive.exists());
    assert!(reporter.saw(EventLevel::Success, "Zig compiler setup complete"));
}

#[test]
fn existing_toolchain_is_reused() {
    let ws = TestWorkspace::new();
    let zig = toolchain();
    let layout = ws.ctx.toolchain(&zig);
    ws.write(&layout.binary, b"#!/bin/sh\n");
    let fetcher = FakeFetcher::new();
    let reporter = RecordingReporter::new();

    let setup = setup_toolchain(&fetcher, &reporter, &zig, &layout, false).unwrap();

    assert_eq!(setup, ToolchainSetup::Cached);
    assert!(fetcher.calls().is_empty());
}

#[test]
fn forced_refresh_replaces_toolchain() {
    let ws = TestWorkspace::new();
    let zig = toolchain();
    let layout = ws.ctx.toolchain(&zig);
    ws.write(&layout.binary, b"old zig");
    ws.write(&layout.lib.join("stale.zig"), b"old lib");
    let fetcher = FakeFetcher::new().serve(zig.archive_url.clone(), toolchain_tarball(&ws, &zig));
    let reporter = RecordingReporter::new();

    setup_toolchain(&fetcher, &reporter, &zig, &layout, true).unwrap();

    assert_eq!(fetcher.calls().len(), 1);
    assert_eq!(std::fs::read(&layout.binary).unwrap(), b"#!/bin/sh\n");
    assert!(!layout.lib.join("stale.zig").exists());
}

#[test]
fn build_command_line() {
    let ctx = WorkspaceContext::new("/work", "/home/me");
    let layout = ctx.toolchain(&toolchain());
    let invocation = build_invocation(
        Utf8Path::new("/work/ghostty-1.2.0"),
        &layout,
        &ctx.prefix(),
        Some("/usr/bin:/bin"),
    );

    insta::assert_snapshot!(invocation.to_string(), @"/work/compiler/zig build -p /home/me/.local -Doptimize=ReleaseFast");
    assert_eq!(invocation.current_dir.as_deref(), Some(Utf8Path::new("/work/ghostty-1.2.0")));
    assert_eq!(
        invocation.envs,
        vec![("PATH".to_owned(), "/work/compiler:/usr/bin:/bin".to_owned())]
    );
}

#[test]
fn build_without_toolchain_is_refused() {
    let ws = TestWorkspace::new();
    let layout = ws.ctx.toolchain(&toolchain());
    let runner = FakeRunner::all_succeed();
    let reporter = RecordingReporter::new();

    let source = ws.ctx.work_dir.join("ghostty-1.2.0");
    let err = build_local(&runner, &reporter, &source, &layout, &ws.ctx.prefix()).unwrap_err();

    assert!(matches!(err, InstallerError::ToolchainMissing { .. }), "{err:?}");
    assert!(runner.calls().is_empty());
}

#[test]
fn failed_build_surfaces_stderr() {
    let ws = TestWorkspace::new();
    let layout = ws.ctx.toolchain(&toolchain());
    ws.write(&layout.binary, b"#!/bin/sh\n");
    let runner = FakeRunner::new(|_| Ok(fail("error: unable to find gtk4")));
    let reporter = RecordingReporter::new();

    let source = ws.ctx.work_dir.join("ghostty-1.2.0");
    let err = build_local(&runner, &reporter, &source, &layout, &ws.ctx.prefix()).unwrap_err();

    match err {
        InstallerError::BuildFailed { status, stderr } => {
            assert_eq!(status, Some(1));
            assert_eq!(stderr, "error: unable to find gtk4");
        }
        other => panic!("expected BuildFailed, got {other:?}"),
    }
    assert!(reporter.saw(EventLevel::Error, "Build failed!"));
}
