//! Building with the local toolchain

use camino::Utf8Path;

use crate::build::OPTIMIZE_FLAG;
use crate::errors::{InstallerError, InstallerResult};
use crate::process::{Invocation, ToolRunner};
use crate::reporter::Reporter;
use crate::workspace::ToolchainLayout;

/// The `zig build` invocation for a source tree
///
/// We run our own `zig` by path, and put its directory first on PATH for
/// anything the build spawns.
pub fn build_invocation(
    source_dir: &Utf8Path,
    toolchain: &ToolchainLayout,
    prefix: &Utf8Path,
    inherited_path: Option<&str>,
) -> Invocation {
    let path = match inherited_path {
        Some(rest) if !rest.is_empty() => format!("{}:{rest}", toolchain.dir),
        _ => toolchain.dir.to_string(),
    };
    Invocation::new(toolchain.binary.as_str(), "build ghostty")
        .arg("build")
        .arg("-p")
        .arg(prefix.as_str())
        .arg(OPTIMIZE_FLAG)
        .current_dir(source_dir)
        .env("PATH", path)
}

/// Build the extracted source, installing into `prefix`
pub fn build_local(
    runner: &dyn ToolRunner,
    reporter: &dyn Reporter,
    source_dir: &Utf8Path,
    toolchain: &ToolchainLayout,
    prefix: &Utf8Path,
) -> InstallerResult<()> {
    if !toolchain.is_installed() {
        return Err(InstallerError::ToolchainMissing {
            path: toolchain.binary.clone(),
        });
    }

    reporter.info("Building Ghostty...");
    let inherited = std::env::var("PATH").ok();
    let invocation = build_invocation(source_dir, toolchain, prefix, inherited.as_deref());
    let output = runner.run(&invocation)?;
    if !output.success {
        reporter.error("Build failed!");
        return Err(InstallerError::BuildFailed {
            status: output.status,
            stderr: output.stderr,
        });
    }

    reporter.success("Build completed successfully");
    Ok(())
}
