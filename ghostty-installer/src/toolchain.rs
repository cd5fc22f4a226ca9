//! Setting up the zig toolchain Ghostty is built with
//!
//! Zig ships as a tarball containing `zig-<arch>-linux-<version>/{zig,lib}`.
//! We unpack it and flatten it into `<work>/compiler/{zig,lib}` so the build
//! step only ever has to prepend one directory to PATH.

use axoasset::LocalAsset;

use crate::acquire::{acquire, Acquisition, Fetcher};
use crate::config::ToolchainDescriptor;
use crate::errors::InstallerResult;
use crate::extract::{extract_as, ArchiveKind};
use crate::reporter::Reporter;
use crate::workspace::ToolchainLayout;

/// How the toolchain came to be ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainSetup {
    /// A previous run already set it up
    Cached,
    /// We set it up just now (the archive itself may have been cached)
    Installed(Acquisition),
}

/// Make sure the toolchain described by `toolchain` is laid out at `layout`
pub fn setup_toolchain(
    fetcher: &dyn Fetcher,
    reporter: &dyn Reporter,
    toolchain: &ToolchainDescriptor,
    layout: &ToolchainLayout,
    force_refresh: bool,
) -> InstallerResult<ToolchainSetup> {
    if layout.is_installed() && !force_refresh {
        reporter.info("Zig compiler already exists, skipping download");
        return Ok(ToolchainSetup::Cached);
    }

    reporter.info(format!(
        "Setting up Zig compiler version {}...",
        toolchain.version
    ));
    LocalAsset::create_dir_all(&layout.dir)?;

    let acquisition = acquire(
        fetcher,
        reporter,
        &toolchain.archive_url,
        &layout.archive,
        force_refresh,
    )?;
    extract_as(&layout.archive, ArchiveKind::TarXz, &layout.dir)?;

    if layout.extracted.exists() {
        let zig = layout.extracted.join("zig");
        if zig.exists() {
            std::fs::rename(&zig, &layout.binary)?;
        }
        let lib = layout.extracted.join("lib");
        if lib.exists() {
            LocalAsset::remove_dir_all(&layout.lib)?;
            std::fs::rename(&lib, &layout.lib)?;
        }
        LocalAsset::remove_dir_all(&layout.extracted)?;
    }
    LocalAsset::remove_file(&layout.archive)?;

    reporter.success("Zig compiler setup complete");
    Ok(ToolchainSetup::Installed(acquisition))
}
