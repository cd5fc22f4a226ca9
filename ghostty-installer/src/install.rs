//! Putting build products where the desktop expects them
//!
//! The binary is the only thing that has to land; the desktop files are
//! nice-to-haves, so failing to install them is reported and nothing more.

use std::os::unix::fs::PermissionsExt;

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};

use crate::config::{APP_DISPLAY_NAME, APP_ID};
use crate::errors::InstallerResult;
use crate::reporter::Reporter;
use crate::workspace::InstalledState;

/// Where a source tree keeps its desktop integration files
const DIST_LINUX: &str = "dist/linux";
/// The application entry template, relative to [`DIST_LINUX`][]
const APP_DESKTOP_TEMPLATE: &str = "app.desktop.in";
/// The Dolphin service menu, relative to [`DIST_LINUX`][]
const SERVICE_MENU: &str = "ghostty_dolphin.desktop";

/// What happened to one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorStatus {
    /// Written to this path
    Installed(Utf8PathBuf),
    /// The source tree didn't have it
    SourceMissing(Utf8PathBuf),
    /// Something went wrong writing it
    Failed(String),
}

impl DescriptorStatus {
    /// Whether the descriptor made it
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// What happened to both descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorOutcome {
    /// `ghostty.desktop`
    pub app_desktop: DescriptorStatus,
    /// The Dolphin service menu
    pub service_menu: DescriptorStatus,
}

/// Fill in the placeholders of `app.desktop.in`
pub fn render_app_desktop(template: &str, binary: &Utf8Path) -> String {
    template
        .replace("@GHOSTTY@", binary.as_str())
        .replace("@NAME@", APP_DISPLAY_NAME)
        .replace("@APPID@", APP_ID)
}

/// Install both desktop descriptors from a source tree
///
/// `source_tree` is anything with a `dist/linux/` in it: the extracted
/// release, or the tree copied out of a build container.
pub fn install_descriptors(
    reporter: &dyn Reporter,
    source_tree: &Utf8Path,
    installed: &InstalledState,
) -> DescriptorOutcome {
    reporter.info("Installing desktop files...");
    let dist = source_tree.join(DIST_LINUX);

    DescriptorOutcome {
        app_desktop: install_app_desktop(reporter, &dist, installed),
        service_menu: install_service_menu(reporter, &dist, installed),
    }
}

fn install_app_desktop(
    reporter: &dyn Reporter,
    dist: &Utf8Path,
    installed: &InstalledState,
) -> DescriptorStatus {
    reporter.info("Installing application desktop file...");
    let src = dist.join(APP_DESKTOP_TEMPLATE);
    if !src.exists() {
        reporter.error(format!("Desktop file not found at {src}"));
        return DescriptorStatus::SourceMissing(src);
    }

    let dest = &installed.app_desktop;
    let result = (|| -> InstallerResult<()> {
        let template = LocalAsset::load_string(&src)?;
        let rendered = render_app_desktop(&template, &installed.binary);
        LocalAsset::write_new_all(&rendered, dest)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            reporter.success(format!("Application desktop file installed to {dest}"));
            DescriptorStatus::Installed(dest.clone())
        }
        Err(e) => {
            reporter.error(format!("Failed to install application desktop file: {e}"));
            DescriptorStatus::Failed(e.to_string())
        }
    }
}

fn install_service_menu(
    reporter: &dyn Reporter,
    dist: &Utf8Path,
    installed: &InstalledState,
) -> DescriptorStatus {
    reporter.info("Installing Dolphin service menu desktop file...");
    let src = dist.join(SERVICE_MENU);
    if !src.exists() {
        reporter.error(format!("Dolphin desktop file not found at {src}"));
        return DescriptorStatus::SourceMissing(src);
    }

    let dest = &installed.service_menu;
    let result = (|| -> InstallerResult<()> {
        if let Some(parent) = dest.parent() {
            LocalAsset::create_dir_all(parent)?;
        }
        LocalAsset::copy_file_to_file(&src, dest)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            reporter.success(format!(
                "Dolphin service menu desktop file installed to {dest}"
            ));
            DescriptorStatus::Installed(dest.clone())
        }
        Err(e) => {
            reporter.error(format!(
                "Failed to install Dolphin service menu desktop file: {e}"
            ));
            DescriptorStatus::Failed(e.to_string())
        }
    }
}

/// Copy a prebuilt binary into place and make it executable
pub fn install_binary(
    reporter: &dyn Reporter,
    binary: &Utf8Path,
    installed: &InstalledState,
) -> InstallerResult<()> {
    let dest = &installed.binary;
    if let Some(parent) = dest.parent() {
        reporter.info(format!("Installing binary to {parent}..."));
        LocalAsset::create_dir_all(parent)?;
    }
    LocalAsset::copy_file_to_file(binary, dest)?;
    std::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755))?;
    reporter.success(format!("Binary installed to {dest}"));
    Ok(())
}
