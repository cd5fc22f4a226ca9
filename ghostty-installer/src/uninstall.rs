//! Checking for and removing an installation
//!
//! Both directions reason over [`InstalledState`][], so whatever the
//! installer can put down, this can pick back up.

use axoasset::LocalAsset;
use camino::Utf8PathBuf;
use ghostty_installer_schema::ArtifactKind;

use crate::reporter::Reporter;
use crate::workspace::InstalledState;

/// Whether the build actually left a binary behind
pub fn verify_installed(reporter: &dyn Reporter, installed: &InstalledState) -> bool {
    reporter.info("Verifying build artifacts...");
    let binary = &installed.binary;
    if binary.exists() {
        reporter.success(format!("Ghostty binary found at {binary}"));
        true
    } else {
        reporter.error(format!("Ghostty binary not found at {binary}"));
        false
    }
}

/// What happened when we tried to remove one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// It wasn't there
    Absent,
    /// It was there and now it isn't
    Removed,
    /// It was there and it still is
    Failed(String),
}

/// One item of an uninstall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRemoval {
    /// What we call it
    pub label: &'static str,
    /// What kind of artifact it is
    pub kind: ArtifactKind,
    /// Where it was
    pub path: Utf8PathBuf,
    /// What happened
    pub removal: Removal,
}

impl ItemRemoval {
    /// `Binary: /home/me/.local/bin/ghostty`, plus the failure if any
    pub fn describe(&self) -> String {
        match &self.removal {
            Removal::Failed(reason) => format!("{}: {} ({reason})", self.label, self.path),
            _ => format!("{}: {}", self.label, self.path),
        }
    }
}

/// The overall result of an uninstall
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Nothing was installed
    NothingToRemove,
    /// Everything that was installed is gone
    Removed(Vec<ItemRemoval>),
    /// Some things couldn't be removed
    Incomplete {
        /// What we did remove
        removed: Vec<ItemRemoval>,
        /// What we couldn't
        failed: Vec<ItemRemoval>,
    },
}

impl UninstallOutcome {
    /// Summarize per-item results
    pub fn from_items(items: &[ItemRemoval]) -> Self {
        let removed: Vec<_> = items
            .iter()
            .filter(|i| i.removal == Removal::Removed)
            .cloned()
            .collect();
        let failed: Vec<_> = items
            .iter()
            .filter(|i| matches!(i.removal, Removal::Failed(_)))
            .cloned()
            .collect();

        if !failed.is_empty() {
            Self::Incomplete { removed, failed }
        } else if !removed.is_empty() {
            Self::Removed(removed)
        } else {
            Self::NothingToRemove
        }
    }
}

/// Try to remove every item of an installation
///
/// Each item is handled independently: one failing doesn't stop the rest.
pub fn remove_installed(reporter: &dyn Reporter, installed: &InstalledState) -> Vec<ItemRemoval> {
    reporter.info("Uninstalling Ghostty...");
    installed
        .items()
        .iter()
        .map(|item| {
            let path = item.path;
            let removal = if !path.exists() {
                reporter.info(format!("{} not found, skipping removal", item.label));
                Removal::Absent
            } else {
                match LocalAsset::remove_file(path) {
                    Ok(()) => {
                        reporter.success(format!("Removed {}: {path}", item.label));
                        Removal::Removed
                    }
                    Err(e) => {
                        reporter.error(format!("Failed to remove {} {path}: {e}", item.label));
                        Removal::Failed(e.to_string())
                    }
                }
            };
            ItemRemoval {
                label: item.label,
                kind: item.kind,
                path: path.to_owned(),
                removal,
            }
        })
        .collect()
}

/// Remove an installation and summarize how it went
pub fn uninstall(reporter: &dyn Reporter, installed: &InstalledState) -> UninstallOutcome {
    let items = remove_installed(reporter, installed);
    let outcome = UninstallOutcome::from_items(&items);

    match &outcome {
        UninstallOutcome::NothingToRemove => {
            reporter.warning("No Ghostty artifacts found to remove");
        }
        UninstallOutcome::Removed(removed) => {
            reporter.success(format!("Successfully removed {} items:", removed.len()));
            for item in removed {
                reporter.info(format!("  - {}", item.describe()));
            }
            reporter.success("Ghostty uninstallation completed successfully");
        }
        UninstallOutcome::Incomplete { removed, failed } => {
            if !removed.is_empty() {
                reporter.success(format!("Successfully removed {} items:", removed.len()));
                for item in removed {
                    reporter.info(format!("  - {}", item.describe()));
                }
            }
            reporter.error(format!("Failed to remove {} items:", failed.len()));
            for item in failed {
                reporter.error(format!("  - {}", item.describe()));
            }
        }
    }
    outcome
}
