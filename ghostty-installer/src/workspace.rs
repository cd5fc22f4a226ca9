//! The on-disk layout of a run
//!
//! [`WorkspaceContext`][] is threaded through every step instead of relying on
//! the process's current directory. It knows where every artifact the
//! pipelines can produce lives, and whether it's there yet.

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};
use ghostty_installer_schema::ArtifactKind;

use crate::config::{ReleaseDescriptor, ToolchainDescriptor, APP_BINARY, APP_ID, CONTAINERFILE};
use crate::errors::{InstallerError, InstallerResult};

/// Name of the directory the toolchain is flattened into
const COMPILER_DIR: &str = "compiler";

/// The two roots everything hangs off of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    /// Where downloads, sources and the toolchain go
    pub work_dir: Utf8PathBuf,
    /// The user's home, which `.local` is relative to
    pub home: Utf8PathBuf,
}

impl WorkspaceContext {
    /// Make a context from explicit roots
    pub fn new(work_dir: impl Into<Utf8PathBuf>, home: impl Into<Utf8PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            home: home.into(),
        }
    }

    /// Make a context for the real machine: the given (or current) dir and the real $HOME
    pub fn detect(work_dir: Option<&Utf8Path>) -> InstallerResult<Self> {
        let cwd = LocalAsset::current_dir()?;
        let home = homedir::my_home()?.ok_or(InstallerError::NoHome)?;
        let home = Utf8PathBuf::try_from(home)?;
        Ok(Self::new(resolve_work_dir(&cwd, work_dir), home))
    }

    /// `<work>/ghostty-<v>.tar.gz`
    pub fn archive_path(&self, release: &ReleaseDescriptor) -> Utf8PathBuf {
        self.work_dir.join(release.archive_name())
    }

    /// `<work>/ghostty-<v>.tar.gz.minisig`
    pub fn signature_path(&self, release: &ReleaseDescriptor) -> Utf8PathBuf {
        self.work_dir.join(release.signature_name())
    }

    /// `<work>/ghostty-<v>/`
    pub fn source_dir(&self, release: &ReleaseDescriptor) -> Utf8PathBuf {
        self.work_dir.join(release.source_dir_name())
    }

    /// `<work>/Containerfile`
    pub fn containerfile(&self) -> Utf8PathBuf {
        self.work_dir.join(CONTAINERFILE)
    }

    /// The toolchain install under this workspace
    pub fn toolchain(&self, toolchain: &ToolchainDescriptor) -> ToolchainLayout {
        ToolchainLayout::new(self.work_dir.join(COMPILER_DIR), toolchain)
    }

    /// `$HOME/.local`, the prefix builds install into
    pub fn prefix(&self) -> Utf8PathBuf {
        self.home.join(".local")
    }

    /// Everything an installation consists of
    pub fn installed(&self) -> InstalledState {
        InstalledState::new(&self.prefix())
    }
}

/// The working dir as an absolute path
///
/// Builds run with their own `current_dir`, so a relative path would point
/// somewhere else by the time the child resolves it.
pub fn resolve_work_dir(cwd: &Utf8Path, work_dir: Option<&Utf8Path>) -> Utf8PathBuf {
    match work_dir {
        Some(dir) => cwd.join(dir),
        None => cwd.to_owned(),
    }
}

/// Where the flattened toolchain lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLayout {
    /// `<work>/compiler`
    pub dir: Utf8PathBuf,
    /// `<work>/compiler/zig`
    pub binary: Utf8PathBuf,
    /// `<work>/compiler/lib`
    pub lib: Utf8PathBuf,
    /// `<work>/compiler/zig.tar.xz`
    pub archive: Utf8PathBuf,
    /// `<work>/compiler/zig-<arch>-linux-<v>`, only around mid-setup
    pub extracted: Utf8PathBuf,
}

impl ToolchainLayout {
    fn new(dir: Utf8PathBuf, toolchain: &ToolchainDescriptor) -> Self {
        Self {
            binary: dir.join("zig"),
            lib: dir.join("lib"),
            archive: dir.join("zig.tar.xz"),
            extracted: dir.join(toolchain.extracted_dir_name()),
            dir,
        }
    }

    /// Whether setup can be skipped
    pub fn is_installed(&self) -> bool {
        self.binary.exists()
    }
}

/// The artifacts an installation leaves behind
///
/// Both the verifier and the uninstaller reason over exactly this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledState {
    /// `$HOME/.local/bin/ghostty`
    pub binary: Utf8PathBuf,
    /// `$HOME/.local/share/applications/ghostty.desktop`
    pub app_desktop: Utf8PathBuf,
    /// `$HOME/.local/share/kio/servicemenus/com.mitchellh.ghostty.desktop`
    pub service_menu: Utf8PathBuf,
}

impl InstalledState {
    /// The installed state under a given prefix
    pub fn new(prefix: &Utf8Path) -> Self {
        let share = prefix.join("share");
        Self {
            binary: prefix.join("bin").join(APP_BINARY),
            app_desktop: share.join("applications").join(format!("{APP_BINARY}.desktop")),
            service_menu: share
                .join("kio")
                .join("servicemenus")
                .join(format!("{APP_ID}.desktop")),
        }
    }

    /// Every installable item, in removal order
    pub fn items(&self) -> [InstalledItem<'_>; 3] {
        [
            InstalledItem {
                label: "Binary",
                kind: ArtifactKind::Binary,
                path: &self.binary,
            },
            InstalledItem {
                label: "Application desktop file",
                kind: ArtifactKind::DesktopFile,
                path: &self.app_desktop,
            },
            InstalledItem {
                label: "Dolphin service menu",
                kind: ArtifactKind::DesktopFile,
                path: &self.service_menu,
            },
        ]
    }
}

/// One entry of an [`InstalledState`][]
#[derive(Debug, Clone, Copy)]
pub struct InstalledItem<'a> {
    /// What to call it when talking to the user
    pub label: &'static str,
    /// What to call it in reports
    pub kind: ArtifactKind,
    /// Where it lives
    pub path: &'a Utf8Path,
}
