//! Unpacking archives

use std::fmt;

use axoasset::LocalAsset;
use camino::Utf8Path;

use crate::errors::{InstallerError, InstallerResult};
use crate::reporter::Reporter;

/// The archive formats we know how to unpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.tar.gz` / `.tgz`
    TarGz,
    /// `.tar.xz`
    TarXz,
    /// `.zip`
    Zip,
}

impl ArchiveKind {
    /// Work out the format from a file name
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let name = path.file_name()?;
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar.xz") {
            Some(Self::TarXz)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::Zip => "zip",
        };
        s.fmt(f)
    }
}

/// Unpack `archive` into `dest`, inferring the format from the file name
pub fn extract(archive: &Utf8Path, dest: &Utf8Path) -> InstallerResult<()> {
    let kind = ArchiveKind::from_path(archive).ok_or_else(|| InstallerError::UnknownArchiveKind {
        path: archive.to_owned(),
    })?;
    extract_as(archive, kind, dest)
}

/// Unpack `archive` into `dest` as the given format
pub fn extract_as(archive: &Utf8Path, kind: ArchiveKind, dest: &Utf8Path) -> InstallerResult<()> {
    LocalAsset::create_dir_all(dest)?;
    let result = match kind {
        ArchiveKind::TarGz => LocalAsset::untar_gz_all(archive, dest),
        ArchiveKind::TarXz => LocalAsset::untar_xz_all(archive, dest),
        ArchiveKind::Zip => LocalAsset::unzip_all(archive, dest),
    };
    result.map_err(|details| InstallerError::Extract {
        archive: archive.to_owned(),
        details,
    })
}

/// Unpack `archive` into `dest`, replacing the directory it unpacks to
///
/// `expected` is the directory the archive is known to produce inside
/// `dest`. Whatever is there gets deleted first so the result never mixes
/// old and new files.
pub fn extract_fresh(
    reporter: &dyn Reporter,
    archive: &Utf8Path,
    dest: &Utf8Path,
    expected: &Utf8Path,
) -> InstallerResult<()> {
    if expected.exists() {
        reporter.info(format!("Removing existing directory {expected}"));
        LocalAsset::remove_dir_all(expected)?;
    }
    reporter.info(format!("Extracting {archive}"));
    extract(archive, dest)?;
    reporter.success(format!("Extracted {archive}"));
    Ok(())
}
