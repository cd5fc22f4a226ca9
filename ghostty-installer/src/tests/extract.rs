use axoasset::LocalAsset;
use camino::Utf8Path;

use super::mock::*;
use crate::errors::InstallerError;
use crate::extract::{extract, extract_as, extract_fresh, ArchiveKind};

#[test]
fn kind_is_inferred_from_file_name() {
    let kind = |name: &str| ArchiveKind::from_path(Utf8Path::new(name));
    assert_eq!(kind("ghostty-1.2.0.tar.gz"), Some(ArchiveKind::TarGz));
    assert_eq!(kind("/tmp/thing.tgz"), Some(ArchiveKind::TarGz));
    assert_eq!(kind("zig.tar.xz"), Some(ArchiveKind::TarXz));
    assert_eq!(kind("bundle.zip"), Some(ArchiveKind::Zip));
    assert_eq!(kind("ghostty-1.2.0.tar.gz.minisig"), None);
    assert_eq!(kind("README"), None);
}

#[test]
fn unknown_kind_is_an_error() {
    let ws = TestWorkspace::new();
    let sig = ws.ctx.work_dir.join("ghostty-1.2.0.tar.gz.minisig");
    ws.write(&sig, b"untrusted comment");

    let err = extract(&sig, &ws.ctx.work_dir).unwrap_err();
    assert!(matches!(err, InstallerError::UnknownArchiveKind { .. }), "{err:?}");
}

#[test]
fn every_supported_format_unpacks() {
    let ws = TestWorkspace::new();
    let tree = ws.scratch("tree");
    write_source_tree(&tree);
    let out = ws.scratch("archives");

    let gz = out.join("src.tar.gz");
    let xz = out.join("src.tar.xz");
    let zip = out.join("src.zip");
    LocalAsset::tar_gz_dir(&tree, &gz, Some("src")).unwrap();
    LocalAsset::tar_xz_dir(&tree, &xz, Some("src")).unwrap();
    LocalAsset::zip_dir(&tree, &zip, Some("src")).unwrap();

    for archive in [&gz, &xz, &zip] {
        let dest = ws.scratch(&format!("unpacked-{}", archive.file_name().unwrap()));
        extract(archive, &dest).unwrap();
        let template = dest.join("src/dist/linux/app.desktop.in");
        assert_eq!(
            LocalAsset::load_string(&template).unwrap(),
            APP_DESKTOP_TEMPLATE,
            "{archive}"
        );
    }
}

#[test]
fn corrupt_archive_is_an_error() {
    let ws = TestWorkspace::new();
    let archive = ws.ctx.work_dir.join("ghostty-1.2.0.tar.gz");
    ws.write(&archive, b"<html>502 Bad Gateway</html>");

    let err = extract_as(&archive, ArchiveKind::TarGz, &ws.ctx.work_dir).unwrap_err();
    assert!(matches!(err, InstallerError::Extract { .. }), "{err:?}");
}

#[test]
fn fresh_extraction_drops_stale_files() {
    let ws = TestWorkspace::new();
    let archive = ws.ctx.work_dir.join("ghostty-1.2.0.tar.gz");
    let bytes = release_tarball(&ws, APP_VER);
    ws.write(&archive, &bytes);

    let source = ws.ctx.work_dir.join("ghostty-1.2.0");
    let stale = source.join("zig-out").join("leftover");
    ws.write(&stale, b"from a previous build");

    let reporter = RecordingReporter::new();
    extract_fresh(&reporter, &archive, &ws.ctx.work_dir, &source).unwrap();

    assert!(!stale.exists());
    assert!(source.join("build.zig").exists());
    assert!(source.join("dist/linux/ghostty_dolphin.desktop").exists());
}
