//! Release signature checks with minisign

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};
use temp_dir::TempDir;

use crate::errors::{InstallerError, InstallerResult};
use crate::process::{Invocation, ToolOutput, ToolRunner};

const MINISIGN: &str = "minisign";

/// What minisign thought of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerdict {
    /// Whether the signature matched
    pub valid: bool,
    /// Everything minisign printed
    pub output: ToolOutput,
}

/// Check `archive` against its detached `signature` using `public_key`
///
/// Fails outright if minisign isn't installed. The key is written to a
/// scratch directory that's gone by the time this returns.
pub fn verify_signature(
    runner: &dyn ToolRunner,
    archive: &Utf8Path,
    signature: &Utf8Path,
    public_key: &str,
) -> InstallerResult<SignatureVerdict> {
    if !runner.probe(MINISIGN, "-v") {
        return Err(InstallerError::MinisignMissing);
    }

    let scratch = TempDir::new()?;
    let key_path = Utf8PathBuf::try_from(scratch.child("ghostty.pub"))?;
    LocalAsset::write_new(public_key, &key_path)?;

    let invocation = Invocation::new(MINISIGN, "verify the release signature")
        .arg("-V")
        .arg("-p")
        .arg(key_path.as_str())
        .arg("-m")
        .arg(archive.as_str())
        .arg("-x")
        .arg(signature.as_str());
    let output = runner.run(&invocation)?;

    Ok(SignatureVerdict {
        valid: output.success,
        output,
    })
}
