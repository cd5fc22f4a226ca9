#![deny(missing_docs)]

//! # ghostty-installer-schema
//!
//! This crate exists to serialize and deserialize the report printed by
//! `ghostty-installer --output-format=json`. Ideally it should be reasonably
//! forward and backward compatible with different versions of this format.
//!
//! The root type of the schema is [`RunReport`][].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A local system path on the machine ghostty-installer was run.
///
/// This is a String because when deserializing this may be a path format from a different OS!
pub type LocalPath = String;

/// A report of everything a single ghostty-installer invocation touched
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    /// The version of ghostty-installer that generated this
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_version: Option<String>,
    /// Which pipeline ran
    pub mode: RunMode,
    /// The Ghostty version that was requested (absent for uninstalls)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// The Zig version the build was pinned to (absent for uninstalls)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain_version: Option<String>,
    /// What happened to the release signature
    #[serde(default)]
    pub signature: SignatureCheck,
    /// Every artifact the run looked at, in the order it looked at them
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactRecord>,
    /// Whether the binary was found at its install path when the run finished
    pub installed: bool,
}

/// The terminal path a run took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RunMode {
    /// Built with a locally downloaded toolchain
    #[serde(rename = "local")]
    Local,
    /// Built inside a container image
    #[serde(rename = "container")]
    Container,
    /// Removed a previous installation
    #[serde(rename = "uninstall")]
    Uninstall,
}

/// The outcome of signature verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum SignatureCheck {
    /// minisign accepted the signature
    #[serde(rename = "verified")]
    Verified,
    /// The user asked us not to check
    #[serde(rename = "skipped")]
    Skipped,
    /// Verification happened somewhere we can't see (inside the container recipe)
    #[serde(rename = "delegated")]
    Delegated,
    /// Signatures play no part in this kind of run
    #[serde(rename = "not-applicable")]
    #[default]
    NotApplicable,
}

/// An on-disk artifact and what the run did with it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactRecord {
    /// What sort of artifact this is
    pub kind: ArtifactKind,
    /// Where it lives
    pub path: LocalPath,
    /// What happened to it
    pub state: ArtifactState,
    /// Extra detail (usually an error message)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Kinds of artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ArtifactKind {
    /// The release source tarball
    #[serde(rename = "archive")]
    Archive,
    /// The detached minisign signature for the archive
    #[serde(rename = "signature")]
    Signature,
    /// The downloaded compiler tarball
    #[serde(rename = "toolchain-archive")]
    ToolchainArchive,
    /// The flattened compiler installation
    #[serde(rename = "toolchain")]
    Toolchain,
    /// The unpacked source tree
    #[serde(rename = "extracted-dir")]
    ExtractedDir,
    /// The installed executable
    #[serde(rename = "binary")]
    Binary,
    /// A desktop-integration descriptor
    #[serde(rename = "desktop-file")]
    DesktopFile,
    /// Unknown to this version of ghostty-installer-schema
    ///
    /// This is a fallback for forward/backward-compat
    #[serde(other)]
    #[serde(rename = "unknown")]
    Unknown,
}

/// States an artifact can end a run in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ArtifactState {
    /// Already present, reused without fetching
    #[serde(rename = "cached")]
    Cached,
    /// Fetched during this run
    #[serde(rename = "downloaded")]
    Downloaded,
    /// Unpacked during this run
    #[serde(rename = "extracted")]
    Extracted,
    /// Placed in the install prefix during this run
    #[serde(rename = "installed")]
    Installed,
    /// Tried to install it but couldn't (non-fatal)
    #[serde(rename = "install-failed")]
    InstallFailed,
    /// Deleted during this run
    #[serde(rename = "removed")]
    Removed,
    /// Wasn't there to begin with
    #[serde(rename = "absent")]
    Absent,
    /// Unknown to this version of ghostty-installer-schema
    ///
    /// This is a fallback for forward/backward-compat
    #[serde(other)]
    #[serde(rename = "unknown")]
    Unknown,
}

impl RunReport {
    /// Create a new, empty RunReport for the given mode
    pub fn new(installer_version: String, mode: RunMode) -> Self {
        Self {
            installer_version: Some(installer_version),
            mode,
            app_version: None,
            toolchain_version: None,
            signature: SignatureCheck::default(),
            artifacts: vec![],
            installed: false,
        }
    }

    /// Record what happened to an artifact
    pub fn record(&mut self, kind: ArtifactKind, path: impl Into<LocalPath>, state: ArtifactState) {
        self.artifacts.push(ArtifactRecord {
            kind,
            path: path.into(),
            state,
            detail: None,
        });
    }

    /// Record what happened to an artifact, with some extra context
    pub fn record_with_detail(
        &mut self,
        kind: ArtifactKind,
        path: impl Into<LocalPath>,
        state: ArtifactState,
        detail: impl Into<String>,
    ) {
        self.artifacts.push(ArtifactRecord {
            kind,
            path: path.into(),
            state,
            detail: Some(detail.into()),
        });
    }

    /// All the records in a given state
    pub fn artifacts_in(&self, state: ArtifactState) -> impl Iterator<Item = &ArtifactRecord> {
        self.artifacts.iter().filter(move |a| a.state == state)
    }

    /// Get the JSON Schema for a RunReport
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RunReport)
    }
}
