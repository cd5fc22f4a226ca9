//! Errors!
//!
//! Every fatal step of every pipeline ends up as one of these. Things that
//! are merely best-effort (desktop files) never become an error; they get
//! reported and the pipeline moves on.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// An alias for the common Result type for this crate
pub type InstallerResult<T> = std::result::Result<T, InstallerError>;

/// Errors ghostty-installer can have
#[derive(Debug, Error, Diagnostic)]
pub enum InstallerError {
    /// random i/o error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// random axoasset error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Asset(#[from] axoasset::AxoassetError),

    /// random axoprocess error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cmd(#[from] axoprocess::AxoprocessError),

    /// random homedir error
    #[error(transparent)]
    Homedir(#[from] homedir::GetHomeError),

    /// A path we were handed wasn't utf8
    #[error("An internal error occurred when decoding path `{:?}' to utf8", path)]
    #[diagnostic(help("Try running from a directory whose path is valid UTF-8"))]
    NonUtf8Path {
        /// The offending path
        path: std::path::PathBuf,
    },

    /// Couldn't work out where $HOME is
    #[error("Unable to determine your home directory")]
    #[diagnostic(help("ghostty-installer installs into $HOME/.local, so it needs one!"))]
    NoHome,

    /// Couldn't build an http client
    #[error("Failed to initialize http client")]
    HttpClient {
        /// Why it failed
        #[source]
        details: axoasset::reqwest::Error,
    },

    /// A download failed
    #[error("Failed to download {url}")]
    Download {
        /// What we were fetching
        url: String,
        /// Why it failed
        #[source]
        details: axoasset::reqwest::Error,
    },

    /// Couldn't put a downloaded file on disk
    #[error("Failed to write {dest}")]
    DownloadWrite {
        /// Where we were writing
        dest: Utf8PathBuf,
        /// Why it failed
        #[source]
        details: std::io::Error,
    },

    /// Couldn't set up the async runtime that drives downloads
    #[error("Failed to initialize the download runtime")]
    Runtime {
        /// Why it failed
        #[source]
        details: std::io::Error,
    },

    /// We don't know how to extract this file
    #[error("Don't know how to extract {path}")]
    #[diagnostic(help("Supported formats are .tar.gz, .tar.xz and .zip"))]
    UnknownArchiveKind {
        /// The file
        path: Utf8PathBuf,
    },

    /// An archive was corrupt or otherwise undecodable
    #[error("Failed to extract {archive}")]
    #[diagnostic(help(
        "If this archive was cached from a previous run it may be truncated; try again with --pull-always"
    ))]
    Extract {
        /// The archive
        archive: Utf8PathBuf,
        /// Why it failed
        #[source]
        details: axoasset::AxoassetError,
    },

    /// The signature tool isn't installed
    #[error("minisign is not installed, so the release signature can't be validated")]
    #[diagnostic(help("Install it with: sudo dnf install minisign"))]
    MinisignMissing,

    /// The signature didn't match
    #[error("Signature validation failed for {archive}, aborting build\n{output}")]
    #[diagnostic(help(
        "If you're certain the archive is trustworthy you can pass --skip-signature (not recommended)"
    ))]
    SignatureInvalid {
        /// The archive that failed to validate
        archive: Utf8PathBuf,
        /// What minisign had to say about it
        output: String,
    },

    /// The toolchain we were about to use isn't where it should be
    #[error("Expected a zig compiler at {path}, but it isn't there")]
    #[diagnostic(help("Try again with --pull-always to re-download the toolchain"))]
    ToolchainMissing {
        /// Where we looked
        path: Utf8PathBuf,
    },

    /// The compiler failed
    #[error("Build failed!\n{stderr}")]
    BuildFailed {
        /// The exit status, if there was one
        status: Option<i32>,
        /// Everything the compiler wrote to stderr
        stderr: String,
    },

    /// The container runtime isn't installed
    #[error("podman is not installed. Please install it to use --container")]
    #[diagnostic(help("Install it with: sudo dnf install podman"))]
    PodmanMissing,

    /// There's no build recipe for the container
    #[error("Containerfile not found at {path}")]
    #[diagnostic(help("Please ensure the Containerfile is in the working directory"))]
    ContainerfileMissing {
        /// Where we looked
        path: Utf8PathBuf,
    },

    /// Some container runtime step failed
    #[error("Container step failed: {step}\n{output}")]
    ContainerStep {
        /// What we were trying to do
        step: String,
        /// What podman had to say about it
        output: String,
    },

    /// The build claimed to succeed but nothing got installed
    #[error("Ghostty binary not found at {path}")]
    #[diagnostic(help("The build finished without installing a binary; check the build output above"))]
    VerificationFailed {
        /// Where we expected the binary
        path: Utf8PathBuf,
    },

    /// Some installed artifacts couldn't be removed
    #[error("Failed to remove {} items", failed.len())]
    #[diagnostic(help("{}", failed.join("\n")))]
    UninstallIncomplete {
        /// Human readable descriptions of what we did remove
        removed: Vec<String>,
        /// Human readable descriptions of what we couldn't remove
        failed: Vec<String>,
    },
}

impl From<camino::FromPathBufError> for InstallerError {
    fn from(e: camino::FromPathBufError) -> Self {
        InstallerError::NonUtf8Path {
            path: e.into_path_buf(),
        }
    }
}
