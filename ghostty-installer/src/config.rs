//! Config types (for workspace, CLI flags, and the fixed release layout)

use std::time::Duration;

use camino::Utf8PathBuf;

/// The Ghostty release we build when nobody asks for a specific one
pub const DEFAULT_GHOSTTY_VERSION: &str = "1.2.0";
/// The Zig release Ghostty is pinned to
pub const DEFAULT_ZIG_VERSION: &str = "0.14.1";

/// Where Ghostty publishes source releases
pub const RELEASE_BASE_URL: &str = "https://release.files.ghostty.org";
/// Where Zig publishes toolchains
pub const ZIG_BASE_URL: &str = "https://ziglang.org/download";

/// The minisign key that signs Ghostty releases
pub const GHOSTTY_PUBLIC_KEY: &str = "untrusted comment: minisign public key 0x23149WL2sEpT\nRWQlAjJC23149WL2sEpT/l0QKy7hMIFhYdQOFy0Z7z7PbneUgvlsnYcV";

/// Name of the installed executable
pub const APP_BINARY: &str = "ghostty";
/// Display name substituted into the desktop entry
pub const APP_DISPLAY_NAME: &str = "Ghostty";
/// Application id substituted into the desktop entry
pub const APP_ID: &str = "com.mitchellh.ghostty";

/// The build recipe used by `--container`, looked up in the working dir
pub const CONTAINERFILE: &str = "Containerfile";
/// Image name for container builds (tagged with the Ghostty version)
pub const CONTAINER_IMAGE: &str = "ghostty-builder";
/// Prefix for the throwaway container we copy artifacts out of
pub const CONTAINER_NAME_PREFIX: &str = "ghostty-extract";

/// How long a single download may take before we give up
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(600);

/// Global config for commands
#[derive(Debug, Clone)]
pub struct Config {
    /// Which pipeline to run
    pub mode: Mode,
    /// The Ghostty version to build
    pub version: String,
    /// The Zig version to build it with
    pub zig_version: String,
    /// Rebuild the container image from scratch
    pub no_cache: bool,
    /// Re-download artifacts even if they're already on disk
    pub pull_always: bool,
    /// Don't check the release signature
    pub skip_signature: bool,
    /// Stop after unpacking the source
    pub skip_build: bool,
    /// Directory downloads and sources live in (defaults to the current dir)
    pub work_dir: Option<Utf8PathBuf>,
    /// Upper bound on each download
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Local,
            version: DEFAULT_GHOSTTY_VERSION.to_owned(),
            zig_version: DEFAULT_ZIG_VERSION.to_owned(),
            no_cache: false,
            pull_always: false,
            skip_signature: false,
            skip_build: false,
            work_dir: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// The three terminal paths a run can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Remove everything a previous install produced
    Uninstall,
    /// Build inside podman
    Container,
    /// Build with a locally downloaded toolchain
    Local,
}

impl Mode {
    /// Pick the path to run from the raw flags
    ///
    /// `--uninstall` wins over everything, then `--container`.
    pub fn select(uninstall: bool, container: bool) -> Self {
        if uninstall {
            Mode::Uninstall
        } else if container {
            Mode::Container
        } else {
            Mode::Local
        }
    }
}

impl Config {
    /// Flags that were passed but have no effect on the selected mode
    ///
    /// Returns the flag name and why it's being ignored.
    pub fn ignored_flags(&self) -> Vec<(&'static str, &'static str)> {
        let mut ignored = vec![];
        match self.mode {
            Mode::Uninstall => {}
            Mode::Container => {
                if self.skip_build {
                    ignored.push(("--skip-build", "ignored when using --container"));
                }
                if self.skip_signature {
                    ignored.push((
                        "--skip-signature",
                        "ignored when using --container (signature always verified)",
                    ));
                }
                if self.pull_always {
                    ignored.push((
                        "--pull-always",
                        "ignored when using --container (always downloads fresh)",
                    ));
                }
            }
            Mode::Local => {
                if self.no_cache {
                    ignored.push(("--no-cache", "only used with --container"));
                }
            }
        }
        ignored
    }
}

/// A fully resolved Ghostty release
///
/// Derived purely from the version string, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// The version, e.g. "1.2.0"
    pub version: String,
    /// URL of the source tarball
    pub archive_url: String,
    /// URL of the detached minisign signature
    pub signature_url: String,
}

impl ReleaseDescriptor {
    /// Resolve the release for a version string
    pub fn new(version: &str) -> Self {
        let archive_url = format!("{RELEASE_BASE_URL}/{version}/ghostty-{version}.tar.gz");
        let signature_url = format!("{archive_url}.minisig");
        Self {
            version: version.to_owned(),
            archive_url,
            signature_url,
        }
    }

    /// File name of the source tarball
    pub fn archive_name(&self) -> String {
        format!("ghostty-{}.tar.gz", self.version)
    }

    /// File name of the signature
    pub fn signature_name(&self) -> String {
        format!("{}.minisig", self.archive_name())
    }

    /// Name of the directory the tarball unpacks to
    pub fn source_dir_name(&self) -> String {
        format!("ghostty-{}", self.version)
    }
}

/// A fully resolved Zig toolchain release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    /// The version, e.g. "0.14.1"
    pub version: String,
    /// The cpu architecture in zig's naming
    pub arch: &'static str,
    /// URL of the toolchain tarball
    pub archive_url: String,
}

impl ToolchainDescriptor {
    /// Resolve the toolchain for the host we're running on
    pub fn for_host(version: &str) -> Self {
        Self::new(version, host_arch())
    }

    /// Resolve the toolchain for a specific architecture
    pub fn new(version: &str, arch: &'static str) -> Self {
        let archive_url = format!("{ZIG_BASE_URL}/{version}/zig-{arch}-linux-{version}.tar.xz");
        Self {
            version: version.to_owned(),
            arch,
            archive_url,
        }
    }

    /// Name of the directory the tarball unpacks to
    pub fn extracted_dir_name(&self) -> String {
        format!("zig-{}-linux-{}", self.arch, self.version)
    }
}

/// The host architecture, as zig names it in release tarballs
///
/// Anything we don't recognize gets the x86_64 toolchain.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "aarch64",
        _ => "x86_64",
    }
}
