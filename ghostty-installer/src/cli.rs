//! All the clap stuff for parsing/documenting the cli

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{
    builder::{PossibleValuesParser, TypedValueParser},
    Parser, ValueEnum,
};
use ghostty_installer::config::{
    Config, Mode, DEFAULT_GHOSTTY_VERSION, DEFAULT_HTTP_TIMEOUT, DEFAULT_ZIG_VERSION,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Clone, Debug)]
#[clap(version, about, long_about = None)]
#[clap(after_help = EXAMPLES)]
/// Build the Ghostty terminal from source and install it to $HOME/.local
///
/// Downloads the Ghostty source release, validates its signature, sets up the
/// Zig compiler, builds Ghostty, and installs it to $HOME/.local/bin. Use
/// --uninstall to remove everything an install put down, or --container to
/// build inside podman without installing any build dependencies locally.
pub struct Cli {
    /// Ghostty version to build
    #[clap(id = "ghostty_version", value_name = "VERSION", default_value = DEFAULT_GHOSTTY_VERSION)]
    pub version: String,

    /// Remove all installed Ghostty artifacts (binary and desktop files)
    ///
    /// Takes precedence over every other flag.
    #[clap(long)]
    pub uninstall: bool,

    /// Build Ghostty using a container (requires podman)
    #[clap(long)]
    pub container: bool,

    /// Zig compiler version to use
    #[clap(long, default_value = DEFAULT_ZIG_VERSION)]
    pub zig_version: String,

    /// Force a container rebuild without cache (only used with --container)
    #[clap(long)]
    pub no_cache: bool,

    /// Always download files even if they already exist in the working directory
    #[clap(long)]
    pub pull_always: bool,

    /// Skip signature validation (not recommended for security)
    #[clap(long)]
    pub skip_signature: bool,

    /// Skip build and installation steps (only download and extract source code)
    #[clap(long)]
    pub skip_build: bool,

    /// Directory to download and build in (defaults to the current directory)
    #[clap(long)]
    #[clap(help_heading = "GLOBAL OPTIONS")]
    pub work_dir: Option<Utf8PathBuf>,

    /// How long a single download may take, in seconds
    #[clap(long, default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs())]
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    #[clap(help_heading = "GLOBAL OPTIONS")]
    pub http_timeout: u64,

    /// How verbose logging should be (log level)
    #[clap(long, short)]
    #[clap(default_value_t = LevelFilter::INFO)]
    #[clap(value_parser = PossibleValuesParser::new(["off", "error", "warn", "info", "debug", "trace"]).map(|s| s.parse::<LevelFilter>().expect("possible values are valid")))]
    #[clap(help_heading = "GLOBAL OPTIONS")]
    pub verbose: LevelFilter,

    /// The format of the output
    #[clap(long, short, value_enum)]
    #[clap(default_value_t = OutputFormat::Human)]
    #[clap(help_heading = "GLOBAL OPTIONS")]
    pub output_format: OutputFormat,
}

const EXAMPLES: &str = "\
Examples:
  ghostty-installer                           # Build the default Ghostty release
  ghostty-installer 1.1.3                     # Build a specific version
  ghostty-installer --uninstall               # Remove all installed Ghostty artifacts
  ghostty-installer --container               # Build using a container (requires podman)
  ghostty-installer --container --zig-version 0.13.0
  ghostty-installer --skip-build              # Only download and extract source
  ghostty-installer --pull-always             # Force re-download of all files
  ghostty-installer 1.2.0 --skip-build --pull-always";

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    /// Turn the parsed flags into library config
    pub fn to_config(&self) -> Config {
        Config {
            mode: Mode::select(self.uninstall, self.container),
            version: self.version.clone(),
            zig_version: self.zig_version.clone(),
            no_cache: self.no_cache,
            pull_always: self.pull_always,
            skip_signature: self.skip_signature,
            skip_build: self.skip_build,
            work_dir: self.work_dir.clone(),
            http_timeout: Duration::from_secs(self.http_timeout),
        }
    }
}
