#![deny(missing_docs)]
#![allow(clippy::result_large_err)]

//! # ghostty-installer
//!
//! This is the library at the core of the `ghostty-installer` CLI. It mostly
//! exists so the pipelines can be tested against fake tools, and isn't
//! intended to be used by anyone else.
//!
//! The moving parts are all behind small traits ([`process::ToolRunner`][],
//! [`acquire::Fetcher`][], [`reporter::Reporter`][]) so that [`do_install`][]
//! is the only place that picks the real ones.

use ghostty_installer_schema::RunReport;

pub use config::{Config, Mode};
pub use errors::{InstallerError, InstallerResult};
pub use pipeline::Pipeline;

pub mod acquire;
pub mod build;
pub mod config;
pub mod errors;
pub mod extract;
pub mod install;
pub mod net;
pub mod pipeline;
pub mod process;
pub mod reporter;
pub mod toolchain;
pub mod uninstall;
pub mod verify;
pub mod workspace;
#[cfg(test)]
mod tests;

/// Run whatever `cfg` asks for against the real machine
pub fn do_install(cfg: &Config) -> InstallerResult<RunReport> {
    let ctx = workspace::WorkspaceContext::detect(cfg.work_dir.as_deref())?;
    let fetcher = acquire::HttpFetcher::new(&net::ClientSettings::new(cfg))?;
    let runner = process::SystemRunner;
    let reporter = reporter::TracingReporter;

    Pipeline::new(cfg, &ctx, &runner, &fetcher, &reporter).run()
}
