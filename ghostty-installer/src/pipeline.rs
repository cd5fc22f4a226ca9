//! The top-level driver
//!
//! A [`Pipeline`][] runs exactly one of the three paths a [`Config`][] can
//! select, stops at the first thing that can't be recovered from, and
//! describes what it did in a [`RunReport`][].

use ghostty_installer_schema::{ArtifactKind, ArtifactState, RunMode, RunReport, SignatureCheck};

use crate::acquire::{acquire, Acquisition, Fetcher};
use crate::build::container::ContainerBuild;
use crate::build::local::build_local;
use crate::config::{Config, Mode, ReleaseDescriptor, ToolchainDescriptor, GHOSTTY_PUBLIC_KEY};
use crate::errors::{InstallerError, InstallerResult};
use crate::extract::extract_fresh;
use crate::install::{install_descriptors, DescriptorOutcome, DescriptorStatus};
use crate::process::ToolRunner;
use crate::reporter::Reporter;
use crate::toolchain::{setup_toolchain, ToolchainSetup};
use crate::uninstall::{uninstall, verify_installed, ItemRemoval, UninstallOutcome};
use crate::verify::verify_signature;
use crate::workspace::WorkspaceContext;

/// Everything a run needs, real or fake
pub struct Pipeline<'a> {
    cfg: &'a Config,
    ctx: &'a WorkspaceContext,
    runner: &'a dyn ToolRunner,
    fetcher: &'a dyn Fetcher,
    reporter: &'a dyn Reporter,
    toolchain: ToolchainDescriptor,
}

impl<'a> Pipeline<'a> {
    /// Wire up a pipeline
    pub fn new(
        cfg: &'a Config,
        ctx: &'a WorkspaceContext,
        runner: &'a dyn ToolRunner,
        fetcher: &'a dyn Fetcher,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            cfg,
            ctx,
            runner,
            fetcher,
            reporter,
            toolchain: ToolchainDescriptor::for_host(&cfg.zig_version),
        }
    }

    /// Use a specific toolchain instead of the host's
    pub fn with_toolchain(mut self, toolchain: ToolchainDescriptor) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Run whichever path the config selects
    pub fn run(&self) -> InstallerResult<RunReport> {
        for (flag, why) in self.cfg.ignored_flags() {
            match self.cfg.mode {
                Mode::Container => self.reporter.warning(format!("{flag} {why}")),
                _ => self.reporter.info(format!("{flag} {why}")),
            }
        }

        match self.cfg.mode {
            Mode::Uninstall => self.run_uninstall(),
            Mode::Container => self.run_container(),
            Mode::Local => self.run_local(),
        }
    }

    fn new_report(&self, mode: RunMode) -> RunReport {
        let mut report = RunReport::new(env!("CARGO_PKG_VERSION").to_owned(), mode);
        if mode != RunMode::Uninstall {
            report.app_version = Some(self.cfg.version.clone());
            report.toolchain_version = Some(self.cfg.zig_version.clone());
        }
        report
    }

    fn run_uninstall(&self) -> InstallerResult<RunReport> {
        let mut report = self.new_report(RunMode::Uninstall);
        let installed = self.ctx.installed();

        match uninstall(self.reporter, &installed) {
            UninstallOutcome::NothingToRemove => {
                for item in installed.items() {
                    report.record(item.kind, item.path.as_str(), ArtifactState::Absent);
                }
                Ok(report)
            }
            UninstallOutcome::Removed(removed) => {
                record_removals(&mut report, &removed);
                Ok(report)
            }
            UninstallOutcome::Incomplete { removed, failed } => {
                Err(InstallerError::UninstallIncomplete {
                    removed: removed.iter().map(ItemRemoval::describe).collect(),
                    failed: failed.iter().map(ItemRemoval::describe).collect(),
                })
            }
        }
    }

    fn run_container(&self) -> InstallerResult<RunReport> {
        let mut report = self.new_report(RunMode::Container);
        report.signature = SignatureCheck::Delegated;

        let mut build = ContainerBuild::new(
            self.runner,
            self.reporter,
            self.ctx,
            &self.cfg.version,
            &self.cfg.zig_version,
            self.cfg.no_cache,
        );
        let outcome = build.run()?;

        self.finish(&mut report, &outcome.descriptors, "Container build")?;
        Ok(report)
    }

    fn run_local(&self) -> InstallerResult<RunReport> {
        let mut report = self.new_report(RunMode::Local);
        let cfg = self.cfg;
        let reporter = self.reporter;
        reporter.info(format!("Building Ghostty version {}", cfg.version));

        let release = ReleaseDescriptor::new(&cfg.version);
        let archive = self.ctx.archive_path(&release);
        let signature = self.ctx.signature_path(&release);

        let got = acquire(
            self.fetcher,
            reporter,
            &release.archive_url,
            &archive,
            cfg.pull_always,
        )?;
        report.record(ArtifactKind::Archive, archive.as_str(), acquisition_state(got));
        let got = acquire(
            self.fetcher,
            reporter,
            &release.signature_url,
            &signature,
            cfg.pull_always,
        )?;
        report.record(ArtifactKind::Signature, signature.as_str(), acquisition_state(got));

        if cfg.skip_signature {
            reporter.warning("Skipping signature validation (not recommended)");
            report.signature = SignatureCheck::Skipped;
        } else {
            reporter.info("Validating signature...");
            let verdict = verify_signature(self.runner, &archive, &signature, GHOSTTY_PUBLIC_KEY)?;
            if !verdict.valid {
                return Err(InstallerError::SignatureInvalid {
                    archive,
                    output: verdict.output.combined(),
                });
            }
            reporter.success("Signature validation passed");
            report.signature = SignatureCheck::Verified;
        }

        let source_dir = self.ctx.source_dir(&release);
        extract_fresh(reporter, &archive, &self.ctx.work_dir, &source_dir)?;
        report.record(ArtifactKind::ExtractedDir, source_dir.as_str(), ArtifactState::Extracted);

        if cfg.skip_build {
            reporter.info("Skipping build and installation steps");
            reporter.success(format!("Ghostty source code extracted to {source_dir}"));
            reporter.info("Run again without --skip-build to build and install Ghostty");
            report.installed = self.ctx.installed().binary.exists();
            return Ok(report);
        }

        let layout = self.ctx.toolchain(&self.toolchain);
        match setup_toolchain(
            self.fetcher,
            reporter,
            &self.toolchain,
            &layout,
            cfg.pull_always,
        )? {
            ToolchainSetup::Cached => {
                report.record(ArtifactKind::Toolchain, layout.dir.as_str(), ArtifactState::Cached);
            }
            ToolchainSetup::Installed(got) => {
                report.record(
                    ArtifactKind::ToolchainArchive,
                    layout.archive.as_str(),
                    acquisition_state(got),
                );
                report.record(
                    ArtifactKind::Toolchain,
                    layout.dir.as_str(),
                    ArtifactState::Installed,
                );
            }
        }

        build_local(self.runner, reporter, &source_dir, &layout, &self.ctx.prefix())?;

        let descriptors = install_descriptors(reporter, &source_dir, &self.ctx.installed());
        self.finish(&mut report, &descriptors, "Build")?;
        Ok(report)
    }

    /// Record the descriptors and run the verifier, which both builds end with
    fn finish(
        &self,
        report: &mut RunReport,
        descriptors: &DescriptorOutcome,
        what: &str,
    ) -> InstallerResult<()> {
        let installed = self.ctx.installed();
        record_descriptor(report, &installed.app_desktop, &descriptors.app_desktop);
        record_descriptor(report, &installed.service_menu, &descriptors.service_menu);

        if !verify_installed(self.reporter, &installed) {
            self.reporter.error(format!("{what} verification failed!"));
            return Err(InstallerError::VerificationFailed {
                path: installed.binary,
            });
        }
        report.record(ArtifactKind::Binary, installed.binary.as_str(), ArtifactState::Installed);
        report.installed = true;

        self.reporter.success(format!("{what} verification passed!"));
        self.reporter
            .info("Ghostty has been successfully built and installed to $HOME/.local");
        Ok(())
    }
}

fn acquisition_state(got: Acquisition) -> ArtifactState {
    match got {
        Acquisition::Cached => ArtifactState::Cached,
        Acquisition::Downloaded => ArtifactState::Downloaded,
    }
}

fn record_descriptor(report: &mut RunReport, dest: &camino::Utf8Path, status: &DescriptorStatus) {
    match status {
        DescriptorStatus::Installed(path) => {
            report.record(ArtifactKind::DesktopFile, path.as_str(), ArtifactState::Installed);
        }
        DescriptorStatus::SourceMissing(src) => report.record_with_detail(
            ArtifactKind::DesktopFile,
            dest.as_str(),
            ArtifactState::InstallFailed,
            format!("{src} not found"),
        ),
        DescriptorStatus::Failed(why) => report.record_with_detail(
            ArtifactKind::DesktopFile,
            dest.as_str(),
            ArtifactState::InstallFailed,
            why.as_str(),
        ),
    }
}

fn record_removals(report: &mut RunReport, removed: &[ItemRemoval]) {
    for item in removed {
        report.record(item.kind, item.path.as_str(), ArtifactState::Removed);
    }
}
