//! Building inside a podman image
//!
//! The image's recipe (the `Containerfile` in the working dir) does the whole
//! fetch/verify/build dance itself. All we do here is build the image, stand
//! up a throwaway container from it, copy the binary and the `dist/` tree out,
//! and install them exactly like a local build would have.
//!
//! The container and the scratch directory we copy into are both cleaned up
//! however we leave this module.

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};
use temp_dir::TempDir;
use uuid::Uuid;

use crate::config::{CONTAINERFILE, CONTAINER_IMAGE, CONTAINER_NAME_PREFIX};
use crate::errors::{InstallerError, InstallerResult};
use crate::install::{install_binary, install_descriptors, DescriptorOutcome};
use crate::process::{Invocation, ToolRunner};
use crate::reporter::Reporter;
use crate::workspace::WorkspaceContext;

const PODMAN: &str = "podman";
/// Where the recipe leaves the built binary
const CONTAINER_BINARY: &str = "/build/output/bin/ghostty";

/// How far a container build got
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContainerState {
    /// Nothing has happened yet
    ImageMissing,
    /// `podman build` succeeded
    ImageBuilt,
    /// A container exists that we're responsible for removing
    InstanceCreated,
    /// The binary and `dist/` tree are on our side
    ArtifactsExtracted,
    /// The container is gone
    InstanceDestroyed,
}

/// A finished container build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerBuildOutcome {
    /// The image we built
    pub image: String,
    /// The container we created (and removed)
    pub container: String,
    /// How the desktop files went
    pub descriptors: DescriptorOutcome,
}

/// `ghostty-builder:<version>`
pub fn image_tag(version: &str) -> String {
    format!("{CONTAINER_IMAGE}:{version}")
}

/// A fresh, unique container name
pub fn container_name() -> String {
    format!("{CONTAINER_NAME_PREFIX}-{}", Uuid::new_v4().simple())
}

/// The `podman build` invocation
pub fn image_build_invocation(
    work_dir: &Utf8Path,
    version: &str,
    zig_version: &str,
    no_cache: bool,
) -> Invocation {
    let mut invocation = Invocation::new(PODMAN, "build the ghostty container image").arg("build");
    if no_cache {
        invocation = invocation.arg("--no-cache");
    }
    invocation
        .arg("-t")
        .arg(image_tag(version))
        .arg("--build-arg")
        .arg(format!("GHOSTTY_VERSION={version}"))
        .arg("--build-arg")
        .arg(format!("ZIG_VERSION={zig_version}"))
        .arg("-f")
        .arg(CONTAINERFILE)
        .arg(".")
        .current_dir(work_dir)
}

/// Check we can do a container build at all
///
/// Runs before anything touches podman's image store.
pub fn check_preconditions(runner: &dyn ToolRunner, ctx: &WorkspaceContext) -> InstallerResult<()> {
    if !runner.probe(PODMAN, "--version") {
        return Err(InstallerError::PodmanMissing);
    }
    let containerfile = ctx.containerfile();
    if !containerfile.exists() {
        return Err(InstallerError::ContainerfileMissing {
            path: containerfile,
        });
    }
    Ok(())
}

/// Removes its container when dropped
struct ContainerInstance<'a> {
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
    name: String,
}

impl Drop for ContainerInstance<'_> {
    fn drop(&mut self) {
        self.reporter.info("Cleaning up container...");
        let invocation =
            Invocation::new(PODMAN, "remove the extraction container").arg("rm").arg(&self.name);
        match self.runner.run(&invocation) {
            Ok(output) if output.success => self.reporter.success("Container removed"),
            Ok(output) => self.reporter.warning(format!(
                "Failed to remove container {}: {}",
                self.name,
                output.combined()
            )),
            Err(e) => self
                .reporter
                .warning(format!("Failed to remove container {}: {e}", self.name)),
        }
    }
}

/// One container build
pub struct ContainerBuild<'a> {
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
    ctx: &'a WorkspaceContext,
    version: &'a str,
    zig_version: &'a str,
    no_cache: bool,
    state: ContainerState,
}

impl<'a> ContainerBuild<'a> {
    /// Plan a container build
    pub fn new(
        runner: &'a dyn ToolRunner,
        reporter: &'a dyn Reporter,
        ctx: &'a WorkspaceContext,
        version: &'a str,
        zig_version: &'a str,
        no_cache: bool,
    ) -> Self {
        Self {
            runner,
            reporter,
            ctx,
            version,
            zig_version,
            no_cache,
            state: ContainerState::ImageMissing,
        }
    }

    /// How far we got
    ///
    /// Once a container has been created this always ends at
    /// [`ContainerState::InstanceDestroyed`][], whether or not the copy and
    /// install steps succeeded.
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// Build the image, pull the artifacts out of it, and install them
    ///
    /// Doesn't check the result; that's the verifier's job.
    pub fn run(&mut self) -> InstallerResult<ContainerBuildOutcome> {
        check_preconditions(self.runner, self.ctx)?;

        self.reporter.info(format!(
            "Building Ghostty {} using container with Zig {}...",
            self.version, self.zig_version
        ));
        let image = image_tag(self.version);
        self.build_image()?;
        self.state = ContainerState::ImageBuilt;

        let container = container_name();
        let scratch = TempDir::new()?;
        let scratch_path = Utf8PathBuf::try_from(scratch.path().to_owned())?;

        let installed = self.install_from_container(&image, &container, &scratch_path);
        if self.state >= ContainerState::InstanceCreated {
            self.state = ContainerState::InstanceDestroyed;
        }
        drop(scratch);
        let descriptors = installed?;

        Ok(ContainerBuildOutcome {
            image,
            container,
            descriptors,
        })
    }

    /// Create the container, copy out of it and install, removing it on the way out
    fn install_from_container(
        &mut self,
        image: &str,
        container: &str,
        scratch: &Utf8Path,
    ) -> InstallerResult<DescriptorOutcome> {
        self.reporter
            .info("Creating temporary container for artifact extraction...");
        self.podman(
            Invocation::new(PODMAN, "create the extraction container")
                .arg("create")
                .arg("--name")
                .arg(container)
                .arg(image),
            "create container",
        )?;
        let _instance = ContainerInstance {
            runner: self.runner,
            reporter: self.reporter,
            name: container.to_owned(),
        };
        self.state = ContainerState::InstanceCreated;

        let (binary, source_tree) = self.copy_artifacts(container, scratch)?;
        self.state = ContainerState::ArtifactsExtracted;

        let installed = self.ctx.installed();
        install_binary(self.reporter, &binary, &installed)?;
        Ok(install_descriptors(self.reporter, &source_tree, &installed))
    }

    fn build_image(&self) -> InstallerResult<()> {
        if self.no_cache {
            self.reporter
                .info("Using --no-cache: container will be rebuilt without cache");
        }
        self.reporter
            .info("Building container image (this may take a few minutes)...");
        let invocation =
            image_build_invocation(&self.ctx.work_dir, self.version, self.zig_version, self.no_cache);
        self.podman(invocation, "build image")?;
        self.reporter.success("Container image built successfully");
        Ok(())
    }

    /// Copy the binary and the `dist/` tree out into `scratch`
    ///
    /// Returns the binary and a directory laid out like a source tree, so the
    /// descriptor installer can't tell it apart from a local build.
    fn copy_artifacts(
        &self,
        container: &str,
        scratch: &Utf8Path,
    ) -> InstallerResult<(Utf8PathBuf, Utf8PathBuf)> {
        self.reporter.info("Extracting binary from container...");
        let binary = scratch.join("ghostty");
        self.podman(
            Invocation::new(PODMAN, "copy the binary out of the container")
                .arg("cp")
                .arg(format!("{container}:{CONTAINER_BINARY}"))
                .arg(binary.as_str()),
            "extract binary",
        )?;
        self.reporter.success("Binary extracted successfully");

        self.reporter.info("Extracting desktop files from container...");
        let source_tree = scratch.join("ghostty-source");
        LocalAsset::create_dir_all(&source_tree)?;
        self.podman(
            Invocation::new(PODMAN, "copy the dist tree out of the container")
                .arg("cp")
                .arg(format!("{container}:/build/ghostty-{}/dist", self.version))
                .arg(source_tree.join("dist").as_str()),
            "extract desktop files",
        )?;
        self.reporter.success("Desktop files extracted successfully");

        Ok((binary, source_tree))
    }

    fn podman(&self, invocation: Invocation, step: &str) -> InstallerResult<()> {
        let output = self.runner.run(&invocation)?;
        if output.success {
            Ok(())
        } else {
            Err(InstallerError::ContainerStep {
                step: step.to_owned(),
                output: output.combined(),
            })
        }
    }
}
