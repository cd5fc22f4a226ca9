//! Running external tools (minisign, zig, podman)
//!
//! Pipelines describe what they want run as an [`Invocation`][] and hand it to a
//! [`ToolRunner`][]. The real runner is a thin layer over [`axoprocess::Cmd`][];
//! tests substitute a scripted one.

use std::fmt;

use axoprocess::Cmd;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::errors::InstallerResult;

/// A command we want to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program (a name to look up on PATH, or a path)
    pub program: String,
    /// Its arguments
    pub args: Vec<String>,
    /// Directory to run it in (inherits ours if None)
    pub current_dir: Option<Utf8PathBuf>,
    /// Extra environment variables
    pub envs: Vec<(String, String)>,
    /// What we'd tell the user this was trying to do
    pub summary: String,
}

impl Invocation {
    /// Start describing a command
    pub fn new(program: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            current_dir: None,
            envs: vec![],
            summary: summary.into(),
        }
    }

    /// Add an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run in this directory
    pub fn current_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }

    /// The first argument, which is usually the subcommand
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished command left behind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// The exit code (None if killed by a signal)
    pub status: Option<i32>,
    /// Whether it exited successfully
    pub success: bool,
    /// Captured stdout, lossily decoded
    pub stdout: String,
    /// Captured stderr, lossily decoded
    pub stderr: String,
}

impl ToolOutput {
    /// stdout and stderr glued together for error messages
    pub fn combined(&self) -> String {
        let mut out = String::new();
        if !self.stdout.trim().is_empty() {
            out.push_str(self.stdout.trim_end());
        }
        if !self.stderr.trim().is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(self.stderr.trim_end());
        }
        out
    }
}

/// Something that can run an [`Invocation`][]
pub trait ToolRunner {
    /// Run the command to completion, capturing its output
    ///
    /// A non-zero exit is NOT an error here; only failing to launch is.
    /// Callers decide what a failed status means.
    fn run(&self, invocation: &Invocation) -> InstallerResult<ToolOutput>;

    /// Whether a tool is installed and runnable (`<program> <arg>` exits 0)
    fn probe(&self, program: &str, arg: &str) -> bool {
        let invocation = Invocation::new(program, format!("check {program} is installed")).arg(arg);
        match self.run(&invocation) {
            Ok(output) => output.success,
            Err(e) => {
                debug!("{program} isn't runnable: {e}");
                false
            }
        }
    }
}

/// Runs commands for real
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> InstallerResult<ToolOutput> {
        let mut cmd = Cmd::new(&invocation.program, invocation.summary.clone());
        for arg in &invocation.args {
            cmd.arg(arg);
        }
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }
        cmd.envs(invocation.envs.iter().map(|(k, v)| (k, v)));
        cmd.check(false);

        let output = cmd.output()?;
        Ok(ToolOutput {
            status: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
