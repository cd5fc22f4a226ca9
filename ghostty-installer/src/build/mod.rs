//! Compiling Ghostty
//!
//! There are two ways to get a binary: [`local`][] builds with a toolchain
//! we set up ourselves, [`container`][] builds inside a podman image. Both
//! end with the same [`InstalledState`][crate::workspace::InstalledState].

pub mod container;
pub mod local;

/// The optimization mode every build uses
pub const OPTIMIZE_FLAG: &str = "-Doptimize=ReleaseFast";
