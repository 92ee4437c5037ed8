//! # bootstrapper-move
//!
//! Moves the agent distribution from the source volume to the target volume.
//!
//! Handles:
//! - **Strategies**: the [`CopyStrategy`] seam with a plain recursive copy
//!   ([`SimpleCopy`]) and a manifest-filtered copy ([`TechnologyCopy`]).
//! - **Atomicity**: the [`Atomic`] decorator, which copies into a work
//!   directory and renames it onto the target.
//! - **Finalisation**: the `agent/bin/current` symlink.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod atomic;
pub mod current;
pub mod simple;
pub mod technology;

use std::fmt;
use std::path::Path;

use bootstrapper_common::config::MoveConfig;
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;

pub use atomic::Atomic;
pub use simple::SimpleCopy;
pub use technology::TechnologyCopy;

/// Copies a directory tree from one location to another.
pub trait CopyStrategy: fmt::Debug {
    /// Copies `from` into `to`.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; `to` may be partially written.
    fn copy(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()>;
}

impl<S: CopyStrategy + ?Sized> CopyStrategy for Box<S> {
    fn copy(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
        (**self).copy(fs, from, to)
    }
}

/// Builds the copy strategy described by `config`.
///
/// A technology filter selects [`TechnologyCopy`], otherwise [`SimpleCopy`]
/// is used. A work directory wraps the result in [`Atomic`].
#[must_use]
pub fn strategy(config: &MoveConfig) -> Box<dyn CopyStrategy> {
    let inner: Box<dyn CopyStrategy> = match config.technology.as_deref() {
        Some(technology) if !technology.is_empty() => {
            Box::new(TechnologyCopy::new(technology))
        }
        _ => Box::new(SimpleCopy),
    };

    match &config.work {
        Some(work) => Box::new(Atomic::new(work.clone(), inner)),
        None => inner,
    }
}

/// Copies `from` to `to` with the configured strategy, then creates the
/// "current version" symlink inside `to`.
///
/// # Errors
///
/// Returns an error if the copy fails or the installer version file is
/// missing from the copied tree.
pub fn execute(fs: &dyn Filesystem, from: &Path, to: &Path, config: &MoveConfig) -> Result<()> {
    let strategy = strategy(config);
    tracing::debug!(strategy = ?strategy, "selected copy strategy");

    strategy.copy(fs, from, to)?;
    current::create_current_symlink(fs, to)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use bootstrapper_fs::MemoryFs;

    use super::*;

    fn source_with_version(fs: &MemoryFs) {
        fs.create_dir_all(Path::new("/source/agent/bin/1.2.3"), 0o755)
            .expect("mkdir");
        fs.write(Path::new("/source/agent/installer.version"), b"1.2.3", 0o644)
            .expect("version");
        fs.write(Path::new("/source/agent/bin/1.2.3/agent"), b"bin", 0o755)
            .expect("binary");
    }

    #[test]
    fn strategy_defaults_to_simple_copy() {
        let strategy = strategy(&MoveConfig::default());
        assert_eq!(format!("{strategy:?}"), "SimpleCopy");
    }

    #[test]
    fn strategy_wraps_technology_copy_in_atomic() {
        let config = MoveConfig {
            work: Some(PathBuf::from("/work")),
            technology: Some("java".into()),
        };
        let debug = format!("{:?}", strategy(&config));
        assert!(debug.starts_with("Atomic"), "{debug}");
        assert!(debug.contains("TechnologyCopy"), "{debug}");
    }

    #[test]
    fn empty_technology_is_a_plain_copy() {
        let config = MoveConfig {
            work: None,
            technology: Some(String::new()),
        };
        assert_eq!(format!("{:?}", strategy(&config)), "SimpleCopy");
    }

    #[test]
    fn execute_copies_whole_tree() {
        let fs = MemoryFs::new();
        source_with_version(&fs);

        execute(&fs, Path::new("/source"), Path::new("/target"), &MoveConfig::default())
            .expect("move");

        assert_eq!(
            fs.read_to_string(Path::new("/target/agent/bin/1.2.3/agent"))
                .expect("read"),
            "bin"
        );
    }

    #[test]
    fn execute_with_work_dir_leaves_no_work_dir() {
        let fs = MemoryFs::new();
        source_with_version(&fs);
        let config = MoveConfig {
            work: Some(PathBuf::from("/work")),
            technology: None,
        };

        execute(&fs, Path::new("/source"), Path::new("/target"), &config).expect("move");

        assert!(!fs.exists(Path::new("/work")).expect("exists"));
        assert!(fs.exists(Path::new("/target/agent/installer.version")).expect("exists"));
    }

    #[test]
    fn execute_fails_without_installer_version() {
        let fs = MemoryFs::new();
        fs.create_dir_all(Path::new("/source/agent"), 0o755)
            .expect("mkdir");

        let err = execute(&fs, Path::new("/source"), Path::new("/target"), &MoveConfig::default())
            .expect_err("version file missing");
        assert!(err.is_not_found());
    }
}
