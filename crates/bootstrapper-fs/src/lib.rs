//! # bootstrapper-fs
//!
//! The filesystem capability shared by the move and configure stages.
//!
//! Handles:
//! - **Filesystem**: the [`Filesystem`] trait, a minimal `std::fs`-shaped API.
//! - **Disk**: [`DiskFs`], backed by the real disk.
//! - **Memory**: [`MemoryFs`], an in-memory tree used by tests.
//! - **Copy**: recursive and single-file copies preserving permission bits.
//! - **File**: create-with-parents and optional-read helpers.
//! - **Symlink**: symlink creation that degrades on unsupported backends.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod copy;
#[cfg(unix)]
pub mod disk;
pub mod file;
pub mod memory;
pub mod symlink;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::Path;

#[cfg(unix)]
pub use disk::DiskFs;
pub use memory::MemoryFs;

/// Permission bits kept in [`Metadata::mode`].
pub const MODE_MASK: u32 = 0o7777;

/// File type and permission bits of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    is_dir: bool,
    mode: u32,
}

impl Metadata {
    /// Creates metadata from its parts. Bits outside [`MODE_MASK`] are dropped.
    #[must_use]
    pub const fn new(is_dir: bool, mode: u32) -> Self {
        Self {
            is_dir,
            mode: mode & MODE_MASK,
        }
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }
}

/// A single entry returned by [`Filesystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    file_name: OsString,
    is_dir: bool,
}

impl DirEntry {
    /// Creates a directory entry.
    #[must_use]
    pub fn new(file_name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            file_name: file_name.into(),
            is_dir,
        }
    }

    /// Returns the bare name of the entry.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Maps paths to bytes, directories, and permission bits.
///
/// Implementors mirror `std::fs` semantics and return raw [`io::Error`]s;
/// callers attach path context. The process is assumed to be the only
/// writer, so no operation takes locks beyond what a backend needs
/// internally.
pub trait Filesystem: fmt::Debug + Send + Sync {
    /// Returns the metadata of `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or cannot be inspected.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Returns whether `path` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match self.metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Reads the whole file at `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Creates or truncates the file at `path` and writes `contents`.
    ///
    /// A newly created file gets exactly `mode`; an existing file keeps its mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the write fails.
    fn write(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;

    /// Like [`write`](Self::write), but a new file's `mode` is filtered
    /// through the process umask.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the write fails.
    fn write_masked(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;

    /// Creates a single directory with exactly `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::AlreadyExists`] if `path` exists, or another
    /// error if the parent is missing.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Creates `path` and all missing ancestors with `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if an ancestor is not a directory or creation fails.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Like [`create_dir_all`](Self::create_dir_all), but new directories
    /// get `mode` filtered through the process umask.
    ///
    /// # Errors
    ///
    /// Returns an error if an ancestor is not a directory or creation fails.
    fn create_dir_all_masked(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Lists the entries of a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a readable directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Removes `path` and everything below it. A missing path is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Renames `from` to `to` in a single step.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` is missing or the rename is not possible.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Creates a symlink at `link` pointing to `original`.
    ///
    /// # Errors
    ///
    /// Backends without symlink support return [`io::ErrorKind::Unsupported`].
    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        let _ = (original, link);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported by this filesystem",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_masks_file_type_bits() {
        let meta = Metadata::new(false, 0o100_644);
        assert_eq!(meta.mode(), 0o644);
        assert!(!meta.is_dir());
    }

    #[test]
    fn default_symlink_is_unsupported() {
        let fs = MemoryFs::new();
        let err = fs
            .symlink(Path::new("1.2.3"), Path::new("/current"))
            .expect_err("memory fs has no symlinks");
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
