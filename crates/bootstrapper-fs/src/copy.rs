//! Recursive and single-file copies.
//!
//! Both helpers preserve the permission bits of what they copy and stop at
//! the first failure, leaving whatever was already copied in place.

use std::path::Path;

use bootstrapper_common::error::{BootstrapperError, Result};

use crate::Filesystem;

/// Copies the directory `from` and everything below it to `to`.
///
/// `to` and any missing ancestors are created with the mode of `from`;
/// nested directories and files keep their own modes.
///
/// # Errors
///
/// Returns [`BootstrapperError::NotADirectory`] if `from` is not a directory,
/// or an I/O error for the first entry that cannot be copied.
pub fn copy_folder(fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
    let from_meta = fs
        .metadata(from)
        .map_err(|e| BootstrapperError::io(from, e))?;
    if !from_meta.is_dir() {
        return Err(BootstrapperError::NotADirectory {
            path: from.to_path_buf(),
        });
    }

    fs.create_dir_all(to, from_meta.mode())
        .map_err(|e| BootstrapperError::io(to, e))?;

    let entries = fs.read_dir(from).map_err(|e| BootstrapperError::io(from, e))?;
    for entry in entries {
        let from_path = from.join(entry.file_name());
        let to_path = to.join(entry.file_name());

        if entry.is_dir() {
            tracing::debug!(
                from = %from_path.display(),
                to = %to_path.display(),
                "copying directory"
            );
            copy_folder(fs, &from_path, &to_path)?;
        } else {
            tracing::debug!(
                from = %from_path.display(),
                to = %to_path.display(),
                "copying file"
            );
            copy_file(fs, &from_path, &to_path)?;
        }
    }

    Ok(())
}

/// Copies a single file, giving a newly created destination the source mode.
///
/// # Errors
///
/// Returns an I/O error if the source cannot be read or the destination
/// cannot be written.
pub fn copy_file(fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
    let meta = fs
        .metadata(from)
        .map_err(|e| BootstrapperError::io(from, e))?;
    let contents = fs.read(from).map_err(|e| BootstrapperError::io(from, e))?;
    fs.write(to, &contents, meta.mode())
        .map_err(|e| BootstrapperError::io(to, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFs;

    fn sample_tree(fs: &MemoryFs) {
        fs.create_dir_all(Path::new("/src/nested/deeper"), 0o750)
            .expect("mkdir");
        fs.write(Path::new("/src/top.txt"), b"top", 0o644)
            .expect("top");
        fs.write(Path::new("/src/nested/exec.sh"), b"#!/bin/sh", 0o755)
            .expect("exec");
        fs.write(Path::new("/src/nested/deeper/leaf"), b"leaf", 0o600)
            .expect("leaf");
    }

    #[test]
    fn copy_folder_copies_nested_tree() {
        let fs = MemoryFs::new();
        sample_tree(&fs);

        copy_folder(&fs, Path::new("/src"), Path::new("/dst")).expect("copy");

        assert_eq!(fs.read_to_string(Path::new("/dst/top.txt")).expect("top"), "top");
        assert_eq!(
            fs.read_to_string(Path::new("/dst/nested/deeper/leaf"))
                .expect("leaf"),
            "leaf"
        );
    }

    #[test]
    fn copy_folder_preserves_modes() {
        let fs = MemoryFs::new();
        sample_tree(&fs);

        copy_folder(&fs, Path::new("/src"), Path::new("/dst")).expect("copy");

        let mode = |p: &str| fs.metadata(Path::new(p)).expect("stat").mode();
        assert_eq!(mode("/dst/nested"), 0o750);
        assert_eq!(mode("/dst/nested/exec.sh"), 0o755);
        assert_eq!(mode("/dst/nested/deeper/leaf"), 0o600);
        assert_eq!(mode("/dst/top.txt"), 0o644);
    }

    #[test]
    fn copy_folder_rejects_file_source() {
        let fs = MemoryFs::new();
        fs.write(Path::new("/file"), b"", 0o644).expect("write");

        let err = copy_folder(&fs, Path::new("/file"), Path::new("/dst"))
            .expect_err("not a dir");
        assert!(matches!(err, BootstrapperError::NotADirectory { .. }));
    }

    #[test]
    fn copy_folder_missing_source_is_not_found() {
        let fs = MemoryFs::new();
        let err = copy_folder(&fs, Path::new("/missing"), Path::new("/dst"))
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn copy_file_uses_source_mode() {
        let fs = MemoryFs::new();
        fs.write(Path::new("/a"), b"content", 0o640).expect("write");

        copy_file(&fs, Path::new("/a"), Path::new("/b")).expect("copy");

        assert_eq!(fs.metadata(Path::new("/b")).expect("stat").mode(), 0o640);
        assert_eq!(fs.read(Path::new("/b")).expect("read"), b"content");
    }
}
