//! In-memory backend.
//!
//! Paths are normalised lexically and relative paths are anchored at `/`,
//! so `./folder` and `/folder` name the same node. Symlinks are not
//! supported. Masked operations use a fixed umask, [`DEFAULT_UMASK`] unless
//! set with [`MemoryFs::with_umask`].

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{DirEntry, Filesystem, MODE_MASK, Metadata};

const ROOT_MODE: u32 = 0o755;

/// Umask applied by the masked operations of a new [`MemoryFs`].
pub const DEFAULT_UMASK: u32 = 0o022;

#[derive(Debug, Clone)]
enum Node {
    Dir { mode: u32 },
    File { mode: u32, data: Vec<u8> },
}

impl Node {
    const fn metadata(&self) -> Metadata {
        match self {
            Self::Dir { mode } => Metadata::new(true, *mode),
            Self::File { mode, .. } => Metadata::new(false, *mode),
        }
    }
}

type Nodes = BTreeMap<PathBuf, Node>;

/// [`Filesystem`] kept entirely in memory.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: Mutex<Nodes>,
    umask: u32,
}

impl MemoryFs {
    /// Creates an empty filesystem containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_umask(DEFAULT_UMASK)
    }

    /// Creates an empty filesystem whose masked operations clear `umask`.
    #[must_use]
    pub fn with_umask(umask: u32) -> Self {
        let mut nodes = Nodes::new();
        let _ = nodes.insert(PathBuf::from("/"), Node::Dir { mode: ROOT_MODE });
        Self {
            nodes: Mutex::new(nodes),
            umask: umask & MODE_MASK,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Nodes> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                let _ = normalized.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    normalized
}

fn error(kind: io::ErrorKind, path: &Path, reason: &str) -> io::Error {
    io::Error::new(kind, format!("{}: {reason}", path.display()))
}

fn not_found(path: &Path) -> io::Error {
    error(io::ErrorKind::NotFound, path, "no such file or directory")
}

fn not_a_directory(path: &Path) -> io::Error {
    error(io::ErrorKind::NotADirectory, path, "not a directory")
}

fn require_parent_dir(nodes: &Nodes, path: &Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    match nodes.get(parent) {
        Some(Node::Dir { .. }) => Ok(()),
        Some(Node::File { .. }) => Err(not_a_directory(parent)),
        None => Err(not_found(parent)),
    }
}

fn has_children(nodes: &Nodes, path: &Path) -> bool {
    nodes.keys().any(|key| key.parent() == Some(path))
}

impl Filesystem for MemoryFs {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let path = normalize(path);
        self.lock()
            .get(&path)
            .map(Node::metadata)
            .ok_or_else(|| not_found(&path))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = normalize(path);
        match self.lock().get(&path) {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Dir { .. }) => Err(error(
                io::ErrorKind::IsADirectory,
                &path,
                "is a directory",
            )),
            None => Err(not_found(&path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        let mode = match nodes.get(&path) {
            Some(Node::Dir { .. }) => {
                return Err(error(io::ErrorKind::IsADirectory, &path, "is a directory"));
            }
            Some(Node::File { mode, .. }) => *mode,
            None => {
                require_parent_dir(&nodes, &path)?;
                mode & MODE_MASK
            }
        };
        let _ = nodes.insert(
            path,
            Node::File {
                mode,
                data: contents.to_vec(),
            },
        );
        Ok(())
    }

    fn write_masked(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        self.write(path, contents, mode & !self.umask)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        if nodes.contains_key(&path) {
            return Err(error(io::ErrorKind::AlreadyExists, &path, "file exists"));
        }
        require_parent_dir(&nodes, &path)?;
        let _ = nodes.insert(
            path,
            Node::Dir {
                mode: mode & MODE_MASK,
            },
        );
        Ok(())
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        let ancestors: Vec<PathBuf> = path.ancestors().map(Path::to_path_buf).collect();
        for ancestor in ancestors.into_iter().rev() {
            match nodes.get(&ancestor) {
                Some(Node::Dir { .. }) => {}
                Some(Node::File { .. }) => return Err(not_a_directory(&ancestor)),
                None => {
                    let _ = nodes.insert(
                        ancestor,
                        Node::Dir {
                            mode: mode & MODE_MASK,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn create_dir_all_masked(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.create_dir_all(path, mode & !self.umask)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path = normalize(path);
        let nodes = self.lock();
        match nodes.get(&path) {
            Some(Node::Dir { .. }) => {}
            Some(Node::File { .. }) => return Err(not_a_directory(&path)),
            None => return Err(not_found(&path)),
        }
        Ok(nodes
            .iter()
            .filter(|(key, _)| key.parent() == Some(path.as_path()))
            .filter_map(|(key, node)| {
                key.file_name()
                    .map(|name| DirEntry::new(name, node.metadata().is_dir()))
            })
            .collect())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        nodes.retain(|key, _| !key.starts_with(&path));
        if nodes.is_empty() {
            let _ = nodes.insert(PathBuf::from("/"), Node::Dir { mode: ROOT_MODE });
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = normalize(from);
        let to = normalize(to);
        let mut nodes = self.lock();

        let source_is_dir = match nodes.get(&from) {
            Some(node) => node.metadata().is_dir(),
            None => return Err(not_found(&from)),
        };
        if from == to {
            return Ok(());
        }
        if to.starts_with(&from) {
            return Err(error(
                io::ErrorKind::InvalidInput,
                &to,
                "cannot move a directory into itself",
            ));
        }
        require_parent_dir(&nodes, &to)?;

        if let Some(existing) = nodes.get(&to) {
            match (source_is_dir, existing.metadata().is_dir()) {
                (true, true) if has_children(&nodes, &to) => {
                    return Err(error(
                        io::ErrorKind::DirectoryNotEmpty,
                        &to,
                        "directory not empty",
                    ));
                }
                (true, false) => return Err(not_a_directory(&to)),
                (false, true) => {
                    return Err(error(io::ErrorKind::IsADirectory, &to, "is a directory"));
                }
                _ => {
                    let _ = nodes.remove(&to);
                }
            }
        }

        let moved: Vec<PathBuf> = nodes
            .keys()
            .filter(|key| key.starts_with(&from))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = nodes.remove(&key) {
                let relative = key.strip_prefix(&from).unwrap_or(Path::new(""));
                let destination = if relative.as_os_str().is_empty() {
                    to.clone()
                } else {
                    to.join(relative)
                };
                let _ = nodes.insert(destination, node);
            }
        }
        Ok(())
    }
}
