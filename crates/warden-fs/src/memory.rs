//! In-memory filesystem collaborator.
//!
//! Backs the test suites and gives embedders a [`FileSystem`] with no OS
//! dependencies. Semantics are object-store flavored: writing a file
//! creates its parent directories implicitly, and the relative root (`.`)
//! and absolute root (`/`) always exist.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::FsError;
use crate::traits::{DirEntry, EntryKind, FileSystem};

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    modes: BTreeMap<String, u32>,
}

/// A [`FileSystem`] backed by in-process maps.
///
/// Interior mutability via a synchronous lock; guards are never held
/// across an await point.
#[derive(Debug, Default)]
pub struct MemoryFs {
    tree: RwLock<Tree>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded mode for `path`, or the default for its kind.
    /// `None` when the path does not exist.
    pub fn mode(&self, path: &str) -> Option<u32> {
        let key = normalize(path);
        let tree = self.tree.read().ok()?;
        if let Some(mode) = tree.modes.get(&key) {
            return Some(*mode);
        }
        if tree.files.contains_key(&key) {
            Some(FILE_MODE)
        } else if is_root(&key) || tree.dirs.contains(&key) {
            Some(DIR_MODE)
        } else {
            None
        }
    }

    fn read_tree(&self) -> Result<RwLockReadGuard<'_, Tree>, FsError> {
        self.tree
            .read()
            .map_err(|_| FsError::Backend("memory fs lock poisoned".to_string()))
    }

    fn write_tree(&self) -> Result<RwLockWriteGuard<'_, Tree>, FsError> {
        self.tree
            .write()
            .map_err(|_| FsError::Backend("memory fs lock poisoned".to_string()))
    }
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let key = normalize(path);
        let tree = self.read_tree()?;
        if is_root(&key) || tree.dirs.contains(&key) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        tree.files
            .get(&key)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.write_tree()?;
        if is_root(&key) || tree.dirs.contains(&key) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        add_parents(&mut tree, &key, path)?;
        tree.files.insert(key, data.to_vec());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, FsError> {
        let key = normalize(path);
        let tree = self.read_tree()?;
        Ok(is_root(&key) || tree.files.contains_key(&key) || tree.dirs.contains(&key))
    }

    async fn delete_file(&self, path: &str) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.write_tree()?;
        if is_root(&key) || tree.dirs.contains(&key) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        tree.files
            .remove(&key)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        tree.modes.remove(&key);
        Ok(())
    }

    async fn delete_dir(&self, path: &str) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.write_tree()?;
        if tree.files.contains_key(&key) {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        if !is_root(&key) && !tree.dirs.contains(&key) {
            return Err(FsError::NotFound(path.to_string()));
        }
        let absolute = key.starts_with('/');
        let prefix = format!("{key}/");
        let keep = |candidate: &str| {
            if is_root(&key) {
                // Clearing a root empties its whole anchor class.
                candidate.starts_with('/') != absolute
            } else {
                candidate != key && !candidate.starts_with(&prefix)
            }
        };
        tree.files.retain(|k, _| keep(k));
        tree.dirs.retain(|k| keep(k));
        tree.modes.retain(|k, _| keep(k));
        Ok(())
    }

    async fn ensure_dir(&self, path: &str) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.write_tree()?;
        if tree.files.contains_key(&key) {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        if !is_root(&key) {
            add_parents(&mut tree, &key, path)?;
            tree.dirs.insert(key);
        }
        Ok(())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let key = normalize(path);
        let tree = self.read_tree()?;
        if tree.files.contains_key(&key) {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        if !is_root(&key) && !tree.dirs.contains(&key) {
            return Err(FsError::NotFound(path.to_string()));
        }
        let mut entries: Vec<DirEntry> = Vec::new();
        for dir in tree.dirs.iter().filter(|k| parent(k) == key) {
            entries.push(DirEntry {
                name: basename(dir).to_string(),
                kind: EntryKind::Directory,
            });
        }
        for file in tree.files.keys().filter(|k| parent(k) == key) {
            entries.push(DirEntry {
                name: basename(file).to_string(),
                kind: EntryKind::File,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn chmod(&self, path: &str, mode: u32) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.write_tree()?;
        if !is_root(&key) && !tree.files.contains_key(&key) && !tree.dirs.contains(&key) {
            return Err(FsError::NotFound(path.to_string()));
        }
        tree.modes.insert(key, mode);
        Ok(())
    }
}

/// Collapse the spellings of the two roots and drop trailing slashes so
/// direct callers and the wrapper address the same keys.
fn normalize(path: &str) -> String {
    let is_absolute = path.starts_with('/');
    let trimmed = path.strip_prefix("./").unwrap_or(path).trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        return if is_absolute {
            "/".to_string()
        } else {
            String::new()
        };
    }
    trimmed.to_string()
}

/// The relative root is the empty key, the absolute root is `/`.
fn is_root(key: &str) -> bool {
    key.is_empty() || key == "/"
}

fn parent(key: &str) -> String {
    match key.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => key[..idx].to_string(),
        None => String::new(),
    }
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Record every missing ancestor of `key` as a directory, refusing if one
/// of them is already a file.
fn add_parents(tree: &mut Tree, key: &str, original: &str) -> Result<(), FsError> {
    let mut current = parent(key);
    while !is_root(&current) {
        if tree.files.contains_key(&current) {
            return Err(FsError::NotADirectory(original.to_string()));
        }
        if !tree.dirs.insert(current.clone()) {
            // Ancestors of an existing directory are directories already.
            break;
        }
        current = parent(&current);
    }
    Ok(())
}
