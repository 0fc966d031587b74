//! The filesystem capability trait and directory entry types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FsError;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// A single entry from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name without any leading path.
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

/// The capability set every filesystem collaborator exposes.
///
/// Implementations own all storage semantics (in-memory, disk, object
/// store); the policy wrapper only decides whether a call may reach them.
/// Paths are `/`-delimited strings, already resolved by the time a wrapped
/// collaborator sees them.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read a file's full contents.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Create or replace a file with the given contents.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FsError>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &str) -> Result<bool, FsError>;

    /// Delete a single file.
    async fn delete_file(&self, path: &str) -> Result<(), FsError>;

    /// Delete a directory and everything beneath it.
    async fn delete_dir(&self, path: &str) -> Result<(), FsError>;

    /// Create a directory, including any missing parents.
    async fn ensure_dir(&self, path: &str) -> Result<(), FsError>;

    /// List a directory's immediate entries.
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Change a path's permission mode.
    async fn chmod(&self, path: &str, mode: u32) -> Result<(), FsError>;
}

#[async_trait]
impl FileSystem for std::sync::Arc<dyn FileSystem> {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        (**self).read_file(path).await
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FsError> {
        (**self).write_file(path, data).await
    }

    async fn exists(&self, path: &str) -> Result<bool, FsError> {
        (**self).exists(path).await
    }

    async fn delete_file(&self, path: &str) -> Result<(), FsError> {
        (**self).delete_file(path).await
    }

    async fn delete_dir(&self, path: &str) -> Result<(), FsError> {
        (**self).delete_dir(path).await
    }

    async fn ensure_dir(&self, path: &str) -> Result<(), FsError> {
        (**self).ensure_dir(path).await
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        (**self).list_dir(path).await
    }

    async fn chmod(&self, path: &str, mode: u32) -> Result<(), FsError> {
        (**self).chmod(path, mode).await
    }
}

// Compile-time check: FileSystem must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn FileSystem) {}
};
