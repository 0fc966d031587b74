//! Filesystem operation kinds and their read-only classification.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A filesystem operation kind, as requested by a caller.
///
/// The policy layer gates on the kind alone; what the operation actually
/// does to storage is the collaborator's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FsOperation {
    /// Read a file's contents.
    ReadFile,
    /// Create or overwrite a file.
    WriteFile,
    /// Check whether a path exists.
    CheckExists,
    /// Delete a single file.
    DeleteFile,
    /// Delete a directory and everything beneath it.
    DeleteDirectory,
    /// Create a directory, including missing parents.
    EnsureDirectory,
    /// List a directory's immediate entries.
    ListDirectory,
    /// Change a path's permission mode.
    ChangeMode,
}

impl FsOperation {
    /// Every operation kind, in declaration order.
    pub const ALL: [FsOperation; 8] = [
        FsOperation::ReadFile,
        FsOperation::WriteFile,
        FsOperation::CheckExists,
        FsOperation::DeleteFile,
        FsOperation::DeleteDirectory,
        FsOperation::EnsureDirectory,
        FsOperation::ListDirectory,
        FsOperation::ChangeMode,
    ];

    /// The subset a read-only policy still permits.
    pub const READ_ONLY: [FsOperation; 3] = [
        FsOperation::ReadFile,
        FsOperation::CheckExists,
        FsOperation::ListDirectory,
    ];

    /// Whether this operation can never modify the filesystem.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            FsOperation::ReadFile | FsOperation::CheckExists | FsOperation::ListDirectory
        )
    }

    /// Stable machine-readable name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            FsOperation::ReadFile => "read-file",
            FsOperation::WriteFile => "write-file",
            FsOperation::CheckExists => "check-exists",
            FsOperation::DeleteFile => "delete-file",
            FsOperation::DeleteDirectory => "delete-directory",
            FsOperation::EnsureDirectory => "ensure-directory",
            FsOperation::ListDirectory => "list-directory",
            FsOperation::ChangeMode => "change-mode",
        }
    }
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
