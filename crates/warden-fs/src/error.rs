//! Error types for the warden-fs crate.

use warden_core::AccessDenied;

/// Errors surfaced by filesystem collaborators and the policy wrapper.
///
/// `Denied` is the wrapper's own contribution; every other variant comes
/// from a collaborator and passes through the wrapper untouched.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Request refused by the safety policy before any I/O.
    #[error("permission denied: {0}")]
    Denied(#[from] AccessDenied),

    /// Path does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Path already occupied by something incompatible
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Directory operation on a non-directory path
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// File operation on a directory path
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// I/O failure from a disk-backed collaborator
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Collaborator-specific failure that fits no other variant
    #[error("backend error: {0}")]
    Backend(String),
}

impl FsError {
    /// The policy denial behind this error, when there is one.
    pub fn denial(&self) -> Option<&AccessDenied> {
        match self {
            FsError::Denied(denial) => Some(denial),
            _ => None,
        }
    }
}
