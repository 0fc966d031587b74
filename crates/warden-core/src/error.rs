//! Error types for the warden-core crate.

use crate::operation::FsOperation;

/// A typed authorization denial.
///
/// Every rejected request surfaces as one of these before any collaborator
/// I/O happens. Denials are ordinary values, not process failures, so they
/// derive equality for matching in callers and tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// The operation kind is excluded by read-only mode or by the
    /// allowed-operations set.
    #[error("operation not permitted: {operation}")]
    OperationNotPermitted {
        /// The operation the caller requested.
        operation: FsOperation,
    },

    /// The path failed a path rule: it escaped the root, matched a
    /// forbidden prefix, or missed a non-empty allowlist.
    #[error("path not permitted: {path}")]
    PathNotPermitted {
        /// The path exactly as the caller supplied it.
        path: String,
    },

    /// The path resolved to more segments than the policy allows.
    #[error("path too deep: {path} resolves to {depth} segments (limit {max_depth})")]
    PathTooDeep {
        /// The path exactly as the caller supplied it.
        path: String,
        /// Canonical segment count below the resolution root.
        depth: usize,
        /// The configured limit.
        max_depth: usize,
    },
}
