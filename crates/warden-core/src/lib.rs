//! warden-core: path canonicalization and filesystem authorization rules.
//!
//! This crate is the pure half of warden: it decides whether an operation
//! on a path is permitted by a policy, and what resolved path an approved
//! request should use. It performs no I/O; pairing decisions with an
//! actual filesystem is `warden-fs`'s job.

mod authorize;
mod error;
mod operation;
mod path;
mod policy;

pub use error::AccessDenied;
pub use operation::FsOperation;
pub use path::{canonicalize, CanonicalPath, PathPrefix};
pub use policy::{PolicyConfig, SafetyPolicy, BUILTIN_FORBIDDEN, DEFAULT_MAX_DEPTH};
