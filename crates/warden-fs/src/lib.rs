//! warden-fs: policy-enforced access to filesystem collaborators.
//!
//! [`SafeFs`] wraps any [`FileSystem`] and consults a `warden-core` policy
//! before every call. [`MemoryFs`] is a collaborator with no OS
//! dependencies, useful for tests and sandboxed embedders.

mod error;
mod memory;
mod safe;
mod traits;

pub use error::FsError;
pub use memory::MemoryFs;
pub use safe::SafeFs;
pub use traits::{DirEntry, EntryKind, FileSystem};

pub use warden_core::{AccessDenied, FsOperation, PolicyConfig, SafetyPolicy};
