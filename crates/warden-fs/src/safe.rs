//! Policy-enforcing wrapper over a filesystem collaborator.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use warden_core::{FsOperation, PolicyConfig, SafetyPolicy};

use crate::error::FsError;
use crate::traits::{DirEntry, FileSystem};

/// Wraps any [`FileSystem`] and checks every call against a
/// [`SafetyPolicy`] before delegating.
///
/// Checks run strictly before collaborator I/O: a denied call never
/// reaches the inner filesystem. An approved call is forwarded with the
/// resolved path, so the collaborator never sees `..`, `.`, or a path
/// outside the configured home. The wrapper holds no per-call state;
/// clones share the collaborator and policy and may be used concurrently.
///
/// `SafeFs` implements [`FileSystem`] itself, so wrapped and unwrapped
/// filesystems are interchangeable at the call site.
pub struct SafeFs<F: FileSystem + ?Sized> {
    inner: Arc<F>,
    policy: Arc<SafetyPolicy>,
}

impl<F: FileSystem + ?Sized> SafeFs<F> {
    /// Wrap `inner`, merging `config` over the policy defaults.
    pub fn new(inner: Arc<F>, config: PolicyConfig) -> Self {
        Self {
            inner,
            policy: Arc::new(SafetyPolicy::new(config)),
        }
    }

    /// Wrap `inner` with an already-merged policy.
    pub fn with_policy(inner: Arc<F>, policy: SafetyPolicy) -> Self {
        Self {
            inner,
            policy: Arc::new(policy),
        }
    }

    /// The fully merged effective policy, defaults and baseline included.
    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    /// The wrapped collaborator.
    pub fn inner(&self) -> &Arc<F> {
        &self.inner
    }

    /// Whether the operation gate would pass `operation`.
    pub fn is_operation_allowed(&self, operation: FsOperation) -> bool {
        self.policy.is_operation_allowed(operation)
    }

    /// Whether the path rules would pass `path`.
    pub fn is_path_allowed(&self, path: &str) -> bool {
        self.policy.is_path_allowed(path)
    }

    /// Authorize one call, logging denials, and hand back the resolved
    /// path the collaborator should receive.
    fn check(&self, operation: FsOperation, path: &str) -> Result<String, FsError> {
        match self.policy.authorize(operation, path) {
            Ok(resolved) => Ok(resolved),
            Err(denial) => {
                tracing::debug!(
                    path = %path,
                    operation = %operation,
                    reason = %denial,
                    "policy denied access"
                );
                Err(FsError::Denied(denial))
            }
        }
    }
}

impl<F: FileSystem + ?Sized> Clone for SafeFs<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<F: FileSystem + ?Sized> fmt::Debug for SafeFs<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeFs")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F: FileSystem + ?Sized + 'static> FileSystem for SafeFs<F> {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let resolved = self.check(FsOperation::ReadFile, path)?;
        self.inner.read_file(&resolved).await
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let resolved = self.check(FsOperation::WriteFile, path)?;
        self.inner.write_file(&resolved, data).await
    }

    async fn exists(&self, path: &str) -> Result<bool, FsError> {
        let resolved = self.check(FsOperation::CheckExists, path)?;
        self.inner.exists(&resolved).await
    }

    async fn delete_file(&self, path: &str) -> Result<(), FsError> {
        let resolved = self.check(FsOperation::DeleteFile, path)?;
        self.inner.delete_file(&resolved).await
    }

    async fn delete_dir(&self, path: &str) -> Result<(), FsError> {
        let resolved = self.check(FsOperation::DeleteDirectory, path)?;
        self.inner.delete_dir(&resolved).await
    }

    async fn ensure_dir(&self, path: &str) -> Result<(), FsError> {
        let resolved = self.check(FsOperation::EnsureDirectory, path)?;
        self.inner.ensure_dir(&resolved).await
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let resolved = self.check(FsOperation::ListDirectory, path)?;
        self.inner.list_dir(&resolved).await
    }

    async fn chmod(&self, path: &str, mode: u32) -> Result<(), FsError> {
        let resolved = self.check(FsOperation::ChangeMode, path)?;
        self.inner.chmod(&resolved, mode).await
    }
}
