//! Policy configuration and the merged effective policy.
//!
//! [`PolicyConfig`] is the caller-facing surface: every field optional,
//! serde-friendly, defaults merged in later. [`SafetyPolicy`] is what the
//! engine actually consults: defaults applied, the built-in denylist
//! baseline merged, every prefix pre-parsed. Merging happens once at
//! construction and the result never changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::operation::FsOperation;
use crate::path::PathPrefix;

/// Denylist baseline merged into every policy. Caller entries add to this
/// set; nothing removes or overrides it.
pub const BUILTIN_FORBIDDEN: [&str; 7] =
    ["/etc/", "/var/", "/usr/", "/sys/", "/proc/", "/bin/", "/sbin/"];

/// Default cap on path segments below the resolution root.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Caller-supplied policy options.
///
/// Missing fields deserialize to their defaults, so a config written for an
/// older set of options keeps parsing as new ones appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PolicyConfig {
    /// Base directory; relative requests resolve against it when set.
    pub home_path: Option<String>,
    /// Allowed path prefixes, relative to `home_path` when one is set.
    /// Empty means every path is allowed except forbidden ones.
    pub allowed_paths: Vec<String>,
    /// Extra forbidden prefixes, merged on top of [`BUILTIN_FORBIDDEN`].
    pub forbidden_paths: Vec<String>,
    /// Maximum number of path segments below the resolution root.
    pub max_depth: usize,
    /// Operation kinds the caller may request at all.
    pub allowed_operations: Vec<FsOperation>,
    /// Narrow permitted operations to the read-only subset.
    pub read_only: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            home_path: None,
            allowed_paths: Vec::new(),
            forbidden_paths: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            allowed_operations: FsOperation::ALL.to_vec(),
            read_only: false,
        }
    }
}

impl PolicyConfig {
    /// Set the base directory relative requests resolve against.
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home_path = Some(home.into());
        self
    }

    /// Replace the allowlist prefixes.
    pub fn with_allowed_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the caller-side denylist additions.
    pub fn with_forbidden_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forbidden_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the segment depth below the resolution root.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Restrict which operation kinds may be requested at all.
    pub fn with_operations<I>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = FsOperation>,
    {
        self.allowed_operations = operations.into_iter().collect();
        self
    }

    /// Toggle read-only mode.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// The effective policy a wrapper enforces.
///
/// Built once from a [`PolicyConfig`]; immutable afterwards. Accessors
/// expose the fully merged view, including the denylist baseline, so
/// callers can inspect exactly what is being enforced.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    home: Option<PathPrefix>,
    home_path: Option<String>,
    allowed: Vec<PathPrefix>,
    allowed_paths: Vec<String>,
    forbidden: Vec<PathPrefix>,
    forbidden_paths: Vec<String>,
    max_depth: usize,
    allowed_operations: Vec<FsOperation>,
    read_only: bool,
}

impl SafetyPolicy {
    /// Merge caller options over defaults and pre-parse every prefix.
    pub fn new(config: PolicyConfig) -> Self {
        let home = config.home_path.as_deref().map(PathPrefix::parse);
        let allowed = config
            .allowed_paths
            .iter()
            .map(|entry| PathPrefix::parse(entry))
            .collect();
        let mut forbidden_paths: Vec<String> = BUILTIN_FORBIDDEN
            .iter()
            .map(|entry| entry.to_string())
            .collect();
        forbidden_paths.extend(config.forbidden_paths);
        let forbidden = forbidden_paths
            .iter()
            .map(|entry| PathPrefix::parse(entry))
            .collect();
        Self {
            home,
            home_path: config.home_path,
            allowed,
            allowed_paths: config.allowed_paths,
            forbidden,
            forbidden_paths,
            max_depth: config.max_depth,
            allowed_operations: config.allowed_operations,
            read_only: config.read_only,
        }
    }

    /// The configured base directory, if any.
    pub fn home_path(&self) -> Option<&str> {
        self.home_path.as_deref()
    }

    /// Allowlist prefixes; empty means all paths except forbidden ones.
    pub fn allowed_paths(&self) -> &[String] {
        &self.allowed_paths
    }

    /// The effective denylist: the built-in baseline followed by caller
    /// entries.
    pub fn forbidden_paths(&self) -> &[String] {
        &self.forbidden_paths
    }

    /// Maximum segment count below the resolution root.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Operation kinds the caller may request, before read-only narrowing.
    pub fn allowed_operations(&self) -> &[FsOperation] {
        &self.allowed_operations
    }

    /// Whether read-only mode narrows the permitted operations.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn home(&self) -> Option<&PathPrefix> {
        self.home.as_ref()
    }

    pub(crate) fn allowed(&self) -> &[PathPrefix] {
        &self.allowed
    }

    pub(crate) fn forbidden(&self) -> &[PathPrefix] {
        &self.forbidden
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl From<PolicyConfig> for SafetyPolicy {
    fn from(config: PolicyConfig) -> Self {
        Self::new(config)
    }
}
