//! Authorization rule evaluation.
//!
//! Rules run in a fixed order: operation gate, canonicalization, traversal
//! check, denylist, allowlist, depth. The first failing rule names the
//! denial; a request is allowed only when every rule passes. Decisions are
//! pure functions of `(operation, path, policy)` and perform no I/O.

use crate::error::AccessDenied;
use crate::operation::FsOperation;
use crate::path::{canonicalize, CanonicalPath};
use crate::policy::SafetyPolicy;

impl SafetyPolicy {
    /// Whether the operation gate alone would pass `operation`.
    ///
    /// Read-only mode narrows first, then the allowed-operations set: an
    /// operation listed there is still refused when read-only is on and
    /// the operation can modify the filesystem.
    pub fn is_operation_allowed(&self, operation: FsOperation) -> bool {
        if self.read_only() && !operation.is_read_only() {
            return false;
        }
        self.allowed_operations().contains(&operation)
    }

    /// Whether the path rules alone would pass `raw`, discarding the
    /// denial reason. Useful for capability probing before attempting an
    /// operation.
    pub fn is_path_allowed(&self, raw: &str) -> bool {
        self.check_path(raw).is_ok()
    }

    /// Authorize `operation` on `raw`.
    ///
    /// On success returns the resolved path the filesystem collaborator
    /// should receive: canonical segments joined back together, prefixed
    /// with the home directory when one is configured.
    pub fn authorize(&self, operation: FsOperation, raw: &str) -> Result<String, AccessDenied> {
        if !self.is_operation_allowed(operation) {
            return Err(AccessDenied::OperationNotPermitted { operation });
        }
        let path = self.check_path(raw)?;
        Ok(path.resolved())
    }

    fn check_path(&self, raw: &str) -> Result<CanonicalPath, AccessDenied> {
        let deny = || AccessDenied::PathNotPermitted {
            path: raw.to_string(),
        };

        // NUL truncates paths in plenty of collaborators; refuse it outright.
        if raw.contains('\0') {
            return Err(deny());
        }

        let path = canonicalize(raw, self.home());

        // Upward traversal. With a home root an escape is always fatal.
        // Without one the clamped form is still screened by a non-empty
        // allowlist, so only the unconstrained case rejects here.
        if path.out_of_root() {
            return Err(deny());
        }
        if path.escapes() > 0 && self.allowed().is_empty() {
            return Err(deny());
        }

        // Denylist before allowlist: a path matching both is denied. The
        // literal spelling counts too, so an input that walks through a
        // forbidden directory and back out is still refused.
        if self
            .forbidden()
            .iter()
            .any(|prefix| prefix.matches(&path) || prefix.matches_literal(&path))
        {
            return Err(deny());
        }

        if !self.allowed().is_empty() && !self.allowed().iter().any(|prefix| prefix.matches(&path))
        {
            return Err(deny());
        }

        match path.depth() {
            Some(depth) if depth > self.max_depth() => Err(AccessDenied::PathTooDeep {
                path: raw.to_string(),
                depth,
                max_depth: self.max_depth(),
            }),
            Some(_) => Ok(path),
            // Out-of-root paths were rejected above; a depthless path here
            // cannot happen, so fail closed rather than wave it through.
            None => Err(deny()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyConfig;

    fn policy(config: PolicyConfig) -> SafetyPolicy {
        SafetyPolicy::new(config)
    }

    #[test]
    fn read_only_narrows_even_explicitly_allowed_operations() {
        let policy = policy(
            PolicyConfig::default()
                .with_operations(FsOperation::ALL)
                .read_only(true),
        );
        assert!(policy.is_operation_allowed(FsOperation::ReadFile));
        assert!(policy.is_operation_allowed(FsOperation::CheckExists));
        assert!(policy.is_operation_allowed(FsOperation::ListDirectory));
        assert!(!policy.is_operation_allowed(FsOperation::WriteFile));
        assert!(!policy.is_operation_allowed(FsOperation::DeleteFile));
        assert!(!policy.is_operation_allowed(FsOperation::ChangeMode));
    }

    #[test]
    fn operation_gate_runs_before_any_path_rule() {
        let policy = policy(PolicyConfig::default().with_operations([FsOperation::ReadFile]));
        // The path would be denied too, but the operation gate speaks first.
        let err = policy
            .authorize(FsOperation::WriteFile, "/etc/passwd")
            .unwrap_err();
        assert_eq!(
            err,
            AccessDenied::OperationNotPermitted {
                operation: FsOperation::WriteFile
            }
        );
    }

    #[test]
    fn empty_allowlist_permits_everything_not_forbidden() {
        let policy = policy(PolicyConfig::default());
        assert!(policy.is_path_allowed("/tmp/scratch.txt"));
        assert!(policy.is_path_allowed("./workspace/file.txt"));
        assert!(!policy.is_path_allowed("/etc/passwd"));
    }

    #[test]
    fn baseline_matches_whole_segments_only() {
        let policy = policy(PolicyConfig::default());
        assert!(!policy.is_path_allowed("/etc/passwd"));
        assert!(policy.is_path_allowed("/etcetera/passwd"));
        assert!(!policy.is_path_allowed("/var/log/syslog"));
        assert!(policy.is_path_allowed("/variant/log"));
    }

    #[test]
    fn denylist_wins_over_allowlist() {
        let policy = policy(
            PolicyConfig::default()
                .with_allowed_paths(["./workspace/"])
                .with_forbidden_paths(["./workspace/secret/"]),
        );
        assert!(policy.is_path_allowed("workspace/notes.txt"));
        assert!(!policy.is_path_allowed("workspace/secret/key.pem"));
    }

    #[test]
    fn traversal_without_allowlist_is_denied() {
        let policy = policy(PolicyConfig::default());
        let err = policy
            .authorize(FsOperation::ReadFile, "../../../etc/passwd")
            .unwrap_err();
        assert_eq!(
            err,
            AccessDenied::PathNotPermitted {
                path: "../../../etc/passwd".to_string()
            }
        );
    }

    #[test]
    fn traversal_out_of_the_allowlist_is_denied() {
        let policy = policy(PolicyConfig::default().with_allowed_paths(["./workspace/"]));
        assert!(!policy.is_path_allowed("./workspace/../../secret"));
    }

    #[test]
    fn clamped_traversal_back_into_the_allowlist_is_permitted() {
        // Without a home the implicit root clamps `..`, so this resolves to
        // workspace/f and the allowlist decides from there.
        let policy = policy(PolicyConfig::default().with_allowed_paths(["./workspace/"]));
        assert!(policy.is_path_allowed("../workspace/f"));
    }

    #[test]
    fn relative_allowlist_does_not_admit_absolute_requests() {
        let policy = policy(PolicyConfig::default().with_allowed_paths(["./workspace/"]));
        assert!(policy.is_path_allowed("workspace/f"));
        assert!(!policy.is_path_allowed("/workspace/f"));
    }

    #[test]
    fn absolute_allowlist_entries_admit_absolute_requests() {
        let policy = policy(PolicyConfig::default().with_allowed_paths(["/srv/public/"]));
        assert!(policy.is_path_allowed("/srv/public/doc.txt"));
        assert!(!policy.is_path_allowed("/srv/private/doc.txt"));
    }

    #[test]
    fn home_escape_is_denied_even_with_an_allowlist() {
        let policy = policy(
            PolicyConfig::default()
                .with_home("/srv/data")
                .with_allowed_paths(["./reports/"]),
        );
        assert!(policy.is_path_allowed("reports/q1.txt"));
        assert!(!policy.is_path_allowed("../reports/q1.txt"));
        assert!(!policy.is_path_allowed("../../etc/passwd"));
    }

    #[test]
    fn dip_and_return_under_a_home_is_permitted() {
        let policy = policy(PolicyConfig::default().with_home("/srv/data"));
        assert!(policy.is_path_allowed("../data/x"));
        assert_eq!(
            policy.authorize(FsOperation::ReadFile, "../data/x").unwrap(),
            "/srv/data/x"
        );
        // A dip that resolves into a sibling stays out of root.
        assert!(!policy.is_path_allowed("../other/x"));
    }

    #[test]
    fn authorize_resolves_relative_requests_under_the_home() {
        let policy = policy(PolicyConfig::default().with_home("/srv/data"));
        let resolved = policy
            .authorize(FsOperation::ReadFile, "reports/q1.txt")
            .unwrap();
        assert_eq!(resolved, "/srv/data/reports/q1.txt");
    }

    #[test]
    fn authorize_strips_stylistic_dot_prefixes() {
        let policy = policy(PolicyConfig::default());
        let resolved = policy
            .authorize(FsOperation::ReadFile, "./workspace/file.txt")
            .unwrap();
        assert_eq!(resolved, "workspace/file.txt");
    }

    #[test]
    fn equivalent_spellings_get_equal_decisions() {
        let policies = [
            policy(PolicyConfig::default()),
            policy(PolicyConfig::default().with_allowed_paths(["./a/"])),
            policy(PolicyConfig::default().with_forbidden_paths(["./a/"])),
            policy(PolicyConfig::default().with_max_depth(1)),
        ];
        for policy in &policies {
            let cleaned = policy.authorize(FsOperation::ReadFile, "./a/file");
            let spelled = policy.authorize(FsOperation::ReadFile, "./a/../a/file");
            match (cleaned, spelled) {
                (Ok(left), Ok(right)) => assert_eq!(left, right),
                // Denials echo the caller's spelling, so compare kinds.
                (Err(left), Err(right)) => assert_eq!(
                    std::mem::discriminant(&left),
                    std::mem::discriminant(&right)
                ),
                (left, right) => panic!("decisions diverged: {left:?} vs {right:?}"),
            }
        }
    }

    #[test]
    fn literal_walk_through_a_forbidden_directory_is_denied() {
        let policy = policy(PolicyConfig::default().with_forbidden_paths(["./tools/"]));
        assert!(policy.is_path_allowed("free/f"));
        assert!(!policy.is_path_allowed("tools/../free/f"));
    }

    #[test]
    fn depth_boundary_is_exact() {
        let policy = policy(PolicyConfig::default().with_max_depth(3));
        assert!(policy.is_path_allowed("a/b/c"));
        let err = policy
            .authorize(FsOperation::ReadFile, "a/b/c/d")
            .unwrap_err();
        assert_eq!(
            err,
            AccessDenied::PathTooDeep {
                path: "a/b/c/d".to_string(),
                depth: 4,
                max_depth: 3
            }
        );
    }

    #[test]
    fn traversal_does_not_inflate_depth() {
        let policy = policy(PolicyConfig::default().with_max_depth(2));
        // Five literal segments, two canonical ones.
        assert!(policy.is_path_allowed("a/b/../../a/b"));
    }

    #[test]
    fn absolute_depth_counts_from_the_filesystem_root() {
        let policy = policy(PolicyConfig::default().with_max_depth(2));
        assert!(policy.is_path_allowed("/tmp/x"));
        assert!(!policy.is_path_allowed("/tmp/x/y"));
    }

    #[test]
    fn home_relative_depth_ignores_the_home_segments() {
        let policy = policy(
            PolicyConfig::default()
                .with_home("/srv/very/deeply/nested/agent/home")
                .with_max_depth(2),
        );
        assert!(policy.is_path_allowed("a/b"));
        assert!(!policy.is_path_allowed("a/b/c"));
    }

    #[test]
    fn nul_bytes_are_denied() {
        let policy = policy(PolicyConfig::default());
        assert!(!policy.is_path_allowed("work\0space/file.txt"));
    }

    #[test]
    fn empty_path_is_the_resolution_root() {
        let open = policy(PolicyConfig::default());
        assert!(open.is_path_allowed(""));
        assert_eq!(open.authorize(FsOperation::ListDirectory, "").unwrap(), ".");

        // A non-empty allowlist closes over the bare root.
        let closed = policy(PolicyConfig::default().with_allowed_paths(["./workspace/"]));
        assert!(!closed.is_path_allowed(""));
    }

    #[test]
    fn home_inside_a_forbidden_prefix_denies_everything_relative() {
        // The baseline wins even when the home itself lives under it.
        let policy = policy(PolicyConfig::default().with_home("/var/app"));
        assert!(!policy.is_path_allowed("data.txt"));
    }

    #[test]
    fn baseline_is_matched_against_absolute_requests_under_a_home() {
        let policy = policy(PolicyConfig::default().with_home("/srv/data"));
        assert!(!policy.is_path_allowed("/etc/passwd"));
        assert!(policy.is_path_allowed("notes.txt"));
    }
}
