//! Lexical path canonicalization and segment-prefix matching.
//!
//! Everything in this module is pure string work over `/`-delimited
//! segments: empty and `.` segments are dropped, `..` pops the last
//! retained segment, and nothing ever touches the OS. Symlinks and other
//! on-disk semantics belong to the filesystem collaborator, not here.

use std::fmt;

/// A configured path prefix (allowlist, denylist, or home entry),
/// pre-parsed into comparable segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    segments: Vec<String>,
    is_absolute: bool,
}

impl PathPrefix {
    /// Parse a configuration entry such as `"./workspace/"` or `"/etc/"`.
    ///
    /// Entries are canonicalized the same way request paths are, so
    /// `"./a/../b/"` configures the same prefix as `"./b/"`. A leading `/`
    /// anchors the prefix at the filesystem root; anything else is
    /// relative to the resolution root.
    pub fn parse(entry: &str) -> Self {
        let is_absolute = entry.starts_with('/');
        let mut segments: Vec<String> = Vec::new();
        for seg in entry.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(seg.to_string()),
            }
        }
        Self {
            segments,
            is_absolute,
        }
    }

    /// Whether this prefix is anchored at the filesystem root.
    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    /// The prefix's canonical segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment-wise prefix match against the canonical views of `path`.
    ///
    /// Absolute entries compare against the absolute view, relative entries
    /// against the root-relative view. Matching is per whole segment, never
    /// per character: `/etc/` matches `/etc/passwd` but not
    /// `/etcetera/passwd`.
    pub fn matches(&self, path: &CanonicalPath) -> bool {
        let view = if self.is_absolute {
            path.absolute_view()
        } else {
            path.relative_view()
        };
        view.is_some_and(|segments| segments.starts_with(&self.segments))
    }

    /// Like [`PathPrefix::matches`], but against the literal spelling of
    /// the request with `..` segments retained. Catches inputs that walk
    /// through this prefix before climbing back out of it.
    pub fn matches_literal(&self, path: &CanonicalPath) -> bool {
        let view = if self.is_absolute {
            path.literal_absolute_view()
        } else {
            path.literal_relative_view()
        };
        view.is_some_and(|segments| segments.starts_with(&self.segments))
    }
}

/// A caller-supplied path reduced to comparable segment views.
///
/// Produced by [`canonicalize`], which never fails: traversal is resolved
/// or flagged here, and rejected later by the authorization rules.
/// Equality compares the resolved views only, so `./a/../a/file` equals
/// `./a/file`; the original spelling is kept for display and diagnostics.
#[derive(Debug, Clone)]
pub struct CanonicalPath {
    raw: String,
    is_absolute: bool,
    rooted: bool,
    full_is_absolute: bool,
    full: Vec<String>,
    rel: Option<Vec<String>>,
    escapes: usize,
    lit_rel: Option<Vec<String>>,
    lit_abs: Option<Vec<String>>,
}

impl CanonicalPath {
    /// The path exactly as the caller wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the caller wrote an absolute path.
    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    /// Count of `..` segments that tried to climb above the implicit root.
    /// Only meaningful without a configured home; the offending segments
    /// themselves are dropped from the canonical form.
    pub fn escapes(&self) -> usize {
        self.escapes
    }

    /// True when a relative request resolved against a configured home
    /// ended up outside the home root. Such a path has no depth and no
    /// root-relative view.
    pub fn out_of_root(&self) -> bool {
        self.rooted && !self.is_absolute && self.rel.is_none()
    }

    /// Canonical segments relative to the resolution root, when the path
    /// stayed inside it.
    pub fn relative_view(&self) -> Option<&[String]> {
        self.rel.as_deref()
    }

    /// Canonical segments from the filesystem root, when the full form is
    /// anchored there (an absolute request, or a relative one resolved
    /// against an absolute home).
    pub fn absolute_view(&self) -> Option<&[String]> {
        if self.full_is_absolute {
            Some(&self.full)
        } else {
            None
        }
    }

    pub(crate) fn literal_relative_view(&self) -> Option<&[String]> {
        self.lit_rel.as_deref()
    }

    pub(crate) fn literal_absolute_view(&self) -> Option<&[String]> {
        self.lit_abs.as_deref()
    }

    /// Number of canonical segments between the resolution root and the
    /// target, counting the target itself. `None` for an out-of-root path.
    pub fn depth(&self) -> Option<usize> {
        if let Some(rel) = &self.rel {
            Some(rel.len())
        } else if self.is_absolute {
            Some(self.full.len())
        } else {
            None
        }
    }

    /// The path a filesystem collaborator should receive: the canonical
    /// segments joined back together, home-joined when a home participated
    /// in resolution.
    pub fn resolved(&self) -> String {
        if self.full_is_absolute {
            format!("/{}", self.full.join("/"))
        } else if self.full.is_empty() {
            ".".to_string()
        } else {
            self.full.join("/")
        }
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute {
            return write!(f, "/{}", self.full.join("/"));
        }
        match &self.rel {
            Some(rel) if rel.is_empty() => f.write_str("."),
            Some(rel) if self.raw.starts_with("./") => write!(f, "./{}", rel.join("/")),
            Some(rel) => f.write_str(&rel.join("/")),
            None => f.write_str(&self.raw),
        }
    }
}

impl PartialEq for CanonicalPath {
    fn eq(&self, other: &Self) -> bool {
        self.is_absolute == other.is_absolute
            && self.rooted == other.rooted
            && self.full_is_absolute == other.full_is_absolute
            && self.full == other.full
            && self.rel == other.rel
            && self.escapes == other.escapes
    }
}

impl Eq for CanonicalPath {}

/// Reduce `raw` to its canonical segment views, resolving relative paths
/// against `home` when one is configured.
///
/// Never fails. Absolute requests resolve from the filesystem root and are
/// never re-based under a home; `/..` clamps at `/`. Without a home, `..`
/// that cannot pop is dropped and counted as an escape.
pub fn canonicalize(raw: &str, home: Option<&PathPrefix>) -> CanonicalPath {
    let lit = literal_segments(raw);

    if raw.starts_with('/') {
        let mut full: Vec<String> = Vec::new();
        for seg in &lit {
            if seg == ".." {
                full.pop();
            } else {
                full.push(seg.clone());
            }
        }
        return CanonicalPath {
            raw: raw.to_string(),
            is_absolute: true,
            rooted: false,
            full_is_absolute: true,
            full,
            rel: None,
            escapes: 0,
            lit_rel: None,
            lit_abs: Some(lit),
        };
    }

    match home {
        Some(root) => {
            // Resolve on top of the home segments the way the OS would;
            // only the final location decides containment, so a transient
            // dip below the home that returns is still in-root.
            let home_len = root.segments().len();
            let mut stack: Vec<String> = root.segments().to_vec();
            for seg in &lit {
                if seg == ".." {
                    stack.pop();
                } else {
                    stack.push(seg.clone());
                }
            }
            let rel = if stack.starts_with(root.segments()) {
                Some(stack[home_len..].to_vec())
            } else {
                None
            };
            let lit_abs = if root.is_absolute() {
                Some(
                    root.segments()
                        .iter()
                        .cloned()
                        .chain(lit.iter().cloned())
                        .collect(),
                )
            } else {
                None
            };
            CanonicalPath {
                raw: raw.to_string(),
                is_absolute: false,
                rooted: true,
                full_is_absolute: root.is_absolute(),
                full: stack,
                rel,
                escapes: 0,
                lit_rel: Some(lit),
                lit_abs,
            }
        }
        None => {
            let mut rel: Vec<String> = Vec::new();
            let mut escapes = 0usize;
            for seg in &lit {
                if seg == ".." {
                    if rel.pop().is_none() {
                        escapes += 1;
                    }
                } else {
                    rel.push(seg.clone());
                }
            }
            CanonicalPath {
                raw: raw.to_string(),
                is_absolute: false,
                rooted: false,
                full_is_absolute: false,
                full: rel.clone(),
                rel: Some(rel),
                escapes,
                lit_rel: Some(lit),
                lit_abs: None,
            }
        }
    }
}

/// Split into segments keeping `..` but dropping `.` and empties, i.e. the
/// spelling the caller used minus pure noise.
fn literal_segments(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .map(str::to_string)
        .collect()
}
