//! Path identity and root mapping.
//!
//! Result tables and expected-file sets are keyed by [`PathKey`], which treats
//! two paths as equal when they differ only in case or separator style. The
//! original path is kept for display and for anything written back to disk.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors raised when a path cannot be re-rooted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathMapError {
    /// The path does not live under the root it was mapped from.
    #[error("{path} is not under {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

// ============================================================================
// PATH KEY
// ============================================================================

/// Case-insensitive path identity that preserves the caller's spelling.
///
/// Equality and hashing use a normalized form (components joined with `/`,
/// lower-cased); [`PathKey::path`] and `Display` return the path as given.
#[derive(Clone)]
pub struct PathKey {
    path: PathBuf,
    normalized: Box<str>,
}

impl PathKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let normalized = normalize(&path).into_boxed_str();
        Self { path, normalized }
    }

    /// The path exactly as it was supplied.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The folded form used for comparisons.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl PartialEq for PathKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PathKey {}

impl Hash for PathKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathKey").field(&self.path).finish()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for PathKey {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for PathKey {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

fn normalize(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        let part = match component {
            Component::RootDir => {
                out.push('/');
                continue;
            }
            Component::CurDir => continue,
            other => fold(other.as_os_str().to_string_lossy().as_ref()),
        };
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&part);
    }
    out
}

fn fold(part: &str) -> String {
    // Windows prefixes like `C:` arrive as one component; backslashes only
    // show up here when a foreign path is parsed on a unix host.
    part.replace('\\', "/").to_lowercase()
}

fn component_eq(a: Component<'_>, b: Component<'_>) -> bool {
    match (a, b) {
        (Component::RootDir, Component::RootDir) => true,
        (Component::CurDir, Component::CurDir) => true,
        (Component::ParentDir, Component::ParentDir) => true,
        (Component::Normal(x), Component::Normal(y)) => {
            fold(&x.to_string_lossy()) == fold(&y.to_string_lossy())
        }
        (Component::Prefix(x), Component::Prefix(y)) => {
            fold(&x.as_os_str().to_string_lossy()) == fold(&y.as_os_str().to_string_lossy())
        }
        _ => false,
    }
}

// ============================================================================
// ROOT MAPPING
// ============================================================================

/// Strip `root` from the front of `path`, comparing components case-insensitively.
///
/// Returns the remainder with its original casing.
fn strip_root(path: &Path, root: &Path) -> Option<PathBuf> {
    let mut remaining = path.components().filter(|c| *c != Component::CurDir);
    for root_component in root.components().filter(|c| *c != Component::CurDir) {
        let next = remaining.next()?;
        if !component_eq(next, root_component) {
            return None;
        }
    }
    Some(remaining.collect())
}

fn reroot(path: &Path, from: &Path, to: &Path) -> Result<PathBuf, PathMapError> {
    let relative = strip_root(path, from).ok_or_else(|| PathMapError::OutsideRoot {
        path: path.to_path_buf(),
        root: from.to_path_buf(),
    })?;
    if relative.as_os_str().is_empty() {
        return Ok(to.to_path_buf());
    }
    Ok(to.join(relative))
}

/// Map a path under `source_root` to the same relative location under `target_root`.
///
/// The prefix match is case-insensitive; the remainder (subdirectories and
/// file name) is preserved verbatim. File renames such as extension changes
/// are the translator's business and are not applied here.
pub fn map_to_target(
    source_path: &Path,
    source_root: &Path,
    target_root: &Path,
) -> Result<PathBuf, PathMapError> {
    reroot(source_path, source_root, target_root)
}

/// Inverse of [`map_to_target`].
pub fn map_to_source(
    target_path: &Path,
    target_root: &Path,
    source_root: &Path,
) -> Result<PathBuf, PathMapError> {
    reroot(target_path, target_root, source_root)
}

/// True when a directory name is one of `excluded` (case-insensitive).
pub fn is_excluded_dir<S: AsRef<str>>(name: &str, excluded: &[S]) -> bool {
    excluded
        .iter()
        .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(name))
}
