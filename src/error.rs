//! Run-level error types.
//!
//! Per-file problems never show up here: translation failures become
//! diagnostics on the unit's outcome and validation problems become findings.
//! A `ConvertError` means the result set as a whole cannot be trusted.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::base::PathMapError;
use crate::validate::ValidationReport;

/// Errors that abort a conversion or characterization run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Two units produced the same target path (compared case-insensitively).
    #[error(
        "Conflicting target {target}: produced by both {first_source} and {second_source}"
    )]
    ConflictingTarget {
        target: PathBuf,
        first_source: PathBuf,
        second_source: PathBuf,
    },

    /// A required directory does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// IO error while reading or writing a specific path.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A path could not be re-rooted.
    #[error(transparent)]
    PathMap(#[from] PathMapError),

    /// The bounded worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    /// Check and recharacterize were both requested for one invocation.
    #[error("A run cannot both check against and recharacterize the expected output")]
    ModeConflict,

    /// A pass/fail verdict was requested while recharacterizing.
    #[error("Validation is not available in recharacterize mode")]
    CheckWhileRecharacterizing,

    /// Overwriting the expected tree was attempted outside recharacterize mode.
    #[error("Overwriting expected output requires recharacterize mode")]
    RecharacterizeRequired,

    /// The writer would clobber an existing file without `overwrite`.
    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    /// Characterization found discrepancies.
    #[error(
        "Characterization failed with {count} finding(s)\n{report}",
        count = .report.failure_count()
    )]
    ValidationFailed { report: Box<ValidationReport> },
}

impl ConvertError {
    /// Create an IO error tied to the path that caused it.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a walk error for the tree rooted at `root`.
    pub fn walk(root: impl AsRef<Path>, source: walkdir::Error) -> Self {
        Self::Walk {
            root: root.as_ref().to_path_buf(),
            source,
        }
    }
}
