//! Validation findings and the report that collects them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::base::{Encoding, PathKey};
use crate::error::ConvertError;

/// Category of a [`Finding`], in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FindingCategory {
    /// Expected file with no corresponding output.
    Missing,
    /// Output whose content or encoding differs from the expected file.
    Mismatch,
    /// Output with no corresponding expected file.
    Extra,
    /// Output whose translation reported diagnostics.
    ConversionError,
    /// Expected file with no output whose source is already identical.
    /// Informational only; never fails a run.
    SkippedUnchanged,
}

impl FindingCategory {
    pub fn is_failure(self) -> bool {
        !matches!(self, FindingCategory::SkippedUnchanged)
    }

    pub fn label(self) -> &'static str {
        match self {
            FindingCategory::Missing => "missing",
            FindingCategory::Mismatch => "mismatch",
            FindingCategory::Extra => "extra",
            FindingCategory::ConversionError => "error",
            FindingCategory::SkippedUnchanged => "skipped",
        }
    }
}

/// What differed between an expected file and the actual output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Text differs beyond line-ending style.
    Content,
    Encoding { expected: Encoding, actual: Encoding },
}

/// One discrepancy found during validation.
///
/// Paths are expressed under the expected root where a mapping exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Missing {
        path: PathBuf,
    },
    Mismatch {
        path: PathBuf,
        kind: MismatchKind,
    },
    Extra {
        path: PathBuf,
    },
    ConversionError {
        path: PathBuf,
        diagnostics: Vec<Arc<str>>,
    },
    SkippedUnchanged {
        path: PathBuf,
    },
}

impl Finding {
    pub fn category(&self) -> FindingCategory {
        match self {
            Finding::Missing { .. } => FindingCategory::Missing,
            Finding::Mismatch { .. } => FindingCategory::Mismatch,
            Finding::Extra { .. } => FindingCategory::Extra,
            Finding::ConversionError { .. } => FindingCategory::ConversionError,
            Finding::SkippedUnchanged { .. } => FindingCategory::SkippedUnchanged,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Finding::Missing { path }
            | Finding::Mismatch { path, .. }
            | Finding::Extra { path }
            | Finding::ConversionError { path, .. }
            | Finding::SkippedUnchanged { path } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.category().is_failure()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path().display();
        match self {
            Finding::Mismatch {
                kind: MismatchKind::Content,
                ..
            } => write!(f, "mismatch (content differs): {path}"),
            Finding::Mismatch {
                kind: MismatchKind::Encoding { expected, actual },
                ..
            } => write!(
                f,
                "mismatch (encoding: expected {expected}, actual {actual}): {path}"
            ),
            Finding::ConversionError { diagnostics, .. } => {
                write!(f, "error: {path}")?;
                for diagnostic in diagnostics {
                    write!(f, "\n    {diagnostic}")?;
                }
                Ok(())
            }
            Finding::SkippedUnchanged { .. } => write!(f, "skipped (unchanged): {path}"),
            Finding::Missing { .. } | Finding::Extra { .. } => {
                write!(f, "{}: {path}", self.category().label())
            }
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// All findings of one validation pass, fully enumerated.
///
/// Findings are ordered by category then path so identical inputs always
/// produce identical reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(mut findings: Vec<Finding>) -> Self {
        findings.sort_by_cached_key(|f| (f.category(), PathKey::new(f.path())));
        Self { findings }
    }

    /// True when nothing but informational findings were recorded.
    pub fn passed(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings that fail the run.
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn of_category(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category() == category)
    }

    pub fn missing(&self) -> impl Iterator<Item = &Finding> {
        self.of_category(FindingCategory::Missing)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &Finding> {
        self.of_category(FindingCategory::Mismatch)
    }

    pub fn extra(&self) -> impl Iterator<Item = &Finding> {
        self.of_category(FindingCategory::Extra)
    }

    pub fn conversion_errors(&self) -> impl Iterator<Item = &Finding> {
        self.of_category(FindingCategory::ConversionError)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Finding> {
        self.of_category(FindingCategory::SkippedUnchanged)
    }

    /// Expected files accepted because their source needed no conversion.
    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    /// `Ok(self)` on a pass, otherwise [`ConvertError::ValidationFailed`].
    pub fn into_result(self) -> Result<Self, ConvertError> {
        if self.passed() {
            Ok(self)
        } else {
            Err(ConvertError::ValidationFailed {
                report: Box::new(self),
            })
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "passed")?;
            if self.skipped_count() > 0 {
                write!(f, " ({} unchanged file(s) skipped)", self.skipped_count())?;
            }
            return Ok(());
        }
        let mut first = true;
        for finding in self.failures() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}
