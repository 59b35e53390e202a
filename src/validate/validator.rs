use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::{ExpectedFileSet, Finding, MismatchKind, ValidationReport};
use crate::base::text_utils::eq_ignoring_line_endings;
use crate::base::{BomDetector, EncodingDetector, PathKey, map_to_source, map_to_target, read_text};
use crate::convert::{ResultTable, TranslationOutcome};
use crate::error::ConvertError;
use crate::output::RunMode;

/// Compares a run's [`ResultTable`] against a golden-master tree.
pub struct Validator {
    detector: Arc<dyn EncodingDetector>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            detector: Arc::new(BomDetector),
        }
    }

    /// A validator for an invocation running in `mode`.
    ///
    /// Fails when recharacterizing: the expected tree is being rewritten, so
    /// there is nothing to check against.
    pub fn for_mode(mode: RunMode) -> Result<Self, ConvertError> {
        match mode {
            RunMode::Check => Ok(Self::new()),
            RunMode::Recharacterize => Err(ConvertError::CheckWhileRecharacterizing),
        }
    }

    /// Use a different detector. It is applied to both sides of every comparison.
    pub fn with_detector(mut self, detector: Arc<dyn EncodingDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Validate `table` against `expected`.
    ///
    /// Target paths in the table live under `source_root`; expected files live
    /// under `expected_root`. Findings are reported under `expected_root`,
    /// except conversion errors of units that faulted before naming a target,
    /// which are reported at their source path. Every finding is collected;
    /// only infrastructure failures (unreadable files, paths outside the
    /// roots) are errors.
    pub fn validate(
        &self,
        expected: &ExpectedFileSet,
        table: &ResultTable,
        expected_root: &Path,
        source_root: &Path,
    ) -> Result<ValidationReport, ConvertError> {
        let mut findings = Vec::new();
        let mut expected_keys = FxHashSet::default();
        let faulted_stems: FxHashSet<PathKey> = table
            .untargeted()
            .iter()
            .filter(|outcome| !outcome.is_success())
            .map(|outcome| stem_key(&outcome.source_path))
            .collect();

        for expected_path in expected.iter() {
            let mapped = map_to_source(expected_path, expected_root, source_root)?;
            expected_keys.insert(PathKey::new(mapped.as_path()));

            match table.get(&mapped) {
                // The unit that would have produced this file faulted before
                // naming a target; it is reported once, as a conversion error.
                None if faulted_stems.contains(&stem_key(&mapped)) => {}
                None if self.is_unchanged(expected_path, &mapped)? => {
                    tracing::trace!("{} needs no conversion", mapped.display());
                    findings.push(Finding::SkippedUnchanged {
                        path: expected_path.to_path_buf(),
                    });
                }
                None => findings.push(Finding::Missing {
                    path: expected_path.to_path_buf(),
                }),
                // Reported once, as a conversion error, below.
                Some(outcome) if !outcome.is_success() => {}
                Some(outcome) => match outcome.text.as_deref() {
                    Some(text) => self.compare(expected_path, outcome, text, &mut findings)?,
                    // The writer never materializes a text-less outcome.
                    None => findings.push(Finding::Missing {
                        path: expected_path.to_path_buf(),
                    }),
                },
            }
        }

        for (key, outcome) in table.iter() {
            if outcome.is_success() && outcome.text.is_none() {
                continue;
            }
            if !expected_keys.contains(key) {
                findings.push(Finding::Extra {
                    path: to_expected(key.path(), source_root, expected_root),
                });
            }
        }

        for outcome in table.failures() {
            let path = match &outcome.target_path {
                Some(target) => to_expected(target, source_root, expected_root),
                None => outcome.source_path.clone(),
            };
            findings.push(Finding::ConversionError {
                path,
                diagnostics: outcome.diagnostics.clone(),
            });
        }

        let report = ValidationReport::new(findings);
        if report.passed() {
            tracing::info!(
                "Characterization passed: {} expected file(s), {} unchanged",
                expected.len(),
                report.skipped_count()
            );
        } else {
            tracing::warn!(
                "Characterization failed with {} finding(s)",
                report.failure_count()
            );
        }
        Ok(report)
    }

    /// True when the mapped source already exists and matches the expected file.
    fn is_unchanged(&self, expected_path: &Path, source_path: &Path) -> Result<bool, ConvertError> {
        if !source_path.is_file() {
            return Ok(false);
        }
        let (expected_text, expected_encoding) = read_text(expected_path, &*self.detector)
            .map_err(|e| ConvertError::io(expected_path, e))?;
        let (source_text, source_encoding) = read_text(source_path, &*self.detector)
            .map_err(|e| ConvertError::io(source_path, e))?;
        Ok(expected_encoding == source_encoding
            && eq_ignoring_line_endings(&expected_text, &source_text))
    }

    fn compare(
        &self,
        expected_path: &Path,
        outcome: &TranslationOutcome,
        actual_text: &str,
        findings: &mut Vec<Finding>,
    ) -> Result<(), ConvertError> {
        let (expected_text, expected_encoding) = read_text(expected_path, &*self.detector)
            .map_err(|e| ConvertError::io(expected_path, e))?;

        if !eq_ignoring_line_endings(&expected_text, actual_text) {
            findings.push(Finding::Mismatch {
                path: expected_path.to_path_buf(),
                kind: MismatchKind::Content,
            });
        }

        // Detect the actual encoding from the bytes the writer would produce.
        let actual_encoding = self
            .detector
            .detect_bytes(&outcome.encoding.encode(actual_text));
        if actual_encoding != expected_encoding {
            findings.push(Finding::Mismatch {
                path: expected_path.to_path_buf(),
                kind: MismatchKind::Encoding {
                    expected: expected_encoding,
                    actual: actual_encoding,
                },
            });
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a file ignoring its extension, pairing a source with its output.
fn stem_key(path: &Path) -> PathKey {
    PathKey::new(path.with_extension(""))
}

/// Report paths under the expected root when they can be mapped there.
fn to_expected(path: &Path, source_root: &Path, expected_root: &Path) -> PathBuf {
    map_to_target(path, source_root, expected_root).unwrap_or_else(|_| path.to_path_buf())
}
