use std::borrow::Borrow;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::RunMode;
use crate::base::constants::TEMP_FILE_SUFFIX;
use crate::base::{PathKey, map_to_target};
use crate::config::ConversionOptions;
use crate::convert::{ResultTable, TranslationOutcome};
use crate::error::ConvertError;

/// Counts from one [`ResultWriter::write`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files written.
    pub written: usize,
    /// Outcomes with diagnostics that were not written.
    pub skipped_failed: usize,
    /// Outcomes with no target path or no text.
    pub skipped_empty: usize,
}

/// Writes outcome text to a destination tree in each source file's encoding.
pub struct ResultWriter {
    source_root: PathBuf,
    write_failed_outputs: bool,
}

impl ResultWriter {
    /// `source_root` is the root that outcome target paths are expressed under.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            write_failed_outputs: false,
        }
    }

    pub fn with_options(mut self, options: &ConversionOptions) -> Self {
        self.write_failed_outputs = options.write_failed_outputs;
        self
    }

    /// Write every targeted outcome under `destination_root`.
    ///
    /// Accepts the raw outcome stream or borrowed outcomes. Without
    /// `overwrite`, an existing destination file is an error. Two outcomes
    /// for the same destination are always an error.
    ///
    /// Outcomes are written as they arrive, so files written before an error
    /// stay on disk. [`ResultWriter::write_table`] checks its destinations
    /// before writing anything.
    pub fn write<I>(
        &self,
        outcomes: I,
        destination_root: &Path,
        overwrite: bool,
    ) -> Result<WriteSummary, ConvertError>
    where
        I: IntoIterator,
        I::Item: Borrow<TranslationOutcome>,
    {
        let mut summary = WriteSummary::default();
        let mut written: FxHashMap<PathKey, PathBuf> = FxHashMap::default();

        for outcome in outcomes {
            let outcome: &TranslationOutcome = outcome.borrow();
            if !outcome.is_success() && !self.write_failed_outputs {
                tracing::debug!(
                    "Not writing failed output for {}",
                    outcome.display_path().display()
                );
                summary.skipped_failed += 1;
                continue;
            }
            let (Some(target), Some(text)) = (&outcome.target_path, &outcome.text) else {
                summary.skipped_empty += 1;
                continue;
            };

            let destination = map_to_target(target, &self.source_root, destination_root)?;
            if let Some(first_source) = written.insert(
                PathKey::new(destination.as_path()),
                outcome.source_path.clone(),
            ) {
                return Err(ConvertError::ConflictingTarget {
                    target: destination,
                    first_source,
                    second_source: outcome.source_path.clone(),
                });
            }
            if !overwrite && destination.exists() {
                return Err(ConvertError::TargetExists(destination));
            }

            write_atomically(&destination, &outcome.encoding.encode(text))?;
            tracing::trace!("Wrote {} ({})", destination.display(), outcome.encoding);
            summary.written += 1;
        }

        tracing::debug!(
            "Wrote {} file(s) under {}",
            summary.written,
            destination_root.display()
        );
        Ok(summary)
    }

    /// Write an aggregated table under `destination_root`.
    ///
    /// Without `overwrite`, every destination is checked first and nothing is
    /// written when any of them already exists.
    pub fn write_table(
        &self,
        table: &ResultTable,
        destination_root: &Path,
        overwrite: bool,
    ) -> Result<WriteSummary, ConvertError> {
        if !overwrite {
            for outcome in table.outcomes() {
                match self.destination(outcome, destination_root)? {
                    Some(destination) if destination.exists() => {
                        return Err(ConvertError::TargetExists(destination));
                    }
                    _ => {}
                }
            }
        }
        self.write(table.outcomes(), destination_root, overwrite)
    }

    /// Where `outcome` would be written, or `None` when it is not written.
    fn destination(
        &self,
        outcome: &TranslationOutcome,
        destination_root: &Path,
    ) -> Result<Option<PathBuf>, ConvertError> {
        if !outcome.is_success() && !self.write_failed_outputs {
            return Ok(None);
        }
        match (&outcome.target_path, &outcome.text) {
            (Some(target), Some(_)) => Ok(Some(map_to_target(
                target,
                &self.source_root,
                destination_root,
            )?)),
            _ => Ok(None),
        }
    }

    /// Replace the expected tree's files with the actual output.
    ///
    /// Only allowed in [`RunMode::Recharacterize`].
    pub fn recharacterize(
        &self,
        mode: RunMode,
        table: &ResultTable,
        expected_root: &Path,
    ) -> Result<WriteSummary, ConvertError> {
        if mode != RunMode::Recharacterize {
            return Err(ConvertError::RecharacterizeRequired);
        }
        tracing::warn!(
            "Recharacterizing: overwriting expected output under {}",
            expected_root.display()
        );
        self.write_table(table, expected_root, true)
    }
}

/// Write to a sibling temporary file, then rename over the destination.
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }

    let mut temp_name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    temp_name.push(TEMP_FILE_SUFFIX);
    let temp_path = destination.with_file_name(temp_name);

    fs::write(&temp_path, bytes).map_err(|e| ConvertError::io(&temp_path, e))?;
    fs::rename(&temp_path, destination).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ConvertError::io(destination, e)
    })
}
