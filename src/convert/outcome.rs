use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Translation;
use crate::base::Encoding;

/// Self-contained result of translating one unit.
///
/// Every failure mode of the translator has already been folded into
/// `diagnostics`; consumers never see an out-of-band error for a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    /// The unit's source file.
    pub source_path: PathBuf,
    /// Target path under the workspace source root, or `None` when the unit
    /// produced no file.
    pub target_path: Option<PathBuf>,
    pub text: Option<String>,
    pub diagnostics: Vec<Arc<str>>,
    /// Encoding of the source file; output is materialized in the same encoding.
    pub encoding: Encoding,
}

impl TranslationOutcome {
    pub fn from_translation(
        source_path: impl Into<PathBuf>,
        translation: Translation,
        encoding: Encoding,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: translation.target_path,
            text: translation.text,
            diagnostics: translation.diagnostics.into_iter().map(Arc::from).collect(),
            encoding,
        }
    }

    /// An outcome with no output and the given diagnostics.
    pub fn failed<I, S>(source_path: impl Into<PathBuf>, encoding: Encoding, diagnostics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            source_path: source_path.into(),
            target_path: None,
            text: None,
            diagnostics: diagnostics.into_iter().map(Into::into).collect(),
            encoding,
        }
    }

    /// True when the translator reported nothing. Text alongside diagnostics
    /// is partial output and does not count as success.
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Target path, falling back to the source path for untargeted outcomes.
    pub fn display_path(&self) -> &Path {
        self.target_path.as_deref().unwrap_or(&self.source_path)
    }
}
