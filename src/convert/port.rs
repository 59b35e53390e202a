//! The per-file translation contract.
//!
//! The translation engine itself lives outside this crate; the orchestrator
//! only ever sees it through [`Translator`].

use std::path::PathBuf;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::project::{Language, TranslatableUnit};

/// Raw result of translating one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// Where the translated file belongs, expressed under the workspace
    /// source root. `None` means the unit intentionally produced no file.
    pub target_path: Option<PathBuf>,
    /// Translated text. May be present alongside diagnostics as partial output.
    pub text: Option<String>,
    /// Diagnostics raised while translating. Empty means success.
    pub diagnostics: Vec<String>,
}

impl Translation {
    /// A clean translation.
    pub fn success(target_path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            target_path: Some(target_path.into()),
            text: Some(text.into()),
            diagnostics: Vec::new(),
        }
    }

    /// A unit that needs no output file.
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

/// Failure raised by a translator for a single unit.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The source could not be parsed or analysed.
    #[error("{0}")]
    Failed(String),

    /// The translator observed the cancellation token.
    #[error("Translation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranslateError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Black-box single-file translator.
///
/// Implementations are shared across worker threads. They should poll
/// `cancel` at convenient points and return [`TranslateError::Cancelled`]
/// when it fires.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        unit: &TranslatableUnit,
        target: &Language,
        cancel: &CancellationToken,
    ) -> Result<Translation, TranslateError>;
}

impl<F> Translator for F
where
    F: Fn(&TranslatableUnit, &Language, &CancellationToken) -> Result<Translation, TranslateError>
        + Send
        + Sync,
{
    fn translate(
        &self,
        unit: &TranslatableUnit,
        target: &Language,
        cancel: &CancellationToken,
    ) -> Result<Translation, TranslateError> {
        self(unit, target, cancel)
    }
}
