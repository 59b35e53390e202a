#![allow(dead_code)]

//! Shared fixtures for pipeline tests.

use crossport::base::{BomDetector, read_text};
use crossport::{
    CancellationToken, ConversionOrchestrator, Language, ResultTable, TranslatableUnit,
    Workspace, WorkspaceLoader, aggregate,
    convert::{NoProgress, TranslateError, Translation, Translator},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub fn source_language() -> Language {
    Language::new("Source", "src")
}

pub fn target_language() -> Language {
    Language::new("Output", "out")
}

/// Copies the source text to `<stem>.out`.
///
/// A file whose first line is `#error <message>` yields the rest of the file
/// as partial text plus `<message>` as a diagnostic. `#fail <message>` makes
/// the translator return an error and `#panic` makes it panic. A file whose
/// first line is `#target <name>` is written to `<name>` in the workspace
/// root instead.
pub struct EchoTranslator;

impl Translator for EchoTranslator {
    fn translate(
        &self,
        unit: &TranslatableUnit,
        target: &Language,
        _cancel: &CancellationToken,
    ) -> Result<Translation, TranslateError> {
        let (text, _) = read_text(&unit.path, &BomDetector)?;
        let (first, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));

        if let Some(message) = first.strip_prefix("#error ") {
            let partial = Translation::success(unit.path.with_extension(target.extension()), rest);
            return Ok(partial.with_diagnostic(message.trim()));
        }
        if let Some(message) = first.strip_prefix("#fail ") {
            return Err(TranslateError::failed(message.trim()));
        }
        if first.trim() == "#panic" {
            panic!("translator crashed on {}", unit.path.display());
        }
        if let Some(name) = first.strip_prefix("#target ") {
            let root = unit.path.ancestors().nth(2).unwrap_or(Path::new("/"));
            return Ok(Translation::success(root.join(name.trim()), rest));
        }
        Ok(Translation::success(
            unit.path.with_extension(target.extension()),
            text,
        ))
    }
}

/// A workspace under `<tmp>/src` and a golden master under `<tmp>/expected`.
pub struct Harness {
    pub dir: TempDir,
    pub source_root: PathBuf,
    pub expected_root: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let source_root = dir.path().join("src");
        let expected_root = dir.path().join("expected");
        fs::create_dir_all(&source_root).unwrap();
        fs::create_dir_all(&expected_root).unwrap();
        Self {
            dir,
            source_root,
            expected_root,
        }
    }

    pub fn source(&self, rel: &str, content: &str) -> &Self {
        write_file(&self.source_root.join(rel), content.as_bytes());
        self
    }

    pub fn expected(&self, rel: &str, content: &str) -> &Self {
        write_file(&self.expected_root.join(rel), content.as_bytes());
        self
    }

    pub fn workspace(&self) -> Workspace {
        WorkspaceLoader::new()
            .load_directory(&self.source_root, &[source_language()])
            .expect("Should load workspace")
    }

    /// Convert the projects accepted by `predicate` and aggregate the results.
    pub fn convert<P>(
        &self,
        workspace: &Workspace,
        predicate: P,
    ) -> Result<ResultTable, crossport::ConvertError>
    where
        P: Fn(&crossport::ProjectInfo) -> bool,
    {
        let orchestrator = ConversionOrchestrator::new(workspace, Arc::new(EchoTranslator));
        let stream = orchestrator.run(
            predicate,
            &target_language(),
            NoProgress,
            &CancellationToken::new(),
        )?;
        aggregate(stream)
    }
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}
