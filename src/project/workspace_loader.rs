use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{Language, ProjectInfo, Workspace};
use crate::base::is_excluded_dir;
use crate::config::ConversionOptions;
use crate::error::ConvertError;

/// Builds a [`Workspace`] from a directory tree.
///
/// Every immediate subdirectory of the workspace root is a project. A
/// project's language is the first of the supplied languages that has at
/// least one file in it; only files of that language become its units.
pub struct WorkspaceLoader {
    excluded_dirs: Vec<String>,
}

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self::with_options(&ConversionOptions::default())
    }

    pub fn with_options(options: &ConversionOptions) -> Self {
        Self {
            excluded_dirs: options.excluded_dirs.clone(),
        }
    }

    /// Loads every project under `path`, in directory-name order.
    pub fn load_directory<P: Into<PathBuf>>(
        &self,
        path: P,
        languages: &[Language],
    ) -> Result<Workspace, ConvertError> {
        let root = path.into();
        if !root.is_dir() {
            return Err(ConvertError::DirectoryNotFound(root));
        }

        let mut projects = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ConvertError::walk(&root, e))?;
            if !entry.file_type().is_dir() || self.is_excluded(entry.path()) {
                continue;
            }
            let name: Arc<str> = entry.file_name().to_string_lossy().into();
            if let Some(project) = self.load_project(entry.path(), name, languages)? {
                projects.push(project);
            }
        }

        tracing::debug!(
            "Loaded workspace {} with {} project(s)",
            root.display(),
            projects.len()
        );
        Ok(Workspace::new(root, projects))
    }

    /// Loads a single project directory.
    ///
    /// Returns `Ok(None)` when the directory holds no file in any of `languages`.
    pub fn load_project(
        &self,
        dir: &Path,
        name: impl Into<Arc<str>>,
        languages: &[Language],
    ) -> Result<Option<ProjectInfo>, ConvertError> {
        let files = self.collect_files(dir)?;
        let Some(language) = languages
            .iter()
            .find(|language| files.iter().any(|f| language.matches_path(f)))
        else {
            return Ok(None);
        };

        let files = files
            .into_iter()
            .filter(|f| language.matches_path(f))
            .collect();
        Ok(Some(ProjectInfo::new(name, language.clone(), dir, files)))
    }

    fn collect_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir() && e.depth() > 0 && self.is_excluded(e.path()))
            });
        for entry in walker {
            let entry = entry.map_err(|e| ConvertError::walk(dir, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| is_excluded_dir(name, &self.excluded_dirs))
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}
