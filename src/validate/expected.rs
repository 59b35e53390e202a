use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::base::{PathKey, is_excluded_dir};
use crate::error::ConvertError;

/// Files of a golden-master tree, excluding build-artifact subtrees.
#[derive(Debug, Clone, Default)]
pub struct ExpectedFileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ExpectedFileSet {
    /// Walk `root`, skipping directories named in `excluded_dirs` at any depth.
    ///
    /// A missing or unreadable tree is fatal: nothing meaningful can be
    /// validated against it.
    pub fn discover<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        excluded_dirs: &[S],
    ) -> Result<Self, ConvertError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ConvertError::DirectoryNotFound(root));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let excluded = e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|name| is_excluded_dir(name, excluded_dirs));
                !excluded
            });
        for entry in walker {
            let entry = entry.map_err(|e| ConvertError::walk(&root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        tracing::debug!("Discovered {} expected file(s) under {}", files.len(), root.display());
        Ok(Self { root, files })
    }

    /// Build a set from already-known paths.
    pub fn from_paths(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, path: &Path) -> bool {
        let key = PathKey::new(path);
        self.files.iter().any(|f| PathKey::new(f.as_path()) == key)
    }
}
