//! Workspace handle and project metadata.
//!
//! A [`Workspace`] is built once (by [`super::WorkspaceLoader`] or by hand)
//! and passed by reference to whatever needs it. Project metadata is
//! immutable, so selection predicates are plain functions over it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Language;

/// Immutable metadata for one project in a workspace.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub name: Arc<str>,
    pub language: Language,
    /// Project directory.
    pub root: PathBuf,
    /// Source files in declaration order.
    pub files: Vec<PathBuf>,
}

impl ProjectInfo {
    pub fn new(
        name: impl Into<Arc<str>>,
        language: Language,
        root: impl Into<PathBuf>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            language,
            root: root.into(),
            files,
        }
    }
}

/// One source file selected for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableUnit {
    /// Absolute source path.
    pub path: PathBuf,
    /// Name of the owning project.
    pub project: Arc<str>,
    pub language: Language,
}

/// A loaded multi-project workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    projects: Vec<ProjectInfo>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, projects: Vec<ProjectInfo>) -> Self {
        Self {
            root: root.into(),
            projects,
        }
    }

    /// The workspace's source root. Target paths are expressed under it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Projects in declaration order.
    pub fn projects(&self) -> &[ProjectInfo] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&ProjectInfo> {
        self.projects.iter().find(|p| &*p.name == name)
    }

    /// Enumerate the units of every project accepted by `predicate`.
    ///
    /// The predicate is called exactly once per project. Units come out in
    /// project-declaration order, then file order within each project.
    pub fn select_units<P>(&self, predicate: P) -> Vec<TranslatableUnit>
    where
        P: Fn(&ProjectInfo) -> bool,
    {
        let mut units = Vec::new();
        for project in &self.projects {
            if !predicate(project) {
                tracing::trace!("Skipping project {}", project.name);
                continue;
            }
            tracing::debug!(
                "Selected project {} ({} file(s))",
                project.name,
                project.files.len()
            );
            units.extend(project.files.iter().map(|path| TranslatableUnit {
                path: path.clone(),
                project: Arc::clone(&project.name),
                language: project.language.clone(),
            }));
        }
        units
    }
}
