//! Source and target language identifiers.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A programming language, identified by name and canonical file extension.
///
/// Names compare case-insensitively; the extension is stored without a dot.
#[derive(Debug, Clone, Eq)]
pub struct Language {
    name: Arc<str>,
    extension: Arc<str>,
}

impl Language {
    pub fn new(name: impl Into<Arc<str>>, extension: &str) -> Self {
        Self {
            name: name.into(),
            extension: extension.trim_start_matches('.').into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// True when `path` carries this language's extension (case-insensitive).
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    /// Pick the language in `languages` whose extension matches `path`.
    pub fn for_path<'a>(languages: &'a [Language], path: &Path) -> Option<&'a Language> {
        languages.iter().find(|language| language.matches_path(path))
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
