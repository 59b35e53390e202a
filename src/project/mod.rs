mod language;
mod workspace;
pub mod workspace_loader;

pub use language::Language;
pub use workspace::{ProjectInfo, TranslatableUnit, Workspace};
pub use workspace_loader::WorkspaceLoader;

#[cfg(test)]
mod tests;
