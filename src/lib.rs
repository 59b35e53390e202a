//! # crossport-base
//!
//! Orchestration and characterization layer for workspace-wide
//! source-to-source translation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! validate  → Golden-master comparison, validation report
//!   ↓
//! output    → Result writer, check/recharacterize mode
//!   ↓
//! convert   → Translation port, orchestrator, outcome stream, aggregation
//!   ↓
//! project   → Workspace handle, project metadata, workspace loading
//!   ↓
//! base      → Primitives (path mapping, PathKey, encodings, text comparison)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let workspace = WorkspaceLoader::new().load_directory(&source_root, &languages)?;
//! let orchestrator = ConversionOrchestrator::new(&workspace, translator);
//! let stream = orchestrator.run(|p| &*p.name == "App", &target, NoProgress, &cancel)?;
//! let table = aggregate(stream)?;
//!
//! let expected = ExpectedFileSet::discover(&expected_root, EXCLUDED_DIRS)?;
//! Validator::for_mode(RunMode::Check)?
//!     .validate(&expected, &table, &expected_root, workspace.root())?
//!     .into_result()?;
//! ```

// ============================================================================
// MODULES (dependency order: base → project → convert → output → validate)
// ============================================================================

/// Foundation types: path mapping, PathKey, encodings
pub mod base;

/// Run configuration
pub mod config;

/// Run-level errors
pub mod error;

/// Project management: workspace handle, workspace loading
pub mod project;

/// Conversion: translation port, orchestrator, aggregation
pub mod convert;

/// Materialization and run mode
pub mod output;

/// Characterization validation
pub mod validate;

// Re-export the types most callers need
pub use base::{Encoding, PathKey, map_to_source, map_to_target};
pub use config::ConversionOptions;
pub use convert::{
    ConversionOrchestrator, OutcomeStream, ResultTable, Translation, TranslationOutcome,
    Translator, aggregate,
};
pub use error::ConvertError;
pub use output::{ResultWriter, RunMode};
pub use project::{Language, ProjectInfo, TranslatableUnit, Workspace, WorkspaceLoader};
pub use validate::{ExpectedFileSet, Finding, FindingCategory, ValidationReport, Validator};

// Cancellation tokens are part of the public contract.
pub use tokio_util::sync::CancellationToken;
