//! Characterization (golden-master) validation.
//!
//! Checks three properties of a run against an expected-output tree:
//! every expected file was produced with matching content and encoding,
//! nothing unexpected was produced, and no output carries diagnostics.
//! Expected files with no output whose source is already identical are
//! accepted but listed as [`FindingCategory::SkippedUnchanged`] so a unit
//! silently dropped by the orchestrator cannot hide.

mod expected;
mod report;
mod validator;

pub use expected::ExpectedFileSet;
pub use report::{Finding, FindingCategory, MismatchKind, ValidationReport};
pub use validator::Validator;

#[cfg(test)]
mod tests;
