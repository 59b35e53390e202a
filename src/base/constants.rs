//! Domain constants shared by discovery, validation and materialization.

/// Build-artifact directory names skipped by expected-file discovery,
/// workspace loading and validation. Matched case-insensitively at any depth.
pub const EXCLUDED_DIRS: &[&str] = &["bin", "obj"];

/// Suffix appended to temporary files written before the final rename.
pub const TEMP_FILE_SUFFIX: &str = ".crossport-tmp";

/// Name prefix for orchestrator worker threads.
pub const WORKER_THREAD_PREFIX: &str = "crossport-worker";
