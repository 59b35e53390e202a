//! Foundation types for the crossport toolchain.
//!
//! This module provides the primitives every other layer builds on:
//! - [`PathKey`] - Case-insensitive, case-preserving path identity
//! - [`map_to_target`], [`map_to_source`] - Source root ↔ target root mapping
//! - [`Encoding`], [`EncodingDetector`] - BOM/heuristic encoding sniffing
//! - Line-ending tolerant text comparison
//! - Domain constants (excluded build-artifact directories)
//!
//! This module has NO dependencies on other crossport modules.

pub mod constants;
mod encoding;
mod paths;
pub mod text_utils;

pub use encoding::{BomDetector, Encoding, EncodingDetector, detect_encoding, read_text};
pub use paths::{PathKey, PathMapError, is_excluded_dir, map_to_source, map_to_target};

#[cfg(test)]
mod tests;
