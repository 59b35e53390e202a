//! End-to-end characterization runs: load, convert, aggregate, validate.

use crate::helpers::Harness;
use crossport::base::constants::EXCLUDED_DIRS;
use crossport::{ConvertError, ExpectedFileSet, Finding, RunMode, ValidationReport, Validator};

fn check(harness: &Harness, project: &str) -> Result<ValidationReport, ConvertError> {
    let workspace = harness.workspace();
    let table = harness.convert(&workspace, |p| &*p.name == project)?;
    let expected = ExpectedFileSet::discover(&harness.expected_root, EXCLUDED_DIRS)?;
    Validator::for_mode(RunMode::Check)?.validate(
        &expected,
        &table,
        &harness.expected_root,
        workspace.root(),
    )
}

#[test]
fn test_selected_project_matching_expected_passes() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P2/Other.src", "ignored")
        .expected("P1/A.out", "X");

    let report = check(&h, "P1").unwrap();
    assert!(report.passed(), "{report}");
    assert!(report.findings().is_empty());
}

#[test]
fn test_changed_expected_text_yields_one_mismatch() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P2/Other.src", "ignored")
        .expected("P1/A.out", "Y");

    let report = check(&h, "P1").unwrap();
    let mismatches: Vec<_> = report.mismatches().collect();
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].path(), h.expected_root.join("P1/A.out"));
}

#[test]
fn test_diagnostics_yield_one_conversion_error() {
    let h = Harness::new();
    h.source("P1/B.src", "#error parse error\nhalf translated")
        .expected("P1/B.out", "half translated");

    let report = check(&h, "P1").unwrap();
    assert_eq!(report.findings().len(), 1, "{report}");
    match &report.findings()[0] {
        Finding::ConversionError { path, diagnostics } => {
            assert_eq!(path, &h.expected_root.join("P1/B.out"));
            assert_eq!(
                diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
                vec!["parse error"]
            );
        }
        other => panic!("expected a conversion error, got {other:?}"),
    }
}

#[test]
fn test_translator_error_yields_one_conversion_error_at_source() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P1/B.src", "#fail parse error\nbody")
        .expected("P1/A.out", "X")
        .expected("P1/B.out", "body");

    let report = check(&h, "P1").unwrap();
    assert_eq!(report.findings().len(), 1, "{report}");
    match &report.findings()[0] {
        Finding::ConversionError { path, diagnostics } => {
            assert_eq!(path, &h.source_root.join("P1/B.src"));
            assert_eq!(&*diagnostics[0], "parse error");
        }
        other => panic!("expected a conversion error, got {other:?}"),
    }
}

#[test]
fn test_translator_panic_yields_one_conversion_error_at_source() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P1/B.src", "#panic\nbody")
        .expected("P1/A.out", "X")
        .expected("P1/B.out", "body");

    let report = check(&h, "P1").unwrap();
    assert_eq!(report.findings().len(), 1, "{report}");
    let error = report.conversion_errors().next().unwrap();
    assert_eq!(error.path(), h.source_root.join("P1/B.src"));
    assert!(error.to_string().contains("Translator panicked"), "{error}");
}

#[test]
fn test_unexpected_output_yields_one_extra() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P1/C.src", "Z")
        .expected("P1/A.out", "X");

    let report = check(&h, "P1").unwrap();
    let extra: Vec<_> = report.extra().collect();
    assert_eq!(report.failure_count(), 1, "{report}");
    assert_eq!(extra[0].path(), h.expected_root.join("P1/C.out"));
}

#[test]
fn test_unconverted_files_are_skipped_not_silently_passed() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .source("P1/Settings.config", "<settings/>")
        .expected("P1/A.out", "X")
        .expected("P1/Settings.config", "<settings/>");

    let report = check(&h, "P1").unwrap();
    assert!(report.passed(), "{report}");
    assert_eq!(report.skipped_count(), 1);
}

#[test]
fn test_expected_output_never_produced_is_missing() {
    let h = Harness::new();
    h.source("P1/A.src", "X")
        .expected("P1/A.out", "X")
        .expected("P1/Gone.out", "removed from source");

    let report = check(&h, "P1").unwrap();
    assert_eq!(report.missing().count(), 1, "{report}");
    assert_eq!(report.failure_count(), 1);
}

#[test]
fn test_target_collision_fails_before_validation() {
    let h = Harness::new();
    h.source("P1/A.src", "#target Shared.out\none")
        .source("P2/B.src", "#target shared.OUT\ntwo")
        .expected("Shared.out", "one");

    let workspace = h.workspace();
    let result = h.convert(&workspace, |_| true);
    assert!(
        matches!(result, Err(ConvertError::ConflictingTarget { .. })),
        "collision must be a run-level error"
    );
}

#[test]
fn test_missing_expected_tree_is_fatal() {
    let h = Harness::new();
    h.source("P1/A.src", "X");
    std::fs::remove_dir_all(&h.expected_root).unwrap();

    assert!(matches!(
        check(&h, "P1"),
        Err(ConvertError::DirectoryNotFound(_))
    ));
}

#[test]
fn test_failing_report_converts_to_error_listing_findings() {
    let h = Harness::new();
    h.source("P1/A.src", "X").expected("P1/A.out", "Y");

    let err = check(&h, "P1").unwrap().into_result().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Characterization failed with 1 finding(s)"));
    assert!(message.contains("mismatch (content differs)"));
    assert!(message.contains("A.out"));
}
