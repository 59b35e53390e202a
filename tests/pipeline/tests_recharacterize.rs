//! Recharacterization: overwriting the golden master, then checking against it.

use crate::helpers::Harness;
use crossport::base::constants::EXCLUDED_DIRS;
use crossport::base::{Encoding, detect_encoding};
use crossport::{ConvertError, ExpectedFileSet, ResultWriter, RunMode, Validator};

#[test]
fn test_recharacterize_then_check_passes() {
    let h = Harness::new();
    h.source("App/Program.src", "new behaviour\n")
        .expected("App/Program.out", "old behaviour\n");
    let workspace = h.workspace();
    let table = h.convert(&workspace, |_| true).unwrap();

    // Human-supervised recharacterization.
    let mode = RunMode::resolve(false, true).unwrap();
    assert!(Validator::for_mode(mode).is_err());
    ResultWriter::new(workspace.root())
        .recharacterize(mode, &table, &h.expected_root)
        .unwrap();

    // A later automated check against the refreshed golden master.
    let mode = RunMode::resolve(true, false).unwrap();
    let expected = ExpectedFileSet::discover(&h.expected_root, EXCLUDED_DIRS).unwrap();
    let report = Validator::for_mode(mode)
        .unwrap()
        .validate(&expected, &table, &h.expected_root, workspace.root())
        .unwrap();
    assert!(report.passed(), "{report}");
}

#[test]
fn test_recharacterize_preserves_source_encoding() {
    let h = Harness::new();
    crate::helpers::write_file(
        &h.source_root.join("App/Program.src"),
        &Encoding::Utf8Bom.encode("with bom\n"),
    );
    let workspace = h.workspace();
    let table = h.convert(&workspace, |_| true).unwrap();

    ResultWriter::new(workspace.root())
        .recharacterize(RunMode::Recharacterize, &table, &h.expected_root)
        .unwrap();

    let written = h.expected_root.join("App/Program.out");
    assert_eq!(detect_encoding(&written).unwrap(), Encoding::Utf8Bom);
    assert_eq!(
        std::fs::read(&written).unwrap(),
        Encoding::Utf8Bom.encode("with bom\n")
    );
}

#[test]
fn test_check_and_recharacterize_together_fail_loudly() {
    assert!(matches!(
        RunMode::resolve(true, true),
        Err(ConvertError::ModeConflict)
    ));
}

#[test]
fn test_check_mode_cannot_overwrite_expected() {
    let h = Harness::new();
    h.source("App/Program.src", "text\n")
        .expected("App/Program.out", "golden\n");
    let workspace = h.workspace();
    let table = h.convert(&workspace, |_| true).unwrap();

    let result = ResultWriter::new(workspace.root()).recharacterize(
        RunMode::Check,
        &table,
        &h.expected_root,
    );
    assert!(matches!(result, Err(ConvertError::RecharacterizeRequired)));
    assert_eq!(
        std::fs::read_to_string(h.expected_root.join("App/Program.out")).unwrap(),
        "golden\n"
    );
}
