//! Whole-pipeline properties: idempotence, completeness, isolation, symmetry.

use crate::helpers::{Harness, target_language};
use crossport::base::constants::EXCLUDED_DIRS;
use crossport::{ExpectedFileSet, ResultWriter, Validator};

fn populate(h: &Harness, projects: usize, files_per_project: usize) {
    for p in 0..projects {
        for f in 0..files_per_project {
            h.source(
                &format!("Project{p}/Dir{}/File{f}.src", f % 3),
                &format!("project {p} file {f}\r\n"),
            );
        }
    }
}

#[test]
fn test_table_holds_one_outcome_per_unit() {
    let h = Harness::new();
    populate(&h, 4, 25);
    let workspace = h.workspace();

    let table = h.convert(&workspace, |_| true).unwrap();
    assert_eq!(table.len(), 100);
    assert!(table.untargeted().is_empty());

    for project in workspace.projects() {
        for file in &project.files {
            let target = file.with_extension(target_language().extension());
            assert!(table.contains(&target), "no outcome for {}", file.display());
        }
    }
}

#[test]
fn test_repeated_runs_produce_identical_reports() {
    let h = Harness::new();
    populate(&h, 3, 10);
    h.expected("Project0/Dir0/File0.out", "stale\r\n")
        .expected("Project9/Orphan.out", "nobody produces this");
    let workspace = h.workspace();
    let expected = ExpectedFileSet::discover(&h.expected_root, EXCLUDED_DIRS).unwrap();

    let mut reports = Vec::new();
    for _ in 0..2 {
        let table = h.convert(&workspace, |_| true).unwrap();
        reports.push(
            Validator::new()
                .validate(&expected, &table, &h.expected_root, workspace.root())
                .unwrap(),
        );
    }
    assert_eq!(reports[0], reports[1]);
    assert!(!reports[0].passed());
}

#[test]
fn test_failure_in_one_unit_does_not_affect_others() {
    let clean = Harness::new();
    populate(&clean, 2, 10);
    let clean_ws = clean.workspace();
    let clean_table = clean.convert(&clean_ws, |_| true).unwrap();

    let faulty = Harness::new();
    populate(&faulty, 2, 10);
    faulty.source("Project1/Dir1/File4.src", "#error injected failure\n");
    let faulty_ws = faulty.workspace();
    let faulty_table = faulty.convert(&faulty_ws, |_| true).unwrap();

    assert_eq!(faulty_table.failures().count(), 1);
    for (key, outcome) in clean_table.iter() {
        let relative = key.path().strip_prefix(clean_ws.root()).unwrap();
        if relative.ends_with("Project1/Dir1/File4.out") {
            continue;
        }
        let other = faulty_table
            .get(&faulty_ws.root().join(relative))
            .unwrap_or_else(|| panic!("{} missing from faulty run", relative.display()));
        assert_eq!(other.text, outcome.text);
        assert_eq!(other.diagnostics, outcome.diagnostics);
        assert_eq!(other.encoding, outcome.encoding);
    }
}

#[test]
fn test_output_validated_against_itself_is_clean() {
    let h = Harness::new();
    populate(&h, 3, 7);
    let workspace = h.workspace();
    let table = h.convert(&workspace, |_| true).unwrap();

    ResultWriter::new(workspace.root())
        .write_table(&table, &h.expected_root, false)
        .unwrap();
    let expected = ExpectedFileSet::discover(&h.expected_root, EXCLUDED_DIRS).unwrap();
    assert_eq!(expected.len(), 21);

    let report = Validator::new()
        .validate(&expected, &table, &h.expected_root, workspace.root())
        .unwrap();
    assert!(report.findings().is_empty(), "{report}");
}

#[test]
fn test_writer_attached_to_raw_stream() {
    use crossport::convert::NoProgress;
    use crossport::{CancellationToken, ConversionOrchestrator};
    use std::sync::Arc;

    let h = Harness::new();
    populate(&h, 2, 5);
    let workspace = h.workspace();
    let out = h.dir.path().join("out");

    let stream = ConversionOrchestrator::new(&workspace, Arc::new(crate::helpers::EchoTranslator))
        .run(|_| true, &target_language(), NoProgress, &CancellationToken::new())
        .unwrap();
    let summary = ResultWriter::new(workspace.root())
        .write(stream, &out, false)
        .unwrap();

    assert_eq!(summary.written, 10);
    assert!(out.join("Project1/Dir1/File4.out").is_file());
}
