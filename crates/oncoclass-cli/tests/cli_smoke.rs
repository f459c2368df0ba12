//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `oncoclass` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("oncoclass").unwrap()
}

fn write_lists(dir: &Path) {
    std::fs::write(dir.join("oncogenes.txt"), "# oncogenes\nKRAS\nBRAF\n").unwrap();
    std::fs::write(dir.join("tsgs.txt"), "TP53\n").unwrap();
}

fn write_mutations(dir: &Path) {
    std::fs::write(
        dir.join("mutations.tsv"),
        "Gene\tAminoAcid\n\
         KRAS\tp.G12D\n\
         KRAS\tp.G12V\n\
         TP53\tp.R175H\n\
         TP53\tp.R248Q\n\
         TTN\tp.A100T\n",
    )
    .unwrap();
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("entropy"))
        .stdout(predicate::str::contains("validate-genes"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oncoclass"));
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_no_input_errors() {
    cmd().arg("classify").assert().failure();
}

#[test]
fn classify_nonexistent_input_errors() {
    cmd()
        .args(["classify", "--input", "/nonexistent/features.tsv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn classify_rejects_unknown_model_type() {
    cmd()
        .args(["classify", "--input", "x.tsv", "--model-type", "gbdt"])
        .assert()
        .failure();
}

#[test]
fn classify_writes_prediction_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("features.tsv");
    let mut table = String::from("gene\ttotal\ttrue class\thotspot\ttruncating\n");
    for i in 0..12 {
        let (hotspot, truncating) = match i % 3 {
            0 => (1, 1),
            1 => (15, 1),
            _ => (1, 15),
        };
        table.push_str(&format!("G{}\t{}\t{}\t{}\t{}\n", i, hotspot + truncating, i % 3, hotspot, truncating));
    }
    std::fs::write(&input, table).unwrap();
    let output = dir.path().join("predictions.tsv");

    cmd()
        .args(["classify", "--iterations", "2", "--seed", "7", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().starts_with("gene\ttrue_class\tn_heldout\tpred_class"));
    assert_eq!(lines.count(), 12);
}

#[test]
fn classify_without_any_labels_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("features.tsv");
    std::fs::write(&input, "gene\ttotal\tf\nA\t1\t1\nB\t2\t2\n").unwrap();

    cmd()
        .args(["classify", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out.tsv"))
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// entropy / validate-genes
// ---------------------------------------------------------------------------

#[test]
fn entropy_writes_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_lists(dir.path());
    write_mutations(dir.path());
    let out_dir = dir.path().join("entropy");

    cmd()
        .current_dir(dir.path())
        .args([
            "entropy",
            "--mutations",
            "mutations.tsv",
            "--oncogenes",
            "oncogenes.txt",
            "--tsgs",
            "tsgs.txt",
            "--output-dir",
        ])
        .arg(&out_dir)
        .assert()
        .success();

    let missense = std::fs::read_to_string(out_dir.join("missense_position_entropy.tsv")).unwrap();
    assert!(missense.starts_with("gene\t"));
    assert!(missense.contains("KRAS\t"));
    assert!(out_dir.join("mutation_position_entropy.tsv").exists());
}

#[test]
fn entropy_requires_reference_lists() {
    cmd()
        .args(["entropy", "--mutations", "mutations.tsv"])
        .assert()
        .failure();
}

#[test]
fn validate_genes_reports_missing_genes() {
    let dir = tempfile::tempdir().unwrap();
    write_lists(dir.path());
    write_mutations(dir.path());

    cmd()
        .current_dir(dir.path())
        .args([
            "validate-genes",
            "--mutations",
            "mutations.tsv",
            "--oncogenes",
            "oncogenes.txt",
            "--tsgs",
            "tsgs.txt",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ONCOGENES: found 1 of 2 genes (missing: BRAF)"))
        .stdout(predicate::str::contains("TSG: found 1 of 1 genes"));
}

#[test]
fn validate_genes_succeeds_when_complete() {
    let dir = tempfile::tempdir().unwrap();
    write_mutations(dir.path());
    std::fs::write(dir.path().join("oncogenes.txt"), "KRAS\n").unwrap();
    std::fs::write(dir.path().join("tsgs.txt"), "TP53\n").unwrap();

    cmd()
        .current_dir(dir.path())
        .args([
            "validate-genes",
            "--mutations",
            "mutations.tsv",
            "--oncogenes",
            "oncogenes.txt",
            "--tsgs",
            "tsgs.txt",
        ])
        .assert()
        .success();
}
