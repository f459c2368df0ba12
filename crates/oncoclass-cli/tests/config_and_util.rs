//! Integration tests for CLI config loading and util helpers.

use oncoclass_classifiers::config::{ClassifyConfig, HoldoutStrategy, ModelType};
use oncoclass_cli::analysis::{run_entropy, run_validate_genes, MUTATION_ENTROPY_FILE};
use oncoclass_cli::classify::{classify_table, load_classify_config};
use oncoclass_cli::util::{load_reference, validate_tsv_file};
use oncoclass_mutations::records::MutationRecord;
use oncoclass_mutations::reference::ReferenceGeneSets;

// ---------------------------------------------------------------------------
// validate_tsv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_tsv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_comma_separated_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.csv");
    std::fs::write(&path, "gene,total\nA,1\n").unwrap();
    let err = validate_tsv_file(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("tab-separated"));
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_file("/nonexistent/path/data.tsv").is_err());
}

// ---------------------------------------------------------------------------
// ClassifyConfig loading
// ---------------------------------------------------------------------------

#[test]
fn classify_config_loads_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(
        &path,
        r#"{"total_iter": 7, "model": {"naive_bayes": {"alpha": 0.5}}, "holdout": {"k_fold": {"folds": 5}}}"#,
    )
    .unwrap();

    let config = load_classify_config(&path).unwrap();
    assert_eq!(config.total_iter, 7);
    assert_eq!(config.model, ModelType::NaiveBayes { alpha: 0.5 });
    assert_eq!(config.holdout, HoldoutStrategy::KFold { folds: 5 });
    assert_eq!(config.driver_sample_rate, 0.7);
}

#[test]
fn classify_config_bad_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classify.json");
    std::fs::write(&path, "{ total_iter: 7 ").unwrap();
    let err = load_classify_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn classify_table_rejects_contradictory_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.tsv");
    std::fs::write(&path, "gene\ttotal\ttrue class\tf\nA\t1\t0\t1\n").unwrap();
    let config = ClassifyConfig {
        classify_oncogene: false,
        classify_tsg: false,
        ..Default::default()
    };
    assert!(classify_table(&path, None, &config).is_err());
}

// ---------------------------------------------------------------------------
// Reference lists and mutation analyses
// ---------------------------------------------------------------------------

#[test]
fn load_reference_reads_optional_smg_list() {
    let dir = tempfile::tempdir().unwrap();
    let onco = dir.path().join("onco.txt");
    let tsg = dir.path().join("tsg.txt");
    let smg = dir.path().join("smg.txt");
    std::fs::write(&onco, "KRAS\n\nBRAF\n").unwrap();
    std::fs::write(&tsg, "TP53\tcomment\n").unwrap();
    std::fs::write(&smg, "TTN\n").unwrap();

    let reference = load_reference(&onco, &tsg, Some(&smg)).unwrap();
    assert_eq!(reference.oncogenes().len(), 2);
    assert!(reference.tsgs().contains("TP53"));
    assert_eq!(reference.smgs().len(), 1);

    assert!(load_reference(&onco, &dir.path().join("missing.txt"), None).is_err());
}

#[test]
fn entropy_and_coverage_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let reference = ReferenceGeneSets::new(["KRAS"], ["TP53"], Vec::<&str>::new());
    let records = vec![
        MutationRecord::new("KRAS", "p.G12D"),
        MutationRecord::new("KRAS", "p.G12V"),
        MutationRecord::new("TP53", "p.R175H"),
        MutationRecord::new("TP53", "p.R273C"),
    ];

    let written = run_entropy(&records, &reference, &dir.path().join("out")).unwrap();
    assert_eq!(written.len(), 2);
    let table = std::fs::read_to_string(dir.path().join("out").join(MUTATION_ENTROPY_FILE)).unwrap();
    assert!(table.contains("KRAS\t0.000000\t2\t1\t1"));
    assert!(table.contains("TP53\t1.000000\t2\t2\t2"));

    let (reports, complete) = run_validate_genes(&records, &reference);
    assert_eq!(reports.len(), 2);
    assert!(complete);
}
