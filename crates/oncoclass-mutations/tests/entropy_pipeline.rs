//! Integration tests: mutation export -> entropy table / coverage reports.

use std::io::Write;

use oncoclass_mutations::coverage::reference_coverage;
use oncoclass_mutations::entropy::{
    missense_position_entropy, mutation_position_entropy, write_entropy_table, EntropyScope,
};
use oncoclass_mutations::records::read_mutation_records;
use oncoclass_mutations::reference::{GeneClass, ReferenceGeneSets};

fn write_mutation_export(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("nucleotide.tsv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Gene\tAminoAcid\tSampleName").unwrap();
    for (gene, aa) in [
        ("KRAS", "p.G12D"),
        ("KRAS", "p.G12V"),
        ("KRAS", "p.G13D"),
        ("KRAS", "p.G12C"),
        ("TP53", "p.R175H"),
        ("TP53", "p.R248Q"),
        ("TP53", "p.R273C"),
        ("TP53", "p.R213*"),
        ("TTN", "p.?"),
    ] {
        writeln!(file, "{}\t{}\tsample", gene, aa).unwrap();
    }
    path
}

fn reference() -> ReferenceGeneSets {
    ReferenceGeneSets::new(["KRAS"], ["TP53"], ["KRAS", "TP53", "PIK3CA"])
}

#[test]
fn entropy_separates_hotspot_from_spread_genes() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_mutation_records(write_mutation_export(dir.path())).unwrap();
    let rows = missense_position_entropy(&records, &reference());

    let kras = rows.iter().find(|r| r.gene == "KRAS").unwrap();
    let tp53 = rows.iter().find(|r| r.gene == "TP53").unwrap();
    let ttn = rows.iter().find(|r| r.gene == "TTN").unwrap();

    assert_eq!(kras.true_class, GeneClass::Oncogene);
    assert_eq!(tp53.true_class, GeneClass::Tsg);
    assert_eq!(ttn.true_class, GeneClass::Other);
    assert!(kras.entropy < tp53.entropy);
    assert!((tp53.entropy - 3f64.log2()).abs() < 1e-9);
    assert_eq!(ttn.n_mutations, 0);
    assert_eq!(ttn.entropy, 0.0);

    let all = mutation_position_entropy(&records, &reference());
    let tp53_all = all.iter().find(|r| r.gene == "TP53").unwrap();
    assert_eq!(tp53_all.n_mutations, 4);
    assert!((tp53_all.entropy - 2.0).abs() < 1e-9);
}

#[test]
fn entropy_table_has_true_class_column() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_mutation_records(write_mutation_export(dir.path())).unwrap();
    let rows = missense_position_entropy(&records, &reference());
    let out = dir.path().join("missense_entropy.tsv");
    write_entropy_table(&rows, EntropyScope::Missense, &out).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "gene\tmissense position entropy\ttotal\tpositions\ttrue class"
    );
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 3);
    assert!(body[0].starts_with("KRAS\t"));
    assert!(body[0].ends_with("\t1"));
    assert!(body[1].ends_with("\t2"));
    assert!(body[2].ends_with("\t0"));
}

#[test]
fn coverage_of_reference_lists() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_mutation_records(write_mutation_export(dir.path())).unwrap();
    let reports = reference_coverage(&reference(), &records);
    assert!(reports[0].is_complete());
    assert!(reports[1].is_complete());
    assert_eq!(reports[2].missing, vec!["PIK3CA".to_string()]);
}
