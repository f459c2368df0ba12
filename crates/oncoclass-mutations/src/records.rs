//! Reader for the tab-separated export of the mutation table.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::StringRecord;

use crate::error::{MutationError, Result};

/// One row of the mutation table: the gene and its protein HGVS change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub gene: String,
    pub amino_acid: String,
}

impl MutationRecord {
    pub fn new(gene: impl Into<String>, amino_acid: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            amino_acid: amino_acid.into(),
        }
    }
}

/// Column names used when reading the mutation export.
#[derive(Debug, Clone)]
pub struct MutationReaderConfig {
    pub gene_column: String,
    pub amino_acid_column: String,
}

impl Default for MutationReaderConfig {
    fn default() -> Self {
        Self {
            gene_column: "Gene".to_string(),
            amino_acid_column: "AminoAcid".to_string(),
        }
    }
}

pub fn read_mutation_records<P: AsRef<Path>>(path: P) -> Result<Vec<MutationRecord>> {
    read_mutation_records_with_config(path, &MutationReaderConfig::default())
}

pub fn read_mutation_records_with_config<P: AsRef<Path>>(
    path: P,
    config: &MutationReaderConfig,
) -> Result<Vec<MutationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(&path)?;

    let headers = reader.headers()?.clone();
    let gene_idx = find_column(&headers, &config.gene_column)
        .ok_or_else(|| MutationError::MissingColumn(config.gene_column.clone()))?;
    let aa_idx = find_column(&headers, &config.amino_acid_column)
        .ok_or_else(|| MutationError::MissingColumn(config.amino_acid_column.clone()))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result?;
        let gene = record.get(gene_idx).unwrap_or_default().trim();
        if gene.is_empty() {
            skipped += 1;
            continue;
        }
        let amino_acid = record.get(aa_idx).unwrap_or_default().trim();
        records.push(MutationRecord::new(gene, amino_acid));
    }

    if skipped > 0 {
        log::warn!("Skipped {} mutation rows without a gene symbol", skipped);
    }
    log::info!(
        "Read {} mutation records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Group the HGVS strings of each gene, with genes in sorted order.
pub fn group_by_gene(records: &[MutationRecord]) -> BTreeMap<&str, Vec<&str>> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.gene.as_str())
            .or_default()
            .push(record.amino_acid.as_str());
    }
    groups
}

pub fn distinct_genes(records: &[MutationRecord]) -> BTreeSet<&str> {
    records.iter().map(|r| r.gene.as_str()).collect()
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_required_columns_case_insensitively() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SampleName\tgene\taminoacid\tTumor").unwrap();
        writeln!(file, "s1\tTP53\tp.R175H\tbreast").unwrap();
        writeln!(file, "s2\t\tp.R175H\tbreast").unwrap();
        writeln!(file, "s3\tKRAS\tp.G12D\tlung").unwrap();

        let records = read_mutation_records(file.path()).unwrap();
        assert_eq!(
            records,
            vec![
                MutationRecord::new("TP53", "p.R175H"),
                MutationRecord::new("KRAS", "p.G12D"),
            ]
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Gene\tProtein").unwrap();
        writeln!(file, "TP53\tp.R175H").unwrap();
        match read_mutation_records(file.path()) {
            Err(MutationError::MissingColumn(name)) => assert_eq!(name, "AminoAcid"),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn groups_sorted_by_gene() {
        let records = vec![
            MutationRecord::new("TP53", "p.R175H"),
            MutationRecord::new("KRAS", "p.G12D"),
            MutationRecord::new("TP53", "p.R273C"),
        ];
        let groups = group_by_gene(&records);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["KRAS", "TP53"]);
        assert_eq!(groups["TP53"], vec!["p.R175H", "p.R273C"]);
        assert_eq!(distinct_genes(&records).len(), 2);
    }
}
