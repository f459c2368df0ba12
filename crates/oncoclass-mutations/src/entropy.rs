//! Positional entropy of mutations within a gene.
//!
//! Mutations of a gene are counted per amino-acid position, the counts are
//! normalized to a probability distribution and its Shannon entropy (bits)
//! is reported. Hotspot genes (typical oncogenes) have low entropy; genes
//! whose mutations spread over the protein (typical TSGs) have high entropy.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::amino_acid::AminoAcidChange;
use crate::error::Result;
use crate::records::{group_by_gene, MutationRecord};
use crate::reference::{GeneClass, ReferenceGeneSets};

/// Which mutations contribute to the positional distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyScope {
    /// Every valid change with a known position.
    AllMutations,
    /// Missense changes only.
    Missense,
}

impl EntropyScope {
    pub fn column_name(self) -> &'static str {
        match self {
            EntropyScope::AllMutations => "mutation position entropy",
            EntropyScope::Missense => "missense position entropy",
        }
    }

    fn accepts(self, change: &AminoAcidChange) -> bool {
        match self {
            EntropyScope::AllMutations => change.is_valid,
            EntropyScope::Missense => change.is_missense(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneEntropy {
    pub gene: String,
    pub entropy: f64,
    pub n_mutations: usize,
    pub n_positions: usize,
    pub true_class: GeneClass,
}

/// Shannon entropy in bits. Zero probabilities contribute nothing.
pub fn shannon_entropy(probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// Count mutations per position for the HGVS strings of a single gene.
///
/// Returns the per-position counts and the total number of counted
/// mutations. Strings that do not parse, or parse without a position, are
/// ignored.
pub fn count_mutation_positions<'a, I>(hgvs: I, scope: EntropyScope) -> (BTreeMap<u32, usize>, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut position_counts: BTreeMap<u32, usize> = BTreeMap::new();
    let mut total = 0usize;
    for change in hgvs.into_iter().map(AminoAcidChange::parse) {
        if !scope.accepts(&change) {
            continue;
        }
        if let Some(pos) = change.pos {
            *position_counts.entry(pos).or_insert(0) += 1;
            total += 1;
        }
    }
    (position_counts, total)
}

/// Entropy of a position histogram; 0 for an empty histogram.
pub fn position_entropy(position_counts: &BTreeMap<u32, usize>) -> f64 {
    let total: usize = position_counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let probabilities: Vec<f64> = position_counts
        .values()
        .map(|&count| count as f64 / total as f64)
        .collect();
    shannon_entropy(&probabilities)
}

/// Per-gene positional entropy over the mutation table, in gene order.
pub fn gene_position_entropy(
    records: &[MutationRecord],
    scope: EntropyScope,
    reference: &ReferenceGeneSets,
) -> Vec<GeneEntropy> {
    log::info!("Calculating {} . . .", scope.column_name());

    let results: Vec<GeneEntropy> = group_by_gene(records)
        .into_iter()
        .map(|(gene, hgvs)| {
            let (counts, total) = count_mutation_positions(hgvs, scope);
            GeneEntropy {
                gene: gene.to_string(),
                entropy: position_entropy(&counts),
                n_mutations: total,
                n_positions: counts.len(),
                true_class: reference.class_of(gene),
            }
        })
        .collect();

    log::info!(
        "Finished calculating {} for {} genes.",
        scope.column_name(),
        results.len()
    );
    results
}

pub fn missense_position_entropy(
    records: &[MutationRecord],
    reference: &ReferenceGeneSets,
) -> Vec<GeneEntropy> {
    gene_position_entropy(records, EntropyScope::Missense, reference)
}

pub fn mutation_position_entropy(
    records: &[MutationRecord],
    reference: &ReferenceGeneSets,
) -> Vec<GeneEntropy> {
    gene_position_entropy(records, EntropyScope::AllMutations, reference)
}

/// Write an entropy table as TSV with a `true class` column (0/1/2).
pub fn write_entropy_table<P: AsRef<Path>>(
    rows: &[GeneEntropy],
    scope: EntropyScope,
    output_path: P,
) -> Result<()> {
    let file = File::create(output_path.as_ref())?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));

    writer.write_record([
        "gene",
        scope.column_name(),
        "total",
        "positions",
        "true class",
    ])?;
    for row in rows {
        writer.write_record([
            row.gene.clone(),
            format!("{:.6}", row.entropy),
            row.n_mutations.to_string(),
            row.n_positions.to_string(),
            row.true_class.code().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
