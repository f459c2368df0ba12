//! CLI helpers for mutation statistics and reference list checks.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use oncoclass_mutations::coverage::{reference_coverage, CoverageReport};
use oncoclass_mutations::entropy::{
    missense_position_entropy, mutation_position_entropy, write_entropy_table, EntropyScope,
};
use oncoclass_mutations::records::{read_mutation_records, MutationRecord};
use oncoclass_mutations::reference::ReferenceGeneSets;

pub const MISSENSE_ENTROPY_FILE: &str = "missense_position_entropy.tsv";
pub const MUTATION_ENTROPY_FILE: &str = "mutation_position_entropy.tsv";

pub fn load_mutations(path: &Path) -> Result<Vec<MutationRecord>> {
    let records = read_mutation_records(path)
        .with_context(|| format!("Failed to read mutation records: {}", path.display()))?;
    log::info!("Read {} mutation records from {}", records.len(), path.display());
    Ok(records)
}

/// Write the missense and all-mutation positional entropy tables into
/// `output_dir`, returning the written paths.
pub fn run_entropy(
    records: &[MutationRecord],
    reference: &ReferenceGeneSets,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let missense_path = output_dir.join(MISSENSE_ENTROPY_FILE);
    let missense = missense_position_entropy(records, reference);
    write_entropy_table(&missense, EntropyScope::Missense, &missense_path)
        .with_context(|| format!("Failed to write {}", missense_path.display()))?;

    let mutation_path = output_dir.join(MUTATION_ENTROPY_FILE);
    let mutation = mutation_position_entropy(records, reference);
    write_entropy_table(&mutation, EntropyScope::AllMutations, &mutation_path)
        .with_context(|| format!("Failed to write {}", mutation_path.display()))?;

    Ok(vec![missense_path, mutation_path])
}

/// Coverage of every loaded reference list; `true` when all are complete.
pub fn run_validate_genes(
    records: &[MutationRecord],
    reference: &ReferenceGeneSets,
) -> (Vec<CoverageReport>, bool) {
    let reports = reference_coverage(reference, records);
    let complete = reports.iter().all(CoverageReport::is_complete);
    (reports, complete)
}
