//! CLI helpers for gene classification.
use std::path::Path;

use anyhow::{Context, Result};

use oncoclass_classifiers::config::ClassifyConfig;
use oncoclass_classifiers::io::{read_gene_table, write_predictions};
use oncoclass_classifiers::{GeneClassifier, GenePredictions};
use oncoclass_mutations::reference::ReferenceGeneSets;

/// Load a classification configuration from a JSON file.
pub fn load_classify_config<P: AsRef<Path>>(path: P) -> Result<ClassifyConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ClassifyConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Classify the genes of a feature table and return the aggregated
/// held-out predictions.
pub fn classify_table<P: AsRef<Path>>(
    input: P,
    reference: Option<&ReferenceGeneSets>,
    config: &ClassifyConfig,
) -> Result<GenePredictions> {
    config.validate().context("Invalid classification config")?;

    let table = read_gene_table(&input, &config.columns)
        .with_context(|| format!("Failed to read gene table: {}", input.as_ref().display()))?;
    let classifier = GeneClassifier::new(&table, reference, config.clone())?;
    let predictions = classifier.kfold_validation()?;
    Ok(predictions)
}

/// Classify and write the results table.
pub fn run_classify<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    reference: Option<&ReferenceGeneSets>,
    config: &ClassifyConfig,
) -> Result<GenePredictions> {
    let predictions = classify_table(input, reference, config)?;
    write_predictions(&output, &predictions)
        .with_context(|| format!("Failed to write predictions: {}", output.as_ref().display()))?;
    Ok(predictions)
}
