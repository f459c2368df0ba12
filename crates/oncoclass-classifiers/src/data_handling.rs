//! Feature and label preparation.
//!
//! Turns a `GeneTable` into the shuffled feature matrix and label vector a
//! classifier run works on: low-count genes are filtered, classes are
//! encoded through the `ClassificationMode`, missing values are imputed and
//! rows are permuted with a seeded RNG.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use oncoclass_mutations::reference::{GeneClass, ReferenceGeneSets};

use crate::config::ClassifyConfig;
use crate::error::{ClassifierError, Result};
use crate::io::GeneTable;
use crate::math::{Array1, Array2};
use crate::mode::ClassificationMode;
use crate::preprocessing::fill_missing_with_mean;

#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Gene identifiers in shuffled row order.
    pub genes: Vec<String>,
    /// Position of each row in the filtered, unshuffled table.
    pub original_index: Vec<usize>,
    pub x: Array2<f64>,
    pub y: Array1<usize>,
    pub true_classes: Vec<GeneClass>,
    pub feature_names: Vec<String>,
    pub mode: ClassificationMode,
}

impl PreparedData {
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Per-code counts of the label vector.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.mode.n_classes()];
        for &code in self.y.iter() {
            counts[code] += 1;
        }
        counts
    }

    /// Features and labels of the given rows.
    pub fn subset(&self, rows: &[usize]) -> (Array2<f64>, Vec<usize>) {
        (self.x.select_rows(rows), self.y.select(rows).to_vec())
    }

    pub fn log_input_data_summary(&self) {
        let names = self.mode.class_names();
        let counts = self.class_counts();
        let summary: Vec<String> = names
            .iter()
            .zip(&counts)
            .map(|(name, count)| format!("{} {}", count, name))
            .collect();
        log::info!(
            "{} genes ({}), {} features, mode {}",
            self.nrows(),
            summary.join(", "),
            self.x.ncols(),
            self.mode
        );
    }
}

/// Indices of the rows whose total mutation count reaches `min_count`.
pub fn filter_min_count(totals: &[f64], min_count: f64) -> Vec<usize> {
    totals
        .iter()
        .enumerate()
        .filter_map(|(idx, &total)| if total >= min_count { Some(idx) } else { None })
        .collect()
}

/// Biological class per row: the table's class column when present,
/// otherwise reference gene-set membership.
pub fn resolve_classes(
    table: &GeneTable,
    reference: Option<&ReferenceGeneSets>,
) -> Result<Vec<GeneClass>> {
    match (&table.classes, reference) {
        (Some(classes), _) => Ok(classes.clone()),
        (None, Some(reference)) => Ok(table.genes.iter().map(|g| reference.class_of(g)).collect()),
        (None, None) => Err(ClassifierError::Data(
            "no class column in the input table and no reference gene lists given".to_string(),
        )),
    }
}

/// Build the shuffled, imputed feature matrix and encoded labels.
pub fn prepare(
    table: &GeneTable,
    reference: Option<&ReferenceGeneSets>,
    config: &ClassifyConfig,
) -> Result<PreparedData> {
    let mode = config.mode()?;
    let classes = resolve_classes(table, reference)?;

    let kept = filter_min_count(&table.totals, config.min_count);
    if kept.len() < table.len() {
        log::info!(
            "Dropped {} of {} genes with total < {}",
            table.len() - kept.len(),
            table.len(),
            config.min_count
        );
    }
    if kept.is_empty() {
        return Err(ClassifierError::Data(format!(
            "no genes left after filtering with min_count = {}",
            config.min_count
        )));
    }

    let (x, feature_names) = fill_missing_with_mean(&table.x.select_rows(&kept), &table.feature_names);
    if feature_names.is_empty() {
        return Err(ClassifierError::Data("no usable feature columns".to_string()));
    }

    let mut order: Vec<usize> = (0..kept.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    order.shuffle(&mut rng);

    let true_classes: Vec<GeneClass> = order.iter().map(|&i| classes[kept[i]]).collect();
    let y: Array1<usize> = true_classes.iter().map(|&c| mode.code_for(c)).collect();

    let data = PreparedData {
        genes: order.iter().map(|&i| table.genes[kept[i]].clone()).collect(),
        original_index: order.clone(),
        x: x.select_rows(&order),
        y,
        true_classes,
        feature_names,
        mode,
    };
    data.log_input_data_summary();
    Ok(data)
}
