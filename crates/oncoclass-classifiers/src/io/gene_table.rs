//! Gene feature table TSV reader.
use std::collections::HashSet;
use std::path::Path;

use csv::StringRecord;
use oncoclass_mutations::reference::GeneClass;

use crate::config::ColumnConfig;
use crate::error::{ClassifierError, Result};
use crate::math::Array2;

/// Raw per-gene table: identifiers, total mutation counts, optional classes
/// and the numeric feature columns. Missing feature cells are NaN.
#[derive(Debug, Clone)]
pub struct GeneTable {
    pub genes: Vec<String>,
    pub totals: Vec<f64>,
    pub classes: Option<Vec<GeneClass>>,
    pub x: Array2<f64>,
    pub feature_names: Vec<String>,
}

impl GeneTable {
    /// Assemble a table, checking row alignment and gene uniqueness.
    pub fn new(
        genes: Vec<String>,
        totals: Vec<f64>,
        classes: Option<Vec<GeneClass>>,
        x: Array2<f64>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        let n = genes.len();
        if totals.len() != n || x.nrows() != n || classes.as_ref().map_or(false, |c| c.len() != n) {
            return Err(ClassifierError::Data(format!(
                "gene table is misaligned: {} genes, {} totals, {} feature rows",
                n,
                totals.len(),
                x.nrows()
            )));
        }
        if feature_names.len() != x.ncols() {
            return Err(ClassifierError::Data(format!(
                "{} feature names for {} feature columns",
                feature_names.len(),
                x.ncols()
            )));
        }
        let mut seen = HashSet::with_capacity(n);
        for gene in &genes {
            if !seen.insert(gene.as_str()) {
                return Err(ClassifierError::Data(format!("duplicate gene '{}'", gene)));
            }
        }
        Ok(Self {
            genes,
            totals,
            classes,
            x,
            feature_names,
        })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Read a tab-separated gene feature table. Every column other than the
/// gene, total and class columns is a numeric feature.
pub fn read_gene_table<P: AsRef<Path>>(path: P, columns: &ColumnConfig) -> Result<GeneTable> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();

    let gene_idx = find_column(&headers, &columns.gene_column).ok_or_else(|| {
        ClassifierError::Data(format!(
            "Missing gene column '{}' in {}",
            columns.gene_column,
            path.display()
        ))
    })?;
    let total_idx = find_column(&headers, &columns.total_column).ok_or_else(|| {
        ClassifierError::Data(format!(
            "Missing total column '{}' in {}",
            columns.total_column,
            path.display()
        ))
    })?;
    let class_idx = find_column(&headers, &columns.class_column);

    let feature_indices: Vec<usize> = (0..headers.len())
        .filter(|&idx| idx != gene_idx && idx != total_idx && Some(idx) != class_idx)
        .collect();
    let feature_names: Vec<String> = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let mut genes = Vec::new();
    let mut totals = Vec::new();
    let mut classes = class_idx.map(|_| Vec::new());
    let mut features = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = row_idx + 2;

        let gene = record.get(gene_idx).unwrap_or("").trim();
        if gene.is_empty() {
            return Err(ClassifierError::Data(format!("Empty gene identifier at line {}", line)));
        }
        genes.push(gene.to_string());

        let total = parse_cell(record.get(total_idx), &columns.total_column, line)?;
        if total.is_nan() {
            return Err(ClassifierError::Data(format!(
                "Missing '{}' value for gene '{}' at line {}",
                columns.total_column, gene, line
            )));
        }
        totals.push(total);

        if let (Some(idx), Some(classes)) = (class_idx, classes.as_mut()) {
            let value = record.get(idx).unwrap_or("");
            let class = value.parse::<GeneClass>().map_err(|e| {
                ClassifierError::Data(format!("{} for gene '{}' at line {}", e, gene, line))
            })?;
            classes.push(class);
        }

        for (&idx, name) in feature_indices.iter().zip(&feature_names) {
            features.push(parse_cell(record.get(idx), name, line)?);
        }
    }

    let x = Array2::from_shape_vec((genes.len(), feature_names.len()), features)
        .map_err(|e| ClassifierError::Data(e.to_string()))?;

    log::debug!(
        "Read {} genes with {} features from {}",
        genes.len(),
        feature_names.len(),
        path.display()
    );

    GeneTable::new(genes, totals, classes, x, feature_names)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

/// Missing cells ("", NA, NaN) become NaN; anything else must be numeric.
fn parse_cell(value: Option<&str>, column: &str, line: usize) -> Result<f64> {
    let value = value.unwrap_or("").trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|_| {
        ClassifierError::Data(format!(
            "Invalid value '{}' in column '{}' at line {}",
            value, column, line
        ))
    })
}
