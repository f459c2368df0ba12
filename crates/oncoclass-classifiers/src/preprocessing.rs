//! Missing-value handling for feature matrices.
//!
//! Missing cells arrive as NaN from the table reader. `fit_imputer` learns a
//! per-column mean over the observed values and `transform_all` fills the
//! gaps, dropping columns that have nothing observed.

use statrs::statistics::Statistics;

use crate::math::Array2;

/// Per-column fill values. `None` marks a column with no observed value.
#[derive(Clone, Debug, PartialEq)]
pub struct MeanImputer {
    pub means: Vec<Option<f64>>,
}

impl MeanImputer {
    /// Indices of the columns that survive the transform.
    pub fn kept_columns(&self) -> Vec<usize> {
        self.means
            .iter()
            .enumerate()
            .filter_map(|(idx, mean)| mean.map(|_| idx))
            .collect()
    }
}

/// Fit a `MeanImputer` from an `Array2<f64>` where rows are genes and
/// columns are features.
pub fn fit_imputer(x: &Array2<f64>) -> MeanImputer {
    let means = (0..x.ncols())
        .map(|col| {
            let observed: Vec<f64> = x
                .column(col)
                .iter()
                .copied()
                .filter(|v| !v.is_nan())
                .collect();
            if observed.is_empty() {
                None
            } else {
                Some(observed.mean())
            }
        })
        .collect();
    MeanImputer { means }
}

/// Fill NaN cells with the column mean and drop unobserved columns.
pub fn transform_all(x: &Array2<f64>, imputer: &MeanImputer) -> Array2<f64> {
    let kept = imputer.kept_columns();
    let mut out = x.select_columns(&kept);
    for row in 0..out.nrows() {
        for (col, &src) in kept.iter().enumerate() {
            if out[(row, col)].is_nan() {
                // kept columns always carry a mean
                out[(row, col)] = imputer.means[src].unwrap_or(0.0);
            }
        }
    }
    out
}

/// Impute a matrix in one call, keeping `feature_names` aligned with the
/// surviving columns.
pub fn fill_missing_with_mean(
    x: &Array2<f64>,
    feature_names: &[String],
) -> (Array2<f64>, Vec<String>) {
    let imputer = fit_imputer(x);
    let kept = imputer.kept_columns();

    for (idx, mean) in imputer.means.iter().enumerate() {
        if mean.is_none() {
            log::warn!(
                "Dropping feature '{}': no observed values",
                feature_names.get(idx).map(String::as_str).unwrap_or("?")
            );
        }
    }

    let n_missing = x.as_slice().iter().filter(|v| v.is_nan()).count();
    if n_missing > 0 {
        log::debug!("Filling {} missing feature values with column means", n_missing);
    }

    let names = kept.iter().map(|&idx| feature_names[idx].clone()).collect();
    (transform_all(x, &imputer), names)
}
