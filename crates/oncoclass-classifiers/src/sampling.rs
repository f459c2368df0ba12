//! Class-imbalance resampling.
//!
//! Oncogenes and TSGs are rare next to the background class. Training sets
//! are biased toward them by drawing `round(count * rate)` examples per
//! class, with one rate for the driver classes and one for the background.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ClassifierError, Result};

/// Per-class sampling rates, each in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRates {
    other: f64,
    driver: f64,
}

impl SampleRates {
    pub fn new(other_sample_rate: f64, driver_sample_rate: f64) -> Result<Self> {
        for (name, rate) in [
            ("other_sample_rate", other_sample_rate),
            ("driver_sample_rate", driver_sample_rate),
        ] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ClassifierError::Configuration(format!(
                    "{} must be in (0, 1], got {}",
                    name, rate
                )));
            }
        }
        Ok(Self {
            other: other_sample_rate,
            driver: driver_sample_rate,
        })
    }

    /// Rate for a class code. Code 0 is the background class in every mode.
    pub fn rate_for(&self, code: usize) -> f64 {
        if code == 0 {
            self.other
        } else {
            self.driver
        }
    }
}

/// Target number of training examples per class code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSizes(Vec<usize>);

impl SampleSizes {
    /// `target[c] = round(counts[c] * rate[c])`.
    pub fn from_counts(counts: &[usize], rates: &SampleRates) -> Self {
        SampleSizes(
            counts
                .iter()
                .enumerate()
                .map(|(code, &count)| (count as f64 * rates.rate_for(code)).round() as usize)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Same sizes, raised to 1 for every class that has examples. Used where
    /// a zero size would drop a class from training entirely.
    pub fn at_least_one(&self, counts: &[usize]) -> SampleSizes {
        SampleSizes(
            self.0
                .iter()
                .zip(counts)
                .map(|(&size, &count)| if count > 0 { size.max(1) } else { size })
                .collect(),
        )
    }
}

/// Number of rows of each class code among `rows`.
pub fn class_counts(rows: &[usize], labels: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &row in rows {
        counts[labels[row]] += 1;
    }
    counts
}

/// Draw a class-stratified subsample of `rows` without replacement.
///
/// Each class contributes `round(count * rate)` rows (at least one if the
/// class is present). The result keeps the relative order of `rows`.
pub fn stratified_subsample<R: Rng + ?Sized>(
    rows: &[usize],
    labels: &[usize],
    n_classes: usize,
    rates: &SampleRates,
    rng: &mut R,
) -> Vec<usize> {
    let counts = class_counts(rows, labels, n_classes);
    let sizes = SampleSizes::from_counts(&counts, rates).at_least_one(&counts);

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for &row in rows {
        by_class[labels[row]].push(row);
    }

    let mut keep = vec![false; labels.len()];
    for (code, members) in by_class.iter().enumerate() {
        for &row in members.choose_multiple(rng, sizes.as_slice()[code]) {
            keep[row] = true;
        }
    }

    log::trace!(
        "Subsampled training rows per class {:?} -> {:?}",
        counts,
        sizes.as_slice()
    );

    rows.iter().copied().filter(|&row| keep[row]).collect()
}
