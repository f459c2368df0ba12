//! Repeated randomized train/predict cycles and their aggregation.
//!
//! Every iteration draws its own holdout partition from an RNG seeded with
//! `(seed, iteration)`, trains a fresh model per partition and records the
//! held-out predictions keyed by row. Iterations are independent and run on
//! the rayon pool; `aggregate` sorts contributions by iteration before
//! reducing them, so the merge order of results does not matter.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use statrs::statistics::Statistics;

use crate::config::{ClassifyConfig, HoldoutStrategy};
use crate::data_handling::PreparedData;
use crate::error::{ClassifierError, Result};
use crate::math::argmax;
use crate::models::classifier_trait::ClassifierModel;
use crate::sampling::{class_counts, stratified_subsample, SampleRates};

/// One held-out prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPrediction {
    pub row: usize,
    pub class: usize,
    pub proba: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub iteration: usize,
    pub predictions: Vec<RowPrediction>,
}

/// Per-row summary over every iteration the row was held out in.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPrediction {
    pub n_heldout: usize,
    pub mean_proba: Vec<f64>,
    /// Population standard deviation of each class probability.
    pub sd_proba: Vec<f64>,
    /// Most frequent predicted class; ties go to the higher mean
    /// probability, then to the lower code.
    pub vote_class: usize,
    /// Class with the highest mean probability.
    pub pred_class: usize,
}

/// Seed of iteration `iteration` derived from the master seed.
pub fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    seed.wrapping_add((iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Train / held-out row partitions of one iteration, stratified by class.
pub fn holdout_partitions<R: Rng + ?Sized>(
    labels: &[usize],
    n_classes: usize,
    strategy: HoldoutStrategy,
    rng: &mut R,
) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &code) in labels.iter().enumerate() {
        by_class[code].push(row);
    }
    for members in by_class.iter_mut() {
        members.shuffle(rng);
    }

    let mut is_test = vec![usize::MAX; labels.len()];
    let n_parts = match strategy {
        HoldoutStrategy::KFold { folds } => {
            // round-robin continues across classes to keep folds balanced
            let mut next = 0;
            for members in &by_class {
                for &row in members {
                    is_test[row] = next % folds;
                    next += 1;
                }
            }
            folds
        }
        HoldoutStrategy::RandomSplit { test_fraction } => {
            for members in &by_class {
                let n_test = (members.len() as f64 * test_fraction).round() as usize;
                for &row in members.iter().take(n_test) {
                    is_test[row] = 0;
                }
            }
            1
        }
    };

    (0..n_parts)
        .map(|part| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&row| is_test[row] == part);
            (train, test)
        })
        .filter(|(_, test)| !test.is_empty())
        .collect()
}

pub struct IterationDriver<'a> {
    data: &'a PreparedData,
    holdout: HoldoutStrategy,
    total_iter: usize,
    weight: bool,
    rates: SampleRates,
    seed: u64,
}

impl<'a> IterationDriver<'a> {
    pub fn new(data: &'a PreparedData, config: &ClassifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            data,
            holdout: config.holdout,
            total_iter: config.total_iter,
            weight: config.weight,
            rates: config.sample_rates()?,
            seed: config.seed,
        })
    }

    /// Run one iteration. `factory` receives a seed and returns a fresh model.
    pub fn run_iteration<F>(&self, iteration: usize, factory: &F) -> Result<IterationResult>
    where
        F: Fn(u64) -> Result<Box<dyn ClassifierModel>>,
    {
        let seed = iteration_seed(self.seed, iteration);
        let mut rng = StdRng::seed_from_u64(seed);
        let labels = self.data.y.as_slice();
        let n_classes = self.data.mode.n_classes();

        let partitions = holdout_partitions(labels, n_classes, self.holdout, &mut rng);
        let mut predictions = Vec::with_capacity(self.data.nrows());

        for (part, (train, test)) in partitions.into_iter().enumerate() {
            let mut model = factory(iteration_seed(seed, part + 1))?;

            let train = if self.weight && !model.resamples_internally() {
                stratified_subsample(&train, labels, n_classes, &self.rates, &mut rng)
            } else {
                train
            };
            if train.is_empty() {
                return Err(ClassifierError::Data(format!(
                    "iteration {} partition {} has no training rows",
                    iteration, part
                )));
            }

            log::trace!(
                "Iteration {} partition {}: {} training rows {:?}, {} held out",
                iteration,
                part,
                train.len(),
                class_counts(&train, labels, n_classes),
                test.len()
            );

            let (x_train, y_train) = self.data.subset(&train);
            model.fit(&x_train, &y_train)?;

            let (x_test, _) = self.data.subset(&test);
            let (classes, proba) = model.predict_with_proba(&x_test)?;
            if classes.len() != test.len() || proba.nrows() != test.len() {
                return Err(ClassifierError::Data(format!(
                    "{} returned {} predictions for {} rows",
                    model.name(),
                    classes.len(),
                    test.len()
                )));
            }

            for (i, &row) in test.iter().enumerate() {
                predictions.push(RowPrediction {
                    row,
                    class: classes[i],
                    proba: proba.row_slice(i).to_vec(),
                });
            }
        }

        Ok(IterationResult {
            iteration,
            predictions,
        })
    }

    /// Run all iterations in parallel; results come back in iteration order.
    pub fn run<F>(&self, factory: F) -> Result<Vec<IterationResult>>
    where
        F: Fn(u64) -> Result<Box<dyn ClassifierModel>> + Sync,
    {
        log::info!(
            "Running {} iterations ({:?}, weighted training: {})",
            self.total_iter,
            self.holdout,
            self.weight
        );
        let mut results = (0..self.total_iter)
            .into_par_iter()
            .map(|iteration| {
                let result = self.run_iteration(iteration, &factory);
                if result.is_ok() {
                    log::debug!("Finished iteration {}", iteration);
                }
                result
            })
            .collect::<Result<Vec<_>>>()?;
        results.sort_by_key(|r| r.iteration);
        Ok(results)
    }
}

/// Reduce iteration results per row. Rows never held out yield `None`.
pub fn aggregate(
    results: &[IterationResult],
    n_rows: usize,
    n_classes: usize,
) -> Result<Vec<Option<AggregatedPrediction>>> {
    let mut per_row: Vec<Vec<(usize, &RowPrediction)>> = vec![Vec::new(); n_rows];
    for result in results {
        for prediction in &result.predictions {
            if prediction.row >= n_rows
                || prediction.class >= n_classes
                || prediction.proba.len() != n_classes
            {
                return Err(ClassifierError::Data(format!(
                    "iteration {} has a prediction outside {} rows x {} classes",
                    result.iteration, n_rows, n_classes
                )));
            }
            per_row[prediction.row].push((result.iteration, prediction));
        }
    }

    Ok(per_row
        .into_iter()
        .map(|mut contributions| {
            if contributions.is_empty() {
                return None;
            }
            contributions.sort_by_key(|&(iteration, _)| iteration);

            let mut mean_proba = Vec::with_capacity(n_classes);
            let mut sd_proba = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                let values: Vec<f64> = contributions.iter().map(|(_, p)| p.proba[class]).collect();
                mean_proba.push(values.iter().mean());
                sd_proba.push(values.iter().population_std_dev());
            }

            let mut votes = vec![0usize; n_classes];
            for (_, p) in &contributions {
                votes[p.class] += 1;
            }
            let vote_class = (0..n_classes)
                .max_by(|&a, &b| {
                    votes[a]
                        .cmp(&votes[b])
                        .then(mean_proba[a].total_cmp(&mean_proba[b]))
                        .then(b.cmp(&a))
                })
                .unwrap_or(0);
            let pred_class = argmax(&mean_proba).unwrap_or(vote_class);

            Some(AggregatedPrediction {
                n_heldout: contributions.len(),
                mean_proba,
                sd_proba,
                vote_class,
                pred_class,
            })
        })
        .collect())
}
