//! Multinomial Naive Bayes over non-negative count features.
//!
//! Additive smoothing with `alpha` on the per-class feature totals, class
//! priors from training frequencies. Classes missing from the training
//! labels get a zero prior and are never predicted.
use crate::error::{ClassifierError, Result};
use crate::math::{argmax, Array2};
use crate::models::classifier_trait::{check_training_data, not_fitted, ClassifierModel};

#[derive(Debug, Clone)]
struct FittedNaiveBayes {
    /// ln P(class), `-inf` for classes absent from training.
    class_log_prior: Vec<f64>,
    /// ln P(feature | class), `n_classes x n_features`.
    feature_log_prob: Array2<f64>,
}

#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    n_classes: usize,
    fitted: Option<FittedNaiveBayes>,
}

impl MultinomialNaiveBayes {
    pub fn new(n_classes: usize, alpha: f64) -> Self {
        Self {
            alpha,
            n_classes,
            fitted: None,
        }
    }

    fn fitted(&self) -> Result<&FittedNaiveBayes> {
        self.fitted.as_ref().ok_or_else(|| not_fitted(self.name()))
    }

    /// Unnormalized joint log likelihood `ln P(class) + sum x_j ln P(j | class)`.
    fn joint_log_likelihood(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let fitted = self.fitted()?;
        let n_features = fitted.feature_log_prob.ncols();
        if x.ncols() != n_features {
            return Err(ClassifierError::Data(format!(
                "model was fitted on {} features but {} were given",
                n_features,
                x.ncols()
            )));
        }
        check_counts(x)?;

        let mut jll = Array2::from_elem((x.nrows(), self.n_classes), 0.0);
        for (row, values) in x.rows().enumerate() {
            for class in 0..self.n_classes {
                let prior = fitted.class_log_prior[class];
                if prior == f64::NEG_INFINITY {
                    jll[(row, class)] = f64::NEG_INFINITY;
                    continue;
                }
                let log_probs = fitted.feature_log_prob.row_slice(class);
                let likelihood: f64 = values
                    .iter()
                    .zip(log_probs)
                    .filter(|(v, _)| **v != 0.0)
                    .map(|(v, lp)| v * lp)
                    .sum();
                jll[(row, class)] = prior + likelihood;
            }
            if !jll.row_slice(row).iter().any(|v| v.is_finite()) {
                return Err(ClassifierError::Data(format!(
                    "no class has a finite likelihood for row {}",
                    row
                )));
            }
        }
        Ok(jll)
    }
}

impl ClassifierModel for MultinomialNaiveBayes {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        self.fitted = None;
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(ClassifierError::Configuration(format!(
                "Naive Bayes alpha must be positive, got {}",
                self.alpha
            )));
        }
        check_training_data(x, y, self.n_classes)?;
        check_counts(x)?;

        let n_features = x.ncols();
        let mut class_count = vec![0usize; self.n_classes];
        let mut feature_count = Array2::from_elem((self.n_classes, n_features), 0.0);
        for (values, &class) in x.rows().zip(y) {
            class_count[class] += 1;
            for (acc, &v) in feature_count.row_slice_mut(class).iter_mut().zip(values) {
                *acc += v;
            }
        }

        let n_samples = y.len() as f64;
        let class_log_prior: Vec<f64> = class_count
            .iter()
            .map(|&count| {
                if count == 0 {
                    f64::NEG_INFINITY
                } else {
                    (count as f64 / n_samples).ln()
                }
            })
            .collect();

        let mut feature_log_prob = Array2::from_elem((self.n_classes, n_features), 0.0);
        for class in 0..self.n_classes {
            let counts = feature_count.row_slice(class);
            let denominator: f64 = counts.iter().sum::<f64>() + self.alpha * n_features as f64;
            for (feature, &count) in counts.iter().enumerate() {
                feature_log_prob[(class, feature)] = ((count + self.alpha) / denominator).ln();
            }
        }

        log::trace!(
            "Fitted {} on {} rows, class counts {:?}",
            self.name(),
            y.len(),
            class_count
        );

        self.fitted = Some(FittedNaiveBayes {
            class_log_prior,
            feature_log_prob,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let jll = self.joint_log_likelihood(x)?;
        jll.rows()
            .map(|row| {
                argmax(row).ok_or_else(|| {
                    ClassifierError::Data("no class has a finite likelihood".to_string())
                })
            })
            .collect()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut jll = self.joint_log_likelihood(x)?;
        for row in 0..jll.nrows() {
            softmax_in_place(jll.row_slice_mut(row));
        }
        Ok(jll)
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn name(&self) -> &str {
        "multinomial_naive_bayes"
    }
}

/// Log-sum-exp normalization of one row of log likelihoods.
fn softmax_in_place(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

fn check_counts(x: &Array2<f64>) -> Result<()> {
    match x.as_slice().iter().find(|v| !v.is_finite() || **v < 0.0) {
        Some(v) => Err(ClassifierError::Data(format!(
            "multinomial Naive Bayes needs non-negative finite features, got {}",
            v
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Array2<f64>, Vec<usize>) {
        let x = Array2::from_shape_vec(
            (6, 3),
            vec![
                9.0, 1.0, 0.0, //
                8.0, 0.0, 1.0, //
                1.0, 9.0, 0.0, //
                0.0, 8.0, 1.0, //
                0.0, 1.0, 9.0, //
                1.0, 0.0, 8.0,
            ],
        )
        .unwrap();
        (x, vec![0, 0, 1, 1, 2, 2])
    }

    #[test]
    fn predicts_training_rows_in_order() {
        let (x, y) = toy_data();
        let mut model = MultinomialNaiveBayes::new(3, 1.0);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), y);

        let proba = model.predict_proba(&x).unwrap();
        assert_eq!(proba.shape(), (6, 3));
        for row in proba.rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn smoothed_parameters() {
        let x = Array2::from_shape_vec((2, 2), vec![3.0, 1.0, 0.0, 2.0]).unwrap();
        let mut model = MultinomialNaiveBayes::new(2, 1.0);
        model.fit(&x, &[0, 1]).unwrap();

        let fitted = model.fitted.as_ref().unwrap();
        assert!((fitted.feature_log_prob[(0, 0)] - (4.0f64 / 6.0).ln()).abs() < 1e-12);
        assert!((fitted.feature_log_prob[(1, 0)] - (1.0f64 / 4.0).ln()).abs() < 1e-12);
        assert!((fitted.class_log_prior[0] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn absent_class_is_never_predicted() {
        let (x, _) = toy_data();
        let y = vec![0, 0, 1, 1, 1, 1];
        let mut model = MultinomialNaiveBayes::new(3, 1.0);
        model.fit(&x, &y).unwrap();

        assert!(model.predict(&x).unwrap().iter().all(|&c| c < 2));
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba.column(2).iter().all(|&p| p == 0.0));
    }

    #[test]
    fn predict_before_fit_is_invalid_state() {
        let (x, _) = toy_data();
        let model = MultinomialNaiveBayes::new(3, 1.0);
        assert!(matches!(model.predict(&x), Err(ClassifierError::InvalidState(_))));
        assert!(matches!(model.predict_proba(&x), Err(ClassifierError::InvalidState(_))));
    }

    #[test]
    fn rejects_negative_features_and_leaves_model_unfitted() {
        let (x, y) = toy_data();
        let mut model = MultinomialNaiveBayes::new(3, 1.0);
        model.fit(&x, &y).unwrap();

        let bad = Array2::from_shape_vec((1, 3), vec![1.0, -1.0, 0.0]).unwrap();
        assert!(matches!(model.fit(&bad, &[0]), Err(ClassifierError::Data(_))));
        assert!(!model.is_fitted());
    }

    #[test]
    fn zero_alpha_is_rejected_at_fit() {
        let x = Array2::from_shape_vec((4, 2), vec![5.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        let mut model = MultinomialNaiveBayes::new(2, 0.0);
        assert!(matches!(
            model.fit(&x, &[0, 0, 1, 1]),
            Err(ClassifierError::Configuration(_))
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn rows_without_finite_likelihood_are_errors() {
        let (x, y) = toy_data();
        let mut model = MultinomialNaiveBayes::new(3, 1.0);
        model.fit(&x, &y).unwrap();

        // Every class likelihood overflows to -inf.
        let huge = Array2::from_shape_vec((1, 3), vec![f64::MAX, f64::MAX, f64::MAX]).unwrap();
        assert!(matches!(model.predict(&huge), Err(ClassifierError::Data(_))));
        assert!(matches!(model.predict_proba(&huge), Err(ClassifierError::Data(_))));
    }

    #[test]
    fn rejects_misaligned_labels() {
        let (x, _) = toy_data();
        let mut model = MultinomialNaiveBayes::new(3, 1.0);
        assert!(matches!(model.fit(&x, &[0, 1]), Err(ClassifierError::Data(_))));
        assert!(matches!(model.fit(&x, &[0, 1, 2, 3, 0, 0]), Err(ClassifierError::Data(_))));
    }
}
