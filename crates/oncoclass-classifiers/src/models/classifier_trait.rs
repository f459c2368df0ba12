use crate::error::{ClassifierError, Result};
use crate::math::Array2;

/// Uniform contract over the statistical engines. Labels are the 0-based
/// class codes of the run's `ClassificationMode`; probability matrices have
/// one row per input row and one column per class code.
pub trait ClassifierModel: Send {
    /// Fit the model, replacing any previous fit. On error the model is left
    /// unfitted.
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()>;

    /// Predicted class code per row, in input order.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>>;

    /// Per-class probabilities per row, in input order.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Classes and probabilities together. Engines that produce both from a
    /// single call override this.
    fn predict_with_proba(&self, x: &Array2<f64>) -> Result<(Vec<usize>, Array2<f64>)> {
        Ok((self.predict(x)?, self.predict_proba(x)?))
    }

    fn n_classes(&self) -> usize;

    fn is_fitted(&self) -> bool;

    /// Whether `fit` already rebalances classes itself, so callers should not
    /// subsample the training set again.
    fn resamples_internally(&self) -> bool {
        false
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Shared input checks for `fit`.
pub(crate) fn check_training_data(x: &Array2<f64>, y: &[usize], n_classes: usize) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ClassifierError::Data(format!(
            "feature matrix has {} rows but {} labels were given",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(ClassifierError::Data("empty training set".to_string()));
    }
    if x.ncols() == 0 {
        return Err(ClassifierError::Data("training set has no features".to_string()));
    }
    if let Some(&code) = y.iter().find(|&&code| code >= n_classes) {
        return Err(ClassifierError::Data(format!(
            "label {} outside of the {} class codes",
            code, n_classes
        )));
    }
    Ok(())
}

pub(crate) fn not_fitted(name: &str) -> ClassifierError {
    ClassifierError::InvalidState(format!("{} model must be fitted before predicting", name))
}
