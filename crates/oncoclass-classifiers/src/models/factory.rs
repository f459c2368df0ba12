use std::sync::Arc;

use crate::config::ModelType;
use crate::error::Result;
use crate::mode::ClassificationMode;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::naive_bayes::MultinomialNaiveBayes;
use crate::models::random_forest::{RRandomForest, Rscript};
use crate::sampling::SampleRates;

/// Build a fresh, unfitted classifier for `mode`. `seed` drives engines that
/// have their own randomness.
pub fn build_model(
    model_type: &ModelType,
    mode: ClassificationMode,
    rates: SampleRates,
    seed: u64,
) -> Result<Box<dyn ClassifierModel>> {
    match model_type {
        ModelType::NaiveBayes { alpha } => {
            Ok(Box::new(MultinomialNaiveBayes::new(mode.n_classes(), *alpha)))
        }
        ModelType::RandomForest { ntree, rscript } => Ok(Box::new(RRandomForest::new(
            mode.n_classes(),
            *ntree,
            rates,
            seed,
            Arc::new(Rscript::new(rscript.clone())),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::PositiveClass;
    use std::path::PathBuf;

    #[test]
    fn builds_unfitted_models_for_the_mode() {
        let rates = SampleRates::new(0.02, 0.7).unwrap();

        let nb = build_model(&ModelType::default(), ClassificationMode::TernaryOncoTsg, rates, 1).unwrap();
        assert_eq!(nb.n_classes(), 3);
        assert!(!nb.is_fitted());
        assert!(!nb.resamples_internally());

        let rf = build_model(
            &ModelType::RandomForest {
                ntree: 10,
                rscript: PathBuf::from("Rscript"),
            },
            ClassificationMode::Binary(PositiveClass::Oncogene),
            rates,
            1,
        )
        .unwrap();
        assert_eq!(rf.n_classes(), 2);
        assert_eq!(rf.name(), "r_random_forest");
        assert!(rf.resamples_internally());
    }
}
