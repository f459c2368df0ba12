//! Gene classifier: preparation, repeated held-out prediction and
//! aggregation wired together for one configured run.
use oncoclass_mutations::reference::{GeneClass, ReferenceGeneSets};

use crate::config::ClassifyConfig;
use crate::data_handling::{prepare, PreparedData};
use crate::error::Result;
use crate::io::GeneTable;
use crate::iteration::{aggregate, AggregatedPrediction, IterationDriver};
use crate::mode::ClassificationMode;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_model;
use crate::stats::ClassificationSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct GenePrediction {
    pub gene: String,
    pub true_class: GeneClass,
    /// `true_class` encoded for the run's mode.
    pub true_code: usize,
    pub result: Option<AggregatedPrediction>,
}

/// Aggregated predictions in the order of the filtered input table.
#[derive(Debug, Clone, PartialEq)]
pub struct GenePredictions {
    pub mode: ClassificationMode,
    pub genes: Vec<GenePrediction>,
}

impl GenePredictions {
    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary::from_pairs(
            self.genes
                .iter()
                .filter_map(|g| g.result.as_ref().map(|r| (g.true_code, r.pred_class))),
            self.mode.n_classes(),
        )
    }
}

#[derive(Debug)]
pub struct GeneClassifier {
    config: ClassifyConfig,
    data: PreparedData,
}

impl GeneClassifier {
    pub fn new(
        table: &GeneTable,
        reference: Option<&ReferenceGeneSets>,
        config: ClassifyConfig,
    ) -> Result<Self> {
        config.validate()?;
        let data = prepare(table, reference, &config)?;
        Ok(Self { config, data })
    }

    pub fn data(&self) -> &PreparedData {
        &self.data
    }

    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    /// Held-out predictions with the configured model.
    pub fn kfold_validation(&self) -> Result<GenePredictions> {
        let model_type = self.config.model.clone();
        let mode = self.data.mode;
        let rates = self.config.sample_rates()?;
        log::info!("Classifying with {}", model_type.name());
        self.kfold_validation_with(move |seed| build_model(&model_type, mode, rates, seed))
    }

    /// Held-out predictions with models from `factory`.
    pub fn kfold_validation_with<F>(&self, factory: F) -> Result<GenePredictions>
    where
        F: Fn(u64) -> Result<Box<dyn ClassifierModel>> + Sync,
    {
        let driver = IterationDriver::new(&self.data, &self.config)?;
        let results = driver.run(factory)?;
        let aggregated = aggregate(&results, self.data.nrows(), self.data.mode.n_classes())?;

        let mut slots: Vec<Option<GenePrediction>> = vec![None; self.data.nrows()];
        for (row, result) in aggregated.into_iter().enumerate() {
            slots[self.data.original_index[row]] = Some(GenePrediction {
                gene: self.data.genes[row].clone(),
                true_class: self.data.true_classes[row],
                true_code: self.data.y[row],
                result,
            });
        }

        let predictions = GenePredictions {
            mode: self.data.mode,
            genes: slots.into_iter().flatten().collect(),
        };
        predictions
            .summary()
            .log_summary(self.data.mode.class_names());
        Ok(predictions)
    }
}
