use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ClassifierError, Result};
use crate::mode::ClassificationMode;
use crate::sampling::SampleRates;

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Multinomial Naive Bayes with additive smoothing `alpha`.
    NaiveBayes { alpha: f64 },
    /// R `randomForest` run out of process through `rscript`.
    RandomForest { ntree: u32, rscript: PathBuf },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::NaiveBayes { alpha: 1.0 }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::NaiveBayes { .. } => "naive_bayes",
            ModelType::RandomForest { .. } => "random_forest",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive_bayes" | "nb" => Ok(ModelType::NaiveBayes { alpha: 1.0 }),
            "random_forest" | "rf" => Ok(ModelType::RandomForest {
                ntree: 1000,
                rscript: PathBuf::from("Rscript"),
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: naive_bayes (nb), random_forest (rf)",
                s
            )),
        }
    }
}

/// How each iteration chooses its held-out rows.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HoldoutStrategy {
    /// Stratified k-fold: every row is held out once per iteration.
    KFold { folds: usize },
    /// One stratified random held-out set per iteration.
    RandomSplit { test_fraction: f64 },
}

impl Default for HoldoutStrategy {
    fn default() -> Self {
        HoldoutStrategy::KFold { folds: 3 }
    }
}

/// Column names of the classifier input table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnConfig {
    pub gene_column: String,
    pub total_column: String,
    /// Optional class column (0/1/2 or other/oncogene/tsg). When absent
    /// from the table, classes come from the reference gene lists.
    pub class_column: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            gene_column: "gene".to_string(),
            total_column: "total".to_string(),
            class_column: "true class".to_string(),
        }
    }
}

/// Settings of a classification run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Rows whose total mutation count is below this are dropped.
    pub min_count: f64,
    /// Subsample training partitions per class with the sample rates.
    pub weight: bool,
    pub total_iter: usize,
    pub other_sample_rate: f64,
    pub driver_sample_rate: f64,
    pub classify_oncogene: bool,
    pub classify_tsg: bool,
    pub seed: u64,
    pub holdout: HoldoutStrategy,
    pub model: ModelType,
    pub columns: ColumnConfig,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            min_count: 0.0,
            weight: false,
            total_iter: 5,
            other_sample_rate: 0.02,
            driver_sample_rate: 0.7,
            classify_oncogene: true,
            classify_tsg: true,
            seed: 42,
            holdout: HoldoutStrategy::default(),
            model: ModelType::default(),
            columns: ColumnConfig::default(),
        }
    }
}

impl ClassifyConfig {
    pub fn mode(&self) -> Result<ClassificationMode> {
        ClassificationMode::from_flags(self.classify_oncogene, self.classify_tsg)
    }

    pub fn sample_rates(&self) -> Result<SampleRates> {
        SampleRates::new(self.other_sample_rate, self.driver_sample_rate)
    }

    /// Check every setting that can be checked without data.
    pub fn validate(&self) -> Result<()> {
        self.mode()?;
        self.sample_rates()?;

        if self.total_iter == 0 {
            return Err(ClassifierError::Configuration(
                "total_iter must be at least 1".to_string(),
            ));
        }
        if !self.min_count.is_finite() {
            return Err(ClassifierError::Configuration(format!(
                "min_count must be finite, got {}",
                self.min_count
            )));
        }
        match self.holdout {
            HoldoutStrategy::KFold { folds } if folds < 2 => {
                return Err(ClassifierError::Configuration(format!(
                    "k-fold holdout needs at least 2 folds, got {}",
                    folds
                )))
            }
            HoldoutStrategy::RandomSplit { test_fraction }
                if !(test_fraction > 0.0 && test_fraction < 1.0) =>
            {
                return Err(ClassifierError::Configuration(format!(
                    "test_fraction must be in (0, 1), got {}",
                    test_fraction
                )))
            }
            _ => {}
        }
        match &self.model {
            ModelType::NaiveBayes { alpha } if !(*alpha > 0.0 && alpha.is_finite()) => {
                Err(ClassifierError::Configuration(format!(
                    "Naive Bayes alpha must be positive, got {}",
                    alpha
                )))
            }
            ModelType::RandomForest { ntree, .. } if *ntree == 0 => Err(
                ClassifierError::Configuration("random forest needs at least one tree".to_string()),
            ),
            _ => Ok(()),
        }
    }
}
