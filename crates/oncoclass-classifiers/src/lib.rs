//! oncoclass-classifiers: oncogene / tumor suppressor gene classification.
//!
//! Reads per-gene mutation feature tables, encodes gene classes for a binary
//! or three-class run, and estimates held-out class probabilities over
//! repeated stratified partitions. Two engines sit behind the
//! `ClassifierModel` trait: an in-process multinomial Naive Bayes and a
//! random forest run by R through `Rscript`.
pub mod classifier;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod iteration;
pub mod math;
pub mod mode;
pub mod models;
pub mod preprocessing;
pub mod sampling;
pub mod stats;

pub use classifier::{GeneClassifier, GenePrediction, GenePredictions};
pub use config::{ClassifyConfig, ColumnConfig, HoldoutStrategy, ModelType};
pub use error::{ClassifierError, Result};
pub use mode::{ClassificationMode, PositiveClass};
