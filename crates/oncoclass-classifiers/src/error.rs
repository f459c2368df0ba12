//! Error type shared by the classifier layer.

use oncoclass_mutations::error::MutationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClassifierError>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Contradictory or insufficient classifier settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A model was used before a successful `fit`.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The external R runtime failed or returned unusable output.
    #[error("R bridge error: {0}")]
    Bridge(String),

    /// Misaligned or malformed input tables.
    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Mutations(#[from] MutationError),
}
