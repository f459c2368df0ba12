use thiserror::Error;

pub type Result<T> = std::result::Result<T, MutationError>;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Invalid reference gene list {path}: {reason}")]
    InvalidGeneList { path: String, reason: String },
}
