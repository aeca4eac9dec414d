use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Degenerate vector: cosine similarity is undefined for a zero-norm embedding")]
    DegenerateVector,

    #[error("Garment not found: {0}")]
    GarmentNotFound(String),

    #[error("No eligible garments in the corpus for this query")]
    EmptyCorpus,

    #[error("Invalid top_k: {0} (must be at least 1)")]
    InvalidTopK(usize),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => "dimension_mismatch",
            Error::DegenerateVector => "degenerate_vector",
            Error::GarmentNotFound(_) => "garment_not_found",
            Error::EmptyCorpus => "empty_corpus",
            Error::InvalidTopK(_) => "invalid_top_k",
            Error::InvalidWeights(_) => "invalid_weights",
            Error::InvalidInput(_) => "invalid_input",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }
}
