use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenreError>;

#[derive(Error, Debug)]
pub enum GenreError {
    #[error("Training corpus has no usable samples")]
    EmptyCorpus,

    #[error("Training corpus produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("Model is not trained")]
    Untrained,

    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
