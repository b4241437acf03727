use thiserror::Error;

use crate::vector::FitId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for '{field}': {value:?} ({reason})")]
    Validation {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Unknown category for '{field}': {value:?} was not seen when the encoder was fitted")]
    UnknownCategory { field: &'static str, value: String },

    #[error("Cannot fit an encoder on an empty population")]
    EmptyPopulation,

    #[error("Vectors from different fits cannot be compared: expected {expected}, got {actual}")]
    FitMismatch { expected: FitId, actual: FitId },

    #[error("Fit is stale: fitted on generation {fitted_generation} ({fitted_len} profiles), population is generation {generation} ({len} profiles)")]
    StaleFit {
        fitted_generation: u64,
        fitted_len: usize,
        generation: u64,
        len: usize,
    },

    #[error("Duplicate profile key in population: {0}")]
    DuplicateKey(String),

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("Failed to persist submission: {0}")]
    StoreWrite(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Field name carried by validation and vocabulary errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Validation { field, .. } | Error::UnknownCategory { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Error::Validation {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
