//! Error types for clustering and recommendation.

use thiserror::Error;

/// Errors raised by the clustering engine, the cluster scorer and the loaders.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// A parameter is outside its valid range.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// A preferred genre is not a coordinate of a centroid.
    #[error("genre '{genre}' is not a centroid coordinate")]
    MissingKey {
        /// The genre that was looked up
        genre: String,
    },

    /// No user with the requested name exists.
    #[error("user '{0}' does not exist")]
    UnknownUser(String),

    /// A field of an input record could not be parsed.
    #[error("line {line}: cannot parse '{value}' as {expected}")]
    Parse {
        /// One-based record number
        line: usize,
        /// Offending value
        value: String,
        /// What the value should have been
        expected: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RecommendError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a MissingKey error.
    pub fn missing_key(genre: impl Into<String>) -> Self {
        Self::MissingKey {
            genre: genre.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
