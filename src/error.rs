//! Error types for the qsnake crate

use thiserror::Error;

/// Main error type for the qsnake crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position ({x}, {y}) is out of bounds for a {grid_size}x{grid_size} table")]
    PositionOutOfBounds { x: i32, y: i32, grid_size: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("malformed value table: {message}")]
    MalformedTable { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
