use thiserror::Error;

/// Main error type for quantity detection and query parsing
#[derive(Error, Debug)]
pub enum QtyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query parse error: {0}")]
    QueryParseError(String),

    #[error("Unknown query parser: {0}")]
    UnknownParser(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for quantity detection operations
pub type Result<T> = std::result::Result<T, QtyError>;

impl QtyError {
    /// Shorthand for building a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        QtyError::Config(message.into())
    }

    /// Check if this error was raised while loading configuration.
    ///
    /// Configuration errors are fatal: the parser plugin must not load.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            QtyError::Config(_) | QtyError::Serialization(_) | QtyError::Io(_)
        )
    }
}
