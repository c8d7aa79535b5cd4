use thiserror::Error;

/// Failures surfaced by entity store operations.
///
/// Every variant carries a human readable message; the same text is recorded on
/// the failing operation's error field so it can be shown next to the action
/// that triggered it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Load(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("operation interrupted: {0}")]
    Interrupted(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }
}

/// Failures reported by a repository adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("request failed: {0}")]
    Unavailable(String),
    #[error("seed data error: {0}")]
    Seed(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Seed(err.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Seed(err.to_string())
    }
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A user-entered amount that is not a number greater than zero.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid amount `{0}`: enter a number greater than 0")]
pub struct InvalidAmount(pub String);
