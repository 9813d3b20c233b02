use thiserror::Error;

/// Top-level error type for the mediavault system.
///
/// Storage failures wrap the underlying driver message as text so that
/// rusqlite errors never leak across crate boundaries. Callers match on the
/// variant, not the inner string.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VaultError {
    fn from(err: toml::ser::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for mediavault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
