use thiserror::Error;

/// Top-level error type for the Cardlink system.
///
/// Dispatching an action never fails; these errors come from the edges
/// (loading configuration, reading host-supplied JSON).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CardlinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid entity id: {0}")]
    InvalidEntityId(String),
}

impl From<toml::de::Error> for CardlinkError {
    fn from(err: toml::de::Error) -> Self {
        CardlinkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CardlinkError {
    fn from(err: toml::ser::Error) -> Self {
        CardlinkError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CardlinkError {
    fn from(err: serde_json::Error) -> Self {
        CardlinkError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Cardlink operations.
pub type Result<T> = std::result::Result<T, CardlinkError>;
