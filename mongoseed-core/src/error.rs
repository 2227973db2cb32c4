// mongoseed-core/src/error.rs
use thiserror::Error;

/// Errors raised while building fixtures or talking to a document store
#[derive(Error, Debug)]
pub enum SeedError {
    /// Store unreachable (I/O, server selection, DNS, authentication)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A document with the same `_id` already exists in the collection
    #[error("Duplicate key in collection '{collection}': {message}")]
    DuplicateKey { collection: String, message: String },

    /// The store's schema rejected a document
    #[error("Document failed validation: {0}")]
    Validation(String),

    #[error("Invalid fixture literal: {0}")]
    InvalidFixture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other store failure
    #[error("Database error: {0}")]
    Database(String),
}

impl SeedError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, SeedError::DuplicateKey { .. })
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        SeedError::Serialization(err.to_string())
    }
}

impl From<bson::oid::Error> for SeedError {
    fn from(err: bson::oid::Error) -> Self {
        SeedError::InvalidFixture(format!("bad ObjectId: {}", err))
    }
}

impl From<chrono::ParseError> for SeedError {
    fn from(err: chrono::ParseError) -> Self {
        SeedError::InvalidFixture(format!("bad timestamp: {}", err))
    }
}

impl From<base64::DecodeError> for SeedError {
    fn from(err: base64::DecodeError) -> Self {
        SeedError::InvalidFixture(format!("bad base64 payload: {}", err))
    }
}

impl From<toml::de::Error> for SeedError {
    fn from(err: toml::de::Error) -> Self {
        SeedError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
