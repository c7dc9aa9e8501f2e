//! Error types for document store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document could not be converted to or from its typed form.
    #[error("serialization error in collection '{collection}': {source}")]
    Serialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// A typed record did not serialize to a JSON object.
    #[error("record for collection '{collection}' is not an object")]
    NotAnObject { collection: String },

    /// The backend refused or failed the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn serialization(collection: &str, source: serde_json::Error) -> Self {
        Self::Serialization {
            collection: collection.to_string(),
            source,
        }
    }
}

/// Convenience type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
