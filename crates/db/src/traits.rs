//! The [`DocumentStore`] trait defining the storage interface.
//!
//! Any backend implements this trait to hold catalog records. Documents are
//! schemaless JSON objects; typing happens one layer up in
//! [`crate::collection`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::query::{Filter, Query};

/// Field map of a stored document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Store-generated identity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing id, e.g. one taken from a request path.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A stored document: identity plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: RecordId,
    pub fields: Fields,
}

/// Storage backend for catalog documents.
///
/// Implementations must be thread-safe and make every single-document
/// operation atomic. Nothing spanning more than one document is atomic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in `collection` matching the query, in the
    /// query's sort order (insertion order when unsorted).
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>>;

    /// Read a document by id. Returns `Ok(None)` if it does not exist.
    async fn find_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Document>>;

    /// Count the documents in `collection` matching `filter`.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Insert a new document and return it with its generated id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document>;

    /// Replace the fields of an existing document, keeping its id.
    ///
    /// Returns `Ok(None)` if no document has this id.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<Document>>;

    /// Delete a document by id.
    ///
    /// Returns `Ok(true)` if the document existed and was removed.
    async fn delete_by_id(&self, collection: &str, id: &RecordId) -> Result<bool>;

    /// Return the first document matching `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let query = Query::filtered(filter.clone());
        Ok(self.find(collection, &query).await?.into_iter().next())
    }
}
