//! In-memory document store for tests, demos and ephemeral deployments.
//!
//! [`InMemoryStore`] keeps each collection as an insertion-ordered vector
//! behind a single `RwLock`. Data is lost when the store is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::query::{Filter, Query};
use crate::traits::{Document, DocumentStore, Fields, RecordId};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        query.sort(&mut found);
        Ok(found)
    }

    async fn find_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| &doc.id == id))
            .cloned())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document> {
        let document = Document {
            id: RecordId::generate(),
            fields,
        };
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        tracing::debug!(collection, id = %document.id, "document inserted");
        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
        else {
            return Ok(None);
        };
        existing.fields = fields;
        tracing::debug!(collection, %id, "document updated");
        Ok(Some(existing.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: &RecordId) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| &doc.id != id);
        let removed = docs.len() < before;
        if removed {
            tracing::debug!(collection, %id, "document deleted");
        }
        Ok(removed)
    }
}
