//! Typed access to a collection of documents.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::ser::{Error as _, Serialize, Serializer};

use crate::error::{Result, StoreError};
use crate::query::{Filter, Query};
use crate::traits::{Document, DocumentStore, Fields, RecordId};

/// A type stored as a document in a named collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the backing collection.
    const COLLECTION: &'static str;

    /// Derived, read-only fields added when a stored record is serialized for
    /// display (urls, formatted names). Never persisted.
    fn virtuals(&self, _id: &RecordId) -> Fields {
        Fields::new()
    }
}

/// A typed record with its identity.
///
/// Serializes as a flat object: the entity's own fields plus `id` and any
/// [`Entity::virtuals`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: RecordId,
    pub data: T,
}

impl<T: Entity> Record<T> {
    pub fn new(id: RecordId, data: T) -> Self {
        Self { id, data }
    }

    fn from_document(document: Document) -> Result<Self> {
        let data = serde_json::from_value(serde_json::Value::Object(document.fields))
            .map_err(|e| StoreError::serialization(T::COLLECTION, e))?;
        Ok(Self {
            id: document.id,
            data,
        })
    }
}

impl<T: Entity> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut fields = match serde_json::to_value(&self.data).map_err(S::Error::custom)? {
            serde_json::Value::Object(fields) => fields,
            _ => return Err(S::Error::custom("entity did not serialize to an object")),
        };
        fields.insert(
            "id".to_string(),
            serde_json::Value::String(self.id.to_string()),
        );
        fields.extend(self.data.virtuals(&self.id));
        fields.serialize(serializer)
    }
}

fn to_fields<T: Entity>(data: &T) -> Result<Fields> {
    match serde_json::to_value(data).map_err(|e| StoreError::serialization(T::COLLECTION, e))? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::NotAnObject {
            collection: T::COLLECTION.to_string(),
        }),
    }
}

/// Typed handle over one collection of a shared [`DocumentStore`].
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn find(&self, query: &Query) -> Result<Vec<Record<T>>> {
        self.store
            .find(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    /// Every record, unsorted.
    pub async fn all(&self) -> Result<Vec<Record<T>>> {
        self.find(&Query::all()).await
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Record<T>>> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(Record::from_document)
            .transpose()
    }

    pub async fn get(&self, id: &RecordId) -> Result<Option<Record<T>>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(Record::from_document)
            .transpose()
    }

    /// Resolve a list of ids, preserving their order and skipping ids that no
    /// longer resolve.
    pub async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<Record<T>>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        self.store.count(T::COLLECTION, filter).await
    }

    pub async fn insert(&self, data: T) -> Result<Record<T>> {
        let document = self.store.insert(T::COLLECTION, to_fields(&data)?).await?;
        Ok(Record::new(document.id, data))
    }

    /// Replace the record with id `id`. Returns `Ok(None)` if it is gone.
    pub async fn update(&self, id: &RecordId, data: T) -> Result<Option<Record<T>>> {
        let updated = self
            .store
            .update_by_id(T::COLLECTION, id, to_fields(&data)?)
            .await?;
        Ok(updated.map(|document| Record::new(document.id, data)))
    }

    pub async fn delete(&self, id: &RecordId) -> Result<bool> {
        self.store.delete_by_id(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Shelf {
        label: String,
        #[serde(default)]
        tags: Vec<RecordId>,
    }

    impl Entity for Shelf {
        const COLLECTION: &'static str = "shelves";

        fn virtuals(&self, id: &RecordId) -> Fields {
            let mut fields = Fields::new();
            fields.insert("url".into(), json!(format!("/shelf/{id}")));
            fields
        }
    }

    fn shelves() -> Collection<Shelf> {
        Collection::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn record_serializes_flat_with_virtuals() {
        let shelves = shelves();
        let record = shelves
            .insert(Shelf {
                label: "A".into(),
                tags: vec![],
            })
            .await
            .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["label"], json!("A"));
        assert_eq!(value["id"], json!(record.id.to_string()));
        assert_eq!(value["url"], json!(format!("/shelf/{}", record.id)));
    }

    #[tokio::test]
    async fn get_many_skips_dangling_ids() {
        let shelves = shelves();
        let a = shelves
            .insert(Shelf {
                label: "A".into(),
                tags: vec![],
            })
            .await
            .unwrap();

        let resolved = shelves
            .get_many(&[RecordId::new("gone"), a.id.clone()])
            .await
            .unwrap();
        assert_eq!(resolved, vec![a]);
    }

    #[tokio::test]
    async fn filter_by_reference_in_array() {
        let shelves = shelves();
        let tag = RecordId::generate();
        shelves
            .insert(Shelf {
                label: "tagged".into(),
                tags: vec![tag.clone()],
            })
            .await
            .unwrap();
        shelves
            .insert(Shelf {
                label: "plain".into(),
                tags: vec![],
            })
            .await
            .unwrap();

        let found = shelves
            .find(&Query::filtered(Filter::eq("tags", tag.as_str())))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data.label, "tagged");
    }
}
