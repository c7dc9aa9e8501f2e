//! Shared request state: typed handles on every catalog collection.

use std::sync::Arc;

use libris_db::{Collection, DocumentStore, Entity, Record, RecordId};
use serde::Serialize;

use crate::modules::authors::models::Author;
use crate::modules::book_instances::models::BookInstance;
use crate::modules::books::models::Book;
use crate::modules::genres::models::Genre;

/// Path prefix every catalog route is mounted under.
pub const CATALOG_PATH: &str = "/catalog";

#[derive(Clone)]
pub struct Catalog {
    pub authors: Collection<Author>,
    pub books: Collection<Book>,
    pub instances: Collection<BookInstance>,
    pub genres: Collection<Genre>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            authors: Collection::new(Arc::clone(&store)),
            books: Collection::new(Arc::clone(&store)),
            instances: Collection::new(Arc::clone(&store)),
            genres: Collection::new(store),
        }
    }
}

/// A form option annotated with whether the current entity selects it.
///
/// Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice<T: Entity> {
    #[serde(flatten)]
    pub record: Record<T>,
    pub checked: bool,
}

/// Mark every candidate whose id appears in `selected`.
pub fn mark_selected<T: Entity>(candidates: Vec<Record<T>>, selected: &[RecordId]) -> Vec<Choice<T>> {
    candidates
        .into_iter()
        .map(|record| {
            let checked = selected.contains(&record.id);
            Choice { record, checked }
        })
        .collect()
}
