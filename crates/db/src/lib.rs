//! Document store for the Libris catalog.
//!
//! The store is deliberately small: records live in named collections, are
//! addressed by a store-generated [`RecordId`], and can be looked up by id or
//! by a simple equality [`Filter`]. There is no automatic dereferencing of
//! foreign ids; callers resolve references explicitly through
//! [`Collection::get`] and [`Collection::get_many`].

pub mod collection;
pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use collection::{Collection, Entity, Record};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use query::{Filter, Query};
pub use traits::{Document, DocumentStore, Fields, RecordId};
