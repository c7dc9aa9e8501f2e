//! Catalog home page with record counts.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use libris_db::Filter;
use libris_http::Page;
use libris_kernel::{Endpoint, Module};
use serde_json::json;

use crate::catalog::Catalog;
use crate::modules::book_instances::models::Status;

pub struct HomeModule {
    catalog: Catalog,
}

impl HomeModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .with_state(self.catalog.clone())
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::get("/", "Catalog home with record counts")]
    }
}

/// Count every collection at once. A failed count does not fail the page:
/// it renders as unavailable and the first failure is shown.
pub async fn index(State(catalog): State<Catalog>) -> Page {
    let all = Filter::all();
    let available = Filter::eq("status", Status::Available.as_str());
    let (books, copies, copies_available, authors, genres) = tokio::join!(
        catalog.books.count(&all),
        catalog.instances.count(&all),
        catalog.instances.count(&available),
        catalog.authors.count(&all),
        catalog.genres.count(&all),
    );

    let error = [&books, &copies, &copies_available, &authors, &genres]
        .into_iter()
        .find_map(|count| count.as_ref().err());
    if let Some(err) = error {
        tracing::warn!(module = "home", error = %err, "catalog counts incomplete");
    }

    Page::render(
        "index.html",
        json!({
            "title": "Local Library Home",
            "error": error.map(ToString::to_string),
            "data": {
                "book_count": books.ok(),
                "book_instance_count": copies.ok(),
                "book_instance_available_count": copies_available.ok(),
                "author_count": authors.ok(),
                "genre_count": genres.ok(),
            },
        }),
    )
}

pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(HomeModule::new(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{memory_catalog, FailingStore};
    use crate::modules::book_instances::models::BookInstance;
    use crate::modules::genres::models::Genre;
    use libris_db::RecordId;

    async fn add_copy(catalog: &Catalog, status: Status) {
        catalog
            .instances
            .insert(BookInstance {
                book: RecordId::generate(),
                imprint: "Tor".into(),
                status,
                due_back: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn counts_every_collection() {
        let catalog = memory_catalog();
        add_copy(&catalog, Status::Available).await;
        add_copy(&catalog, Status::Loaned).await;
        add_copy(&catalog, Status::Available).await;
        catalog
            .genres
            .insert(Genre {
                name: "Fantasy".into(),
            })
            .await
            .unwrap();

        let page = index(State(catalog)).await;
        let context = &page.view().unwrap().context;
        assert_eq!(context["title"], "Local Library Home");
        assert!(context["error"].is_null());
        assert_eq!(context["data"]["book_count"], 0);
        assert_eq!(context["data"]["book_instance_count"], 3);
        assert_eq!(context["data"]["book_instance_available_count"], 2);
        assert_eq!(context["data"]["genre_count"], 1);
    }

    #[tokio::test]
    async fn failed_count_is_reported_without_failing_the_page() {
        let page = index(State(FailingStore::catalog("genres"))).await;
        let context = &page.view().unwrap().context;
        assert_eq!(context["error"], "store unavailable: genres is offline");
        assert!(context["data"]["genre_count"].is_null());
        assert_eq!(context["data"]["author_count"], 0);
    }
}
