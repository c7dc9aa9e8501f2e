pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{Endpoint, InitCtx, Module};

use crate::catalog::Catalog;
use handlers::*;

/// Books module: titles with their author, genres and copies
pub struct BooksModule {
    catalog: Catalog,
}

impl BooksModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.catalog.books.count(&Filter::all()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = count,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(book_list))
            .route("/book/create", get(book_create_get).post(book_create_post))
            .route("/book/{id}", get(book_detail))
            .route("/book/{id}/delete", get(book_delete_get).post(book_delete_post))
            .route("/book/{id}/update", get(book_update_get).post(book_update_post))
            .with_state(self.catalog.clone())
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::get("/books", "List books"),
            Endpoint::get("/book/create", "Book create form"),
            Endpoint::post("/book/create", "Create book"),
            Endpoint::get("/book/{id}", "Book detail"),
            Endpoint::get("/book/{id}/delete", "Book delete confirmation"),
            Endpoint::post("/book/{id}/delete", "Delete book"),
            Endpoint::get("/book/{id}/update", "Book update form"),
            Endpoint::post("/book/{id}/update", "Update book"),
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}
