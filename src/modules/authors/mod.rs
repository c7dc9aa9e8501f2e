pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{Endpoint, InitCtx, Module};

use crate::catalog::Catalog;
use handlers::*;

/// Authors: list, detail, and the create/update/delete forms.
pub struct AuthorsModule {
    catalog: Catalog,
}

impl AuthorsModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.catalog.authors.count(&Filter::all()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            authors = count,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/authors", get(author_list))
            .route("/author/create", get(author_create_get).post(author_create_post))
            .route("/author/{id}", get(author_detail))
            .route("/author/{id}/delete", get(author_delete_get).post(author_delete_post))
            .route("/author/{id}/update", get(author_update_get).post(author_update_post))
            .with_state(self.catalog.clone())
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::get("/authors", "List authors"),
            Endpoint::get("/author/create", "Author create form"),
            Endpoint::post("/author/create", "Create author"),
            Endpoint::get("/author/{id}", "Author detail"),
            Endpoint::get("/author/{id}/delete", "Author delete confirmation"),
            Endpoint::post("/author/{id}/delete", "Delete author"),
            Endpoint::get("/author/{id}/update", "Author update form"),
            Endpoint::post("/author/{id}/update", "Update author"),
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(catalog))
}
