pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{Endpoint, InitCtx, Module};

use crate::catalog::Catalog;
use handlers::*;

/// Physical copies of books and their circulation status
pub struct BookInstancesModule {
    catalog: Catalog,
}

impl BookInstancesModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BookInstancesModule {
    fn name(&self) -> &'static str {
        "book_instances"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.catalog.instances.count(&Filter::all()).await?;
        tracing::info!(module = self.name(), copies = count, "book instances module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/bookinstances", get(bookinstance_list))
            .route(
                "/bookinstance/create",
                get(bookinstance_create_get).post(bookinstance_create_post),
            )
            .route("/bookinstance/{id}", get(bookinstance_detail))
            .route(
                "/bookinstance/{id}/delete",
                get(bookinstance_delete_get).post(bookinstance_delete_post),
            )
            .route(
                "/bookinstance/{id}/update",
                get(bookinstance_update_get).post(bookinstance_update_post),
            )
            .with_state(self.catalog.clone())
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::get("/bookinstances", "List book copies"),
            Endpoint::get("/bookinstance/create", "Book copy create form"),
            Endpoint::post("/bookinstance/create", "Create book copy"),
            Endpoint::get("/bookinstance/{id}", "Book copy detail"),
            Endpoint::get("/bookinstance/{id}/delete", "Book copy delete confirmation"),
            Endpoint::post("/bookinstance/{id}/delete", "Delete book copy"),
            Endpoint::get("/bookinstance/{id}/update", "Book copy update form"),
            Endpoint::post("/bookinstance/{id}/update", "Update book copy"),
        ]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book instances module stopped");
        Ok(())
    }
}

pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(BookInstancesModule::new(catalog))
}
