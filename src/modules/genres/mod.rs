pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::Filter;
use libris_kernel::{Endpoint, InitCtx, Module};

use crate::catalog::Catalog;
use handlers::*;

pub struct GenresModule {
    catalog: Catalog,
}

impl GenresModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.catalog.genres.count(&Filter::all()).await?;
        tracing::info!(module = self.name(), genres = count, "genres module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/genres", get(genre_list))
            .route("/genre/create", get(genre_create_get).post(genre_create_post))
            .route("/genre/{id}", get(genre_detail))
            .route("/genre/{id}/delete", get(genre_delete_get).post(genre_delete_post))
            .route("/genre/{id}/update", get(genre_update_get).post(genre_update_post))
            .with_state(self.catalog.clone())
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::get("/genres", "List genres"),
            Endpoint::get("/genre/create", "Genre create form"),
            Endpoint::post("/genre/create", "Create genre"),
            Endpoint::get("/genre/{id}", "Genre detail"),
            Endpoint::get("/genre/{id}/delete", "Genre delete confirmation"),
            Endpoint::post("/genre/{id}/delete", "Delete genre"),
            Endpoint::get("/genre/{id}/update", "Genre update form"),
            Endpoint::post("/genre/{id}/update", "Update genre"),
        ]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "genres module stopped");
        Ok(())
    }
}

pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(GenresModule::new(catalog))
}
