use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_db::DocumentStore;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub store: &'a Arc<dyn DocumentStore>,
}

/// A route a module serves, for route listings and startup logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
}

impl Endpoint {
    pub const fn get(path: &'static str, summary: &'static str) -> Self {
        Self {
            method: "GET",
            path,
            summary,
        }
    }

    pub const fn post(path: &'static str, summary: &'static str) -> Self {
        Self {
            method: "POST",
            path,
            summary,
        }
    }
}

/// Core module trait that all catalog modules implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes
    /// Routes are merged and mounted under the catalog mount path
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Describe the routes returned by [`Module::routes`]
    fn endpoints(&self) -> Vec<Endpoint> {
        vec![]
    }

    /// Start background tasks for this module
    /// Called after every module has been initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
