//! HTTP server facade for Libris with Axum, server-rendered views and error handling.

use anyhow::Context;
use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use libris_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod form;
pub mod router;
pub mod views;

pub use error::AppError;
pub use form::Submission;
pub use router::RouterBuilder;
pub use views::{Page, View};

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    mount_path: &'static str,
) -> anyhow::Result<()> {
    let address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings, mount_path);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}{}", address, mount_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted under `mount_path`
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &Settings,
    mount_path: &'static str,
) -> Router {
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .with_root_redirect(mount_path)
        .mount_modules(mount_path, registry)
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}
