//! Libris library catalog
//!
//! Server-rendered CRUD over authors, books, book copies and genres, built
//! from Libris modules mounted under [`catalog::CATALOG_PATH`].

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use libris_db::{DocumentStore, InMemoryStore};
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod catalog;
pub mod dates;
pub mod modules;
pub mod seed;
pub mod templates;
pub mod validation;

use catalog::{Catalog, CATALOG_PATH};

/// A bootstrapped catalog: store, typed collections and initialized modules.
pub struct App {
    pub store: Arc<dyn DocumentStore>,
    pub catalog: Catalog,
    pub registry: ModuleRegistry,
}

impl App {
    /// Install the views, open the store, optionally seed it and initialize
    /// every module.
    pub async fn bootstrap(settings: &Settings) -> anyhow::Result<Self> {
        templates::install().context("failed to install catalog views")?;

        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let catalog = Catalog::new(Arc::clone(&store));

        if settings.store.seed_on_start {
            seed::seed(&catalog)
                .await
                .context("failed to seed demo catalog")?;
        }

        let registry = modules::registry(&catalog);
        let ctx = InitCtx {
            settings,
            store: &store,
        };
        registry.init_modules(&ctx).await?;

        Ok(Self {
            store,
            catalog,
            registry,
        })
    }

    pub fn router(&self, settings: &Settings) -> Router {
        libris_http::build_router(&self.registry, settings, CATALOG_PATH)
    }
}

/// Run the catalog until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        seed = settings.store.seed_on_start,
        "libris bootstrap starting"
    );

    let app = App::bootstrap(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
        store: &app.store,
    };
    app.registry.start_modules(&ctx).await?;

    tracing::info!(
        modules = app.registry.module_count(),
        "libris bootstrap complete"
    );

    let served = libris_http::start_server(&app.registry, &settings, CATALOG_PATH).await;
    app.registry.stop_modules().await?;
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    async fn app() -> (Router, Catalog) {
        let settings = Settings::default();
        let app = App::bootstrap(&settings).await.unwrap();
        (app.router(&settings), app.catalog)
    }

    async fn get(router: &Router, uri: &str) -> Response {
        router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(router: &Router, uri: &str, form: &str) -> Response {
        router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn root_redirects_to_catalog_home() {
        let (router, _) = app().await;

        let response = get(&router, "/").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog");

        let response = get(&router, "/catalog").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("Local Library Home"));
    }

    #[tokio::test]
    async fn duplicate_genre_post_redirects_to_existing() {
        let (router, catalog) = app().await;

        let first = post(&router, "/catalog/genre/create", "name=Fantasy").await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        let second = post(&router, "/catalog/genre/create", "name=Fantasy").await;
        assert_eq!(location(&first), location(&second));
        assert_eq!(catalog.genres.all().await.unwrap().len(), 1);

        let detail = body(get(&router, &location(&first)).await).await;
        assert!(detail.contains("Genre: Fantasy"));
    }

    #[tokio::test]
    async fn book_form_keeps_every_selected_genre() {
        let (router, catalog) = app().await;
        let author = location(
            &post(&router, "/catalog/author/create", "first_name=Ben&family_name=Bova").await,
        );
        let author = author.rsplit('/').next().unwrap().to_string();
        let fantasy = location(&post(&router, "/catalog/genre/create", "name=Fantasy").await);
        let scifi = location(&post(&router, "/catalog/genre/create", "name=SciFi").await);
        let fantasy = fantasy.rsplit('/').next().unwrap();
        let scifi = scifi.rsplit('/').next().unwrap();

        let form = format!(
            "title=Death+Wave&author={author}&summary=Sequel&isbn=9780765379504&genre={fantasy}&genre={scifi}"
        );
        let response = post(&router, "/catalog/book/create", &form).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let books = catalog.books.all().await.unwrap();
        assert_eq!(books[0].data.genre.len(), 2);

        let detail = body(get(&router, &location(&response)).await).await;
        assert!(detail.contains("Bova, Ben"));
        assert!(detail.contains("Fantasy"));
        assert!(detail.contains("SciFi"));
    }

    #[tokio::test]
    async fn invalid_author_is_rerendered_with_messages() {
        let (router, catalog) = app().await;

        let response = post(
            &router,
            "/catalog/author/create",
            "first_name=&family_name=O%27Brien&date_of_birth=1950-13-40",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("First name must be specified."));
        assert!(html.contains("Family name has non-alphanumeric characters."));
        assert!(html.contains("Invalid date of birth"));
        assert!(catalog.authors.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_record_renders_not_found_page() {
        let (router, _) = app().await;

        let response = get(&router, "/catalog/book/does-not-exist").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("Book not found"));
    }

    #[tokio::test]
    async fn blocked_author_delete_shows_dependents() {
        let (router, catalog) = app().await;
        let summary = seed::seed(&catalog).await.unwrap();
        assert!(summary.books > 0);

        let author = catalog
            .authors
            .find_one(&libris_db::Filter::eq("family_name", "Rothfuss"))
            .await
            .unwrap()
            .unwrap();
        let uri = format!("/catalog/author/{}/delete", author.id);
        let response = post(&router, &uri, &format!("authorid={}", author.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("Delete the following books"));
        assert!(html.contains("The Name of the Wind"));
        assert!(catalog.authors.get(&author.id).await.unwrap().is_some());
    }
}
