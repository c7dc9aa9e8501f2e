//! Server-side views: a process-wide minijinja environment and the [`Page`]
//! outcome every catalog handler returns.

use axum::response::{Html, IntoResponse, Redirect, Response};
use minijinja::{AutoEscape, Environment};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::error::AppError;

static ENGINE: OnceCell<Environment<'static>> = OnceCell::new();

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view engine has not been installed")]
    NotInstalled,

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Install the view templates. Only the first call takes effect.
///
/// Field values reach the templates already escaped by the form validators,
/// so template auto-escaping is switched off.
pub fn install(templates: &[(&'static str, &'static str)]) -> Result<(), RenderError> {
    ENGINE.get_or_try_init(|| {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for &(name, source) in templates {
            env.add_template(name, source)?;
        }
        tracing::debug!(templates = templates.len(), "view engine installed");
        Ok::<_, minijinja::Error>(env)
    })?;
    Ok(())
}

/// Render an installed template with a JSON context.
pub fn render(template: &str, context: &serde_json::Value) -> Result<String, RenderError> {
    let env = ENGINE.get().ok_or(RenderError::NotInstalled)?;
    Ok(env.get_template(template)?.render(context)?)
}

/// A template name plus the data it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub template: &'static str,
    pub context: serde_json::Value,
}

/// The outcome of a catalog handler: render a view or redirect.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Render(View),
    Redirect(String),
}

impl Page {
    pub fn render(template: &'static str, context: serde_json::Value) -> Self {
        Self::Render(View { template, context })
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect(location.into())
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Self::Render(view) => Some(view),
            Self::Redirect(_) => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Render(_) => None,
            Self::Redirect(location) => Some(location),
        }
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Render(view) => match render(view.template, &view.context) {
                Ok(html) => Html(html).into_response(),
                Err(e) => AppError::from(e).into_response(),
            },
            Page::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[test]
    fn page_accessors() {
        let page = Page::render("x.html", json!({"title": "X"}));
        assert_eq!(page.view().unwrap().context["title"], json!("X"));
        assert!(page.location().is_none());

        let page = Page::redirect("/catalog/authors");
        assert_eq!(page.location(), Some("/catalog/authors"));
        assert!(page.view().is_none());
    }

    #[test]
    fn redirect_is_see_other() {
        let response = Page::redirect("/catalog/genres").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/catalog/genres");
    }
}
