//! HTML views compiled into the binary.

use libris_http::views::{self, RenderError};

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name)))
    };
}

pub const TEMPLATES: &[(&str, &str)] = &[
    template!("layout.html"),
    template!("errors.html"),
    template!("error.html"),
    template!("index.html"),
    template!("author_list.html"),
    template!("author_detail.html"),
    template!("author_form.html"),
    template!("author_delete.html"),
    template!("genre_list.html"),
    template!("genre_detail.html"),
    template!("genre_form.html"),
    template!("genre_delete.html"),
    template!("book_summary.html"),
    template!("book_list.html"),
    template!("book_detail.html"),
    template!("book_form.html"),
    template!("book_delete.html"),
    template!("bookinstance_list.html"),
    template!("bookinstance_detail.html"),
    template!("bookinstance_form.html"),
    template!("bookinstance_delete.html"),
];

/// Install the catalog views into the process-wide view engine.
pub fn install() -> Result<(), RenderError> {
    views::install(TEMPLATES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_template_compiles_and_forms_render_empty() {
        install().unwrap();
        let html = views::render(
            "author_form.html",
            &json!({"title": "Create Author", "author": null, "errors": []}),
        )
        .unwrap();
        assert!(html.contains("<title>Create Author</title>"));
        assert!(html.contains(r#"name="first_name" placeholder="First name" value="""#));
    }

    #[test]
    fn dashboard_marks_failed_counts_unavailable() {
        install().unwrap();
        let html = views::render(
            "index.html",
            &json!({
                "title": "Local Library Home",
                "error": "store unavailable",
                "data": {
                    "book_count": 3,
                    "book_instance_count": 0,
                    "book_instance_available_count": 0,
                    "author_count": 2,
                    "genre_count": null,
                },
            }),
        )
        .unwrap();
        assert!(html.contains("<strong>Books:</strong> 3"));
        assert!(html.contains("<strong>Copies:</strong> 0"));
        assert!(html.contains("<strong>Genres:</strong> unavailable"));
        assert!(html.contains("Error: store unavailable"));
    }
}
