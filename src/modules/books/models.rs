use libris_db::{Entity, Fields, RecordId};
use libris_http::Submission;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::CATALOG_PATH;
use crate::validation::{Check, FieldRule};

/// A title in the catalog. References one author and any number of genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: RecordId,
    #[serde(default)]
    pub genre: Vec<RecordId>,
}

impl Book {
    /// Build a book from an already sanitized submission. `genre` may be
    /// posted any number of times, including not at all.
    pub fn from_submission(form: &Submission) -> Self {
        Self {
            title: form.text("title"),
            summary: form.text("summary"),
            isbn: form.text("isbn"),
            author: RecordId::from(form.text("author")),
            genre: form
                .all("genre")
                .into_iter()
                .filter(|id| !id.is_empty())
                .map(RecordId::from)
                .collect(),
        }
    }
}

pub fn book_url(id: &RecordId) -> String {
    format!("{CATALOG_PATH}/book/{id}")
}

impl Entity for Book {
    const COLLECTION: &'static str = "books";

    fn virtuals(&self, id: &RecordId) -> Fields {
        let mut fields = Fields::new();
        fields.insert("url".into(), json!(book_url(id)));
        fields
    }
}

pub const BOOK_RULES: &[FieldRule] = &[
    FieldRule::new(
        "title",
        &[
            Check::Trim,
            Check::Required("Title must not be empty."),
            Check::Escape,
        ],
    ),
    FieldRule::new(
        "author",
        &[
            Check::Trim,
            Check::Required("Author must not be empty."),
            Check::Escape,
        ],
    ),
    FieldRule::new(
        "summary",
        &[
            Check::Trim,
            Check::Required("Summary must not be empty."),
            Check::Escape,
        ],
    ),
    FieldRule::new(
        "isbn",
        &[
            Check::Trim,
            Check::Required("ISBN must not be empty"),
            Check::Escape,
        ],
    ),
    FieldRule::new("genre", &[Check::Escape]),
];
