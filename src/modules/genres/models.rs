use libris_db::{Entity, Fields, RecordId};
use libris_http::Submission;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::CATALOG_PATH;
use crate::validation::{Check, FieldRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

impl Genre {
    pub fn from_submission(form: &Submission) -> Self {
        Self {
            name: form.text("name"),
        }
    }
}

pub fn genre_url(id: &RecordId) -> String {
    format!("{CATALOG_PATH}/genre/{id}")
}

impl Entity for Genre {
    const COLLECTION: &'static str = "genres";

    fn virtuals(&self, id: &RecordId) -> Fields {
        let mut fields = Fields::new();
        fields.insert("url".into(), json!(genre_url(id)));
        fields
    }
}

pub const GENRE_RULES: &[FieldRule] = &[FieldRule::new(
    "name",
    &[
        Check::Trim,
        Check::Required("Genre name required"),
        Check::Escape,
    ],
)];
