use libris_db::{Entity, Fields, RecordId};
use libris_http::Submission;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Date;

use crate::catalog::CATALOG_PATH;
use crate::dates;
use crate::validation::{Check, FieldRule};

/// Circulation state of a physical copy. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Maintenance,
        Status::Loaned,
        Status::Reserved,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Maintenance => "Maintenance",
            Status::Loaned => "Loaned",
            Status::Reserved => "Reserved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

const STATUS_NAMES: &[&str] = &["Available", "Maintenance", "Loaned", "Reserved"];

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub book: RecordId,
    pub imprint: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, with = "dates::optional_iso")]
    pub due_back: Option<Date>,
}

impl BookInstance {
    /// Build a copy from an already sanitized submission. A blank status
    /// falls back to [`Status::Maintenance`].
    pub fn from_submission(form: &Submission) -> Self {
        Self {
            book: RecordId::from(form.text("book")),
            imprint: form.text("imprint"),
            status: form.get("status").and_then(Status::parse).unwrap_or_default(),
            due_back: dates::parse_optional(form.get("due_back")),
        }
    }

    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(dates::to_display).unwrap_or_default()
    }
}

pub fn book_instance_url(id: &RecordId) -> String {
    format!("{CATALOG_PATH}/bookinstance/{id}")
}

impl Entity for BookInstance {
    const COLLECTION: &'static str = "bookinstances";

    fn virtuals(&self, id: &RecordId) -> Fields {
        let mut fields = Fields::new();
        fields.insert("url".into(), json!(book_instance_url(id)));
        fields.insert("due_back_formatted".into(), json!(self.due_back_formatted()));
        fields
    }
}

pub const BOOK_INSTANCE_RULES: &[FieldRule] = &[
    FieldRule::new(
        "book",
        &[
            Check::Trim,
            Check::Required("Book must be specified"),
            Check::Escape,
        ],
    ),
    FieldRule::new(
        "imprint",
        &[
            Check::Trim,
            Check::Required("Imprint must be specified"),
            Check::Escape,
        ],
    ),
    FieldRule::new(
        "status",
        &[
            Check::Trim,
            Check::Escape,
            Check::OneOf(STATUS_NAMES, "Invalid status"),
        ],
    ),
    FieldRule::new("due_back", &[Check::IsoDate("Invalid date")]),
];
