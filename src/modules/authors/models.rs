use libris_db::{Entity, Fields, RecordId};
use libris_http::Submission;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Date;

use crate::catalog::CATALOG_PATH;
use crate::dates;
use crate::validation::{Check, FieldRule};

/// A person who wrote one or more books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub first_name: String,
    pub family_name: String,
    #[serde(default, with = "dates::optional_iso")]
    pub date_of_birth: Option<Date>,
    #[serde(default, with = "dates::optional_iso")]
    pub date_of_death: Option<Date>,
}

impl Author {
    /// Build an author from an already sanitized submission.
    pub fn from_submission(form: &Submission) -> Self {
        Self {
            first_name: form.text("first_name"),
            family_name: form.text("family_name"),
            date_of_birth: dates::parse_optional(form.get("date_of_birth")),
            date_of_death: dates::parse_optional(form.get("date_of_death")),
        }
    }

    /// `"family_name, first_name"`, or empty when either part is missing.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        let birth = self.date_of_birth.map(dates::to_display).unwrap_or_default();
        let death = self.date_of_death.map(dates::to_display).unwrap_or_default();
        format!("{birth} - {death}")
    }
}

pub fn author_url(id: &RecordId) -> String {
    format!("{CATALOG_PATH}/author/{id}")
}

impl Entity for Author {
    const COLLECTION: &'static str = "authors";

    fn virtuals(&self, id: &RecordId) -> Fields {
        let mut fields = Fields::new();
        fields.insert("url".into(), json!(author_url(id)));
        fields.insert("name".into(), json!(self.name()));
        fields.insert("lifespan".into(), json!(self.lifespan()));
        fields
    }
}

pub const AUTHOR_RULES: &[FieldRule] = &[
    FieldRule::new(
        "first_name",
        &[
            Check::Trim,
            Check::Required("First name must be specified."),
            Check::Escape,
            Check::Alphanumeric("First name has non-alphanumeric characters."),
        ],
    ),
    FieldRule::new(
        "family_name",
        &[
            Check::Trim,
            Check::Required("Family name must be specified."),
            Check::Escape,
            Check::Alphanumeric("Family name has non-alphanumeric characters."),
        ],
    ),
    FieldRule::new("date_of_birth", &[Check::IsoDate("Invalid date of birth")]),
    FieldRule::new("date_of_death", &[Check::IsoDate("Invalid date of death")]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn ursula() -> Author {
        Author {
            first_name: "Ursula".into(),
            family_name: "LeGuin".into(),
            date_of_birth: Some(date!(1929 - 10 - 21)),
            date_of_death: Some(date!(2018 - 01 - 22)),
        }
    }

    #[test]
    fn name_and_lifespan() {
        let author = ursula();
        assert_eq!(author.name(), "LeGuin, Ursula");
        assert_eq!(author.lifespan(), "Oct 21, 1929 - Jan 22, 2018");

        let unnamed = Author {
            first_name: String::new(),
            ..ursula()
        };
        assert_eq!(unnamed.name(), "");
    }

    #[test]
    fn dates_are_stored_as_iso_strings() {
        let value = serde_json::to_value(ursula()).unwrap();
        assert_eq!(value["date_of_birth"], json!("1929-10-21"));

        let living = Author {
            date_of_death: None,
            ..ursula()
        };
        let value = serde_json::to_value(&living).unwrap();
        assert!(value["date_of_death"].is_null());
        let back: Author = serde_json::from_value(value).unwrap();
        assert_eq!(back, living);
    }

    #[test]
    fn from_submission_ignores_blank_dates() {
        let form = Submission::new()
            .with("first_name", "Ursula")
            .with("family_name", "LeGuin")
            .with("date_of_birth", "1929-10-21")
            .with("date_of_death", "");
        let author = Author::from_submission(&form);
        assert_eq!(author.date_of_birth, Some(date!(1929 - 10 - 21)));
        assert_eq!(author.date_of_death, None);
    }
}
