//! Declarative form validation.
//!
//! Each entity declares a static table of [`FieldRule`]s. A rule's checks run
//! in order against every value posted for its field: sanitizers rewrite the
//! value, validators record at most one [`FieldError`] per value.

use libris_http::Submission;
use serde::Serialize;

use crate::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Strip surrounding whitespace.
    Trim,
    /// Replace HTML-significant characters with entities.
    Escape,
    /// Value must be non-empty.
    Required(&'static str),
    /// Value must be ASCII letters and digits only.
    Alphanumeric(&'static str),
    /// Value must be empty or a `YYYY-MM-DD` date.
    IsoDate(&'static str),
    /// Value must be empty or one of the listed options.
    OneOf(&'static [&'static str], &'static str),
}

impl Check {
    fn failure(&self, value: &str) -> Option<&'static str> {
        match *self {
            Check::Trim | Check::Escape => None,
            Check::Required(msg) => value.is_empty().then_some(msg),
            Check::Alphanumeric(msg) => {
                (!value.chars().all(|c| c.is_ascii_alphanumeric())).then_some(msg)
            }
            Check::IsoDate(msg) => {
                (!value.is_empty() && dates::parse_iso(value).is_none()).then_some(msg)
            }
            Check::OneOf(options, msg) => {
                (!value.is_empty() && !options.contains(&value)).then_some(msg)
            }
        }
    }

    fn sanitize(&self, value: String) -> String {
        match self {
            Check::Trim => value.trim().to_string(),
            Check::Escape => escape(&value),
            _ => value,
        }
    }
}

/// The ordered checks for one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub checks: &'static [Check],
}

impl FieldRule {
    pub const fn new(field: &'static str, checks: &'static [Check]) -> Self {
        Self { field, checks }
    }

    /// Run the checks on one value, returning the sanitized value and the
    /// first failure message.
    fn apply(&self, value: String) -> (String, Option<&'static str>) {
        let mut value = value;
        for check in self.checks {
            value = check.sanitize(value);
            if let Some(msg) = check.failure(&value) {
                return (value, Some(msg));
            }
        }
        (value, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
    pub value: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
            value: value.into(),
        }
    }
}

/// A sanitized submission and the failures found while sanitizing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub submission: Submission,
    pub errors: Vec<FieldError>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The sanitized values as posted, keyed by rule field, for re-rendering
    /// a rejected form. Values that failed a check are kept verbatim.
    pub fn echo(&self, rules: &[FieldRule]) -> serde_json::Value {
        rules
            .iter()
            .map(|rule| {
                let value = self.submission.get(rule.field).unwrap_or_default();
                (rule.field.to_string(), serde_json::Value::from(value))
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

pub fn validate(rules: &[FieldRule], submission: Submission) -> Validated {
    let mut submission = submission;
    let mut errors = Vec::new();

    for rule in rules {
        if !submission.contains(rule.field) {
            // Absent fields are checked as empty but not added to the form.
            let (value, failure) = rule.apply(String::new());
            if let Some(msg) = failure {
                errors.push(FieldError::new(rule.field, msg, value));
            }
            continue;
        }

        for (field, value) in submission.pairs_mut().iter_mut() {
            if field.as_str() != rule.field {
                continue;
            }
            let (sanitized, failure) = rule.apply(std::mem::take(value));
            if let Some(msg) = failure {
                errors.push(FieldError::new(rule.field, msg, sanitized.clone()));
            }
            *value = sanitized;
        }
    }

    Validated { submission, errors }
}

/// HTML-escape a submitted value.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            c => escaped.push(c),
        }
    }
    escaped
}
