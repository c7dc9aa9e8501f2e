//! Equality filters and sorted queries over documents.

use std::cmp::Ordering;

use serde_json::Value;

use crate::traits::Document;

/// Conjunction of `field == value` conditions.
///
/// A condition on an array-valued field matches when the array contains the
/// value, so `Filter::eq("genre", id)` finds every book tagged with `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// A filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            match document.fields.get(field) {
                Some(Value::Array(items)) => items.contains(expected),
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

/// A filter plus an optional ascending sort key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort_by: Option<String>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            sort_by: None,
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    /// Apply the sort key in place. Documents missing the field sort first.
    pub fn sort(&self, documents: &mut [Document]) {
        if let Some(field) = &self.sort_by {
            documents.sort_by(|a, b| compare(a.fields.get(field), b.fields.get(field)));
        }
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
