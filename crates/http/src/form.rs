//! URL-encoded form submissions that keep repeated keys.

use serde::Deserialize;

/// A submitted form as ordered `(field, value)` pairs.
///
/// Multi-select inputs post the same key once per selected option, which a
/// plain map would collapse; use with `axum::Form<Submission>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct Submission {
    pairs: Vec<(String, String)>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((field.into(), value.into()));
        self
    }

    /// First value posted for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// First value posted for `field`, or the empty string.
    pub fn text(&self, field: &str) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    /// Every value posted for `field`, in submission order.
    pub fn all(&self, field: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.pairs.iter().any(|(name, _)| name == field)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn pairs_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.pairs
    }
}

impl From<Vec<(String, String)>> for Submission {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_are_preserved() {
        let form = Submission::new()
            .with("title", "Dune")
            .with("genre", "g1")
            .with("genre", "g2");

        assert_eq!(form.get("title"), Some("Dune"));
        assert_eq!(form.all("genre"), vec!["g1", "g2"]);
        assert!(form.all("missing").is_empty());
        assert_eq!(form.text("missing"), "");
    }

    #[tokio::test]
    async fn extracts_from_urlencoded_body() {
        use axum::{body::Body, extract::FromRequest, http::Request, Form};

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("title=Dune&genre=g1&genre=g2"))
            .unwrap();

        let Form(form) = Form::<Submission>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(form.all("genre"), vec!["g1", "g2"]);
        assert_eq!(form.get("title"), Some("Dune"));
    }
}
