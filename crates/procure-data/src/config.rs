//! Endpoint configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding the search endpoint.
pub const SEARCH_URL_ENV: &str = "PROCURE_SEARCH_URL";
/// Environment variable overriding the locations endpoint.
pub const LOCATIONS_URL_ENV: &str = "PROCURE_LOCATIONS_URL";
/// Environment variable overriding the categories endpoint.
pub const CATEGORIES_URL_ENV: &str = "PROCURE_CATEGORIES_URL";
/// Environment variable overriding the submission endpoint.
pub const SUBMIT_URL_ENV: &str = "PROCURE_SUBMIT_URL";
/// Environment variable overriding the submissions listing endpoint.
pub const SUBMISSIONS_URL_ENV: &str = "PROCURE_SUBMISSIONS_URL";

/// The remote endpoints the client consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Product search (`GET ?query=&page=&sort_by=`).
    #[serde(default = "default_search")]
    pub search: String,
    /// Location list (`GET`, `{countries: [...]}`).
    #[serde(default = "default_locations")]
    pub locations: String,
    /// Category list (`GET`, `{categories: [...]}`).
    #[serde(default = "default_categories")]
    pub categories: String,
    /// Item submission (`POST` JSON draft).
    #[serde(default = "default_submit")]
    pub submit: String,
    /// Stored submissions (`GET`, JSON array).
    #[serde(default = "default_submissions")]
    pub submissions: String,
}

fn default_search() -> String {
    "http://localhost:8000/api/v1/search".to_string()
}

fn default_locations() -> String {
    "http://localhost:8000/api/v1/countries".to_string()
}

fn default_categories() -> String {
    "http://localhost:8000/api/v1/categories".to_string()
}

fn default_submit() -> String {
    "http://localhost:8000/api/v1/submit".to_string()
}

fn default_submissions() -> String {
    "http://localhost:8000/api/v1/forms".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: default_search(),
            locations: default_locations(),
            categories: default_categories(),
            submit: default_submit(),
            submissions: default_submissions(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at `base` using the standard paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search: format!("{}/api/v1/search", base),
            locations: format!("{}/api/v1/countries", base),
            categories: format!("{}/api/v1/categories", base),
            submit: format!("{}/api/v1/submit", base),
            submissions: format!("{}/api/v1/forms", base),
        }
    }

    /// Apply `PROCURE_*_URL` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots: [(&str, &mut String); 5] = [
            (SEARCH_URL_ENV, &mut self.search),
            (LOCATIONS_URL_ENV, &mut self.locations),
            (CATEGORIES_URL_ENV, &mut self.categories),
            (SUBMIT_URL_ENV, &mut self.submit),
            (SUBMISSIONS_URL_ENV, &mut self.submissions),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        }
        self
    }

    /// Endpoints as `(name, url)` pairs.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("search", self.search.as_str()),
            ("locations", self.locations.as_str()),
            ("categories", self.categories.as_str()),
            ("submit", self.submit.as_str()),
            ("submissions", self.submissions.as_str()),
        ]
    }

    /// Problems with the configured URLs, one message per bad entry.
    pub fn validate(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|(name, url)| match Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
                Ok(parsed) => Some(format!(
                    "endpoints.{}: unsupported scheme '{}'",
                    name,
                    parsed.scheme()
                )),
                Err(e) => Some(format!("endpoints.{}: {} ({})", name, e, url)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let endpoints = Endpoints::default();
        assert!(endpoints.validate().is_empty());
        assert_eq!(endpoints.search, "http://localhost:8000/api/v1/search");
    }

    #[test]
    fn test_overrides_apply_per_key() {
        let env: HashMap<&str, &str> = [
            (LOCATIONS_URL_ENV, "https://ref.example.com/countries"),
            (SUBMIT_URL_ENV, "  "),
        ]
        .into_iter()
        .collect();

        let endpoints =
            Endpoints::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(endpoints.locations, "https://ref.example.com/countries");
        assert_eq!(endpoints.submit, Endpoints::default().submit);
        assert_eq!(endpoints.search, Endpoints::default().search);
    }

    #[test]
    fn test_with_base() {
        let endpoints = Endpoints::with_base("https://procure.example.com/");
        assert_eq!(endpoints.categories, "https://procure.example.com/api/v1/categories");
        assert_eq!(endpoints.submissions, "https://procure.example.com/api/v1/forms");
    }

    #[test]
    fn test_validate_reports_bad_entries() {
        let endpoints = Endpoints {
            search: "localhost:8000".to_string(),
            submit: "nope".to_string(),
            ..Default::default()
        };
        let problems = endpoints.validate();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("endpoints.search"));
        assert!(problems[1].starts_with("endpoints.submit"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let endpoints: Endpoints =
            serde_json::from_str(r#"{"search": "http://10.0.0.2/api/v1/search"}"#).unwrap();
        assert_eq!(endpoints.search, "http://10.0.0.2/api/v1/search");
        assert_eq!(endpoints.locations, Endpoints::default().locations);
    }
}
