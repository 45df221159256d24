//! HTTP response handling.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::FetchError;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: BTreeMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Extract an array field from a JSON object body.
    ///
    /// This is the shape check every list endpoint needs: the body must be an
    /// object whose `field` is an array of `T`. A body carrying an `error`
    /// string instead surfaces as [`FetchError::ServiceError`].
    pub fn json_array_field<T: DeserializeOwned>(&self, field: &str) -> Result<Vec<T>, FetchError> {
        let value: serde_json::Value = self.json()?;
        match value.get(field) {
            Some(items) if items.is_array() => Vec::<T>::deserialize(items)
                .map_err(|e| FetchError::ParseError(format!("`{}`: {}", field, e))),
            _ => Err(service_error(&value).unwrap_or_else(|| FetchError::MissingField(field.to_string()))),
        }
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = self.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(FetchError::HttpError {
                status: self.status,
                message,
            })
        }
    }
}

fn service_error(value: &serde_json::Value) -> Option<FetchError> {
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(|e| FetchError::ServiceError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, BTreeMap::new(), body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(302, b"").is_success());
        assert!(!make_response(500, b"").is_success());
    }

    #[test]
    fn test_response_text_invalid_utf8() {
        let resp = make_response(200, &[0xff, 0xfe]);
        assert!(resp.text().is_err());
    }

    #[test]
    fn test_array_field_extracted_in_order() {
        let resp = make_response(200, br#"{"countries": ["India", "Japan", "Chile"]}"#);
        let countries: Vec<String> = resp.json_array_field("countries").unwrap();
        assert_eq!(countries, vec!["India", "Japan", "Chile"]);
    }

    #[test]
    fn test_array_field_missing() {
        let resp = make_response(200, br#"{"categories_v2": []}"#);
        let result: Result<Vec<String>, _> = resp.json_array_field("categories");
        assert_eq!(result, Err(FetchError::MissingField("categories".to_string())));
    }

    #[test]
    fn test_array_field_wrong_type() {
        let resp = make_response(200, br#"{"categories": "none"}"#);
        let result: Result<Vec<String>, _> = resp.json_array_field("categories");
        assert_eq!(result, Err(FetchError::MissingField("categories".to_string())));
    }

    #[test]
    fn test_array_field_on_non_object_body() {
        let resp = make_response(200, br#"["a", "b"]"#);
        let result: Result<Vec<String>, _> = resp.json_array_field("countries");
        assert!(matches!(result, Err(FetchError::MissingField(_))));
    }

    #[test]
    fn test_array_field_service_error() {
        let resp = make_response(200, br#"{"error": "Value error: quota exceeded"}"#);
        let result: Result<Vec<String>, _> = resp.json_array_field("products");
        assert_eq!(
            result,
            Err(FetchError::ServiceError("Value error: quota exceeded".to_string()))
        );
    }

    #[test]
    fn test_array_field_invalid_json() {
        let resp = make_response(200, b"{categories farmers:[]}");
        let result: Result<Vec<String>, _> = resp.json_array_field("categories");
        assert!(matches!(result, Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_array_field_bad_element() {
        let resp = make_response(200, br#"{"countries": ["India", 4]}"#);
        let result: Result<Vec<String>, _> = resp.json_array_field("countries");
        assert!(matches!(result, Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let resp = Response::new(200, headers, Vec::new());
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(200, b"OK").error_for_status().is_ok());

        let err = make_response(500, b"boom").error_for_status().unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 500,
                message: "boom".to_string()
            }
        );
        assert_eq!(err.status(), Some(500));
    }
}
