//! Product summaries returned by the search endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::ids::ProductId;

/// The minimal representation of a search result.
///
/// Every field is optional: the search service passes through whatever the
/// upstream marketplace returned, and the results grid falls back to defaults
/// for missing titles and photos.
///
/// Deserialization never fails. A field holding an unexpected JSON type is
/// converted where that is unambiguous (`999` becomes `"999"`, `"1,204"`
/// becomes `1204`) and dropped otherwise; an element that is not an object
/// yields an empty summary. One array element always gives one summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductSummary {
    /// Marketplace identifier (`asin`, or `id` from generic catalogs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_photo: Option<String>,
    /// Display price, already formatted by the service (e.g. `"$999"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_minimum_offer_price: Option<String>,
    /// Delivery estimate text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_original_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_star_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_num_ratings: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_num_offers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_best_seller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_amazon_choice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prime: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_volume: Option<String>,
}

impl<'de> Deserialize<'de> for ProductSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_object() {
            Some(fields) => Self::from_fields(fields),
            None => Self::default(),
        })
    }
}

impl ProductSummary {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| fields.get(key).and_then(as_text);
        let count = |key: &str| fields.get(key).and_then(as_count);
        let flag = |key: &str| fields.get(key).and_then(as_flag);

        Self {
            asin: text("asin").or_else(|| text("id")).map(ProductId::new),
            product_title: text("product_title"),
            product_photo: text("product_photo"),
            product_price: text("product_price"),
            product_minimum_offer_price: text("product_minimum_offer_price"),
            delivery: text("delivery"),
            product_original_price: text("product_original_price"),
            currency: text("currency"),
            product_star_rating: text("product_star_rating"),
            product_num_ratings: count("product_num_ratings"),
            product_url: text("product_url"),
            product_num_offers: count("product_num_offers"),
            is_best_seller: flag("is_best_seller"),
            is_amazon_choice: flag("is_amazon_choice"),
            is_prime: flag("is_prime"),
            sales_volume: text("sales_volume"),
        }
    }

    /// Create a summary with just an identifier and a title.
    pub fn new(asin: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            asin: Some(asin.into()),
            product_title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the display price.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.product_price = Some(price.into());
        self
    }

    /// Set the photo URL.
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.product_photo = Some(url.into());
        self
    }

    /// Title if present and non-blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.product_title.as_deref())
    }

    /// Photo URL if present and non-blank.
    pub fn photo(&self) -> Option<&str> {
        non_blank(self.product_photo.as_deref())
    }

    /// Badges worth showing next to the title.
    pub fn badges(&self) -> Vec<&'static str> {
        let mut badges = Vec::new();
        if self.is_best_seller == Some(true) {
            badges.push("Best Seller");
        }
        if self.is_amazon_choice == Some(true) {
            badges.push("Choice");
        }
        if self.is_prime == Some(true) {
            badges.push("Prime");
        }
        badges
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| !matches!(c, ',' | '_' | ' ')).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
