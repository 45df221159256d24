//! The new-item request draft.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ProcureError;
use crate::ids::CategoryId;
use crate::reference::Location;

/// Date format used by the timeline field and the submission payload.
pub const TIMELINE_FORMAT: &str = "%Y-%m-%d";

/// Fields of the item draft, named as the form and payload name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    SupplierName,
    ProductInfo,
    ProductUrl,
    Category,
    Quantity,
    Timeline,
    Location,
    RequiredFor,
}

impl DraftField {
    /// All fields in form order.
    pub const ALL: [DraftField; 8] = [
        DraftField::SupplierName,
        DraftField::ProductInfo,
        DraftField::ProductUrl,
        DraftField::Category,
        DraftField::Quantity,
        DraftField::Timeline,
        DraftField::Location,
        DraftField::RequiredFor,
    ];

    /// Wire / form-input name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::SupplierName => "supplierName",
            DraftField::ProductInfo => "productInfo",
            DraftField::ProductUrl => "productUrl",
            DraftField::Category => "category",
            DraftField::Quantity => "quantity",
            DraftField::Timeline => "timeline",
            DraftField::Location => "location",
            DraftField::RequiredFor => "requiredFor",
        }
    }

    /// Human label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::SupplierName => "Name of the Supplier",
            DraftField::ProductInfo => "Information about Product",
            DraftField::ProductUrl => "Website URL",
            DraftField::Category => "Category",
            DraftField::Quantity => "Quantity Required",
            DraftField::Timeline => "Timeline/When it is Required",
            DraftField::Location => "Location",
            DraftField::RequiredFor => "Required For",
        }
    }

    /// Whether the form refuses to submit while this field is empty.
    pub fn is_required(&self) -> bool {
        !matches!(self, DraftField::ProductUrl)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = ProcureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ProcureError::UnknownField(s.to_string()))
    }
}

/// The in-progress item request held as form state.
///
/// The draft is the single source of truth for the category and location
/// selections; [`ItemDraft::selected_category`] and
/// [`ItemDraft::selected_location`] are derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub supplier_name: String,
    pub product_info: String,
    pub product_url: String,
    pub category: Option<CategoryId>,
    pub quantity: Option<u32>,
    #[serde(default, with = "timeline_format")]
    pub timeline: Option<NaiveDate>,
    pub location: Option<Location>,
    pub required_for: String,
}

impl ItemDraft {
    /// Apply a raw input value to a field.
    ///
    /// Empty values clear the field. Quantity must be a positive whole number
    /// and timeline an ISO date; a rejected value leaves the draft unchanged.
    pub fn set(&mut self, field: DraftField, value: &str) -> Result<(), ProcureError> {
        match field {
            DraftField::SupplierName => self.supplier_name = value.to_string(),
            DraftField::ProductInfo => self.product_info = value.to_string(),
            DraftField::ProductUrl => self.product_url = value.to_string(),
            DraftField::RequiredFor => self.required_for = value.to_string(),
            DraftField::Category => self.select_category(value),
            DraftField::Location => self.select_location(value),
            DraftField::Quantity => self.quantity = parse_quantity(value)?,
            DraftField::Timeline => self.timeline = parse_timeline(value)?,
        }
        Ok(())
    }

    /// Apply a raw input value addressed by its form name.
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), ProcureError> {
        self.set(name.parse()?, value)
    }

    /// Current value of a field as the form input would show it.
    pub fn get(&self, field: DraftField) -> String {
        match field {
            DraftField::SupplierName => self.supplier_name.clone(),
            DraftField::ProductInfo => self.product_info.clone(),
            DraftField::ProductUrl => self.product_url.clone(),
            DraftField::RequiredFor => self.required_for.clone(),
            DraftField::Category => self.selected_category().to_string(),
            DraftField::Location => self.selected_location().to_string(),
            DraftField::Quantity => self.quantity.map(|q| q.to_string()).unwrap_or_default(),
            DraftField::Timeline => self
                .timeline
                .map(|d| d.format(TIMELINE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    /// Select a category by id; the empty placeholder value clears it.
    pub fn select_category(&mut self, id: &str) {
        self.category = (!id.is_empty()).then(|| CategoryId::new(id));
    }

    /// Select a location; the empty placeholder value clears it.
    pub fn select_location(&mut self, name: &str) {
        self.location = (!name.is_empty()).then(|| Location::new(name));
    }

    /// Selected category id, or `""` for the placeholder option.
    pub fn selected_category(&self) -> &str {
        self.category.as_ref().map(|c| c.as_str()).unwrap_or("")
    }

    /// Selected location, or `""` for the placeholder option.
    pub fn selected_location(&self) -> &str {
        self.location.as_ref().map(|l| l.as_str()).unwrap_or("")
    }

    /// Required fields that are still empty, in form order.
    ///
    /// Text counts as present when it is non-empty, whitespace included.
    /// Quantity and timeline trim before parsing, so blank input leaves them
    /// missing.
    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_empty())
            .collect()
    }

    /// Check the required-field constraints.
    pub fn validate(&self) -> Result<(), ProcureError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProcureError::MissingFields(missing))
        }
    }

    /// Serialize the draft as the submission body.
    pub fn to_json(&self) -> Result<Vec<u8>, ProcureError> {
        Ok(serde_json::to_vec(self)?)
    }
}

fn parse_quantity(value: &str) -> Result<Option<u32>, ProcureError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<u32>() {
        Ok(q) if q > 0 => Ok(Some(q)),
        _ => Err(ProcureError::InvalidQuantity(value.to_string())),
    }
}

fn parse_timeline(value: &str) -> Result<Option<NaiveDate>, ProcureError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, TIMELINE_FORMAT)
        .map(Some)
        .map_err(|_| ProcureError::InvalidDate(value.to_string()))
}

mod timeline_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMELINE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(TIMELINE_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, TIMELINE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Body returned by the submission endpoint.
///
/// The service answers `{"message", "id"}` on success and `{"error"}` when it
/// could not store the request, both with a 200 status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionReceipt {
    /// Whether the service reported that it stored the request.
    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// A stored submission as returned by the submissions listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: u64,
    pub supplier_name: String,
    pub product_info: String,
    #[serde(default)]
    pub product_url: Option<String>,
    pub category: String,
    pub quantity: u32,
    pub timeline: String,
    pub location: String,
    pub required_for: String,
}
