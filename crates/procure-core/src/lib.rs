//! Procurement domain types.
//!
//! This crate provides the client-side view model shared by the gateway, the
//! UI components and the CLI:
//!
//! - **Catalog**: product summaries from the search endpoint
//! - **Reference data**: locations and categories used to populate selects
//! - **Draft**: the new-item request record and its field-level edits
//!
//! # Example
//!
//! ```rust
//! use procure_core::prelude::*;
//!
//! let mut draft = ItemDraft::default();
//! draft.set(DraftField::SupplierName, "Acme").unwrap();
//! draft.set(DraftField::Quantity, "12").unwrap();
//! draft.select_category("3");
//!
//! assert_eq!(draft.quantity, Some(12));
//! assert_eq!(draft.selected_category(), "3");
//! assert!(!draft.missing_required().is_empty());
//! ```

pub mod catalog;
pub mod draft;
pub mod error;
pub mod ids;
pub mod reference;

pub use catalog::ProductSummary;
pub use draft::{DraftField, ItemDraft, StoredSubmission, SubmissionReceipt};
pub use error::ProcureError;
pub use ids::*;
pub use reference::{Category, Location};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::ProductSummary;
    pub use crate::draft::{DraftField, ItemDraft, StoredSubmission, SubmissionReceipt};
    pub use crate::error::ProcureError;
    pub use crate::ids::*;
    pub use crate::reference::{Category, Location};
}
