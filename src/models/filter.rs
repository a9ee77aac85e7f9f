use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// Structured search intent extracted from one free-text message.
/// Every field is best-effort; extraction never fails, it just leaves
/// fields unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub service: Option<ServiceCategory>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub passengers: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SearchFilter {
    /// True when nothing at all was extracted from the message.
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.passengers.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

/// Filter predicate handed to a catalog provider for one category query.
/// Location fields are already alias-expanded: a row matches when its
/// location column contains any of the terms.
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub passengers: Option<i64>,
    /// Destination-side terms (to_location for empty legs, the location
    /// column for ground categories).
    pub location_terms: Vec<String>,
    /// Departure-side terms (from_location / home base).
    pub from_terms: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Free-text fallback matched against name/description when no
    /// location terms are present.
    pub text: Option<String>,
    pub limit: i64,
}
