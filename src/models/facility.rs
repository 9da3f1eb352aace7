// src/models/facility.rs

//! Facility record scraped from one detail page.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a detail page has no postal code.
pub const NO_ZIP: &str = "No Zip";

/// A national site as presented on its detail page.
///
/// Missing fields are filled with placeholders by the extractor, except the
/// postal code, which stays `None` so that callers can tell a real code from
/// its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Classification, e.g. "National Park"
    pub category: String,

    /// Display name, e.g. "Isle Royale"
    pub name: String,

    /// "{city}, {region}", e.g. "Houghton, MI"
    pub address: String,

    /// Postal code, e.g. "49931" or "82190-0168"
    pub postal_code: Option<String>,

    /// Phone number, e.g. "(906) 482-0984"
    pub phone: String,
}

impl Default for FacilityRecord {
    fn default() -> Self {
        Self {
            category: "No Category".to_string(),
            name: "No Name".to_string(),
            address: "No Address".to_string(),
            postal_code: None,
            phone: "No Phone Number".to_string(),
        }
    }
}

impl FacilityRecord {
    /// Postal code for display, or the "No Zip" placeholder.
    pub fn zipcode(&self) -> &str {
        self.postal_code.as_deref().unwrap_or(NO_ZIP)
    }

    /// One-line summary: `name (category): address zip`.
    pub fn info(&self) -> String {
        format!(
            "{} ({}): {} {}",
            self.name,
            self.category,
            self.address,
            self.zipcode()
        )
    }
}
