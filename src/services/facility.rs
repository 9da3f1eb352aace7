// src/services/facility.rs

//! Facility extractor.
//!
//! Reads one facility detail page into a [`FacilityRecord`]. Each field is
//! optional on the page; a missing field is replaced by a placeholder and never
//! fails the extraction.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{FacilityRecord, FacilitySelectors};
use crate::services::parse_selector;

const NO_TYPE: &str = "No Type";
const NO_NAME: &str = "No Name";
const NO_NUMBER: &str = "No Number";
const NO_STATE: &str = "No State";
const NO_CITY: &str = "No City";

/// Extracts a facility record from its detail page.
pub struct FacilityExtractor {
    category: Selector,
    name: Selector,
    phone: Selector,
    postal_code: Selector,
    region: Selector,
    city: Selector,
}

impl FacilityExtractor {
    pub fn new(selectors: &FacilitySelectors) -> Result<Self> {
        Ok(Self {
            category: parse_selector(&selectors.category)?,
            name: parse_selector(&selectors.name)?,
            phone: parse_selector(&selectors.phone)?,
            postal_code: parse_selector(&selectors.postal_code)?,
            region: parse_selector(&selectors.region)?,
            city: parse_selector(&selectors.city)?,
        })
    }

    pub fn extract(&self, html: &str) -> FacilityRecord {
        let document = Html::parse_document(html);
        let field = |selector: &Selector, placeholder: &str| {
            first_text(&document, selector).unwrap_or_else(|| placeholder.to_string())
        };

        let city = field(&self.city, NO_CITY);
        let region = field(&self.region, NO_STATE);

        FacilityRecord {
            category: field(&self.category, NO_TYPE),
            name: field(&self.name, NO_NAME),
            address: format!("{city}, {region}"),
            // A blank code cannot be searched, so it counts as missing.
            postal_code: first_text(&document, &self.postal_code).filter(|zip| !zip.is_empty()),
            phone: field(&self.phone, NO_NUMBER),
        }
    }
}

/// Trimmed text of the first element matching `selector`.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
