// src/services/listing.rs

//! Region listing extractor.
//!
//! Reads a region's listing page into the ordered detail-page URLs of the
//! facilities it lists. Order matters: it is the numbering shown to the user.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ListingSelectors;
use crate::services::parse_selector;
use crate::utils::resolve_url;

/// Extracts facility detail links from a region listing page.
pub struct ListingExtractor {
    column: Selector,
    section_index: usize,
    heading: Selector,
    link: Selector,
    origin: Url,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors, origin: Url) -> Result<Self> {
        Ok(Self {
            column: parse_selector(&selectors.column)?,
            section_index: selectors.section_index,
            heading: parse_selector(&selectors.heading)?,
            link: parse_selector(&selectors.link)?,
            origin,
        })
    }

    /// Absolute detail URLs in page order.
    ///
    /// The column and its section must exist; a section with no headings is
    /// an empty listing.
    pub fn extract(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let column = document
            .select(&self.column)
            .next()
            .ok_or_else(|| AppError::extraction("listing", "content column not found"))?;

        let section = column
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "div")
            .nth(self.section_index)
            .ok_or_else(|| {
                AppError::extraction(
                    "listing",
                    format!("content column has no section #{}", self.section_index + 1),
                )
            })?;

        section
            .select(&self.heading)
            .enumerate()
            .map(|(i, heading)| {
                heading
                    .select(&self.link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| resolve_url(&self.origin, href))
                    .ok_or_else(|| {
                        AppError::extraction("listing", format!("heading #{} has no link", i + 1))
                    })
            })
            .collect()
    }
}
