//! Service layer for parkscout.
//!
//! This module contains the business logic for:
//! - Cache-aside network access (`ResourceFetcher`)
//! - Region directory extraction (`DirectoryExtractor`)
//! - Region listing extraction (`ListingExtractor`)
//! - Facility detail extraction (`FacilityExtractor`)
//! - Nearby place lookup (`ProximityEnricher`)

mod directory;
mod facility;
mod fetcher;
mod listing;
mod proximity;

use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DirectoryIndex, FacilityRecord, SiteSelectors};

pub use directory::DirectoryExtractor;
pub use facility::FacilityExtractor;
pub use fetcher::ResourceFetcher;
pub use listing::ListingExtractor;
pub use proximity::{ProximityEnricher, parse_places};

/// Turns raw page markup into typed records.
///
/// The pipeline only depends on this trait, so the site's markup details can
/// change without touching the fetch logic.
pub trait ExtractionAdapter {
    /// Region name to listing URL, from the index page.
    fn directory(&self, html: &str) -> Result<DirectoryIndex>;

    /// Facility detail URLs, in page order, from a region listing page.
    fn listing(&self, html: &str) -> Result<Vec<String>>;

    /// One facility record from its detail page.
    fn facility(&self, html: &str) -> FacilityRecord;
}

/// [`ExtractionAdapter`] driven by configurable CSS selectors.
pub struct SelectorAdapter {
    directory: DirectoryExtractor,
    listing: ListingExtractor,
    facility: FacilityExtractor,
}

impl SelectorAdapter {
    /// Compile every selector; relative links resolve against `origin`.
    pub fn new(selectors: &SiteSelectors, origin: Url) -> Result<Self> {
        Ok(Self {
            directory: DirectoryExtractor::new(&selectors.directory, origin.clone())?,
            listing: ListingExtractor::new(&selectors.listing, origin)?,
            facility: FacilityExtractor::new(&selectors.facility)?,
        })
    }
}

impl ExtractionAdapter for SelectorAdapter {
    fn directory(&self, html: &str) -> Result<DirectoryIndex> {
        self.directory.extract(html)
    }

    fn listing(&self, html: &str) -> Result<Vec<String>> {
        self.listing.extract(html)
    }

    fn facility(&self, html: &str) -> FacilityRecord {
        self.facility.extract(html)
    }
}

/// Parse a CSS selector, mapping failures to [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
