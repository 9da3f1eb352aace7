// src/services/directory.rs

//! Directory extractor.
//!
//! Turns the site index page into a map from region name to the absolute URL
//! of that region's listing page.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DirectoryIndex, DirectorySelectors};
use crate::services::parse_selector;
use crate::utils::{normalize_whitespace, resolve_url};

/// Extracts the region navigation from the index page.
pub struct DirectoryExtractor {
    container: Selector,
    item: Selector,
    link: Selector,
    origin: Url,
}

impl DirectoryExtractor {
    pub fn new(selectors: &DirectorySelectors, origin: Url) -> Result<Self> {
        Ok(Self {
            container: parse_selector(&selectors.container)?,
            item: parse_selector(&selectors.item)?,
            link: parse_selector(&selectors.link)?,
            origin,
        })
    }

    /// Parse the index page.
    ///
    /// A missing navigation container, an empty navigation, or an entry
    /// without a link means the page is not what we expect, and no partial
    /// directory is returned.
    pub fn extract(&self, html: &str) -> Result<DirectoryIndex> {
        let document = Html::parse_document(html);
        let container = document
            .select(&self.container)
            .next()
            .ok_or_else(|| AppError::extraction("directory", "region navigation not found"))?;

        let mut regions = Vec::new();
        for item in container.select(&self.item) {
            let name = normalize_whitespace(&item.text().collect::<String>());
            let href = item
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| {
                    AppError::extraction("directory", format!("region '{name}' has no link"))
                })?;
            regions.push((name, resolve_url(&self.origin, href)));
        }

        if regions.is_empty() {
            return Err(AppError::extraction(
                "directory",
                "region navigation has no entries",
            ));
        }

        log::debug!("Directory lists {} regions", regions.len());
        Ok(DirectoryIndex::from_pairs(regions))
    }
}
