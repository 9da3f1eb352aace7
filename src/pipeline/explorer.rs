// src/pipeline/explorer.rs

//! Fetch-and-extract driver.
//!
//! Directory (once) → region listing (per region) → facility (per listed
//! site) → nearby places (on demand). Every page read goes through the
//! [`ResourceFetcher`], so a second run over the same regions makes no
//! requests.

use crate::error::Result;
use crate::models::{Config, DirectoryIndex, FacilityRecord, NearbyPlaces};
use crate::services::{ExtractionAdapter, ProximityEnricher, ResourceFetcher, SelectorAdapter};
use crate::storage::PersistentCache;
use crate::utils::http::HttpSource;

/// Drives the extractors over cached network reads.
pub struct Explorer<'a> {
    fetcher: ResourceFetcher<'a>,
    adapter: Box<dyn ExtractionAdapter>,
    enricher: ProximityEnricher,
    index_url: String,
}

impl<'a> Explorer<'a> {
    pub fn new(
        fetcher: ResourceFetcher<'a>,
        adapter: Box<dyn ExtractionAdapter>,
        enricher: ProximityEnricher,
        index_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            adapter,
            enricher,
            index_url: index_url.into(),
        }
    }

    /// Build an explorer with the selector adapter described by `config`.
    pub fn from_config(
        config: &Config,
        cache: &'a mut PersistentCache,
        http: &'a dyn HttpSource,
    ) -> Result<Self> {
        let adapter = SelectorAdapter::new(&config.selectors, config.site.origin_url()?)?;
        Ok(Self::new(
            ResourceFetcher::new(cache, http),
            Box::new(adapter),
            ProximityEnricher::new(config.proximity.clone()),
            config.site.index_url()?,
        ))
    }

    /// Region index from the site's index page.
    pub async fn directory(&mut self) -> Result<DirectoryIndex> {
        let html = self.fetcher.page(&self.index_url).await?;
        self.adapter.directory(&html)
    }

    /// Every facility listed on a region page, in page order.
    pub async fn facilities(&mut self, region_url: &str) -> Result<Vec<FacilityRecord>> {
        let html = self.fetcher.page(region_url).await?;
        let detail_urls = self.adapter.listing(&html)?;
        log::debug!("{} lists {} sites", region_url, detail_urls.len());

        let mut records = Vec::with_capacity(detail_urls.len());
        for url in &detail_urls {
            records.push(self.facility(url).await?);
        }
        Ok(records)
    }

    /// One facility from its detail page.
    pub async fn facility(&mut self, detail_url: &str) -> Result<FacilityRecord> {
        let html = self.fetcher.page(detail_url).await?;
        Ok(self.adapter.facility(&html))
    }

    /// Places near `facility`.
    pub async fn nearby(&mut self, facility: &FacilityRecord) -> Result<NearbyPlaces> {
        self.enricher.nearby(&mut self.fetcher, facility).await
    }

    pub fn cache(&self) -> &PersistentCache {
        self.fetcher.cache()
    }
}
