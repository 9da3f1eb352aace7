// src/services/proximity.rs

//! Proximity enricher.
//!
//! Finds places near a facility by querying a radius-search API with the
//! facility's postal code. Results are cached per postal code, including empty
//! ones, so a postal code is only ever searched once.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{FacilityRecord, NearbyPlaces, ProximityConfig};
use crate::services::ResourceFetcher;
use crate::storage::Places;

const NO_ADDRESS: &str = "No Address";
const NO_CITY: &str = "No City";

/// Radius-search response body.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "searchResults", default)]
    search_results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    fields: PlaceFields,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    group_sic_code_name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl PlaceFields {
    /// `name (category): street, city`
    fn describe(&self) -> String {
        let or_placeholder = |value: &Option<String>, placeholder: &str| match value.as_deref() {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => placeholder.to_string(),
        };

        format!(
            "{} ({}): {}, {}",
            self.name.as_deref().unwrap_or_default(),
            self.group_sic_code_name.as_deref().unwrap_or_default(),
            or_placeholder(&self.address, NO_ADDRESS),
            or_placeholder(&self.city, NO_CITY),
        )
    }
}

/// Parse a radius-search body into ranked descriptions.
///
/// A body without `searchResults` is a search with no matches, not an error.
pub fn parse_places(body: &str) -> Result<NearbyPlaces> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let Some(results) = response.search_results else {
        log::info!("Search response has no results");
        return Ok(NearbyPlaces::new());
    };
    Ok(NearbyPlaces::ranked(
        results.iter().map(|result| result.fields.describe()),
    ))
}

/// Looks up places near a facility.
#[derive(Debug, Clone)]
pub struct ProximityEnricher {
    config: ProximityConfig,
}

impl ProximityEnricher {
    pub fn new(config: ProximityConfig) -> Self {
        if config.api_key.is_empty() {
            log::warn!("proximity.api_key is not set; nearby searches will likely be rejected");
        }
        Self { config }
    }

    /// Query parameters for a search around `postal_code`.
    pub fn query(&self, postal_code: &str) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.config.api_key.clone()),
            ("origin", postal_code.to_string()),
            ("radius", self.config.radius.to_string()),
            ("maxMatches", self.config.max_matches.to_string()),
            ("ambiguities", self.config.ambiguities.clone()),
            ("outFormat", self.config.out_format.clone()),
        ]
    }

    /// Places near `facility`, ranked in API order.
    ///
    /// A facility without a postal code yields no places, without touching the
    /// network or the cache.
    pub async fn nearby(
        &self,
        fetcher: &mut ResourceFetcher<'_>,
        facility: &FacilityRecord,
    ) -> Result<NearbyPlaces> {
        let Some(postal_code) = facility.postal_code.as_deref() else {
            log::warn!(
                "{} has no zip code, so nearby places cannot be searched",
                facility.name
            );
            return Ok(NearbyPlaces::new());
        };

        let http = fetcher.http();
        let endpoint = self.config.endpoint.as_str();
        let query = self.query(postal_code);
        let places = fetcher
            .fetch_or_load::<Places, _, _>(postal_code, || async move {
                let body = http.get_text(endpoint, &query).await?;
                parse_places(&body)
            })
            .await?;

        if places.is_empty() {
            log::info!(
                "No places within {} of {}",
                self.config.radius,
                postal_code
            );
        }
        Ok(places)
    }
}
