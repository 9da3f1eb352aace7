//! Persistent cache for fetched resources.
//!
//! Every network read goes through one JSON document on disk. The document
//! holds two typed namespaces so that page URLs and postal codes can never
//! collide:
//!
//! ```text
//! {
//!   "updated_at": "2026-10-19T12:00:00Z",
//!   "pages":  { "https://www.nps.gov/index.htm": "<html>..." },
//!   "places": { "49931": { "1": "Cafe (Restaurants): 1 Main St, Houghton" } }
//! }
//! ```

pub mod cache;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::NearbyPlaces;

// Re-export for convenience
pub use cache::PersistentCache;

/// On-disk cache document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheDocument {
    /// Time of the last flush
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Absolute URL to raw page markup
    #[serde(default)]
    pub pages: BTreeMap<String, String>,

    /// Postal code to ranked nearby places
    #[serde(default)]
    pub places: BTreeMap<String, NearbyPlaces>,
}

/// A typed partition of the cache document.
pub trait Namespace {
    type Value: Clone;

    /// Label used in log lines
    const LABEL: &'static str;

    fn entries(document: &CacheDocument) -> &BTreeMap<String, Self::Value>;

    fn entries_mut(document: &mut CacheDocument) -> &mut BTreeMap<String, Self::Value>;
}

/// Raw HTML keyed by absolute URL.
pub enum Pages {}

impl Namespace for Pages {
    type Value = String;
    const LABEL: &'static str = "page";

    fn entries(document: &CacheDocument) -> &BTreeMap<String, String> {
        &document.pages
    }

    fn entries_mut(document: &mut CacheDocument) -> &mut BTreeMap<String, String> {
        &mut document.pages
    }
}

/// Nearby-place results keyed by postal code.
pub enum Places {}

impl Namespace for Places {
    type Value = NearbyPlaces;
    const LABEL: &'static str = "places";

    fn entries(document: &CacheDocument) -> &BTreeMap<String, NearbyPlaces> {
        &document.places
    }

    fn entries_mut(document: &mut CacheDocument) -> &mut BTreeMap<String, NearbyPlaces> {
        &mut document.places
    }
}
