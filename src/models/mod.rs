// src/models/mod.rs

//! Domain models for parkscout.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod directory;
mod facility;
mod places;
mod selectors;

// Re-export all public types
pub use config::{
    API_KEY_ENV, CacheConfig, Config, FlushPolicy, HttpConfig, ProximityConfig, SiteConfig,
};
pub use directory::DirectoryIndex;
pub use facility::{FacilityRecord, NO_ZIP};
pub use places::NearbyPlaces;
pub use selectors::{DirectorySelectors, FacilitySelectors, ListingSelectors, SiteSelectors};
