// src/models/places.rs

//! Ranked nearby-place descriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nearby places keyed by 1-based rank, in API response order.
///
/// Serializes as a JSON object with stringified integer keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NearbyPlaces(BTreeMap<u32, String>);

impl NearbyPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank descriptions 1..=n in iteration order.
    pub fn ranked<I, S>(descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            (1..)
                .zip(descriptions)
                .map(|(rank, desc)| (rank, desc.into()))
                .collect(),
        )
    }

    pub fn get(&self, rank: u32) -> Option<&str> {
        self.0.get(&rank).map(String::as_str)
    }

    /// Descriptions in rank order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_start_at_one() {
        let places = NearbyPlaces::ranked(["a", "b", "c"]);
        assert_eq!(places.get(1), Some("a"));
        assert_eq!(places.get(3), Some("c"));
        assert_eq!(places.get(0), None);
    }

    #[test]
    fn ten_or_more_keep_numeric_order() {
        let places = NearbyPlaces::ranked((1..=11).map(|i| format!("place {i}")));
        let last = places.descriptions().last().unwrap();
        assert_eq!(last, "place 11");
    }

    #[test]
    fn serializes_as_object_with_string_keys() {
        let places = NearbyPlaces::ranked(["Cafe (Restaurants): 1 Main St, Houghton"]);
        let json = serde_json::to_string(&places).unwrap();
        assert_eq!(json, r#"{"1":"Cafe (Restaurants): 1 Main St, Houghton"}"#);

        let back: NearbyPlaces = serde_json::from_str(&json).unwrap();
        assert_eq!(back, places);
    }
}
