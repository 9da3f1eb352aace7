// src/models/directory.rs

//! Region name to listing URL mapping.

use std::collections::BTreeMap;

/// Index of regions (U.S. states) found on the directory page.
///
/// Names are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryIndex {
    regions: BTreeMap<String, String>,
}

impl DirectoryIndex {
    /// Build an index from `(name, absolute url)` pairs.
    ///
    /// A later duplicate name replaces an earlier one.
    pub fn from_pairs<I, N, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, U)>,
        N: AsRef<str>,
        U: Into<String>,
    {
        let regions = pairs
            .into_iter()
            .map(|(name, url)| (name.as_ref().trim().to_lowercase(), url.into()))
            .collect();
        Self { regions }
    }

    /// Listing URL for a region, ignoring case and surrounding whitespace.
    pub fn get(&self, region: &str) -> Option<&str> {
        self.regions
            .get(&region.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.get(region).is_some()
    }

    /// Region names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let index = DirectoryIndex::from_pairs([(
            "Michigan",
            "https://example.test/state/mi/index.htm",
        )]);

        assert_eq!(
            index.get("michigan"),
            Some("https://example.test/state/mi/index.htm")
        );
        assert_eq!(
            index.get("  MICHIGAN "),
            Some("https://example.test/state/mi/index.htm")
        );
        assert!(!index.contains("ohio"));
    }

    #[test]
    fn names_are_lowercase_and_sorted() {
        let index = DirectoryIndex::from_pairs([("Wyoming", "w"), ("Alaska", "a")]);
        let names: Vec<_> = index.names().collect();
        assert_eq!(names, vec!["alaska", "wyoming"]);
        assert_eq!(index.len(), 2);
    }
}
