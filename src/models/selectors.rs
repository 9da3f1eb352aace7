// src/models/selectors.rs

//! CSS selectors for scraping the parks directory site.

use serde::{Deserialize, Serialize};

/// All selectors used by the markup extractors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSelectors {
    /// Selectors for the top-level index page
    #[serde(default)]
    pub directory: DirectorySelectors,

    /// Selectors for a region listing page
    #[serde(default)]
    pub listing: ListingSelectors,

    /// Selectors for a facility detail page
    #[serde(default)]
    pub facility: FacilitySelectors,
}

impl SiteSelectors {
    /// Every selector string, paired with a dotted name for error messages.
    pub fn all(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("directory.container", &self.directory.container),
            ("directory.item", &self.directory.item),
            ("directory.link", &self.directory.link),
            ("listing.column", &self.listing.column),
            ("listing.heading", &self.listing.heading),
            ("listing.link", &self.listing.link),
            ("facility.category", &self.facility.category),
            ("facility.name", &self.facility.name),
            ("facility.phone", &self.facility.phone),
            ("facility.postal_code", &self.facility.postal_code),
            ("facility.region", &self.facility.region),
            ("facility.city", &self.facility.city),
        ]
    }
}

/// Region navigation on the index page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectorySelectors {
    /// The single navigation container
    #[serde(default = "defaults::directory_container")]
    pub container: String,

    /// One list item per region
    #[serde(default = "defaults::directory_item")]
    pub item: String,

    /// Anchor inside a list item
    #[serde(default = "defaults::link")]
    pub link: String,
}

impl Default for DirectorySelectors {
    fn default() -> Self {
        Self {
            container: defaults::directory_container(),
            item: defaults::directory_item(),
            link: defaults::link(),
        }
    }
}

/// Facility headings on a region listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Primary content column
    #[serde(default = "defaults::listing_column")]
    pub column: String,

    /// Which immediate `div` child of the column holds the headings (0-based)
    #[serde(default = "defaults::listing_section_index")]
    pub section_index: usize,

    /// One heading per facility
    #[serde(default = "defaults::listing_heading")]
    pub heading: String,

    /// Anchor inside a heading
    #[serde(default = "defaults::link")]
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            column: defaults::listing_column(),
            section_index: defaults::listing_section_index(),
            heading: defaults::listing_heading(),
            link: defaults::link(),
        }
    }
}

/// Optional fields on a facility detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacilitySelectors {
    #[serde(default = "defaults::facility_category")]
    pub category: String,

    #[serde(default = "defaults::facility_name")]
    pub name: String,

    #[serde(default = "defaults::facility_phone")]
    pub phone: String,

    #[serde(default = "defaults::facility_postal_code")]
    pub postal_code: String,

    #[serde(default = "defaults::facility_region")]
    pub region: String,

    #[serde(default = "defaults::facility_city")]
    pub city: String,
}

impl Default for FacilitySelectors {
    fn default() -> Self {
        Self {
            category: defaults::facility_category(),
            name: defaults::facility_name(),
            phone: defaults::facility_phone(),
            postal_code: defaults::facility_postal_code(),
            region: defaults::facility_region(),
            city: defaults::facility_city(),
        }
    }
}

mod defaults {
    pub fn link() -> String {
        "a".into()
    }

    pub fn directory_container() -> String {
        "#HERO".into()
    }
    pub fn directory_item() -> String {
        "li".into()
    }

    pub fn listing_column() -> String {
        "div.col-md-9.col-sm-12.col-xs-12.stateCol".into()
    }
    pub fn listing_section_index() -> usize {
        1
    }
    pub fn listing_heading() -> String {
        "h3".into()
    }

    pub fn facility_category() -> String {
        "span.Hero-designation".into()
    }
    pub fn facility_name() -> String {
        "a.Hero-title".into()
    }
    pub fn facility_phone() -> String {
        "span.tel".into()
    }
    pub fn facility_postal_code() -> String {
        r#"span[itemprop="postalCode"]"#.into()
    }
    pub fn facility_region() -> String {
        r#"span[itemprop="addressRegion"]"#.into()
    }
    pub fn facility_city() -> String {
        r#"span[itemprop="addressLocality"]"#.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let selectors: SiteSelectors = toml::from_str(
            r#"
            [listing]
            section_index = 2
            "#,
        )
        .unwrap();

        assert_eq!(selectors.listing.section_index, 2);
        assert_eq!(selectors.listing.heading, "h3");
        assert_eq!(selectors.directory, DirectorySelectors::default());
    }

    #[test]
    fn all_lists_every_selector() {
        assert_eq!(SiteSelectors::default().all().len(), 12);
    }
}
