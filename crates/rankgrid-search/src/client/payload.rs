//! Wire shapes of the Serper-style provider responses.
//!
//! Only the fields the trackers consume are modelled; unknown fields are
//! ignored. A missing result array or a result without its required fields
//! fails deserialization, which the client reports as a provider error.

use serde::Deserialize;

use crate::types::SearchResultItem;

#[derive(Debug, Deserialize)]
pub(super) struct OrganicResponse {
    pub organic: Vec<OrganicEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrganicEntry {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlacesResponse {
    pub places: Vec<PlaceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaceEntry {
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// 1-based position of the `index`-th entry on a page.
fn page_position(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

impl OrganicResponse {
    pub fn into_items(self) -> Vec<SearchResultItem> {
        self.organic
            .into_iter()
            .enumerate()
            .map(|(index, entry)| SearchResultItem {
                title: entry.title,
                link: Some(entry.link),
                address: None,
                rating: None,
                review_count: None,
                phone_number: None,
                position: page_position(index),
            })
            .collect()
    }
}

impl PlacesResponse {
    pub fn into_items(self) -> Vec<SearchResultItem> {
        self.places
            .into_iter()
            .enumerate()
            .map(|(index, entry)| SearchResultItem {
                title: entry.title,
                link: entry.website.filter(|w| !w.trim().is_empty()),
                address: entry.address,
                rating: entry.rating,
                review_count: entry.rating_count,
                phone_number: entry.phone_number,
                position: page_position(index),
            })
            .collect()
    }
}
