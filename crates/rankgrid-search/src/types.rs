//! Shared request/response types for the ranked-search provider.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a coordinate usable as a grid center.
    ///
    /// Poles are rejected: the longitude step divides by `cos(latitude)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCenter`] for non-finite values, `|latitude| >= 90`,
    /// or `|longitude| > 180`.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, GridError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() < 90.0
            && longitude.abs() <= 180.0;
        if !valid {
            return Err(GridError::InvalidCenter {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Organic web results.
    Organic,
    /// Map/places results (the local pack).
    #[default]
    Local,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Organic => write!(f, "organic"),
            SearchMode::Local => write!(f, "local"),
        }
    }
}

/// One page request against the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub keyword: String,
    pub mode: SearchMode,
    /// Two-letter country code (`gl`).
    pub country: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Only used by [`SearchMode::Local`].
    pub location: Option<Coordinates>,
    pub zoom: u8,
    /// 1-based page number.
    pub page: u32,
}

/// A single ranked result. `position` is 1-based within its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub title: String,
    /// Organic result URL, or the listing's website for places.
    pub link: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub phone_number: Option<String>,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<SearchResultItem>,
}

impl SearchPage {
    #[must_use]
    pub fn item_count_on_page(&self) -> usize {
        self.items.len()
    }
}
