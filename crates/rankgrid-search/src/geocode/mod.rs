//! Forward geocoding (free-text place → coordinates) for grid centers.
//!
//! Talks to a Nominatim-compatible `/search` endpoint. Responses are cached
//! in an injected [`GeocodeCache`].

mod cache;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::GeocodeCache;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const RESULT_LIMIT: &str = "5";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocode query must not be blank")]
    BlankQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from geocoder")]
    UnexpectedStatus { status: u16 },

    #[error("malformed geocoder payload: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("geocoder returned a non-numeric coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct RawPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl TryFrom<RawPlace> for GeocodeResult {
    type Error = GeocodeError;

    fn try_from(raw: RawPlace) -> Result<Self, Self::Error> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeocodeError::InvalidCoordinate(s.to_owned()))
        };
        Ok(Self {
            latitude: parse(&raw.lat)?,
            longitude: parse(&raw.lon)?,
            display_name: raw.display_name,
        })
    }
}

pub struct Geocoder {
    client: Client,
    base_url: Url,
    cache: GeocodeCache,
}

impl Geocoder {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        cache: GeocodeCache,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL, cache)
    }

    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
        cache: GeocodeCache,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url,
            cache,
        })
    }

    #[must_use]
    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", RESULT_LIMIT);
        Ok(url)
    }

    /// Resolves free text to candidate coordinates, best match first.
    ///
    /// Cached per normalized query; empty answers are cached too.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::BlankQuery`]: nothing to look up.
    /// - [`GeocodeError::UnexpectedStatus`]: non-2xx from the geocoder.
    /// - [`GeocodeError::Deserialize`] / [`GeocodeError::InvalidCoordinate`]: malformed payload.
    /// - [`GeocodeError::Http`]: network failure.
    pub async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::BlankQuery);
        }
        if let Some(hit) = self.cache.get(query) {
            tracing::debug!(query, "geocode cache hit");
            return Ok(hit);
        }

        let response = self.client.get(self.search_url(query)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let raw: Vec<RawPlace> = serde_json::from_str(&body)?;
        let results = raw
            .into_iter()
            .map(GeocodeResult::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(query, count = results.len(), "geocoded");
        self.cache.insert(query, results.clone());
        Ok(results)
    }
}
