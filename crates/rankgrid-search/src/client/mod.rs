//! HTTP client for the ranked-search provider (Serper-compatible API).

mod payload;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::types::{SearchMode, SearchPage, SearchRequest};

use payload::{OrganicResponse, PlacesResponse};

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/";

/// Results requested per organic page.
const ORGANIC_PAGE_SIZE: u32 = 10;

/// A source of ranked search results, one page per call.
///
/// Implementations do not retry; the tracker decides what an error or an
/// empty page means.
pub trait RankedSearch: Send + Sync {
    /// Fetches a single page of results.
    fn fetch_page(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Pre-flight check run before any point is searched.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no call could possibly succeed.
    fn ensure_configured(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

/// Client for the Serper search and places endpoints.
///
/// Use [`SerperClient::new`] for production or [`SerperClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SerperClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl SerperClient {
    /// Creates a client pointed at the production API.
    ///
    /// A missing `api_key` is accepted here; every fetch then fails with
    /// [`SearchError::MissingApiKey`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`SearchError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            base_url,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, mode: SearchMode) -> Result<Url, SearchError> {
        let path = match mode {
            SearchMode::Organic => "search",
            SearchMode::Local => "places",
        };
        self.base_url
            .join(path)
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// JSON body for one page request.
    fn request_body(request: &SearchRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "q": request.keyword,
            "gl": request.country,
            "hl": request.language,
            "page": request.page,
        });
        match request.mode {
            SearchMode::Organic => {
                body["num"] = serde_json::json!(ORGANIC_PAGE_SIZE);
            }
            SearchMode::Local => {
                if let Some(at) = request.location {
                    body["ll"] = serde_json::json!(format!(
                        "@{},{},{}z",
                        at.latitude, at.longitude, request.zoom
                    ));
                }
            }
        }
        body
    }

    fn parse_page(mode: SearchMode, body: &str, context: String) -> Result<SearchPage, SearchError> {
        let items = match mode {
            SearchMode::Organic => serde_json::from_str::<OrganicResponse>(body)
                .map(OrganicResponse::into_items),
            SearchMode::Local => {
                serde_json::from_str::<PlacesResponse>(body).map(PlacesResponse::into_items)
            }
        }
        .map_err(|source| SearchError::Deserialize { context, source })?;
        Ok(SearchPage { items })
    }
}

impl RankedSearch for SerperClient {
    fn ensure_configured(&self) -> Result<(), SearchError> {
        if self.api_key.is_none() {
            return Err(SearchError::MissingApiKey);
        }
        Ok(())
    }

    /// Fetches one page from the provider.
    ///
    /// # Errors
    ///
    /// - [`SearchError::MissingApiKey`]: no credential configured.
    /// - [`SearchError::UnexpectedStatus`]: any non-2xx status, with the body.
    /// - [`SearchError::Deserialize`]: payload does not match the expected shape.
    /// - [`SearchError::Http`]: network or TLS failure.
    async fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;
        let url = self.endpoint(request.mode)?;

        let response = self
            .client
            .post(url.clone())
            .header("X-API-KEY", api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = response.text().await?;
        let context = format!(
            "{} page {} for \"{}\"",
            request.mode, request.page, request.keyword
        );
        let page = Self::parse_page(request.mode, &body, context)?;

        tracing::debug!(
            keyword = %request.keyword,
            mode = %request.mode,
            page = request.page,
            items = page.item_count_on_page(),
            "fetched search page"
        );
        Ok(page)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
