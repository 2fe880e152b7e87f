//! Single-location rank tracking over paginated search results.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::RankedSearch;
use crate::domain::domains_match;
use crate::types::{Coordinates, SearchMode, SearchRequest, SearchResultItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Maximum number of pages fetched per tracked query.
    pub max_pages: u32,
    /// Maximum number of scanned results kept on the outcome.
    pub top_results_limit: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            max_pages: 5,
            top_results_limit: 20,
        }
    }
}

/// What to look for, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct RankQuery {
    pub keyword: String,
    pub target_domain: String,
    pub mode: SearchMode,
    pub country: String,
    pub language: String,
    pub location: Option<Coordinates>,
    pub zoom: u8,
}

impl RankQuery {
    fn request_for_page(&self, page: u32) -> SearchRequest {
        SearchRequest {
            keyword: self.keyword.clone(),
            mode: self.mode,
            country: self.country.clone(),
            language: self.language.clone(),
            location: self.location,
            zoom: self.zoom,
            page,
        }
    }

    fn matches(&self, item: &SearchResultItem) -> bool {
        item.link
            .as_deref()
            .is_some_and(|link| domains_match(link, &self.target_domain))
    }
}

/// Outcome of a first-match rank search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResult {
    pub keyword: String,
    pub target_domain: String,
    pub found: bool,
    /// Overall 1-based position, continuous across pages.
    pub rank: Option<u32>,
    pub page: Option<u32>,
    pub position_on_page: Option<u32>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub matched: Option<SearchResultItem>,
    /// The first scanned results, bounded by `top_results_limit`.
    pub top_results: Vec<SearchResultItem>,
    pub pages_fetched: u32,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl RankingResult {
    fn empty(query: &RankQuery) -> Self {
        Self {
            keyword: query.keyword.clone(),
            target_domain: query.target_domain.clone(),
            found: false,
            rank: None,
            page: None,
            position_on_page: None,
            url: None,
            title: None,
            matched: None,
            top_results: Vec::new(),
            pages_fetched: 0,
            error: None,
            checked_at: Utc::now(),
        }
    }
}

/// Pages through results until the target domain first appears.
///
/// Stops at the first match, at an empty page, or once `max_pages` pages have
/// been read. A failed page aborts the scan: the result is `found = false`
/// with `error` naming the page and cause, and no later page is requested.
pub async fn track_ranking<P: RankedSearch>(
    provider: &P,
    query: &RankQuery,
    settings: TrackerSettings,
) -> RankingResult {
    let mut result = RankingResult::empty(query);
    let mut overall_position: u32 = 0;

    for page in 1..=settings.max_pages {
        let fetched = match provider.fetch_page(&query.request_for_page(page)).await {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(
                    keyword = %query.keyword,
                    page,
                    error = %err,
                    "rank tracking aborted on failed page"
                );
                result.top_results.clear();
                result.error = Some(format!("page {page} failed: {err}"));
                return result;
            }
        };
        result.pages_fetched = page;

        if fetched.items.is_empty() {
            tracing::debug!(keyword = %query.keyword, page, "result pages exhausted");
            break;
        }

        for (index, item) in fetched.items.into_iter().enumerate() {
            overall_position += 1;
            if result.top_results.len() < settings.top_results_limit {
                result.top_results.push(item.clone());
            }
            if query.matches(&item) {
                result.found = true;
                result.rank = Some(overall_position);
                result.page = Some(page);
                result.position_on_page = Some(u32::try_from(index + 1).unwrap_or(u32::MAX));
                result.url.clone_from(&item.link);
                result.title = Some(item.title.clone());
                result.matched = Some(item);
                return result;
            }
        }
    }

    result
}

/// One matching listing in the local pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPlace {
    pub overall_position: u32,
    pub page: u32,
    pub position_on_page: u32,
    pub place: SearchResultItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPackResult {
    pub keyword: String,
    pub target_domain: String,
    pub found: bool,
    /// Listings scanned across all fetched pages.
    pub total_places: u32,
    pub matching_places: Vec<MatchedPlace>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Scans every local-pack page up to `max_pages` and collects all listings
/// whose website matches the target (a business may hold several).
///
/// A failed page aborts the scan and discards matches from earlier pages.
pub async fn track_local_pack<P: RankedSearch>(
    provider: &P,
    query: &RankQuery,
    settings: TrackerSettings,
) -> LocalPackResult {
    let query = RankQuery {
        mode: SearchMode::Local,
        ..query.clone()
    };
    let mut total_places: u32 = 0;
    let mut matching_places = Vec::new();
    let mut error = None;

    for page in 1..=settings.max_pages {
        let fetched = match provider.fetch_page(&query.request_for_page(page)).await {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(keyword = %query.keyword, page, error = %err, "local pack scan aborted");
                matching_places.clear();
                error = Some(format!("page {page} failed: {err}"));
                break;
            }
        };
        if fetched.items.is_empty() {
            break;
        }

        for (index, place) in fetched.items.into_iter().enumerate() {
            total_places += 1;
            if query.matches(&place) {
                matching_places.push(MatchedPlace {
                    overall_position: total_places,
                    page,
                    position_on_page: u32::try_from(index + 1).unwrap_or(u32::MAX),
                    place,
                });
            }
        }
    }

    LocalPackResult {
        keyword: query.keyword,
        target_domain: query.target_domain,
        found: !matching_places.is_empty(),
        total_places,
        matching_places,
        error,
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
