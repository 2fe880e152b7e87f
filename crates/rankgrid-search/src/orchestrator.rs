//! Batched fan-out of rank tracking over a grid.
//!
//! Points run in fixed-size batches: every tracker in a batch is in flight at
//! once, the batch is awaited in full, then a fixed pause precedes the next
//! batch. This bounds simultaneous provider calls to `batch_size` and gives
//! coarse pacing against provider rate limits. Results come back in input
//! order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::client::RankedSearch;
use crate::error::GridSearchError;
use crate::grid::{GridPoint, MAX_GRID_POINTS};
use crate::summary::{summarize, GridSearchSummary};
use crate::tracker::{track_ranking, RankQuery, RankingResult, TrackerSettings};
use crate::types::{SearchMode, SearchResultItem};

#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub tracker: TrackerSettings,
    pub mode: SearchMode,
    pub country: String,
    pub language: String,
    pub zoom: u8,
}

impl Default for GridSearchSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_millis(200),
            tracker: TrackerSettings::default(),
            mode: SearchMode::Local,
            country: "us".to_owned(),
            language: "en".to_owned(),
            zoom: 14,
        }
    }
}

impl GridSearchSettings {
    #[must_use]
    pub fn from_app_config(config: &rankgrid_core::AppConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
            tracker: TrackerSettings {
                max_pages: config.max_pages.max(1),
                top_results_limit: config.top_results_limit,
            },
            mode: SearchMode::Local,
            country: config.default_country.clone(),
            language: config.default_language.clone(),
            zoom: config.places_zoom,
        }
    }
}

/// Rank outcome for one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOutcome {
    pub point_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub row: i32,
    pub col: i32,
    pub rank: Option<u32>,
    pub matched_entity: Option<SearchResultItem>,
    pub top_results: Vec<SearchResultItem>,
    pub error: Option<String>,
}

impl PointOutcome {
    fn from_ranking(point: &GridPoint, result: RankingResult) -> Self {
        Self {
            point_id: point.id.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            row: point.row,
            col: point.col,
            rank: result.rank,
            matched_entity: result.matched,
            top_results: result.top_results,
            error: result.error,
        }
    }

    fn failed(point: &GridPoint, error: String) -> Self {
        Self {
            point_id: point.id.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            row: point.row,
            col: point.col,
            rank: None,
            matched_entity: None,
            top_results: Vec::new(),
            error: Some(error),
        }
    }
}

/// Combined result of one grid run, shaped as the HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridReport {
    pub keyword: String,
    pub target_website: String,
    pub total_points: usize,
    pub summary: GridSearchSummary,
    pub results: Vec<PointOutcome>,
}

impl GridReport {
    /// `keyword` and `target_website` are echoed trimmed, as searched.
    #[must_use]
    pub fn new(keyword: &str, target_website: &str, results: Vec<PointOutcome>) -> Self {
        Self {
            keyword: keyword.trim().to_owned(),
            target_website: target_website.trim().to_owned(),
            total_points: results.len(),
            summary: summarize(&results),
            results,
        }
    }
}

fn validate(
    points: &[GridPoint],
    keyword: &str,
    target_domain: &str,
) -> Result<Vec<GridPoint>, GridSearchError> {
    if keyword.trim().is_empty() {
        return Err(GridSearchError::BlankKeyword);
    }
    if target_domain.trim().is_empty() {
        return Err(GridSearchError::BlankTarget);
    }
    if points.len() > MAX_GRID_POINTS {
        return Err(GridSearchError::TooManyPoints {
            count: points.len(),
            max: MAX_GRID_POINTS,
        });
    }
    let selected: Vec<GridPoint> = points.iter().filter(|p| p.is_selected).cloned().collect();
    if selected.is_empty() {
        return Err(GridSearchError::EmptyPoints);
    }
    Ok(selected)
}

/// Tracks the target's rank at every selected point.
///
/// Unselected points are skipped. The returned outcomes are index-aligned
/// with the selected points. A failure while tracking one point, including a
/// panic, is recorded on that point's outcome and never aborts the run.
///
/// # Errors
///
/// Fails before any network call when no point is selected, more than
/// [`MAX_GRID_POINTS`] points are submitted, `keyword` or `target_domain` is
/// blank, or the provider reports itself unconfigured.
pub async fn run_grid_search<P: RankedSearch>(
    provider: &P,
    points: &[GridPoint],
    keyword: &str,
    target_domain: &str,
    settings: &GridSearchSettings,
) -> Result<Vec<PointOutcome>, GridSearchError> {
    let selected = validate(points, keyword, target_domain)?;
    provider
        .ensure_configured()
        .map_err(GridSearchError::Configuration)?;

    let batch_size = settings.batch_size.max(1);
    let batch_count = selected.len().div_ceil(batch_size);
    tracing::info!(
        keyword,
        target_domain,
        points = selected.len(),
        batch_size,
        batch_count,
        "starting grid search"
    );

    let mut outcomes = Vec::with_capacity(selected.len());
    for (batch_index, batch) in selected.chunks(batch_size).enumerate() {
        if batch_index > 0 && !settings.batch_delay.is_zero() {
            tokio::time::sleep(settings.batch_delay).await;
        }
        let in_flight = batch
            .iter()
            .map(|point| track_point(provider, point, keyword, target_domain, settings));
        outcomes.extend(join_all(in_flight).await);
        tracing::debug!(batch = batch_index + 1, batch_count, "grid batch complete");
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    let found = outcomes.iter().filter(|o| o.rank.is_some()).count();
    tracing::info!(keyword, found, failed, total = outcomes.len(), "grid search finished");
    Ok(outcomes)
}

/// [`run_grid_search`] plus the summary, as a [`GridReport`].
///
/// # Errors
///
/// Same as [`run_grid_search`].
pub async fn run_grid_report<P: RankedSearch>(
    provider: &P,
    points: &[GridPoint],
    keyword: &str,
    target_website: &str,
    settings: &GridSearchSettings,
) -> Result<GridReport, GridSearchError> {
    let outcomes = run_grid_search(provider, points, keyword, target_website, settings).await?;
    Ok(GridReport::new(keyword, target_website, outcomes))
}

async fn track_point<P: RankedSearch>(
    provider: &P,
    point: &GridPoint,
    keyword: &str,
    target_domain: &str,
    settings: &GridSearchSettings,
) -> PointOutcome {
    let query = RankQuery {
        keyword: keyword.trim().to_owned(),
        target_domain: target_domain.trim().to_owned(),
        mode: settings.mode,
        country: settings.country.clone(),
        language: settings.language.clone(),
        location: Some(point.coordinates()),
        zoom: settings.zoom,
    };

    match AssertUnwindSafe(track_ranking(provider, &query, settings.tracker))
        .catch_unwind()
        .await
    {
        Ok(result) => {
            if let Some(error) = &result.error {
                tracing::warn!(point = %point.id, error = %error, "grid point failed");
            }
            PointOutcome::from_ranking(point, result)
        }
        Err(panic) => {
            let message = format!("point tracking failed: {}", panic_message(panic.as_ref()));
            tracing::warn!(point = %point.id, error = %message, "grid point failed");
            PointOutcome::failed(point, message)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        return (*message).to_owned();
    }
    if let Some(message) = panic.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_owned()
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
