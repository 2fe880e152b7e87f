use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use rankgrid_search::{
    track_local_pack, track_ranking, Coordinates, GridSearchError, LocalPackResult, RankQuery,
    RankedSearch, RankingResult, SearchMode,
};
use serde::Deserialize;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankRequest {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    target_website: String,
    country: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocalRankRequest {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    target_website: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn non_blank(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Shared pre-flight for the single-point routes.
fn base_query(state: &AppState, keyword: &str, target: &str) -> Result<RankQuery, ApiError> {
    if keyword.trim().is_empty() {
        return Err(GridSearchError::BlankKeyword.into());
    }
    if target.trim().is_empty() {
        return Err(GridSearchError::BlankTarget.into());
    }
    state.search.ensure_configured()?;

    Ok(RankQuery {
        keyword: keyword.trim().to_owned(),
        target_domain: target.trim().to_owned(),
        mode: SearchMode::Organic,
        country: state.settings.country.clone(),
        language: state.settings.language.clone(),
        location: None,
        zoom: state.settings.zoom,
    })
}

pub(super) async fn organic_rank(
    State(state): State<AppState>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankingResult>, ApiError> {
    let Json(request) = payload?;
    let mut query = base_query(&state, &request.keyword, &request.target_website)?;
    query.country = non_blank(request.country, &query.country);
    query.language = non_blank(request.language, &query.language);

    let result = track_ranking(state.search.as_ref(), &query, state.settings.tracker).await;
    if let Some(error) = &result.error {
        return Err(ApiError::new("provider_error", error.clone()));
    }
    Ok(Json(result))
}

pub(super) async fn local_rank(
    State(state): State<AppState>,
    payload: Result<Json<LocalRankRequest>, JsonRejection>,
) -> Result<Json<LocalPackResult>, ApiError> {
    let Json(request) = payload?;
    let location = match (request.latitude, request.longitude) {
        (Some(lat), Some(lng)) => Some(Coordinates::checked(lat, lng)?),
        (None, None) => None,
        _ => {
            return Err(ApiError::validation(
                "latitude and longitude must be supplied together",
            ))
        }
    };
    let mut query = base_query(&state, &request.keyword, &request.target_website)?;
    query.location = location;

    let result = track_local_pack(state.search.as_ref(), &query, state.settings.tracker).await;
    if let Some(error) = &result.error {
        return Err(ApiError::new("provider_error", error.clone()));
    }
    Ok(Json(result))
}
