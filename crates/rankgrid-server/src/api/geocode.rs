use axum::{
    extract::{Query, State},
    Json,
};
use rankgrid_search::GeocodeResult;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let results = state.geocoder.geocode(&params.q).await?;
    Ok(Json(GeocodeResponse { results }))
}
