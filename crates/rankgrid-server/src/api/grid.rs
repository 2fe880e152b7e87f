use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use rankgrid_search::{
    generate_grid, run_grid_report, Coordinates, GridConfig, GridPoint, GridReport,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GridRequest {
    center_lat: f64,
    center_lng: f64,
    config: GridConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct GridResponse {
    points: Vec<GridPoint>,
}

pub(super) async fn create_grid(
    payload: Result<Json<GridRequest>, JsonRejection>,
) -> Result<Json<GridResponse>, ApiError> {
    let Json(request) = payload?;
    let center = Coordinates::checked(request.center_lat, request.center_lng)?;
    Ok(Json(GridResponse {
        points: generate_grid(center, &request.config),
    }))
}

/// Blank or missing text fields are left to the orchestrator's validation
/// so every caller sees the same messages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GridSearchRequest {
    #[serde(default)]
    grid_points: Vec<GridPoint>,
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    target_website: String,
}

pub(super) async fn grid_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<GridSearchRequest>, JsonRejection>,
) -> Result<Json<GridReport>, ApiError> {
    let Json(request) = payload?;

    let credits = state.credits.as_deref();
    let reserved = match credits {
        Some(credits) => Some(
            credits
                .try_consume()
                .ok_or_else(|| ApiError::new("payment_required", "usage credits exhausted"))?,
        ),
        None => None,
    };

    let outcome = run_grid_report(
        state.search.as_ref(),
        &request.grid_points,
        &request.keyword,
        &request.target_website,
        &state.settings,
    )
    .await;

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            if let Some(credits) = credits {
                credits.refund_one();
                tracing::debug!(request_id = %req_id.0, "usage credit refunded");
            }
            return Err(err.into());
        }
    };

    if let Some(remaining) = reserved {
        tracing::info!(request_id = %req_id.0, remaining, "usage credit consumed");
    }
    tracing::info!(
        request_id = %req_id.0,
        total_points = report.total_points,
        found = report.summary.found_count,
        "grid search served"
    );

    Ok(Json(report))
}
