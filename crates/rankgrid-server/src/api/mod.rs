mod geocode;
mod grid;
mod rank;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rankgrid_core::{AppConfig, UsageCredits};
use rankgrid_search::{
    GeocodeCache, GeocodeError, Geocoder, GridError, GridSearchError, GridSearchSettings,
    SearchError, SerperClient,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SerperClient>,
    pub settings: Arc<GridSearchSettings>,
    pub geocoder: Arc<Geocoder>,
    /// `None` when credit accounting is disabled.
    pub credits: Option<Arc<UsageCredits>>,
}

impl AppState {
    /// Builds the outbound clients and run settings from loaded configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let search = SerperClient::with_base_url(
            config.serper_api_key.as_deref(),
            config.search_timeout_secs,
            &config.user_agent,
            &config.search_base_url,
        )?;
        let geocoder = Geocoder::with_base_url(
            config.search_timeout_secs,
            &config.user_agent,
            &config.geocoder_base_url,
            GeocodeCache::new(config.geocoder_cache_capacity),
        )?;
        Ok(Self {
            search: Arc::new(search),
            settings: Arc::new(GridSearchSettings::from_app_config(config)),
            geocoder: Arc::new(geocoder),
            credits: config.usage_credits.map(|n| Arc::new(UsageCredits::new(n))),
        })
    }
}

/// Error response body: `{ "error": "<message>" }`.
///
/// `code` selects the HTTP status and is not serialized.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    pub error: String,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    fn status(&self) -> StatusCode {
        match self.code {
            "validation_error" => StatusCode::BAD_REQUEST,
            "payment_required" => StatusCode::PAYMENT_REQUIRED,
            "not_found" => StatusCode::NOT_FOUND,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "provider_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code, error = %self.error, "request failed");
        }
        (status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<GridError> for ApiError {
    fn from(error: GridError) -> Self {
        Self::validation(error.to_string())
    }
}

impl From<GridSearchError> for ApiError {
    fn from(error: GridSearchError) -> Self {
        if error.is_validation() {
            Self::validation(error.to_string())
        } else {
            Self::new("configuration_error", error.to_string())
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        if error.is_configuration() {
            Self::new("configuration_error", error.to_string())
        } else {
            Self::new("provider_error", error.to_string())
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(error: GeocodeError) -> Self {
        match error {
            GeocodeError::BlankQuery => Self::validation(error.to_string()),
            other => Self::new("provider_error", other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    search_provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    credits_remaining: Option<u64>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState, geocode_rate_limit: RateLimitState) -> Router {
    let geocode_routes = Router::new()
        .route("/api/v1/geocode", get(geocode::geocode))
        .layer(axum::middleware::from_fn_with_state(
            geocode_rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/grid", post(grid::create_grid))
        .route("/api/v1/grid-search", post(grid::grid_search))
        .route("/api/v1/rank", post(rank::organic_rank))
        .route("/api/v1/local-rank", post(rank::local_rank))
        .merge(geocode_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        search_provider: if state.search.is_configured() {
            "configured"
        } else {
            "missing"
        },
        credits_remaining: state.credits.as_ref().map(|c| c.remaining()),
    })
}

async fn not_found() -> ApiError {
    ApiError::new("not_found", "route not found")
}

pub fn default_geocode_rate_limit() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "../api_test.rs"]
mod tests;
