//! Grid-based rank sampling: lattice generation, ranked-search client,
//! per-point rank tracking, batched orchestration, and summary statistics.

pub mod client;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod grid;
pub mod orchestrator;
pub mod summary;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod fake;

pub use client::{RankedSearch, SerperClient};
pub use domain::{domains_match, domains_overlap, normalize_domain};
pub use error::{GridError, GridSearchError, SearchError};
pub use geocode::{GeocodeCache, GeocodeError, GeocodeResult, Geocoder};
pub use grid::{
    generate_grid, DistanceUnit, GridConfig, GridPoint, MAX_GRID_POINTS, MAX_GRID_SIZE,
};
pub use orchestrator::{run_grid_report, run_grid_search, GridReport, GridSearchSettings, PointOutcome};
pub use summary::{summarize, GridSearchSummary};
pub use tracker::{
    track_local_pack, track_ranking, LocalPackResult, MatchedPlace, RankQuery, RankingResult,
    TrackerSettings,
};
pub use types::{Coordinates, SearchMode, SearchPage, SearchRequest, SearchResultItem};
