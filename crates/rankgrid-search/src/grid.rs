//! Geographic sampling lattice around a center point.
//!
//! Longitude step widens with latitude so the physical spacing between
//! adjacent columns stays equal to the row spacing.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::types::Coordinates;

const METERS_PER_MILE: f64 = 1609.34;
const METERS_PER_LAT_DEGREE: f64 = 111_320.0;

/// Largest accepted points-per-side. Every point costs up to `max_pages`
/// provider calls, so the lattice is capped at `MAX_GRID_SIZE²` points.
pub const MAX_GRID_SIZE: u32 = 25;

/// Most grid points a single run accepts.
pub const MAX_GRID_POINTS: usize = (MAX_GRID_SIZE * MAX_GRID_SIZE) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    Miles,
}

/// Spacing and dimension of a square grid.
///
/// Construction (including deserialization) enforces a positive finite
/// spacing and an odd grid size no larger than [`MAX_GRID_SIZE`], so every
/// grid has exactly one center cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGridConfig")]
pub struct GridConfig {
    distance_unit: DistanceUnit,
    spacing: f64,
    grid_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridConfig {
    distance_unit: DistanceUnit,
    spacing: f64,
    grid_size: u32,
}

impl TryFrom<RawGridConfig> for GridConfig {
    type Error = GridError;

    fn try_from(raw: RawGridConfig) -> Result<Self, Self::Error> {
        GridConfig::new(raw.distance_unit, raw.spacing, raw.grid_size)
    }
}

impl GridConfig {
    /// # Errors
    ///
    /// - [`GridError::InvalidSpacing`] when `spacing` is not a positive finite number.
    /// - [`GridError::InvalidGridSize`] when `grid_size` is zero, even, or above
    ///   [`MAX_GRID_SIZE`].
    pub fn new(distance_unit: DistanceUnit, spacing: f64, grid_size: u32) -> Result<Self, GridError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GridError::InvalidSpacing(spacing));
        }
        if grid_size == 0 || grid_size % 2 == 0 || grid_size > MAX_GRID_SIZE {
            return Err(GridError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            distance_unit,
            spacing,
            grid_size,
        })
    }

    #[must_use]
    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }

    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    #[must_use]
    pub fn spacing_meters(&self) -> f64 {
        match self.distance_unit {
            DistanceUnit::Meters => self.spacing,
            DistanceUnit::Miles => self.spacing * METERS_PER_MILE,
        }
    }
}

/// One sampled coordinate. Identity is `(row, col)`; `id` is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub row: i32,
    pub col: i32,
    #[serde(default)]
    pub is_center: bool,
    #[serde(default = "selected_by_default")]
    pub is_selected: bool,
}

fn selected_by_default() -> bool {
    true
}

impl GridPoint {
    #[must_use]
    pub fn point_id(row: i32, col: i32) -> String {
        format!("{row}_{col}")
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Generate the `grid_size × grid_size` lattice centered on `center`, in
/// row-major order from the south-west corner.
///
/// Pure and deterministic. The center is not validated here: a center at
/// either pole yields non-finite longitudes, see [`Coordinates::checked`].
#[must_use]
pub fn generate_grid(center: Coordinates, config: &GridConfig) -> Vec<GridPoint> {
    let spacing_meters = config.spacing_meters();
    let lat_step = spacing_meters / METERS_PER_LAT_DEGREE;
    let lng_step = spacing_meters / (METERS_PER_LAT_DEGREE * center.latitude.to_radians().cos());

    let half = i32::try_from(config.grid_size / 2).unwrap_or(i32::MAX);
    let side = usize::try_from(config.grid_size).unwrap_or(0);
    let mut points = Vec::with_capacity(side * side);

    for row in -half..=half {
        for col in -half..=half {
            let is_center = row == 0 && col == 0;
            let (latitude, longitude) = if is_center {
                (center.latitude, center.longitude)
            } else {
                (
                    center.latitude + f64::from(row) * lat_step,
                    center.longitude + f64::from(col) * lng_step,
                )
            };
            points.push(GridPoint {
                id: GridPoint::point_id(row, col),
                latitude,
                longitude,
                row,
                col,
                is_center,
                is_selected: true,
            });
        }
    }
    points
}
