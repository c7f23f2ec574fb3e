/// Core data types for the groundwater monitoring geospatial core.
///
/// This module defines the shared domain model imported by all other
/// modules. It contains no I/O and no map or cache logic - only types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coordinate types
// ---------------------------------------------------------------------------

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// An explicit two-corner bounding box: south-west and north-east corners
/// carried as four named scalars.
///
/// Viewport bounds are always reported in this form rather than as any
/// map-library bounds object, so consumers never depend on rendering
/// internals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub const fn from_corners(south_west: LatLon, north_east: LatLon) -> Self {
        Self {
            south: south_west.lat,
            west: south_west.lon,
            north: north_east.lat,
            east: north_east.lon,
        }
    }

    /// A degenerate box containing exactly one point. Seed for `extend`.
    pub const fn around(p: LatLon) -> Self {
        Self {
            south: p.lat,
            west: p.lon,
            north: p.lat,
            east: p.lon,
        }
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, p: LatLon) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }

    /// Grows the box to include `p`.
    pub fn extend(&mut self, p: LatLon) {
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
        self.west = self.west.min(p.lon);
        self.east = self.east.max(p.lon);
    }
}

// ---------------------------------------------------------------------------
// Monitored entities
// ---------------------------------------------------------------------------

/// One monitored entity as consumed from the aggregation API: either a
/// district-level aggregate (identity is `(state, district)`, `station_id`
/// absent) or a single station (identity is `station_id`).
///
/// Entities are immutable snapshots. A re-fetch produces new values; nothing
/// in this crate mutates an entity after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntity {
    pub state: String,
    pub district: String,
    pub station_id: Option<String>,
    /// Ground-truth coordinate. Present for station rows; usually absent for
    /// district aggregates, which are placed by `geo::resolve_coordinates`.
    pub coordinate: Option<LatLon>,
    /// GAVI health score, nominally in `[0, 100)`.
    pub gavi: f64,
    /// Active alert code, if any. Unrecognized codes degrade to the default
    /// descriptor in `classify::alerts`.
    pub alert: Option<String>,
    /// Number of stations aggregated into this entity; 1 for station rows.
    /// Drives aggregate marker radius on the map.
    pub station_count: u32,
}

impl GeoEntity {
    /// A district-level aggregate with no ground-truth coordinate.
    pub fn district(state: &str, district: &str, gavi: f64, station_count: u32) -> Self {
        Self {
            state: state.to_string(),
            district: district.to_string(),
            station_id: None,
            coordinate: None,
            gavi,
            alert: None,
            station_count,
        }
    }

    /// A station-level entity with a known coordinate.
    pub fn station(
        station_id: &str,
        state: &str,
        district: &str,
        coordinate: LatLon,
        gavi: f64,
        alert: Option<&str>,
    ) -> Self {
        Self {
            state: state.to_string(),
            district: district.to_string(),
            station_id: Some(station_id.to_string()),
            coordinate: Some(coordinate),
            gavi,
            alert: alert.map(String::from),
            station_count: 1,
        }
    }

    /// Stable identity key: the station id for station rows, otherwise
    /// `state_district`.
    pub fn identity(&self) -> String {
        match &self.station_id {
            Some(id) => id.clone(),
            None => format!("{}_{}", self.state, self.district),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding aggregation API data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx HTTP response from the aggregation API.
    Http(u16),
    /// The response body could not be deserialized.
    Parse(String),
    /// The request could not be completed (DNS, connect, timeout).
    Request(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(code) => write!(f, "HTTP error: {}", code),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors from map-layer lifecycle misuse. Rendering errors are fatal for
/// the owning view and are not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The cluster layer was used after `destroy`.
    LayerDestroyed,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::LayerDestroyed => write!(f, "marker layer used after destroy"),
        }
    }
}

impl std::error::Error for MapError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
