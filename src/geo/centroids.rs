/// Centroid registry for administrative entities.
///
/// Defines the curated list of known district centroids, approximate state
/// centroids, and the national fallback coordinate used when an entity
/// cannot be placed more precisely. This is the single source of truth for
/// placement coordinates - other modules should look coordinates up here
/// rather than hardcoding them.
///
/// These tables are immutable process-wide configuration loaded at compile
/// time; there is deliberately no reload or mutation path. The district
/// table covers major districts only - entities absent from it fall back to
/// the state centroid plus a grid offset (see `geo::resolve`).

use crate::model::{GeoBounds, LatLon};

// ---------------------------------------------------------------------------
// National constants
// ---------------------------------------------------------------------------

/// Fixed national centroid, used when even the state is unknown.
pub const NATIONAL_CENTROID: LatLon = LatLon::new(20.5937, 78.9629);

/// Display extent of the national map: south-west to north-east corner.
pub const NATIONAL_BOUNDS: GeoBounds =
    GeoBounds::from_corners(LatLon::new(6.5, 68.0), LatLon::new(35.5, 97.5));

// ---------------------------------------------------------------------------
// District centroids
// ---------------------------------------------------------------------------

/// Known centroid coordinate for a single district.
pub struct DistrictCentroid {
    pub state: &'static str,
    pub district: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// Curated district centroids for major districts.
pub static DISTRICT_CENTROIDS: &[DistrictCentroid] = &[
    DistrictCentroid { state: "Gujarat", district: "Vadodara", latitude: 22.3072, longitude: 73.1812 },
    DistrictCentroid { state: "Gujarat", district: "Ahmedabad", latitude: 23.0225, longitude: 72.5714 },
    DistrictCentroid { state: "Maharashtra", district: "Mumbai", latitude: 19.0760, longitude: 72.8777 },
    DistrictCentroid { state: "Maharashtra", district: "Pune", latitude: 18.5204, longitude: 73.8567 },
    DistrictCentroid { state: "Maharashtra", district: "Nagpur", latitude: 21.1458, longitude: 79.0882 },
    DistrictCentroid { state: "Rajasthan", district: "Jaipur", latitude: 26.9124, longitude: 75.7873 },
    DistrictCentroid { state: "Rajasthan", district: "Jodhpur", latitude: 26.2389, longitude: 73.0243 },
    DistrictCentroid { state: "Uttar Pradesh", district: "Lucknow", latitude: 26.8467, longitude: 80.9462 },
    DistrictCentroid { state: "Uttar Pradesh", district: "Kanpur", latitude: 26.4499, longitude: 80.3319 },
    DistrictCentroid { state: "Tamil Nadu", district: "Chennai", latitude: 13.0827, longitude: 80.2707 },
    DistrictCentroid { state: "Karnataka", district: "Bangalore", latitude: 12.9716, longitude: 77.5946 },
    DistrictCentroid { state: "West Bengal", district: "Kolkata", latitude: 22.5726, longitude: 88.3639 },
    DistrictCentroid { state: "Telangana", district: "Hyderabad", latitude: 17.3850, longitude: 78.4867 },
    DistrictCentroid { state: "Andhra Pradesh", district: "Visakhapatnam", latitude: 17.6868, longitude: 83.2185 },
    DistrictCentroid { state: "Kerala", district: "Thiruvananthapuram", latitude: 8.5241, longitude: 76.9366 },
    DistrictCentroid { state: "Odisha", district: "Bhubaneswar", latitude: 20.2961, longitude: 85.8245 },
    DistrictCentroid { state: "Punjab", district: "Ludhiana", latitude: 30.9010, longitude: 75.8573 },
    DistrictCentroid { state: "Haryana", district: "Gurugram", latitude: 28.4595, longitude: 77.0266 },
    DistrictCentroid { state: "Delhi", district: "New Delhi", latitude: 28.6139, longitude: 77.2090 },
    DistrictCentroid { state: "Madhya Pradesh", district: "Bhopal", latitude: 23.2599, longitude: 77.4126 },
    DistrictCentroid { state: "Bihar", district: "Patna", latitude: 25.5941, longitude: 85.1376 },
    DistrictCentroid { state: "Jharkhand", district: "Ranchi", latitude: 23.3441, longitude: 85.3096 },
    DistrictCentroid { state: "Assam", district: "Guwahati", latitude: 26.1445, longitude: 91.7362 },
];

// ---------------------------------------------------------------------------
// State centroids
// ---------------------------------------------------------------------------

/// Approximate centroid coordinate for a state.
pub struct StateCentroid {
    pub state: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Approximate state centroids, used as the base point for grid-offset
/// placement of districts with no curated centroid.
pub static STATE_CENTROIDS: &[StateCentroid] = &[
    StateCentroid { state: "Gujarat", latitude: 22.2587, longitude: 71.1924 },
    StateCentroid { state: "Maharashtra", latitude: 19.7515, longitude: 75.7139 },
    StateCentroid { state: "Rajasthan", latitude: 27.0238, longitude: 74.2179 },
    StateCentroid { state: "Uttar Pradesh", latitude: 26.8467, longitude: 80.9462 },
    StateCentroid { state: "Tamil Nadu", latitude: 11.1271, longitude: 78.6569 },
    StateCentroid { state: "Karnataka", latitude: 15.3173, longitude: 75.7139 },
    StateCentroid { state: "West Bengal", latitude: 22.9868, longitude: 87.8550 },
    StateCentroid { state: "Telangana", latitude: 18.1124, longitude: 79.0193 },
    StateCentroid { state: "Andhra Pradesh", latitude: 15.9129, longitude: 79.7400 },
    StateCentroid { state: "Kerala", latitude: 10.8505, longitude: 76.2711 },
    StateCentroid { state: "Odisha", latitude: 20.9517, longitude: 85.0985 },
    StateCentroid { state: "Punjab", latitude: 31.1471, longitude: 75.3412 },
    StateCentroid { state: "Haryana", latitude: 29.0588, longitude: 76.0856 },
    StateCentroid { state: "Delhi", latitude: 28.7041, longitude: 77.1025 },
    StateCentroid { state: "Madhya Pradesh", latitude: 22.9734, longitude: 78.6569 },
    StateCentroid { state: "Bihar", latitude: 25.0961, longitude: 85.3131 },
    StateCentroid { state: "Jharkhand", latitude: 23.6102, longitude: 85.2799 },
    StateCentroid { state: "Assam", latitude: 26.2006, longitude: 92.9376 },
    StateCentroid { state: "Chhattisgarh", latitude: 21.2787, longitude: 81.8661 },
    StateCentroid { state: "Uttarakhand", latitude: 30.0668, longitude: 79.0193 },
    StateCentroid { state: "Himachal Pradesh", latitude: 31.1048, longitude: 77.1734 },
    StateCentroid { state: "Jammu and Kashmir", latitude: 33.7782, longitude: 76.5762 },
];

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// Exact `(state, district)` centroid lookup. Returns `None` if the
/// district is not in the curated table.
pub fn find_district(state: &str, district: &str) -> Option<LatLon> {
    DISTRICT_CENTROIDS
        .iter()
        .find(|d| d.state == state && d.district == district)
        .map(|d| LatLon::new(d.latitude, d.longitude))
}

/// Approximate state centroid lookup. Returns `None` for unknown states.
pub fn find_state(state: &str) -> Option<LatLon> {
    STATE_CENTROIDS
        .iter()
        .find(|s| s.state == state)
        .map(|s| LatLon::new(s.latitude, s.longitude))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
