/// Web Mercator pixel projection.
///
/// Converts WGS84 coordinates to pixel positions in the world plane at a
/// given zoom level (256px tiles, world width `256 * 2^zoom`). Screen-space
/// clustering distances and viewport bounds are computed in this plane.

use crate::model::LatLon;

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_MERCATOR_LAT: f64 = 85.05112878;

/// World plane edge length in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::powi(2.0, zoom as i32)
}

/// Projects a coordinate to `(x, y)` pixels at `zoom`. Latitude is clamped
/// to the Mercator limit; `y` grows southward and stays within
/// `[0, world_size]` even when rounding at the clamped poles would nudge it
/// past an edge.
pub fn project(p: LatLon, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lon + 180.0) / 360.0 * size;
    let y = ((1.0 - ((lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI)) / 2.0 * size)
        .clamp(0.0, size);
    (x, y)
}

/// Inverse of `project`.
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLon {
    let size = world_size(zoom);
    let lon = x / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLon::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_meridian_projects_to_world_center() {
        let (x, y) = project(LatLon::new(0.0, 0.0), 5);
        let half = world_size(5) / 2.0;
        assert!((x - half).abs() < 1e-6);
        assert!((y - half).abs() < 1e-6);
    }

    #[test]
    fn test_project_unproject_round_trip() {
        for p in [
            LatLon::new(20.5937, 78.9629),
            LatLon::new(-33.9, 151.2),
            LatLon::new(60.2, -1.3),
        ] {
            let (x, y) = project(p, 10);
            let back = unproject(x, y, 10);
            assert!((back.lat - p.lat).abs() < 1e-6, "lat drifted for {:?}", p);
            assert!((back.lon - p.lon).abs() < 1e-6, "lon drifted for {:?}", p);
        }
    }

    #[test]
    fn test_pixel_distance_doubles_per_zoom_level() {
        let a = LatLon::new(22.0, 73.0);
        let b = LatLon::new(22.0, 74.0);
        let (ax5, _) = project(a, 5);
        let (bx5, _) = project(b, 5);
        let (ax6, _) = project(a, 6);
        let (bx6, _) = project(b, 6);
        assert!(((bx6 - ax6) - 2.0 * (bx5 - ax5)).abs() < 1e-6);
    }

    #[test]
    fn test_polar_latitudes_clamp_instead_of_diverging() {
        // Rounding at the clamped Mercator latitude must not push y past
        // the world-plane edges.
        let (_, north_y) = project(LatLon::new(89.9, 0.0), 5);
        assert!(north_y.is_finite());
        assert!(north_y >= 0.0);

        let (_, south_y) = project(LatLon::new(-89.9, 0.0), 5);
        assert!(south_y.is_finite());
        assert!(south_y <= world_size(5));
    }
}
