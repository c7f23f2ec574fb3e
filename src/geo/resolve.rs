/// Coordinate resolution for monitored entities.
///
/// Every entity in a batch gets a coordinate, with zero exceptions, even
/// when no ground-truth coordinate exists for its district. Resolution is
/// fully deterministic for a given ordered input list.
///
/// Priority order per entity:
/// 1. the entity's own coordinate (station rows carry one);
/// 2. exact `(state, district)` match in the curated centroid table;
/// 3. state centroid plus a deterministic 5-column grid offset, spreading
///    otherwise-identical points into a visible grid;
/// 4. the fixed national centroid, no offset.
///
/// The grid offset depends on the entity's zero-based position among all
/// entities sharing its state, in input order - not on any entity identity.
/// Reordering entities within a state therefore changes their offsets.
/// That is documented behavior, not a bug: the offsets only exist to keep
/// approximate points visually distinct.

use std::collections::HashMap;

use crate::geo::centroids::{find_district, find_state, NATIONAL_CENTROID};
use crate::model::{GeoEntity, LatLon};

/// Grid spacing in degrees between adjacent synthetic points.
const GRID_STEP_DEG: f64 = 0.5;

/// Columns in the synthetic placement grid.
const GRID_COLUMNS: usize = 5;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolves a coordinate for every entity in `entities`, preserving order.
/// The output vector always has the same length as the input.
pub fn resolve_coordinates(entities: &[GeoEntity]) -> Vec<LatLon> {
    // Position of each entity within its state group, counted over all
    // entities of that state in input order.
    let mut state_positions: HashMap<&str, usize> = HashMap::new();

    entities
        .iter()
        .map(|entity| {
            let position = {
                let counter = state_positions.entry(entity.state.as_str()).or_insert(0);
                let current = *counter;
                *counter += 1;
                current
            };
            resolve_one(entity, position)
        })
        .collect()
}

fn resolve_one(entity: &GeoEntity, position_in_state: usize) -> LatLon {
    if let Some(coordinate) = entity.coordinate {
        return coordinate;
    }
    if let Some(exact) = find_district(&entity.state, &entity.district) {
        return exact;
    }
    if let Some(state_center) = find_state(&entity.state) {
        let (lat_offset, lon_offset) = grid_offset(position_in_state);
        return LatLon::new(state_center.lat + lat_offset, state_center.lon + lon_offset);
    }
    NATIONAL_CENTROID
}

/// Offset of grid slot `i`: a 5-column grid centered on the state centroid.
/// Columns wrap every 5 slots; rows extend eastward indefinitely, so every
/// slot is distinct.
fn grid_offset(i: usize) -> (f64, f64) {
    let lat = (i % GRID_COLUMNS) as f64 - 2.0;
    let lon = (i / GRID_COLUMNS) as f64 - 2.0;
    (lat * GRID_STEP_DEG, lon * GRID_STEP_DEG)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoEntity;

    fn unknown_district(state: &str, n: usize) -> GeoEntity {
        GeoEntity::district(state, &format!("District{}", n), 40.0, 3)
    }

    #[test]
    fn test_own_coordinate_wins_over_curated_table() {
        // A station row carries its ground-truth position even when its
        // district has a curated centroid.
        let station = GeoEntity::station(
            "GW000001",
            "Gujarat",
            "Vadodara",
            LatLon::new(22.4001, 73.2002),
            30.0,
            None,
        );
        let coords = resolve_coordinates(&[station]);
        assert_eq!(coords[0], LatLon::new(22.4001, 73.2002));
    }

    #[test]
    fn test_exact_district_match() {
        let entity = GeoEntity::district("Gujarat", "Vadodara", 40.0, 5);
        let coords = resolve_coordinates(&[entity]);
        assert_eq!(coords[0], LatLon::new(22.3072, 73.1812));
    }

    #[test]
    fn test_state_fallback_at_position_seven() {
        // Seven known-coordinate Chhattisgarh entities ahead of the target
        // put it at position 7 within its state group: lat offset
        // (7 % 5 - 2) * 0.5 = 0, lon offset (7 / 5 - 2) * 0.5 = -0.5.
        let mut entities: Vec<GeoEntity> = (0..7)
            .map(|n| {
                GeoEntity::station(
                    &format!("GW{:06}", n),
                    "Chhattisgarh",
                    "Raipur",
                    LatLon::new(21.25, 81.63),
                    50.0,
                    None,
                )
            })
            .collect();
        entities.push(GeoEntity::district("Chhattisgarh", "Unknown", 40.0, 2));

        let coords = resolve_coordinates(&entities);
        let target = coords[7];
        assert!((target.lat - 21.2787).abs() < 1e-9);
        assert!((target.lon - 81.3661).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_state_resolves_to_national_centroid() {
        let entity = GeoEntity::district("Atlantis", "Lost City", 10.0, 1);
        let coords = resolve_coordinates(&[entity]);
        assert_eq!(coords[0], NATIONAL_CENTROID);
    }

    #[test]
    fn test_resolution_never_misses_an_entity() {
        let entities = vec![
            GeoEntity::district("Gujarat", "Vadodara", 40.0, 5),
            GeoEntity::district("Atlantis", "Nowhere", 10.0, 1),
            unknown_district("Chhattisgarh", 1),
            GeoEntity::station("GW1", "Bihar", "Patna", LatLon::new(25.6, 85.1), 70.0, None),
        ];
        let coords = resolve_coordinates(&entities);
        assert_eq!(coords.len(), entities.len());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let entities: Vec<GeoEntity> =
            (0..30).map(|n| unknown_district("Chhattisgarh", n)).collect();
        let first = resolve_coordinates(&entities);
        let second = resolve_coordinates(&entities);
        assert_eq!(first, second, "two runs over the same input must agree");
    }

    #[test]
    fn test_first_25_grid_slots_are_distinct() {
        let entities: Vec<GeoEntity> =
            (0..25).map(|n| unknown_district("Chhattisgarh", n)).collect();
        let coords = resolve_coordinates(&entities);

        let mut seen = std::collections::HashSet::new();
        for c in &coords {
            let key = (format!("{:.4}", c.lat), format!("{:.4}", c.lon));
            assert!(seen.insert(key), "grid slot collision at ({}, {})", c.lat, c.lon);
        }
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn test_rows_extend_beyond_the_5x5_grid() {
        let entities: Vec<GeoEntity> =
            (0..30).map(|n| unknown_district("Chhattisgarh", n)).collect();
        let coords = resolve_coordinates(&entities);
        // Slot 25 starts a sixth row east of the 5x5 block; no wrap-around.
        assert_eq!(coords[25].lat, coords[0].lat);
        assert!(coords[25].lon > coords[0].lon);
    }

    #[test]
    fn test_offsets_count_positions_across_the_whole_state_group() {
        // Entities with known coordinates still advance the group position,
        // exactly as the offset is defined: position among all entities of
        // the state, not among unknown ones only.
        let entities = vec![
            GeoEntity::district("Gujarat", "Vadodara", 40.0, 5), // position 0, exact match
            GeoEntity::district("Gujarat", "Mystery", 40.0, 2),  // position 1
        ];
        let coords = resolve_coordinates(&entities);
        // Position 1: lat offset (1 - 2) * 0.5 = -0.5, lon offset -1.0.
        assert!((coords[1].lat - (22.2587 - 0.5)).abs() < 1e-9);
        assert!((coords[1].lon - (71.1924 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reordering_within_a_state_changes_offsets() {
        let a = GeoEntity::district("Chhattisgarh", "A", 40.0, 1);
        let b = GeoEntity::district("Chhattisgarh", "B", 40.0, 1);

        let forward = resolve_coordinates(&[a.clone(), b.clone()]);
        let reversed = resolve_coordinates(&[b, a]);

        // Offsets follow the slot, not the entity: whichever district is
        // listed first takes slot 0, so each entity's coordinate changes
        // with its position while the slot coordinates themselves stay put.
        assert_eq!(forward[0], reversed[0]);
        assert_eq!(forward[1], reversed[1]);
        assert_ne!(forward[0], forward[1]);
    }

    #[test]
    fn test_state_groups_are_independent() {
        // Interleaving entities from two states must not perturb either
        // state's slot numbering.
        let entities = vec![
            unknown_district("Chhattisgarh", 0),
            unknown_district("Uttarakhand", 0),
            unknown_district("Chhattisgarh", 1),
            unknown_district("Uttarakhand", 1),
        ];
        let coords = resolve_coordinates(&entities);

        let solo_chhattisgarh = resolve_coordinates(&[
            unknown_district("Chhattisgarh", 0),
            unknown_district("Chhattisgarh", 1),
        ]);
        assert_eq!(coords[0], solo_chhattisgarh[0]);
        assert_eq!(coords[2], solo_chhattisgarh[1]);
    }
}
