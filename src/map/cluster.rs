/// Marker clustering for large station sets.
///
/// A `ClusterGroup` is the one persistent clustering resource per map view.
/// It is synchronized wholesale: every update clears the previous marker set
/// and adds the new one in a single batch, so re-renders can never duplicate
/// markers or leave stale ones behind. Clusters are navigational groupings
/// only - every input entity appears as exactly one leaf at every zoom.
///
/// `MarkerLayer` wraps the group behind the view lifecycle: created lazily
/// on first render, destroyed exactly once on unmount. A clustering failure
/// is fatal for the owning view; there is no fallback non-clustered path.

use std::collections::HashMap;

use crate::classify::severity::color_for_score;
use crate::geo::centroids::find_district;
use crate::geo::resolve::resolve_coordinates;
use crate::logging;
use crate::map::project::{project, unproject};
use crate::model::{GeoBounds, GeoEntity, LatLon, MapError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Clustering and marker sizing parameters.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Screen-space merge radius in pixels at the current zoom.
    pub max_cluster_radius_px: f64,
    /// Smallest marker radius, so single-station districts stay visible.
    pub min_marker_radius_px: f64,
    /// Largest marker radius, so huge districts don't dominate the view.
    pub max_marker_radius_px: f64,
    /// Deepest zoom level of the owning map.
    pub max_zoom: u8,
    /// Separate coincident markers in a circle at max zoom.
    pub spiderfy_on_max_zoom: bool,
    /// Clicking a cluster below max zoom zooms to its member bounds.
    pub zoom_to_bounds_on_click: bool,
    /// Leg length of the spiderfy circle in pixels.
    pub spiderfy_radius_px: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_cluster_radius_px: 50.0,
            min_marker_radius_px: 8.0,
            max_marker_radius_px: 25.0,
            max_zoom: 10,
            spiderfy_on_max_zoom: true,
            zoom_to_bounds_on_click: true,
            spiderfy_radius_px: 28.0,
        }
    }
}

/// Marker radius for an aggregate of `station_count` stations: square-root
/// scaled so counts grow sublinearly, clamped to the configured bounds.
pub fn marker_radius(station_count: u32, config: &ClusterConfig) -> f64 {
    ((station_count as f64).sqrt() * 1.5)
        .clamp(config.min_marker_radius_px, config.max_marker_radius_px)
}

// ---------------------------------------------------------------------------
// Markers and cluster nodes
// ---------------------------------------------------------------------------

/// One positioned, classified marker. `entity_index` points back into the
/// entity list passed to the last `sync_entities`.
#[derive(Debug, Clone)]
pub struct Marker {
    pub entity_index: usize,
    pub position: LatLon,
    /// Derived from the score band, never from the alert code.
    pub color: &'static str,
    pub radius_px: f64,
}

/// One on-screen unit at a given zoom: either a single marker or a cluster
/// of marker indices.
#[derive(Debug, Clone)]
pub enum ClusterNode {
    Leaf {
        marker_index: usize,
    },
    Cluster {
        position: LatLon,
        /// Bounding box of all member positions.
        bounds: GeoBounds,
        /// Indices into the group's marker list.
        members: Vec<usize>,
    },
}

/// Action resulting from a cluster click.
#[derive(Debug, Clone)]
pub enum ClusterClick {
    /// Zoom the map to these bounds to reveal the members.
    ZoomToBounds(GeoBounds),
    /// Fan the members out around the cluster point; each entry is a marker
    /// index and its displaced display position.
    Spiderfy(Vec<(usize, LatLon)>),
}

// ---------------------------------------------------------------------------
// Cluster group
// ---------------------------------------------------------------------------

/// The clustering resource. One per map view; see `MarkerLayer` for the
/// create/destroy lifecycle.
pub struct ClusterGroup {
    config: ClusterConfig,
    markers: Vec<Marker>,
    entities: Vec<GeoEntity>,
}

impl ClusterGroup {
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            config,
            markers: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The original entity behind a marker.
    pub fn entity(&self, marker_index: usize) -> Option<&GeoEntity> {
        let marker = self.markers.get(marker_index)?;
        self.entities.get(marker.entity_index)
    }

    /// Replaces the entire marker set from a new entity snapshot: clear,
    /// resolve coordinates, classify, add in one batch.
    pub fn sync_entities(&mut self, entities: &[GeoEntity]) {
        self.markers.clear();
        self.entities.clear();

        let coordinates = resolve_coordinates(entities);
        let mut placed_exact = 0usize;
        for (index, (entity, position)) in entities.iter().zip(coordinates).enumerate() {
            if entity.coordinate.is_some() || find_district(&entity.state, &entity.district).is_some()
            {
                placed_exact += 1;
            }
            self.markers.push(Marker {
                entity_index: index,
                position,
                color: color_for_score(entity.gavi),
                radius_px: marker_radius(entity.station_count, &self.config),
            });
        }
        self.entities = entities.to_vec();
        logging::log_sync_summary(entities.len(), placed_exact, entities.len() - placed_exact);
    }

    /// Groups markers within the configured screen-space radius at `zoom`.
    /// Greedy assignment over a grid index: a marker joins the first
    /// existing cluster whose seed point lies within the merge radius,
    /// otherwise it seeds a new cluster at its own position.
    pub fn clusters_at(&self, zoom: u8) -> Vec<ClusterNode> {
        let zoom = zoom.min(self.config.max_zoom);
        let radius = self.config.max_cluster_radius_px;

        struct Builder {
            seed_x: f64,
            seed_y: f64,
            members: Vec<usize>,
        }

        let mut builders: Vec<Builder> = Vec::new();
        // Cell -> builder indices; cell edge equals the merge radius so any
        // candidate within range lives in the 3x3 neighborhood.
        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

        for (marker_index, marker) in self.markers.iter().enumerate() {
            let (x, y) = project(marker.position, zoom);
            let cell = ((x / radius).floor() as i64, (y / radius).floor() as i64);

            let mut joined = None;
            'search: for cx in cell.0 - 1..=cell.0 + 1 {
                for cy in cell.1 - 1..=cell.1 + 1 {
                    let Some(candidates) = grid.get(&(cx, cy)) else {
                        continue;
                    };
                    for &builder_index in candidates {
                        let b = &builders[builder_index];
                        let dx = b.seed_x - x;
                        let dy = b.seed_y - y;
                        if dx * dx + dy * dy <= radius * radius {
                            joined = Some(builder_index);
                            break 'search;
                        }
                    }
                }
            }

            match joined {
                Some(builder_index) => builders[builder_index].members.push(marker_index),
                None => {
                    builders.push(Builder {
                        seed_x: x,
                        seed_y: y,
                        members: vec![marker_index],
                    });
                    grid.entry(cell).or_default().push(builders.len() - 1);
                }
            }
        }

        builders
            .into_iter()
            .map(|b| {
                if b.members.len() == 1 {
                    ClusterNode::Leaf {
                        marker_index: b.members[0],
                    }
                } else {
                    let mut bounds = GeoBounds::around(self.markers[b.members[0]].position);
                    let mut lat_sum = 0.0;
                    let mut lon_sum = 0.0;
                    for &mi in &b.members {
                        let p = self.markers[mi].position;
                        bounds.extend(p);
                        lat_sum += p.lat;
                        lon_sum += p.lon;
                    }
                    let n = b.members.len() as f64;
                    ClusterNode::Cluster {
                        position: LatLon::new(lat_sum / n, lon_sum / n),
                        bounds,
                        members: b.members,
                    }
                }
            })
            .collect()
    }

    /// Resolves a click on a cluster node. Returns `None` for leaves -
    /// those go through `MarkerLayer::select_marker` instead.
    pub fn click_cluster(&self, node: &ClusterNode, zoom: u8) -> Option<ClusterClick> {
        let ClusterNode::Cluster {
            position,
            bounds,
            members,
        } = node
        else {
            return None;
        };

        if zoom >= self.config.max_zoom && self.config.spiderfy_on_max_zoom {
            Some(ClusterClick::Spiderfy(self.spiderfy(*position, members)))
        } else if self.config.zoom_to_bounds_on_click {
            Some(ClusterClick::ZoomToBounds(*bounds))
        } else {
            None
        }
    }

    /// Display positions for spiderfied members: an even circle around the
    /// cluster point, computed in pixel space at max zoom so the legs have
    /// a constant on-screen length. Coincident markers always separate.
    fn spiderfy(&self, center: LatLon, members: &[usize]) -> Vec<(usize, LatLon)> {
        let zoom = self.config.max_zoom;
        let (cx, cy) = project(center, zoom);
        let n = members.len().max(1) as f64;
        members
            .iter()
            .enumerate()
            .map(|(slot, &marker_index)| {
                let angle = std::f64::consts::TAU * slot as f64 / n;
                let x = cx + self.config.spiderfy_radius_px * angle.cos();
                let y = cy + self.config.spiderfy_radius_px * angle.sin();
                (marker_index, unproject(x, y, zoom))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Marker layer lifecycle
// ---------------------------------------------------------------------------

type SelectCallback = Box<dyn FnMut(&GeoEntity)>;

/// Owns the cluster group for one map view.
///
/// The group is created lazily on the first `render` (once the drawing
/// surface exists) and torn down exactly once by `destroy`. Using the layer
/// after `destroy` is a `MapError::LayerDestroyed` - the owning view is
/// expected to treat that as unrecoverable rather than retry.
pub struct MarkerLayer {
    config: ClusterConfig,
    group: Option<ClusterGroup>,
    on_select: Option<SelectCallback>,
    destroyed: bool,
}

impl MarkerLayer {
    pub fn new(config: ClusterConfig, on_select: Option<SelectCallback>) -> Self {
        Self {
            config,
            group: None,
            on_select,
            destroyed: false,
        }
    }

    /// Synchronizes the layer to a new entity snapshot, creating the cluster
    /// group on first use.
    pub fn render(&mut self, entities: &[GeoEntity]) -> Result<(), MapError> {
        if self.destroyed {
            return Err(MapError::LayerDestroyed);
        }
        let config = self.config.clone();
        let group = self
            .group
            .get_or_insert_with(|| ClusterGroup::new(config));
        group.sync_entities(entities);
        Ok(())
    }

    pub fn group(&self) -> Option<&ClusterGroup> {
        self.group.as_ref()
    }

    /// Dispatches a click on a single marker to the caller-supplied
    /// selection callback, passing the original entity (not the marker).
    /// Unknown marker indices are ignored.
    pub fn select_marker(&mut self, marker_index: usize) -> Result<(), MapError> {
        if self.destroyed {
            return Err(MapError::LayerDestroyed);
        }
        let Some(group) = &self.group else {
            return Ok(());
        };
        if let (Some(entity), Some(callback)) =
            (group.entity(marker_index), self.on_select.as_mut())
        {
            callback(entity);
        }
        Ok(())
    }

    /// Releases the cluster group. Idempotent: the first call tears down,
    /// later calls are no-ops, but any further render is an error.
    pub fn destroy(&mut self) {
        self.group = None;
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn spread_entities(n: usize) -> Vec<GeoEntity> {
        // Far enough apart that no two markers cluster at zoom 5.
        (0..n)
            .map(|i| {
                GeoEntity::station(
                    &format!("GW{:04}", i),
                    "Test",
                    "Spread",
                    LatLon::new(8.0 + 2.0 * i as f64, 70.0 + 2.0 * i as f64),
                    80.0,
                    None,
                )
            })
            .collect()
    }

    fn coincident_entities(n: usize) -> Vec<GeoEntity> {
        (0..n)
            .map(|i| {
                GeoEntity::station(
                    &format!("GW{:04}", i),
                    "Gujarat",
                    "Vadodara",
                    LatLon::new(22.3072, 73.1812),
                    30.0,
                    None,
                )
            })
            .collect()
    }

    fn leaf_count(nodes: &[ClusterNode]) -> usize {
        nodes
            .iter()
            .map(|n| match n {
                ClusterNode::Leaf { .. } => 1,
                ClusterNode::Cluster { members, .. } => members.len(),
            })
            .sum()
    }

    #[test]
    fn test_empty_entity_list_yields_zero_markers() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&[]);
        assert!(group.is_empty());
        assert!(group.clusters_at(5).is_empty());
    }

    #[test]
    fn test_clusters_preserve_every_entity_as_a_leaf() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        let entities = coincident_entities(40);
        group.sync_entities(&entities);
        for zoom in [4, 5, 7, 10] {
            assert_eq!(
                leaf_count(&group.clusters_at(zoom)),
                40,
                "clustering at zoom {} must not lose markers",
                zoom
            );
        }
    }

    #[test]
    fn test_repeated_sync_never_duplicates_markers() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        let entities = spread_entities(10);
        group.sync_entities(&entities);
        group.sync_entities(&entities);
        group.sync_entities(&entities);
        assert_eq!(group.marker_count(), 10);
    }

    #[test]
    fn test_sync_replaces_stale_markers() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&spread_entities(10));
        group.sync_entities(&spread_entities(3));
        assert_eq!(group.marker_count(), 3);
    }

    #[test]
    fn test_marker_color_comes_from_score_not_alert() {
        let entity = GeoEntity::station(
            "GW0001",
            "Bihar",
            "Patna",
            LatLon::new(25.6, 85.1),
            90.0, // safe
            Some("CRITICAL_GROUNDWATER"),
        );

        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(std::slice::from_ref(&entity));
        // Safe green, despite the critical alert code.
        assert_eq!(group.markers()[0].color, "#388e3c");
    }

    #[test]
    fn test_marker_radius_is_monotonic_and_bounded() {
        let config = ClusterConfig::default();
        let mut previous = 0.0;
        for count in [1u32, 4, 25, 100, 400, 10_000] {
            let r = marker_radius(count, &config);
            assert!(r >= config.min_marker_radius_px);
            assert!(r <= config.max_marker_radius_px);
            assert!(r >= previous, "radius must not shrink as counts grow");
            previous = r;
        }
        assert_eq!(marker_radius(1, &config), config.min_marker_radius_px);
        assert_eq!(marker_radius(10_000, &config), config.max_marker_radius_px);
    }

    #[test]
    fn test_coincident_markers_form_one_cluster() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&coincident_entities(5));
        let nodes = group.clusters_at(5);
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            ClusterNode::Cluster { members, .. } => assert_eq!(members.len(), 5),
            ClusterNode::Leaf { .. } => panic!("coincident markers should cluster"),
        }
    }

    #[test]
    fn test_distant_markers_stay_individual() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&spread_entities(6));
        let nodes = group.clusters_at(10);
        assert_eq!(nodes.len(), 6);
        assert!(nodes.iter().all(|n| matches!(n, ClusterNode::Leaf { .. })));
    }

    #[test]
    fn test_cluster_click_below_max_zoom_zooms_to_bounds() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&coincident_entities(4));
        let nodes = group.clusters_at(5);
        match group.click_cluster(&nodes[0], 5) {
            Some(ClusterClick::ZoomToBounds(bounds)) => {
                assert!(bounds.contains(LatLon::new(22.3072, 73.1812)));
            }
            other => panic!("expected zoom-to-bounds, got {:?}", other),
        }
    }

    #[test]
    fn test_cluster_click_at_max_zoom_spiderfies() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&coincident_entities(6));
        let nodes = group.clusters_at(10);
        assert_eq!(nodes.len(), 1, "same-point markers cluster even at max zoom");

        match group.click_cluster(&nodes[0], 10) {
            Some(ClusterClick::Spiderfy(legs)) => {
                assert_eq!(legs.len(), 6);
                // Every member remains individually selectable: all display
                // positions distinct.
                let mut seen = std::collections::HashSet::new();
                for (_, p) in &legs {
                    let key = (format!("{:.8}", p.lat), format!("{:.8}", p.lon));
                    assert!(seen.insert(key), "spiderfy produced overlapping legs");
                }
            }
            other => panic!("expected spiderfy at max zoom, got {:?}", other),
        }
    }

    #[test]
    fn test_click_on_leaf_is_not_a_cluster_action() {
        let mut group = ClusterGroup::new(ClusterConfig::default());
        group.sync_entities(&spread_entities(2));
        let nodes = group.clusters_at(10);
        assert!(group.click_cluster(&nodes[0], 10).is_none());
    }

    #[test]
    fn test_layer_creates_group_lazily_and_destroys_once() {
        let mut layer = MarkerLayer::new(ClusterConfig::default(), None);
        assert!(layer.group().is_none(), "group must not exist before first render");

        layer.render(&spread_entities(3)).expect("first render");
        assert!(layer.group().is_some());

        layer.destroy();
        assert!(layer.group().is_none(), "destroy must release the group");
        layer.destroy(); // second destroy is a no-op

        assert_eq!(
            layer.render(&spread_entities(1)),
            Err(MapError::LayerDestroyed),
            "rendering after destroy is fatal for this view"
        );
    }

    #[test]
    fn test_select_marker_invokes_callback_with_original_entity() {
        let selected: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        let mut layer = MarkerLayer::new(
            ClusterConfig::default(),
            Some(Box::new(move |entity: &GeoEntity| {
                sink.borrow_mut().push(entity.identity());
            })),
        );

        layer.render(&spread_entities(3)).expect("render");
        layer.select_marker(1).expect("select");
        layer.select_marker(99).expect("unknown index is ignored");

        assert_eq!(selected.borrow().as_slice(), &["GW0001".to_string()]);
    }
}
