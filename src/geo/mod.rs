/// Geospatial placement: centroid registries and coordinate resolution.
///
/// Submodules:
/// - `centroids` - curated district/state centroid tables and the national
///   fallback coordinate
/// - `resolve`   - deterministic entity to coordinate resolution

pub mod centroids;
pub mod resolve;
