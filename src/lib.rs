/// Geospatial classification and rendering core for the groundwater
/// monitoring dashboard.
///
/// This crate owns the algorithmic parts of the dashboard: GAVI score and
/// alert classification, administrative-entity coordinate resolution,
/// screen-space marker clustering, viewport change notification, and the
/// cached read path against the external aggregation API. Page shells,
/// navigation, CSV export, and styling live in external view layers that
/// call into this core with plain data and callbacks.
///
/// Module map:
/// - `model`    - shared domain types, no logic or I/O
/// - `classify` - score band and alert descriptor lookup (total functions)
/// - `geo`      - centroid registries and the coordinate resolver
/// - `map`      - cluster renderer and viewport event bridge
/// - `cache`    - keyed query cache with staleness policy and dedup
/// - `ingest`   - HTTP client for the aggregation API
/// - `config`   - TOML service configuration
/// - `logging`  - structured logging with subsystem tags

pub mod cache;
pub mod classify;
pub mod config;
pub mod geo;
pub mod ingest;
pub mod logging;
pub mod map;
pub mod model;

pub use classify::alerts::classify_alert;
pub use classify::severity::classify_score;
pub use geo::resolve::resolve_coordinates;
pub use model::{GeoBounds, GeoEntity, LatLon};
