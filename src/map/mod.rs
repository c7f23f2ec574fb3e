/// Map rendering core: clustering and viewport notification.
///
/// Nothing here draws pixels. These modules own the geometry and lifecycle
/// that an external view layer renders from: which markers exist, how they
/// group at a zoom level, what the current viewport is.
///
/// Submodules:
/// - `project`  - Web Mercator pixel projection
/// - `cluster`  - cluster group resource and marker layer lifecycle
/// - `viewport` - map view state, observer registry, and the event bridge

pub mod cluster;
pub mod project;
pub mod viewport;
