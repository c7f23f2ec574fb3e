/// Map view state and the viewport event bridge.
///
/// `MapView` owns the authoritative viewport (center, zoom, pixel size) and
/// an observer registry for pan/zoom-end events. Consumers receive viewport
/// snapshots; the state itself is never writable from outside.
///
/// `ViewportBridge` is the contract external page logic consumes: mount it
/// with up to two callbacks, receive one synchronous initial zoom and one
/// initial bounds (so consumers never observe an unset viewport), then a
/// bounded stream of change events until unmount. After unmount no callback
/// fires again, even if a subscription were somehow left behind.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MapDefaults;
use crate::geo::centroids::NATIONAL_BOUNDS;
use crate::map::project::{project, unproject};
use crate::model::{GeoBounds, LatLon};

// ---------------------------------------------------------------------------
// Viewport state
// ---------------------------------------------------------------------------

/// Snapshot of the current viewport, emitted to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: u8,
    pub bounds: GeoBounds,
}

pub type HandlerId = u64;

type ViewportHandler = Box<dyn FnMut(&ViewportState)>;

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

/// The owning map instance: viewport state plus pan/zoom-end observers.
pub struct MapView {
    center: LatLon,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    width_px: f64,
    height_px: f64,
    /// Pan clamp; the center never leaves this box.
    max_bounds: GeoBounds,
    next_handler_id: HandlerId,
    zoom_end_handlers: Vec<(HandlerId, ViewportHandler)>,
    move_end_handlers: Vec<(HandlerId, ViewportHandler)>,
}

impl MapView {
    /// Creates a view over a drawing surface of the given pixel size.
    pub fn new(defaults: &MapDefaults, width_px: f64, height_px: f64) -> Self {
        Self {
            center: defaults.center(),
            zoom: defaults.zoom.clamp(defaults.min_zoom, defaults.max_zoom),
            min_zoom: defaults.min_zoom,
            max_zoom: defaults.max_zoom,
            width_px,
            height_px,
            max_bounds: NATIONAL_BOUNDS,
            next_handler_id: 0,
            zoom_end_handlers: Vec::new(),
            move_end_handlers: Vec::new(),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Visible bounds: the pixel viewport unprojected around the center.
    pub fn bounds(&self) -> GeoBounds {
        let (cx, cy) = project(self.center, self.zoom);
        let half_w = self.width_px / 2.0;
        let half_h = self.height_px / 2.0;
        // y grows southward in the projected plane.
        let south_west = unproject(cx - half_w, cy + half_h, self.zoom);
        let north_east = unproject(cx + half_w, cy - half_h, self.zoom);
        GeoBounds::from_corners(south_west, north_east)
    }

    pub fn viewport(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            bounds: self.bounds(),
        }
    }

    // --- observer registry --------------------------------------------------

    pub fn on_zoom_end(&mut self, handler: ViewportHandler) -> HandlerId {
        let id = self.next_id();
        self.zoom_end_handlers.push((id, handler));
        id
    }

    pub fn on_move_end(&mut self, handler: ViewportHandler) -> HandlerId {
        let id = self.next_id();
        self.move_end_handlers.push((id, handler));
        id
    }

    /// Removes a handler from whichever registry holds it.
    pub fn off(&mut self, id: HandlerId) {
        self.zoom_end_handlers.retain(|(hid, _)| *hid != id);
        self.move_end_handlers.retain(|(hid, _)| *hid != id);
    }

    fn next_id(&mut self) -> HandlerId {
        self.next_handler_id += 1;
        self.next_handler_id
    }

    // --- interaction --------------------------------------------------------

    /// Sets the zoom (clamped to the configured range) and fires zoom-end.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let state = self.viewport();
        for (_, handler) in &mut self.zoom_end_handlers {
            handler(&state);
        }
    }

    /// Pans to a new center (clamped into the max bounds) and fires
    /// move-end.
    pub fn pan_to(&mut self, center: LatLon) {
        self.center = LatLon::new(
            center.lat.clamp(self.max_bounds.south, self.max_bounds.north),
            center.lon.clamp(self.max_bounds.west, self.max_bounds.east),
        );
        let state = self.viewport();
        for (_, handler) in &mut self.move_end_handlers {
            handler(&state);
        }
    }
}

// ---------------------------------------------------------------------------
// Event bridge
// ---------------------------------------------------------------------------

type ZoomCallback = Box<dyn FnMut(u8)>;
type BoundsCallback = Box<dyn FnMut(GeoBounds)>;

struct BridgeInner {
    mounted: bool,
    on_zoom: Option<ZoomCallback>,
    on_bounds: Option<BoundsCallback>,
}

impl BridgeInner {
    fn emit_zoom(&mut self, zoom: u8) {
        if !self.mounted {
            return;
        }
        if let Some(callback) = self.on_zoom.as_mut() {
            callback(zoom);
        }
    }

    fn emit_bounds(&mut self, bounds: GeoBounds) {
        if !self.mounted {
            return;
        }
        if let Some(callback) = self.on_bounds.as_mut() {
            callback(bounds);
        }
    }
}

/// Mirrors the map's viewport outward to two independently optional
/// callbacks. Owns no business logic.
pub struct ViewportBridge {
    inner: Rc<RefCell<BridgeInner>>,
    zoom_subscription: Option<HandlerId>,
    move_subscription: Option<HandlerId>,
}

impl ViewportBridge {
    /// Subscribes to the map's zoom-end and move-end signals and
    /// synchronously emits one initial bounds and one initial zoom from the
    /// map's current viewport.
    pub fn mount(
        map: &mut MapView,
        on_zoom: Option<ZoomCallback>,
        on_bounds: Option<BoundsCallback>,
    ) -> Self {
        let inner = Rc::new(RefCell::new(BridgeInner {
            mounted: true,
            on_zoom,
            on_bounds,
        }));

        // Zoom-end reports both the new zoom and the new bounds; move-end
        // reports bounds only.
        let zoom_subscription = {
            let inner = Rc::clone(&inner);
            map.on_zoom_end(Box::new(move |state: &ViewportState| {
                let mut bridge = inner.borrow_mut();
                bridge.emit_zoom(state.zoom);
                bridge.emit_bounds(state.bounds);
            }))
        };
        let move_subscription = {
            let inner = Rc::clone(&inner);
            map.on_move_end(Box::new(move |state: &ViewportState| {
                inner.borrow_mut().emit_bounds(state.bounds);
            }))
        };

        // Initial synchronous emission, so consumers never see an unset
        // viewport.
        let state = map.viewport();
        {
            let mut bridge = inner.borrow_mut();
            bridge.emit_bounds(state.bounds);
            bridge.emit_zoom(state.zoom);
        }

        Self {
            inner,
            zoom_subscription: Some(zoom_subscription),
            move_subscription: Some(move_subscription),
        }
    }

    /// Unsubscribes from the map and disarms the callbacks. No callback
    /// invocation can occur after this returns.
    pub fn unmount(&mut self, map: &mut MapView) {
        if let Some(id) = self.zoom_subscription.take() {
            map.off(id);
        }
        if let Some(id) = self.move_subscription.take() {
            map.off(id);
        }
        self.inner.borrow_mut().mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().mounted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
