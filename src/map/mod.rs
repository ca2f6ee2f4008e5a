pub mod bounds;
pub mod mapbox;

pub use bounds::{Bounds, LngLat};
pub use mapbox::MapboxStatic;

use tracing::{debug, info};

/// Camera used before any bounds fit
pub const DEFAULT_CENTER: LngLat = LngLat { lng: -74.5, lat: 40.0 };
pub const DEFAULT_ZOOM: f64 = 9.0;
/// Margin, in pixels, kept around fitted markers
pub const FIT_PADDING: u32 = 50;

/// Initial viewport of a new map instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Seam over a map-rendering SDK. Implementations own every underlying
/// resource and release it in [`MapBackend::remove`].
pub trait MapBackend: Send {
    /// Construct a map instance on `mount`
    fn create(&mut self, mount: &str, camera: Camera) -> MapId;

    /// Whether the tile layer of `map` has signalled readiness
    fn is_loaded(&self, map: MapId) -> bool;

    fn add_marker(&mut self, map: MapId, at: LngLat) -> MarkerId;

    fn remove_marker(&mut self, map: MapId, marker: MarkerId);

    fn fit_bounds(&mut self, map: MapId, bounds: Bounds, padding: u32);

    /// Drop any fitted bounds and return to the camera `map` was created with
    fn reset_camera(&mut self, map: MapId);

    /// Tear down `map` and everything attached to it
    fn remove(&mut self, map: MapId);

    /// Textual rendition of the current map, for terminal output
    fn render(&self, map: MapId) -> String;
}

/// Lifecycle of the map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Uninitialized,
    /// Instance exists, tile load pending
    Initializing,
    /// Markers placed
    Ready,
    TornDown,
}

/// Map adapter: at most one live instance per mount, markers mirroring the
/// most recent record set.
pub struct MapView {
    backend: Box<dyn MapBackend>,
    state: MapState,
    map: Option<MapId>,
    markers: Vec<MarkerId>,
    points: Vec<LngLat>,
}

impl MapView {
    pub fn new(backend: Box<dyn MapBackend>) -> Self {
        Self {
            backend,
            state: MapState::Uninitialized,
            map: None,
            markers: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Create the underlying map on `mount` unless one is already live.
    /// Returns `true` when a new instance was constructed.
    pub fn mount(&mut self, mount: &str) -> bool {
        if self.map.is_some() {
            debug!("Map already mounted, reusing instance");
            return false;
        }

        let map = self.backend.create(mount, Camera::default());
        debug!(?map, mount, "Created map instance");
        self.map = Some(map);
        self.state = MapState::Initializing;

        if self.backend.is_loaded(map) {
            self.on_load();
        }
        true
    }

    /// Tile layer readiness callback: place markers for the latest records
    pub fn on_load(&mut self) {
        if self.state != MapState::Initializing {
            return;
        }
        self.state = MapState::Ready;
        self.place_markers();
    }

    /// Replace the record set shown on the map. Markers are rebuilt right
    /// away on a ready map, otherwise on the next load.
    pub fn set_records<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = LngLat>,
    {
        self.points = points.into_iter().collect();
        if self.state == MapState::Ready {
            self.place_markers();
        }
    }

    /// Release the underlying map. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let Some(map) = self.map.take() else {
            return;
        };
        self.markers.clear();
        self.backend.remove(map);
        self.state = MapState::TornDown;
        debug!(?map, "Removed map instance");
    }

    pub fn render(&self) -> Option<String> {
        self.map.map(|map| self.backend.render(map))
    }

    fn place_markers(&mut self) {
        let Some(map) = self.map else {
            return;
        };

        for marker in self.markers.drain(..) {
            self.backend.remove_marker(map, marker);
        }
        for &point in &self.points {
            let marker = self.backend.add_marker(map, point);
            self.markers.push(marker);
        }

        match Bounds::from_points(self.points.iter().copied()) {
            Some(bounds) => self.backend.fit_bounds(map, bounds, FIT_PADDING),
            None => self.backend.reset_camera(map),
        }
        info!("Placed {} map markers", self.markers.len());
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        self.unmount();
    }
}
