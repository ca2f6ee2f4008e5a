use crate::map::{Bounds, Camera, LngLat, MapBackend, MapId, MarkerId};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const STATIC_API: &str = "https://api.mapbox.com/styles/v1";

/// Map style, `owner/style`
pub const DEFAULT_STYLE: &str = "mapbox/streets-v11";

struct StaticMap {
    camera: Camera,
    markers: BTreeMap<MarkerId, LngLat>,
    fit: Option<(Bounds, u32)>,
}

/// Renders maps through the Mapbox Static Images API. Each instance is a
/// URL that an image viewer or browser can open; tiles are "loaded" as
/// soon as the instance exists.
pub struct MapboxStatic {
    access_token: String,
    style: String,
    width: u32,
    height: u32,
    maps: HashMap<MapId, StaticMap>,
    next_id: u64,
}

impl MapboxStatic {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            style: DEFAULT_STYLE.to_string(),
            width: 800,
            height: 600,
            maps: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn url(&self, map: &StaticMap) -> String {
        let mut path = format!("{}/{}/static", STATIC_API, self.style);

        if !map.markers.is_empty() {
            let overlay = map
                .markers
                .values()
                .map(|p| format!("pin-s({p})"))
                .collect::<Vec<_>>()
                .join(",");
            path.push('/');
            path.push_str(&overlay);
        }

        let mut query = vec![format!("access_token={}", self.access_token)];
        match map.fit {
            Some((bounds, padding)) if !bounds.is_degenerate() => {
                path.push_str(&format!(
                    "/[{},{},{},{}]",
                    bounds.south_west.lng, bounds.south_west.lat, bounds.north_east.lng, bounds.north_east.lat
                ));
                query.push(format!("padding={padding}"));
            }
            Some((_, padding)) => {
                path.push_str("/auto");
                query.push(format!("padding={padding}"));
            }
            None => {
                path.push_str(&format!("/{},{}", map.camera.center, map.camera.zoom));
            }
        }

        format!("{}/{}x{}?{}", path, self.width, self.height, query.join("&"))
    }
}

impl MapBackend for MapboxStatic {
    fn create(&mut self, mount: &str, camera: Camera) -> MapId {
        let id = MapId(self.next());
        debug!(?id, mount, "Creating static map");
        self.maps.insert(
            id,
            StaticMap {
                camera,
                markers: BTreeMap::new(),
                fit: None,
            },
        );
        id
    }

    fn is_loaded(&self, map: MapId) -> bool {
        self.maps.contains_key(&map)
    }

    fn add_marker(&mut self, map: MapId, at: LngLat) -> MarkerId {
        let id = MarkerId(self.next());
        if let Some(state) = self.maps.get_mut(&map) {
            state.markers.insert(id, at);
        }
        id
    }

    fn remove_marker(&mut self, map: MapId, marker: MarkerId) {
        if let Some(state) = self.maps.get_mut(&map) {
            state.markers.remove(&marker);
        }
    }

    fn fit_bounds(&mut self, map: MapId, bounds: Bounds, padding: u32) {
        if let Some(state) = self.maps.get_mut(&map) {
            state.fit = Some((bounds, padding));
        }
    }

    fn reset_camera(&mut self, map: MapId) {
        if let Some(state) = self.maps.get_mut(&map) {
            state.fit = None;
        }
    }

    fn remove(&mut self, map: MapId) {
        self.maps.remove(&map);
    }

    fn render(&self, map: MapId) -> String {
        self.maps.get(&map).map(|state| self.url(state)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapView, FIT_PADDING};

    #[test]
    fn default_camera_without_markers() {
        let mut backend = MapboxStatic::new("tok");
        let map = backend.create("map", Camera::default());

        assert_eq!(
            backend.render(map),
            "https://api.mapbox.com/styles/v1/mapbox/streets-v11/static/-74.5,40,9/800x600?access_token=tok"
        );
    }

    #[test]
    fn fitted_markers_use_bounding_box() {
        let mut backend = MapboxStatic::new("tok").with_size(400, 300);
        let map = backend.create("map", Camera::default());
        backend.add_marker(map, LngLat::new(2.5, 41.0));
        backend.add_marker(map, LngLat::new(-3.5, 40.0));
        backend.fit_bounds(
            map,
            Bounds::from_points([LngLat::new(2.5, 41.0), LngLat::new(-3.5, 40.0)]).unwrap(),
            FIT_PADDING,
        );

        assert_eq!(
            backend.render(map),
            "https://api.mapbox.com/styles/v1/mapbox/streets-v11/static/\
             pin-s(2.5,41),pin-s(-3.5,40)/[-3.5,40,2.5,41]/400x300?access_token=tok&padding=50"
        );
    }

    #[test]
    fn single_marker_falls_back_to_auto() {
        let mut backend = MapboxStatic::new("tok");
        let map = backend.create("map", Camera::default());
        let point = LngLat::new(1.0, 2.0);
        backend.add_marker(map, point);
        backend.fit_bounds(map, Bounds::from_points([point]).unwrap(), FIT_PADDING);

        assert!(backend.render(map).contains("/pin-s(1,2)/auto/800x600?"));
    }

    #[test]
    fn emptied_view_returns_to_default_camera() {
        let mut view = MapView::new(Box::new(MapboxStatic::new("tok")));
        view.set_records([LngLat::new(2.0, 41.0), LngLat::new(-3.0, 40.0)]);
        view.mount("map");
        assert!(view.render().unwrap().contains("/[-3,40,2,41]/"));

        view.set_records(std::iter::empty());

        assert_eq!(
            view.render().unwrap(),
            "https://api.mapbox.com/styles/v1/mapbox/streets-v11/static/-74.5,40,9/800x600?access_token=tok"
        );
    }

    #[test]
    fn remove_releases_instance() {
        let mut backend = MapboxStatic::new("tok");
        let map = backend.create("map", Camera::default());
        assert!(backend.is_loaded(map));

        backend.remove(map);
        assert!(!backend.is_loaded(map));
        assert_eq!(backend.render(map), "");
    }
}
