use std::fmt;

/// WGS84 coordinate pair, longitude first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Smallest axis-aligned box covering a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    /// `None` when `points` is empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LngLat>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LngLat) {
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
    }

    /// A single distinct point has no area to fit
    pub fn is_degenerate(&self) -> bool {
        self.south_west == self.north_east
    }
}
