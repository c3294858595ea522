//! Geographic coordinate type and great-circle helpers.
//!
//! Every distance in this crate is expressed in **nautical miles**. Mixing
//! units inside the resolver or the assembler would silently break the
//! endpoint thresholds, so the only distance function exported here returns nm.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3_440.065;

/// A WGS-84 position stored as `(longitude, latitude)` degrees.
///
/// Serialises as a two-element `[lon, lat]` array, matching GeoJSON ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance to `other` in nautical miles.
    pub fn distance_nm(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_NM * c
    }

    /// `true` when both components are finite and inside the WGS-84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Wrap longitude into `[-180, 180]` and clamp latitude into `[-90, 90]`.
    ///
    /// Non-finite components collapse to zero.
    pub fn normalized(&self) -> Coordinate {
        let lon = if self.lon.is_finite() {
            let wrapped = (self.lon + 180.0).rem_euclid(360.0) - 180.0;
            if wrapped == -180.0 && self.lon > 0.0 {
                180.0
            } else {
                wrapped
            }
        } else {
            0.0
        };
        let lat = if self.lat.is_finite() {
            self.lat.clamp(-90.0, 90.0)
        } else {
            0.0
        };
        Coordinate { lon, lat }
    }

    /// Approximate equality used when joining geometry onto node coordinates.
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        const EPSILON_DEG: f64 = 1e-6;
        (self.lon - other.lon).abs() < EPSILON_DEG && (self.lat - other.lat).abs() < EPSILON_DEG
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lon, value.lat]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lon, self.lat)
    }
}

/// Sum of consecutive great-circle segment lengths along `points`, in nautical miles.
pub fn polyline_length_nm(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_nm(&pair[1]))
        .sum()
}

/// Shift longitudes so consecutive points differ by at most 180 degrees.
///
/// The first point is left untouched. Later points may fall outside
/// `[-180, 180]` on lines that cross the antimeridian; distances are unchanged.
pub fn unwrap_longitudes(points: &mut [Coordinate]) {
    for i in 1..points.len() {
        let previous = points[i - 1].lon;
        let delta = points[i].lon - previous;
        points[i].lon = previous + (delta - 360.0 * (delta / 360.0).round());
    }
}

/// Split a polyline where it crosses the antimeridian.
///
/// Every returned part stays inside `[-180, 180]`; crossing points are
/// interpolated onto the `±180` meridian. A line that never crosses comes back
/// as a single part.
pub fn split_at_antimeridian(points: &[Coordinate]) -> Vec<Vec<Coordinate>> {
    let mut line = points.to_vec();
    unwrap_longitudes(&mut line);

    let mut parts = Vec::new();
    let Some(first) = line.first() else {
        return parts;
    };

    let mut band = longitude_band(first.lon);
    let mut current = vec![shift_band(first, band)];
    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let next_band = longitude_band(b.lon);
        if next_band != band {
            let offset = 360.0 * band as f64;
            let boundary = if next_band > band { 180.0 } else { -180.0 };
            let t = (boundary + offset - a.lon) / (b.lon - a.lon);
            let lat = a.lat + t * (b.lat - a.lat);

            push_distinct(&mut current, Coordinate::new(boundary, lat));
            parts.push(std::mem::take(&mut current));
            current.push(Coordinate::new(-boundary, lat));
            band = next_band;
            push_distinct(&mut current, shift_band(&b, band));
        } else {
            current.push(shift_band(&b, band));
        }
    }
    parts.push(current);
    parts.retain(|part| part.len() >= 2);
    parts
}

fn longitude_band(lon: f64) -> i64 {
    ((lon + 180.0) / 360.0).floor() as i64
}

fn shift_band(point: &Coordinate, band: i64) -> Coordinate {
    Coordinate::new(point.lon - 360.0 * band as f64, point.lat)
}

fn push_distinct(part: &mut Vec<Coordinate>, point: Coordinate) {
    if part.last().is_some_and(|last| last.approx_eq(&point)) {
        return;
    }
    part.push(point);
}
