//! Body-centred positions
//!
//! A `GeoPosition` caches the last observed (latitude, longitude, elevation)
//! and the Cartesian vector it projects to. The vector is only recomputed
//! when the observation moves beyond the change tolerances.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Elevation change (m) that forces a recompute
pub const ELEVATION_TOLERANCE_M: f64 = 0.5;
/// Latitude/longitude change (deg) that forces a recompute
pub const ANGULAR_TOLERANCE_DEG: f64 = 2e-5;

/// A spherical celestial body. Two positions share a frame only when
/// their bodies compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: String,
    pub radius_m: f64,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>, radius_m: f64) -> Self {
        Self {
            name: name.into(),
            radius_m,
        }
    }

    pub fn kerbin() -> Self {
        Self::new("Kerbin", 600_000.0)
    }

    pub fn mun() -> Self {
        Self::new("Mun", 200_000.0)
    }

    pub fn duna() -> Self {
        Self::new("Duna", 320_000.0)
    }
}

/// Observed location of a station or receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    body: Option<CelestialBody>,
    vector: Vector3<f64>,
    latitude_deg: f64,
    longitude_deg: f64,
    elevation_m: f64,
    latitude_text: String,
    longitude_text: String,
}

impl Default for GeoPosition {
    fn default() -> Self {
        Self {
            body: None,
            vector: Vector3::zeros(),
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            elevation_m: 0.0,
            latitude_text: format_latitude(0.0),
            longitude_text: format_longitude(0.0),
        }
    }
}

impl GeoPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a position already placed at the given observation
    pub fn at(body: CelestialBody, latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        let mut position = Self::default();
        position.update(&body, latitude_deg, longitude_deg, elevation_m);
        position
    }

    /// Feed a new observation. Returns true when the Cartesian vector was
    /// recomputed, so callers know to push the change to the registry.
    pub fn update(
        &mut self,
        body: &CelestialBody,
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_m: f64,
    ) -> bool {
        let same_body = self.body.as_ref() == Some(body);
        if same_body
            && (elevation_m - self.elevation_m).abs() <= ELEVATION_TOLERANCE_M
            && (latitude_deg - self.latitude_deg).abs() <= ANGULAR_TOLERANCE_DEG
            && (longitude_deg - self.longitude_deg).abs() <= ANGULAR_TOLERANCE_DEG
        {
            return false;
        }

        self.vector = project(body.radius_m, latitude_deg, longitude_deg, elevation_m);
        self.latitude_deg = latitude_deg;
        self.longitude_deg = longitude_deg;
        self.elevation_m = elevation_m;
        self.latitude_text = format_latitude(latitude_deg);
        self.longitude_text = format_longitude(longitude_deg);
        if !same_body {
            trace!("Position now referenced to {}", body.name);
            self.body = Some(body.clone());
        }
        true
    }

    pub fn body(&self) -> Option<&CelestialBody> {
        self.body.as_ref()
    }

    /// True when both positions are placed on the same body
    pub fn same_body(&self, other: &GeoPosition) -> bool {
        matches!((&self.body, &other.body), (Some(a), Some(b)) if a == b)
    }

    pub fn body_radius_m(&self) -> f64 {
        self.body.as_ref().map_or(0.0, |b| b.radius_m)
    }

    pub fn vector(&self) -> &Vector3<f64> {
        &self.vector
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    pub fn latitude_text(&self) -> &str {
        &self.latitude_text
    }

    pub fn longitude_text(&self) -> &str {
        &self.longitude_text
    }
}

/// Spherical projection into the body-centred equatorial frame
pub fn project(body_radius_m: f64, latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Vector3<f64> {
    let radius = elevation_m + body_radius_m;
    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();
    Vector3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    )
}

// ============================================================================
// Degree / minute / second text
// ============================================================================

pub fn format_latitude(latitude_deg: f64) -> String {
    let hemisphere = if latitude_deg < 0.0 { 'S' } else { 'N' };
    let (deg, min, tenths) = split_dms(latitude_deg);
    format!("{hemisphere}{deg:02}°{min:02}'{:02}.{}\"", tenths / 10, tenths % 10)
}

pub fn format_longitude(longitude_deg: f64) -> String {
    let hemisphere = if longitude_deg < 0.0 { 'W' } else { 'E' };
    let (deg, min, tenths) = split_dms(longitude_deg);
    format!("{hemisphere}{deg:03}°{min:02}'{:02}.{}\"", tenths / 10, tenths % 10)
}

/// Whole degrees, whole minutes and tenths of a second. Rounded once on
/// the total so a carry never renders as 60 seconds.
fn split_dms(value_deg: f64) -> (u64, u64, u64) {
    let total_tenths = (value_deg.abs() * 36_000.0).round() as u64;
    let deg = total_tenths / 36_000;
    let min = (total_tenths / 600) % 60;
    let tenths = total_tenths % 600;
    (deg, min, tenths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_always_recomputes() {
        let mut pos = GeoPosition::new();
        assert!(pos.update(&CelestialBody::kerbin(), 0.0, 0.0, 0.0));
        assert!((pos.vector().x - 600_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_small_moves_are_ignored() {
        let kerbin = CelestialBody::kerbin();
        let mut pos = GeoPosition::at(kerbin.clone(), 10.0, 20.0, 100.0);
        assert!(!pos.update(&kerbin, 10.00001, 20.00001, 100.4));
        assert!(pos.update(&kerbin, 10.0, 20.0, 101.0));
        assert!(pos.update(&kerbin, 10.0001, 20.0, 101.0));
    }

    #[test]
    fn test_body_change_recomputes() {
        let mut pos = GeoPosition::at(CelestialBody::kerbin(), 0.0, 0.0, 0.0);
        assert!(pos.update(&CelestialBody::mun(), 0.0, 0.0, 0.0));
        assert_eq!(pos.body().map(|b| b.name.as_str()), Some("Mun"));
        assert!((pos.vector().x - 200_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_axes() {
        let north_pole = project(600_000.0, 90.0, 0.0, 0.0);
        assert!(north_pole.x.abs() < 1e-6);
        assert!((north_pole.z - 600_000.0).abs() < 1e-6);

        let east = project(600_000.0, 0.0, 90.0, 1000.0);
        assert!((east.y - 601_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_text() {
        let pos = GeoPosition::default();
        assert_eq!(pos.latitude_text(), "N00°00'00.0\"");
        assert_eq!(pos.longitude_text(), "E000°00'00.0\"");
        let origin = GeoPosition::at(CelestialBody::kerbin(), 0.0, 0.0, 0.0);
        assert_eq!(pos.latitude_text(), origin.latitude_text());
        assert_eq!(pos.longitude_text(), origin.longitude_text());
        assert!(pos.body().is_none());
    }

    #[test]
    fn test_dms_text() {
        assert_eq!(format_latitude(-0.5), "S00°30'00.0\"");
        assert_eq!(format_longitude(-74.7249), "W074°43'29.6\"");
        assert_eq!(format_latitude(12.999_999_9), "N13°00'00.0\"");
    }

    #[test]
    fn test_json_snapshot() {
        let pos = GeoPosition::at(CelestialBody::duna(), -12.5, 140.25, 2500.0);
        let json = serde_json::to_string(&pos).unwrap();
        let restored: GeoPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.body(), pos.body());
        assert_eq!(restored.latitude_deg(), -12.5);
        assert_eq!(restored.longitude_deg(), 140.25);
        assert_eq!(restored.elevation_m(), 2500.0);
        assert_eq!(restored.latitude_text(), pos.latitude_text());
        assert!((restored.vector() - pos.vector()).norm() < 1e-6);
    }

    #[test]
    fn test_same_body() {
        let a = GeoPosition::at(CelestialBody::kerbin(), 0.0, 0.0, 0.0);
        let b = GeoPosition::at(CelestialBody::kerbin(), 1.0, 1.0, 0.0);
        let c = GeoPosition::at(CelestialBody::mun(), 0.0, 0.0, 0.0);
        assert!(a.same_body(&b));
        assert!(!a.same_body(&c));
        assert!(!a.same_body(&GeoPosition::new()));
    }
}
