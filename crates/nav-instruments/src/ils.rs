//! Localizer and glideslope needles

use navaid_core::{GeoPosition, Station, StationType};
use serde::{Deserialize, Serialize};

/// Needle travel limit in half-widths
pub const FULL_SCALE: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedleReading {
    /// Beam half-widths off centre, clamped to full scale
    pub deviation: f64,
    /// The raw value was beyond full scale
    pub pegged: bool,
    pub ident: String,
}

impl NeedleReading {
    fn new(raw: f64, station: &Station) -> Self {
        Self {
            deviation: raw.clamp(-FULL_SCALE, FULL_SCALE),
            pegged: raw.abs() > FULL_SCALE,
            ident: station.identity.to_string(),
        }
    }
}

/// Left/right needle; `None` unless `station` is a localizer on the same body
pub fn localizer_reading(station: &Station, receiver: &GeoPosition) -> Option<NeedleReading> {
    if station.station_type() != StationType::Loc || !station.position.same_body(receiver) {
        return None;
    }
    Some(NeedleReading::new(station.localizer_offset(receiver), station))
}

/// Up/down needle; `None` unless `station` is a glideslope on the same body
pub fn glideslope_reading(station: &Station, receiver: &GeoPosition) -> Option<NeedleReading> {
    if station.station_type() != StationType::Gls || !station.position.same_body(receiver) {
        return None;
    }
    Some(NeedleReading::new(station.glideslope_offset(receiver), station))
}
