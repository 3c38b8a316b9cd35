//! Signal propagation
//!
//! Free-space inverse-square flux and a horizon test against the body
//! sphere. Positions on different bodies never see each other's signal.

use std::f64::consts::PI;

use crate::geo::GeoPosition;

/// Received flux (W/m^2) above which a signal is usable
pub const USABLE_FLUX_W_M2: f64 = 2e-9;

/// Flux (W/m^2) at `receiver` from an isotropic transmitter at `station`
pub fn flux(station: &GeoPosition, transmit_power_w: f64, receiver: &GeoPosition) -> f64 {
    if !station.same_body(receiver) {
        return 0.0;
    }
    let distance_sq = (receiver.vector() - station.vector()).norm_squared();
    if distance_sq == 0.0 {
        return if transmit_power_w > 0.0 { f64::INFINITY } else { 0.0 };
    }
    transmit_power_w / (4.0 * PI * distance_sq)
}

pub fn is_usable(flux_w_m2: f64) -> bool {
    flux_w_m2 > USABLE_FLUX_W_M2
}

/// Straight-line distance (m), `None` across bodies
pub fn slant_distance(station: &GeoPosition, receiver: &GeoPosition) -> Option<f64> {
    station
        .same_body(receiver)
        .then(|| (receiver.vector() - station.vector()).norm())
}

/// False when the segment from station to receiver enters the body.
///
/// Solves `A t^2 + 2 B t + C = 0` with `A = |a|^2`, `B = v.a`,
/// `C = |r|^2 - R^2` where `v` is the station, `r` the receiver and
/// `a = r - v`. A root inside `[0, 1]` means the body is in the way.
/// Positions on different bodies report a clear line.
pub fn line_of_sight(station: &GeoPosition, receiver: &GeoPosition) -> bool {
    if !station.same_body(receiver) {
        return true;
    }

    let v = station.vector();
    let offset = receiver.vector() - v;
    let radius = station.body_radius_m();

    let a = offset.norm_squared();
    if a == 0.0 {
        return true;
    }
    let b = v.dot(&offset);
    let c = receiver.vector().norm_squared() - radius * radius;

    let discriminant = b * b - a * c;
    if discriminant <= 0.0 {
        return true;
    }

    let spread = (discriminant / (a * a)).sqrt();
    let centre = b / a;
    let t1 = -centre - spread;
    let t2 = -centre + spread;

    let blocks = |t: f64| (0.0..=1.0).contains(&t);
    !(blocks(t1) || blocks(t2))
}
