//! Strategies for the navigation domain
//!
//! All angles are degrees, distances metres, power watts.

use proptest::prelude::*;

// ============================================================================
// Geographic Generators
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Terrain elevation (-500 to 6500 m)
pub fn elevation_m() -> impl Strategy<Value = f64> {
    -500.0f64..=6_500.0
}

/// Flight altitude above a station (10 m to 70 km)
pub fn altitude_m() -> impl Strategy<Value = f64> {
    10.0f64..=70_000.0
}

/// Heading or bearing (0 to 360 deg)
pub fn heading_deg() -> impl Strategy<Value = f64> {
    0.0f64..360.0
}

/// (lat, lon, elevation) triple
pub fn surface_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (latitude_deg(), longitude_deg(), elevation_m())
}

// ============================================================================
// Channel / Identity Generators
// ============================================================================

/// Channel index in `0..count`
pub fn channel_index(count: i32) -> impl Strategy<Value = i32> {
    0..count.max(1)
}

/// Call sign of two to four letters
pub fn call_sign() -> impl Strategy<Value = String> {
    "[A-Z]{2,4}"
}

/// Letter offsets 0..=25, as stored by call signs
pub fn call_sign_letters() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..26, 1..=4)
}

// ============================================================================
// Signal Generators
// ============================================================================

/// Transmitter power (1 W to 1 kW)
pub fn transmit_power_w() -> impl Strategy<Value = f64> {
    1.0f64..=1_000.0
}

/// Received flux around the usability threshold (1e-12 to 1e-3 W/m^2)
pub fn flux_w_m2() -> impl Strategy<Value = f64> {
    (-12.0f64..=-3.0).prop_map(|exp| 10f64.powf(exp))
}

/// Strictly increasing simulation ticks
pub fn tick_sequence(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..3.0, len).prop_map(|steps| {
        steps
            .into_iter()
            .scan(0.0, |t, dt| {
                *t += dt;
                Some(*t)
            })
            .collect()
    })
}
