//! VOR course deviation indicator

use navaid_core::bearing::{normalize_signed, INVALID_BEARING};
use navaid_core::{GeoPosition, Station};
use serde::{Deserialize, Serialize};

/// Degrees of course error per needle dot
pub const DEGREES_PER_DOT: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToFrom {
    To,
    From,
}

impl std::fmt::Display for ToFrom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ToFrom::To => "TO",
            ToFrom::From => "FROM",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VorReading {
    /// Needle position in dots, positive when the selected course lies right
    pub deviation_dots: f64,
    pub to_from: ToFrom,
    pub ident: String,
}

/// Course error for `obs_deg` against the received `radial_deg`.
/// Beyond 90 degrees the course is flown TO the station and the error
/// is reflected about the reciprocal.
pub fn course_deviation(obs_deg: f64, radial_deg: f64) -> (f64, ToFrom) {
    let deviation = normalize_signed(obs_deg - radial_deg);
    if deviation < -90.0 {
        (-180.0 - deviation, ToFrom::To)
    } else if deviation > 90.0 {
        (180.0 - deviation, ToFrom::To)
    } else {
        (deviation, ToFrom::From)
    }
}

/// Omni-bearing selector plus needle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VorIndicator {
    obs_deg: i32,
}

impl VorIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obs(obs_deg: i32) -> Self {
        Self {
            obs_deg: obs_deg.rem_euclid(360),
        }
    }

    pub fn obs(&self) -> i32 {
        self.obs_deg
    }

    /// Selector as shown on the dial, e.g. "045"
    pub fn obs_text(&self) -> String {
        format!("{:03}", self.obs_deg)
    }

    pub fn increment_obs(&mut self) {
        self.obs_deg = (self.obs_deg + 1).rem_euclid(360);
    }

    pub fn decrement_obs(&mut self) {
        self.obs_deg = (self.obs_deg - 1).rem_euclid(360);
    }

    /// No reading inside the zone of confusion or across bodies
    pub fn read(&self, vor: &Station, receiver: &GeoPosition) -> Option<VorReading> {
        if vor.in_zone_of_confusion(receiver) {
            return None;
        }
        let radial = vor.radial(receiver);
        if radial == INVALID_BEARING {
            return None;
        }
        let (deviation, to_from) = course_deviation(f64::from(self.obs_deg), radial);
        Some(VorReading {
            deviation_dots: deviation / DEGREES_PER_DOT,
            to_from,
            ident: vor.identity.to_string(),
        })
    }
}
