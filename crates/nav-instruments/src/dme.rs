//! DME readout: distance, groundspeed and time to station
//!
//! Groundspeed is the rate of change of slant distance between samples
//! at least one time unit apart. Losing the station resets the tracker.

use serde::{Deserialize, Serialize};

use nav_master::NO_IDENT;

pub const METRES_PER_NM: f64 = 1852.0;
pub const METRES_PER_KM: f64 = 1000.0;

/// Minimum spacing between groundspeed samples
pub const SAMPLE_INTERVAL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnits {
    NauticalMiles,
    Kilometres,
}

impl DistanceUnits {
    pub fn metres_per_unit(self) -> f64 {
        match self {
            DistanceUnits::NauticalMiles => METRES_PER_NM,
            DistanceUnits::Kilometres => METRES_PER_KM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceUnits::NauticalMiles => "nm",
            DistanceUnits::Kilometres => "km",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmeMode {
    Distance,
    Groundspeed,
    TimeToStation,
}

impl DmeMode {
    pub fn next(self) -> Self {
        match self {
            DmeMode::Distance => DmeMode::Groundspeed,
            DmeMode::Groundspeed => DmeMode::TimeToStation,
            DmeMode::TimeToStation => DmeMode::Distance,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DmeMode::Distance => "DIST",
            DmeMode::Groundspeed => "GS",
            DmeMode::TimeToStation => "TTS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Sample {
    time: f64,
    distance_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmeIndicator {
    pub units: DistanceUnits,
    pub mode: DmeMode,
    ident: Option<String>,
    last_sample: Option<Sample>,
    /// Distance units per hour, positive when closing
    closure_rate: Option<f64>,
}

impl Default for DmeIndicator {
    fn default() -> Self {
        Self {
            units: DistanceUnits::NauticalMiles,
            mode: DmeMode::Distance,
            ident: None,
            last_sample: None,
            closure_rate: None,
        }
    }
}

impl DmeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    pub fn toggle_units(&mut self) {
        self.units = match self.units {
            DistanceUnits::NauticalMiles => DistanceUnits::Kilometres,
            DistanceUnits::Kilometres => DistanceUnits::NauticalMiles,
        };
    }

    /// Feed the slant distance to the tuned DME at time `now`, or `None`
    /// when no DME is received
    pub fn sample(&mut self, ident: Option<&str>, distance_m: Option<f64>, now: f64) {
        let (Some(ident), Some(distance_m)) = (ident, distance_m) else {
            self.reset();
            return;
        };
        if self.ident.as_deref() != Some(ident) {
            self.reset();
            self.ident = Some(ident.to_string());
        }

        match self.last_sample {
            Some(last) if now - last.time < SAMPLE_INTERVAL => {}
            Some(last) => {
                let hours = (now - last.time) / 3600.0;
                self.closure_rate = Some((last.distance_m - distance_m) / hours);
                self.last_sample = Some(Sample { time: now, distance_m });
            }
            None => self.last_sample = Some(Sample { time: now, distance_m }),
        }
    }

    fn reset(&mut self) {
        self.ident = None;
        self.last_sample = None;
        self.closure_rate = None;
    }

    pub fn ident(&self) -> &str {
        self.ident.as_deref().unwrap_or(NO_IDENT)
    }

    /// Slant distance in display units
    pub fn distance(&self) -> Option<f64> {
        self.last_sample
            .map(|s| s.distance_m / self.units.metres_per_unit())
    }

    /// Magnitude of the distance rate in display units per hour
    pub fn groundspeed(&self) -> Option<f64> {
        self.closure_rate
            .map(|rate| rate.abs() / self.units.metres_per_unit())
    }

    /// Minutes to the station; only while closing faster than 1 unit/h
    pub fn time_to_station_min(&self) -> Option<f64> {
        let rate = self.closure_rate? / self.units.metres_per_unit();
        if rate <= 1.0 {
            return None;
        }
        Some(self.distance()? / rate * 60.0)
    }

    /// Display text for the current mode
    pub fn readout(&self) -> String {
        let dashes = || NO_IDENT.to_string();
        match self.mode {
            DmeMode::Distance => self.distance().map_or_else(dashes, |d| format!("{d:.1}")),
            DmeMode::Groundspeed => self.groundspeed().map_or_else(dashes, |gs| format!("{gs:.0}")),
            DmeMode::TimeToStation => self
                .time_to_station_min()
                .map_or_else(dashes, |tts| format!("{tts:.0}")),
        }
    }
}
