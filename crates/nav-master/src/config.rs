//! Scheduler and resolution settings

use navaid_core::USABLE_FLUX_W_M2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub const USABLE_FLUX_ENV: &str = "NAV_USABLE_FLUX";
pub const RESCAN_INTERVAL_ENV: &str = "NAV_RESCAN_INTERVAL";
pub const FREQUENCY_TOLERANCE_ENV: &str = "NAV_FREQUENCY_TOLERANCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Flux (W/m^2) a resolved station must exceed
    pub usable_flux_w_m2: f64,
    /// Age (simulation time units) after which a candidate list is stale
    pub rescan_interval: f64,
    /// Maximum |station - receiver| frequency (MHz) for a match
    pub frequency_tolerance_mhz: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            usable_flux_w_m2: USABLE_FLUX_W_M2,
            rescan_interval: 1.0,
            frequency_tolerance_mhz: 0.01,
        }
    }
}

impl NavConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse JSON; absent fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: NavConfig = serde_json::from_str(text)?;
        Ok(config.validated())
    }

    /// Defaults overridden by `NAV_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        override_from_env(USABLE_FLUX_ENV, &mut config.usable_flux_w_m2);
        override_from_env(RESCAN_INTERVAL_ENV, &mut config.rescan_interval);
        override_from_env(FREQUENCY_TOLERANCE_ENV, &mut config.frequency_tolerance_mhz);
        config.validated()
    }

    pub fn rescan_interval(mut self, interval: f64) -> Self {
        self.rescan_interval = interval;
        self
    }

    pub fn usable_flux(mut self, flux_w_m2: f64) -> Self {
        self.usable_flux_w_m2 = flux_w_m2;
        self
    }

    /// Replace non-finite or negative values with defaults. A zero
    /// rescan interval is allowed and rescans on every tick.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.usable_flux_w_m2.is_finite() && self.usable_flux_w_m2 >= 0.0) {
            warn!("Rejecting usable flux {}, using {}", self.usable_flux_w_m2, defaults.usable_flux_w_m2);
            self.usable_flux_w_m2 = defaults.usable_flux_w_m2;
        }
        if !(self.rescan_interval.is_finite() && self.rescan_interval >= 0.0) {
            warn!("Rejecting rescan interval {}, using {}", self.rescan_interval, defaults.rescan_interval);
            self.rescan_interval = defaults.rescan_interval;
        }
        if !(self.frequency_tolerance_mhz.is_finite() && self.frequency_tolerance_mhz > 0.0) {
            warn!(
                "Rejecting frequency tolerance {}, using {}",
                self.frequency_tolerance_mhz, defaults.frequency_tolerance_mhz
            );
            self.frequency_tolerance_mhz = defaults.frequency_tolerance_mhz;
        }
        self
    }
}

fn override_from_env(name: &str, field: &mut f64) {
    let Ok(raw) = std::env::var(name) else {
        return;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) => *field = value,
        Err(_) => warn!("Ignoring {}={:?}: not a number", name, raw),
    }
}
