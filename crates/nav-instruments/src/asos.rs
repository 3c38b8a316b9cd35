//! Automated weather station
//!
//! Turns host-supplied weather samples into an hourly METAR and a plain
//! English report, and publishes the English text as the message of a
//! COMM station registered with the navigation master.

use nav_master::{NavMaster, Result, StationHandle};
use navaid_core::{GeoPosition, Station, StationKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seconds in a Kerbin day
pub const DAY_LENGTH_S: f64 = 21_600.0;
pub const DEFAULT_IDENT: &str = "XKSP";
/// COMM channel for 121.425 MHz
pub const DEFAULT_CHANNEL: i32 = 411;
pub const BROADCAST_POWER_W: f64 = 10.0;
/// Dew point is reported this far below the air temperature
pub const DEW_POINT_SPREAD_C: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Day of the clock, starting at 1
    pub day: i64,
    pub hour: i64,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub metar: String,
    pub english: String,
}

/// Day (1-based) and hour of day for a universal time
pub fn day_and_hour(ut: f64) -> (i64, i64) {
    let days = (ut / DAY_LENGTH_S).floor();
    let hour = ((ut - days * DAY_LENGTH_S) / 3600.0).trunc();
    (days as i64 + 1, hour as i64)
}

/// Two-digit absolute value with an `M` prefix below zero
fn metar_temperature(celsius: f64) -> String {
    let magnitude = celsius.abs().round() as i64;
    if celsius < 0.0 {
        format!("M{magnitude:02}")
    } else {
        format!("{magnitude:02}")
    }
}

impl WeatherReport {
    pub fn new(ident: &str, ut: f64, pressure_hpa: f64, temperature_c: f64) -> Self {
        let (day, hour) = day_and_hour(ut);
        let dew_point_c = temperature_c - DEW_POINT_SPREAD_C;
        let pressure = pressure_hpa.round() as i64;

        let metar = format!(
            "{ident} {day:02}{hour:02}00Z 00000MPS 9999 CLR {}/{} Q{pressure:04} RMK AO1",
            metar_temperature(temperature_c),
            metar_temperature(dew_point_c),
        );
        let english = format!(
            "{ident} Automated Weather {hour:02}00 Zulu wind calm visibility greater than ten thousand meters \
             sky conditions clear temperature {} celcius dew point {} altimeter {pressure:04}",
            temperature_c.round() as i64,
            dew_point_c.round() as i64,
        );

        Self {
            day,
            hour,
            temperature_c,
            pressure_hpa,
            metar,
            english,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherStation {
    station: Station,
    pub broadcast_enabled: bool,
    handle: Option<StationHandle>,
    /// Last state pushed to the master
    published: Option<Station>,
    report: Option<WeatherReport>,
}

impl Default for WeatherStation {
    fn default() -> Self {
        Self {
            station: Station::new(StationKind::comm())
                .with_identity(DEFAULT_IDENT)
                .with_channel(DEFAULT_CHANNEL),
            broadcast_enabled: true,
            handle: None,
            published: None,
            report: None,
        }
    }
}

impl WeatherStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Channel and call-sign editing; changes go out with the next broadcast
    pub fn station_mut(&mut self) -> &mut Station {
        &mut self.station
    }

    pub fn handle(&self) -> Option<StationHandle> {
        self.handle
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn metar(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.metar.as_str())
    }

    pub fn english(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.english.as_str())
    }

    /// Feed a weather sample. A new report is cut only when the hour of
    /// day has changed since the last one; returns true when it was.
    pub fn observe(&mut self, ut: f64, pressure_hpa: f64, temperature_c: f64) -> bool {
        let (day, hour) = day_and_hour(ut);
        if self.report.as_ref().is_some_and(|r| r.day == day && r.hour == hour) {
            return false;
        }
        let report = WeatherReport::new(self.station.identity.as_str(), ut, pressure_hpa, temperature_c);
        debug!("New METAR: {}", report.metar);
        self.report = Some(report);
        true
    }

    pub fn register(&mut self, master: &mut NavMaster) -> StationHandle {
        if let Some(handle) = self.handle {
            return handle;
        }
        let handle = master.register_station(self.station.clone());
        self.handle = Some(handle);
        self.published = Some(self.station.clone());
        handle
    }

    /// Refresh transmitter power, site and message, then push the station
    /// to `master` if anything changed. `powered` is whether the host can
    /// supply the transmitter. Returns true when an update was pushed.
    pub fn broadcast(&mut self, master: &mut NavMaster, site: &GeoPosition, powered: bool) -> Result<bool> {
        let handle = self.register(master);

        self.station.transmit_power_w = if self.broadcast_enabled && powered {
            BROADCAST_POWER_W
        } else {
            0.0
        };
        if let Some(body) = site.body() {
            self.station.position.update(
                body,
                site.latitude_deg(),
                site.longitude_deg(),
                site.elevation_m(),
            );
        }
        if self.station.is_on() {
            if let Some(report) = &self.report {
                self.station.set_message(&report.english);
            }
        }

        if self.published.as_ref() == Some(&self.station) {
            return Ok(false);
        }
        master.update_station(handle, self.station.clone())?;
        self.published = Some(self.station.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navaid_core::{CelestialBody, Receiver};

    fn kerbin_at(lat: f64, lon: f64, elev: f64) -> GeoPosition {
        GeoPosition::at(CelestialBody::kerbin(), lat, lon, elev)
    }

    #[test]
    fn test_default_station() {
        let asos = WeatherStation::new();
        assert_eq!(asos.station().identity.as_str(), "XKSP");
        assert!((asos.station().frequency() - 121.425).abs() < 1e-9);
        assert!(asos.metar().is_none());
    }

    #[test]
    fn test_day_and_hour() {
        assert_eq!(day_and_hour(0.0), (1, 0));
        assert_eq!(day_and_hour(3599.0), (1, 0));
        assert_eq!(day_and_hour(2.0 * DAY_LENGTH_S + 5.0 * 3600.0 + 100.0), (3, 5));
    }

    #[test]
    fn test_report_text() {
        let report = WeatherReport::new("XKSP", 0.0, 1013.25, 15.4);
        assert_eq!(report.metar, "XKSP 010000Z 00000MPS 9999 CLR 15/10 Q1013 RMK AO1");
        assert_eq!(
            report.english,
            "XKSP Automated Weather 0000 Zulu wind calm visibility greater than ten thousand meters \
             sky conditions clear temperature 15 celcius dew point 10 altimeter 1013"
        );
    }

    #[test]
    fn test_negative_dew_point() {
        let ut = 2.0 * DAY_LENGTH_S + 5.0 * 3600.0;
        let report = WeatherReport::new("XKSP", ut, 998.0, 2.0);
        assert_eq!(report.metar, "XKSP 030500Z 00000MPS 9999 CLR 02/M03 Q0998 RMK AO1");
        assert!(report.english.ends_with("temperature 2 celcius dew point -3 altimeter 0998"));

        let cold = WeatherReport::new("XKSP", 0.0, 1000.0, -12.0);
        assert!(cold.metar.contains("CLR M12/M17 "));
    }

    #[test]
    fn test_report_held_for_the_hour() {
        let mut asos = WeatherStation::new();
        assert!(asos.observe(100.0, 1013.0, 15.0));
        assert!(!asos.observe(3000.0, 990.0, 30.0));
        assert!(asos.metar().unwrap_or_default().contains("15/10"));
        assert!(asos.observe(3700.0, 990.0, 30.0));
        assert!(asos.metar().unwrap_or_default().starts_with("XKSP 010100Z"));
    }

    #[test]
    fn test_broadcast_publishes_message() {
        let mut master = NavMaster::default();
        let mut asos = WeatherStation::new();
        let site = kerbin_at(-0.1, -74.6, 70.0);
        asos.observe(0.0, 1013.0, 15.0);

        assert!(asos.broadcast(&mut master, &site, true).unwrap());
        let handle = asos.handle().unwrap();
        let published = master.station(handle).unwrap();
        assert_eq!(published.transmit_power_w, BROADCAST_POWER_W);
        assert_eq!(published.message(), asos.english());

        // Nothing changed, nothing pushed
        assert!(!asos.broadcast(&mut master, &site, true).unwrap());

        let rx = master.register_receiver(
            Receiver::comm(false)
                .with_channel(DEFAULT_CHANNEL)
                .with_position(kerbin_at(-0.1, -74.5, 1500.0)),
        );
        master.tick(0.0);
        assert_eq!(master.tuned_station(rx).unwrap(), Some(handle));
    }

    #[test]
    fn test_unpowered_broadcast_goes_silent() {
        let mut master = NavMaster::default();
        let mut asos = WeatherStation::new();
        let site = kerbin_at(0.0, 0.0, 0.0);
        asos.broadcast(&mut master, &site, true).unwrap();

        assert!(asos.broadcast(&mut master, &site, false).unwrap());
        let handle = asos.handle().unwrap();
        assert!(!master.station(handle).unwrap().is_on());

        asos.broadcast_enabled = false;
        assert!(!asos.broadcast(&mut master, &site, true).unwrap());
    }
}
