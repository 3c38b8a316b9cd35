//! Nav Instruments
//!
//! Cockpit indicator math on top of the navigation master: VOR course
//! deviation with TO/FROM, localizer and glideslope needles, the DME
//! readout, and the automated weather station that broadcasts on COMM.

pub mod asos;
pub mod dme;
pub mod ils;
pub mod panel;
pub mod vor;

pub use asos::{WeatherReport, WeatherStation};
pub use dme::{DistanceUnits, DmeIndicator, DmeMode};
pub use ils::{glideslope_reading, localizer_reading, NeedleReading};
pub use panel::{NavPanel, PanelReadout};
pub use vor::{course_deviation, ToFrom, VorIndicator, VorReading};
