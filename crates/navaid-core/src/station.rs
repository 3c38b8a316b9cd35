//! Ground transmitters
//!
//! A `Station` carries what every navaid shares (call sign, position,
//! power, channel) and a `StationKind` with the per-type parameters.

use serde::{Deserialize, Serialize};

use crate::bearing;
use crate::channel::{ChannelCodec, ChannelPlan};
use crate::geo::GeoPosition;
use crate::identity::StationIdentity;
use crate::persist::{self, ConfigNode, Persist};
use crate::propagation;

/// Station discriminant, used to filter tuned-station lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    Comm,
    Vor,
    Loc,
    Gls,
    Ndb,
    Dme,
}

impl StationType {
    pub fn plan(self) -> ChannelPlan {
        match self {
            StationType::Comm => ChannelPlan::Comm,
            StationType::Vor => ChannelPlan::Vor,
            StationType::Loc | StationType::Gls => ChannelPlan::Ils,
            StationType::Ndb => ChannelPlan::Ndb,
            StationType::Dme => ChannelPlan::Vhf,
        }
    }
}

impl std::fmt::Display for StationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StationType::Comm => "COMM",
            StationType::Vor => "VOR",
            StationType::Loc => "LOC",
            StationType::Gls => "GLS",
            StationType::Ndb => "NDB",
            StationType::Dme => "DME",
        };
        f.write_str(label)
    }
}

/// Type-specific station parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StationKind {
    Comm {
        close_spacing: bool,
        /// Broadcast text, e.g. an automated weather report
        message: String,
    },
    Vor {
        radial_offset_deg: f64,
        test_station: bool,
    },
    Loc {
        beam_bearing_deg: f64,
        beam_half_width_deg: f64,
    },
    Gls {
        glidepath_angle_deg: f64,
        beam_half_width_deg: f64,
    },
    Ndb,
    Dme,
}

impl StationKind {
    pub fn comm() -> Self {
        StationKind::Comm {
            close_spacing: false,
            message: String::new(),
        }
    }

    pub fn vor() -> Self {
        StationKind::Vor {
            radial_offset_deg: 0.0,
            test_station: false,
        }
    }

    pub fn loc() -> Self {
        StationKind::Loc {
            beam_bearing_deg: 0.0,
            beam_half_width_deg: 5.0,
        }
    }

    pub fn gls() -> Self {
        StationKind::Gls {
            glidepath_angle_deg: 3.0,
            beam_half_width_deg: 1.5,
        }
    }

    pub fn station_type(&self) -> StationType {
        match self {
            StationKind::Comm { .. } => StationType::Comm,
            StationKind::Vor { .. } => StationType::Vor,
            StationKind::Loc { .. } => StationType::Loc,
            StationKind::Gls { .. } => StationType::Gls,
            StationKind::Ndb => StationType::Ndb,
            StationKind::Dme => StationType::Dme,
        }
    }
}

/// VOR service volumes and their transmitter power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VorPowerClass {
    Low,
    Terminal,
    High,
}

impl VorPowerClass {
    pub fn transmit_power_w(self) -> f64 {
        match self {
            VorPowerClass::Low => 80.0,
            VorPowerClass::Terminal => 50.0,
            VorPowerClass::High => 260.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub identity: StationIdentity,
    pub position: GeoPosition,
    /// Watts, 0 = off
    pub transmit_power_w: f64,
    channel: i32,
    kind: StationKind,
}

impl Station {
    pub fn new(kind: StationKind) -> Self {
        Self {
            identity: StationIdentity::default(),
            position: GeoPosition::default(),
            transmit_power_w: 0.0,
            channel: 0,
            kind,
        }
    }

    pub fn with_identity(mut self, call_sign: &str) -> Self {
        self.identity = StationIdentity::parse(call_sign);
        self
    }

    pub fn with_channel(mut self, channel: i32) -> Self {
        self.set_channel(channel);
        self
    }

    pub fn with_power(mut self, transmit_power_w: f64) -> Self {
        self.transmit_power_w = transmit_power_w;
        self
    }

    pub fn with_position(mut self, position: GeoPosition) -> Self {
        self.position = position;
        self
    }

    pub fn kind(&self) -> &StationKind {
        &self.kind
    }

    /// Switch type; the channel is folded into the new plan
    pub fn set_kind(&mut self, kind: StationKind) {
        self.kind = kind;
        self.set_channel(self.channel);
    }

    pub fn with_kind(mut self, kind: StationKind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Replace a COMM station's broadcast text. Returns false for other
    /// station types or when the text is unchanged.
    pub fn set_message(&mut self, text: &str) -> bool {
        match &mut self.kind {
            StationKind::Comm { message, .. } if message.as_str() != text => {
                text.clone_into(message);
                true
            }
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.kind {
            StationKind::Comm { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn station_type(&self) -> StationType {
        self.kind.station_type()
    }

    pub fn codec(&self) -> &'static ChannelCodec {
        self.station_type().plan().codec()
    }

    pub fn is_on(&self) -> bool {
        self.transmit_power_w > 0.0
    }

    // ========================================================================
    // Channel
    // ========================================================================

    pub fn channel(&self) -> i32 {
        self.channel
    }

    /// Out-of-range values wrap into the plan
    pub fn set_channel(&mut self, channel: i32) {
        self.channel = self.codec().normalize(channel);
    }

    pub fn frequency(&self) -> f64 {
        self.codec().frequency(self.channel)
    }

    fn close_spacing(&self) -> bool {
        match self.kind {
            StationKind::Comm { close_spacing, .. } => close_spacing,
            _ => true,
        }
    }

    pub fn increment_channel(&mut self) {
        self.channel = self.codec().increment(self.channel, self.close_spacing());
    }

    pub fn decrement_channel(&mut self) {
        self.channel = self.codec().decrement(self.channel, self.close_spacing());
    }

    pub fn increment_channel_large(&mut self) {
        self.channel = self.codec().increment_large(self.channel);
    }

    pub fn decrement_channel_large(&mut self) {
        self.channel = self.codec().decrement_large(self.channel);
    }

    // ========================================================================
    // Signal and geometry at a receiver
    // ========================================================================

    pub fn flux(&self, receiver: &GeoPosition) -> f64 {
        propagation::flux(&self.position, self.transmit_power_w, receiver)
    }

    pub fn line_of_sight(&self, receiver: &GeoPosition) -> bool {
        propagation::line_of_sight(&self.position, receiver)
    }

    /// Usable flux and an unobstructed path
    pub fn is_receivable(&self, receiver: &GeoPosition) -> bool {
        propagation::is_usable(self.flux(receiver)) && self.line_of_sight(receiver)
    }

    pub fn distance(&self, receiver: &GeoPosition) -> Option<f64> {
        propagation::slant_distance(&self.position, receiver)
    }

    pub fn bearing_from(&self, receiver: &GeoPosition) -> f64 {
        bearing::bearing_from(&self.position, receiver)
    }

    pub fn bearing_to(&self, receiver: &GeoPosition) -> f64 {
        bearing::bearing_to(&self.position, receiver)
    }

    /// VOR radial including the station's offset; other types report the
    /// plain bearing from the station
    pub fn radial(&self, receiver: &GeoPosition) -> f64 {
        match self.kind {
            StationKind::Vor {
                radial_offset_deg,
                test_station,
            } => bearing::vor_radial(&self.position, receiver, radial_offset_deg, test_station),
            _ => self.bearing_from(receiver),
        }
    }

    pub fn in_zone_of_confusion(&self, receiver: &GeoPosition) -> bool {
        bearing::in_zone_of_confusion(&self.position, receiver)
    }

    /// Localizer needle; 0 for any other station type
    pub fn localizer_offset(&self, receiver: &GeoPosition) -> f64 {
        match self.kind {
            StationKind::Loc {
                beam_bearing_deg,
                beam_half_width_deg,
            } => bearing::localizer_deviation(&self.position, receiver, beam_bearing_deg, beam_half_width_deg),
            _ => 0.0,
        }
    }

    /// Glideslope needle; 0 for any other station type
    pub fn glideslope_offset(&self, receiver: &GeoPosition) -> f64 {
        match self.kind {
            StationKind::Gls {
                glidepath_angle_deg,
                beam_half_width_deg,
            } => bearing::glideslope_deviation(&self.position, receiver, glidepath_angle_deg, beam_half_width_deg),
            _ => 0.0,
        }
    }
}

impl Persist for Station {
    fn save(&self, node: &mut ConfigNode) {
        node.set(persist::KEY_CHANNEL, self.channel);
        node.set(persist::KEY_TRANSMIT_POWER, self.transmit_power_w);
        let letters = self.identity.letters();
        node.set(persist::KEY_ID_LENGTH, letters.len());
        for (i, letter) in letters.iter().enumerate() {
            node.set(persist::id_key(i), letter);
        }

        match &self.kind {
            StationKind::Comm { close_spacing, message } => {
                node.set_bool(persist::KEY_CLOSE_SPACING, *close_spacing);
                node.set(persist::KEY_MESSAGE_LENGTH, message.chars().count());
                for (i, c) in message.chars().enumerate() {
                    node.set(persist::message_key(i), c);
                }
            }
            StationKind::Vor {
                radial_offset_deg,
                test_station,
            } => {
                node.set(persist::KEY_RADIAL_OFFSET, radial_offset_deg);
                node.set_bool(persist::KEY_TEST_STATION, *test_station);
            }
            StationKind::Loc {
                beam_bearing_deg,
                beam_half_width_deg,
            } => {
                node.set(persist::KEY_BEAM_BEARING, beam_bearing_deg);
                node.set(persist::KEY_BEAM_HALF_WIDTH, beam_half_width_deg);
            }
            StationKind::Gls {
                glidepath_angle_deg,
                beam_half_width_deg,
            } => {
                node.set(persist::KEY_GLIDEPATH_ANGLE, glidepath_angle_deg);
                node.set(persist::KEY_BEAM_HALF_WIDTH, beam_half_width_deg);
            }
            StationKind::Ndb | StationKind::Dme => {}
        }
    }

    fn load(&mut self, node: &ConfigNode) {
        let mut channel = self.channel;
        node.load_into(persist::KEY_CHANNEL, &mut channel);
        self.set_channel(channel);
        node.load_into(persist::KEY_TRANSMIT_POWER, &mut self.transmit_power_w);

        if let Some(id_len) = node.indexed_len(persist::KEY_ID_LENGTH, persist::id_key).filter(|&n| n > 0) {
            let letters = (0..id_len)
                .map(|i| node.parse::<u8>(&persist::id_key(i)).unwrap_or(0))
                .collect();
            self.identity = StationIdentity::from_letters(letters);
        }

        match &mut self.kind {
            StationKind::Comm { close_spacing, message } => {
                node.load_bool_into(persist::KEY_CLOSE_SPACING, close_spacing);
                if let Some(len) = node.indexed_len(persist::KEY_MESSAGE_LENGTH, persist::message_key) {
                    *message = (0..len)
                        .filter_map(|i| node.get(&persist::message_key(i))?.chars().next())
                        .collect();
                }
            }
            StationKind::Vor {
                radial_offset_deg,
                test_station,
            } => {
                node.load_into(persist::KEY_RADIAL_OFFSET, radial_offset_deg);
                node.load_bool_into(persist::KEY_TEST_STATION, test_station);
            }
            StationKind::Loc {
                beam_bearing_deg,
                beam_half_width_deg,
            } => {
                node.load_into(persist::KEY_BEAM_BEARING, beam_bearing_deg);
                node.load_into(persist::KEY_BEAM_HALF_WIDTH, beam_half_width_deg);
            }
            StationKind::Gls {
                glidepath_angle_deg,
                beam_half_width_deg,
            } => {
                node.load_into(persist::KEY_GLIDEPATH_ANGLE, glidepath_angle_deg);
                node.load_into(persist::KEY_BEAM_HALF_WIDTH, beam_half_width_deg);
            }
            StationKind::Ndb | StationKind::Dme => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CelestialBody;

    #[test]
    fn test_defaults() {
        let loc = Station::new(StationKind::loc());
        assert_eq!(
            *loc.kind(),
            StationKind::Loc {
                beam_bearing_deg: 0.0,
                beam_half_width_deg: 5.0
            }
        );
        assert!(!loc.is_on());
        assert_eq!(loc.identity.as_str(), "");
        assert!((loc.frequency() - 108.1).abs() < 1e-9);
    }

    #[test]
    fn test_comm_step_follows_spacing() {
        let mut comm = Station::new(StationKind::comm());
        comm.increment_channel();
        assert_eq!(comm.channel(), 3);
        comm.set_kind(StationKind::Comm {
            close_spacing: true,
            message: String::new(),
        });
        comm.increment_channel();
        assert_eq!(comm.channel(), 4);
        comm.decrement_channel_large();
        assert_eq!(comm.channel(), 2164);
    }

    #[test]
    fn test_dme_uses_vhf_plan() {
        let dme = Station::new(StationKind::Dme).with_channel(40);
        assert!((dme.frequency() - 110.0).abs() < 1e-9);
        assert_eq!(dme.station_type().plan(), ChannelPlan::Vhf);
    }

    #[test]
    fn test_set_channel_wraps() {
        let ndb = Station::new(StationKind::Ndb).with_channel(1561);
        assert_eq!(ndb.channel(), 1);
        let vor = Station::new(StationKind::vor()).with_channel(-1);
        assert_eq!(vor.channel(), 159);
    }

    #[test]
    fn test_power_classes() {
        assert_eq!(VorPowerClass::Low.transmit_power_w(), 80.0);
        assert_eq!(VorPowerClass::Terminal.transmit_power_w(), 50.0);
        assert_eq!(VorPowerClass::High.transmit_power_w(), 260.0);
    }

    #[test]
    fn test_type_specific_offsets() {
        let kerbin = CelestialBody::kerbin();
        let receiver = GeoPosition::at(kerbin.clone(), 0.0, 0.0, 1000.0);
        let gls = Station::new(StationKind::gls()).with_position(GeoPosition::at(kerbin, 0.0, 0.0, 0.0));
        assert!((gls.glideslope_offset(&receiver) - 58.0).abs() < 1e-6);
        assert_eq!(gls.localizer_offset(&receiver), 0.0);
    }

    #[test]
    fn test_vor_save_load() {
        let station = Station::new(StationKind::vor())
            .with_identity("KSC")
            .with_channel(57)
            .with_power(80.0)
            .with_kind(StationKind::Vor {
                radial_offset_deg: -3.5,
                test_station: true,
            });

        let mut node = ConfigNode::new();
        station.save(&mut node);
        assert_eq!(node.get("ID Length"), Some("3"));
        assert_eq!(node.get("ID0"), Some("10"));
        assert_eq!(node.get("Test Station"), Some("True"));

        let mut restored = Station::new(StationKind::vor());
        restored.load(&node);
        assert_eq!(restored.channel(), 57);
        assert_eq!(restored.transmit_power_w, 80.0);
        assert_eq!(restored.identity.as_str(), "KSC");
        assert_eq!(restored.kind(), station.kind());
    }

    #[test]
    fn test_comm_message_persists() {
        let station = Station::new(StationKind::Comm {
            close_spacing: true,
            message: "XKSP 0112".to_string(),
        });
        let mut node = ConfigNode::new();
        station.save(&mut node);
        assert_eq!(node.get("Message Length"), Some("9"));
        assert_eq!(node.get("Message Data 4"), Some(" "));

        let mut restored = Station::new(StationKind::comm());
        restored.load(&node);
        assert_eq!(restored.kind(), station.kind());
    }

    #[test]
    fn test_load_missing_keys_keeps_fields() {
        let mut station = Station::new(StationKind::gls())
            .with_identity("IKS")
            .with_channel(5)
            .with_power(20.0);
        let mut node = ConfigNode::new();
        node.set("Channel", "not a number");
        node.set("Glidepath Angle", 3.5);
        station.load(&node);
        assert_eq!(station.channel(), 5);
        assert_eq!(station.transmit_power_w, 20.0);
        assert_eq!(station.identity.as_str(), "IKS");
        assert_eq!(
            *station.kind(),
            StationKind::Gls {
                glidepath_angle_deg: 3.5,
                beam_half_width_deg: 1.5
            }
        );
    }

    #[test]
    fn test_kind_switch_refolds_channel() {
        let mut station = Station::new(StationKind::Ndb).with_channel(1000);
        assert_eq!(station.channel(), 1000);
        station.set_kind(StationKind::vor());
        assert_eq!(station.channel(), 40);
        assert_eq!(station.station_type(), StationType::Vor);
        assert!((108.0..=117.95).contains(&station.frequency()));

        let dme = Station::new(StationKind::Dme).with_channel(199).with_kind(StationKind::loc());
        assert_eq!(dme.channel(), 39);
    }

    #[test]
    fn test_set_message_only_on_comm() {
        let mut comm = Station::new(StationKind::comm());
        assert!(comm.set_message("XKSP INFO A"));
        assert!(!comm.set_message("XKSP INFO A"));
        assert_eq!(comm.message(), Some("XKSP INFO A"));

        let mut ndb = Station::new(StationKind::Ndb);
        assert!(!ndb.set_message("ignored"));
        assert_eq!(ndb.message(), None);
    }

    #[test]
    fn test_load_oversized_lengths() {
        let mut node = ConfigNode::new();
        node.set("ID Length", usize::MAX);
        node.set("ID0", 10);
        node.set("ID1", 18);
        node.set("ID2", 2);
        node.set("Message Length", usize::MAX);
        node.set("Message Data 0", "O");
        node.set("Message Data 1", "K");

        let mut station = Station::new(StationKind::comm());
        station.load(&node);
        assert_eq!(station.identity.as_str(), "KSC");
        assert_eq!(station.message(), Some("OK"));
    }

    #[test]
    fn test_load_shorter_length_than_keys() {
        let mut node = ConfigNode::new();
        node.set("ID Length", 2);
        for (i, letter) in [10, 18, 2].into_iter().enumerate() {
            node.set(persist::id_key(i), letter);
        }
        let mut station = Station::new(StationKind::Ndb);
        station.load(&node);
        assert_eq!(station.identity.as_str(), "KS");
    }

    #[test]
    fn test_load_non_numeric_values() {
        let mut station = Station::new(StationKind::vor())
            .with_identity("KSC")
            .with_channel(12)
            .with_power(50.0);
        let mut node = ConfigNode::new();
        node.set("Transmit Power", "lots");
        node.set("ID Length", "three");
        node.set("Radial Offset", "east");
        node.set("Test Station", "maybe");
        station.load(&node);
        assert_eq!(station.transmit_power_w, 50.0);
        assert_eq!(station.identity.as_str(), "KSC");
        assert_eq!(*station.kind(), StationKind::vor());

        // Unparsable letters read as 'A'
        let mut node = ConfigNode::new();
        node.set("ID Length", 2);
        node.set("ID0", "x");
        node.set("ID1", 1);
        station.load(&node);
        assert_eq!(station.identity.as_str(), "AB");
    }

    #[test]
    fn test_load_out_of_range_channel_wraps() {
        let mut node = ConfigNode::new();
        node.set("Channel", 1000);
        let mut vor = Station::new(StationKind::vor());
        vor.load(&node);
        assert_eq!(vor.channel(), 40);

        node.set("Channel", -1);
        let mut ndb = Station::new(StationKind::Ndb);
        ndb.load(&node);
        assert_eq!(ndb.channel(), 1559);
    }

    #[test]
    fn test_json_snapshot() {
        let station = Station::new(StationKind::Comm {
            close_spacing: true,
            message: "XKSP 0112".to_string(),
        })
        .with_identity("XKSP")
        .with_channel(411)
        .with_power(10.0);

        let json = serde_json::to_string(&station).unwrap();
        let restored: Station = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, station);
        assert_eq!(restored.channel(), 411);
        assert_eq!(restored.message(), Some("XKSP 0112"));
    }
}
