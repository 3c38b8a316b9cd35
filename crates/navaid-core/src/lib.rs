//! Navaid Core
//!
//! Signal model for ground radio-navigation aids (VOR, LOC, GLS, DME,
//! NDB, COMM) and the airborne receivers that tune them: body-centred
//! positions, call signs, per-type channel plans, inverse-square
//! propagation with a horizon test, and great-circle bearing geometry.

pub mod bearing;
pub mod channel;
pub mod geo;
pub mod identity;
pub mod persist;
pub mod propagation;
pub mod receiver;
pub mod station;

pub use bearing::{INVALID_BEARING, ZONE_OF_CONFUSION_DEG};
pub use channel::{ChannelCodec, ChannelPlan};
pub use geo::{CelestialBody, GeoPosition};
pub use identity::StationIdentity;
pub use persist::{ConfigNode, Persist};
pub use propagation::USABLE_FLUX_W_M2;
pub use receiver::{Receiver, ReceiverKind, ReceiverType};
pub use station::{Station, StationKind, StationType, VorPowerClass};
