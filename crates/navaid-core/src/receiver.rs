//! Airborne receivers with an active and a standby channel

use serde::{Deserialize, Serialize};

use crate::channel::{self, ChannelCodec, ChannelPlan};
use crate::geo::GeoPosition;
use crate::persist::{self, ConfigNode, Persist};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiverType {
    /// VHF navigation (VOR, ILS, DME)
    Vhf,
    /// Medium-frequency beacon receiver
    Mf,
    Comm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiverKind {
    Vhf,
    Mf,
    Comm { close_spacing: bool },
}

impl ReceiverKind {
    pub fn receiver_type(self) -> ReceiverType {
        match self {
            ReceiverKind::Vhf => ReceiverType::Vhf,
            ReceiverKind::Mf => ReceiverType::Mf,
            ReceiverKind::Comm { .. } => ReceiverType::Comm,
        }
    }

    pub fn plan(self) -> ChannelPlan {
        match self {
            ReceiverKind::Vhf => ChannelPlan::Vhf,
            ReceiverKind::Mf => ChannelPlan::Ndb,
            ReceiverKind::Comm { .. } => ChannelPlan::Comm,
        }
    }

    fn close_spacing(self) -> bool {
        match self {
            ReceiverKind::Comm { close_spacing } => close_spacing,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub position: GeoPosition,
    /// Radio switched on and supplied; an unpowered receiver hears nothing
    pub power_on: bool,
    channel: i32,
    standby_channel: i32,
    kind: ReceiverKind,
}

impl Receiver {
    pub fn new(kind: ReceiverKind) -> Self {
        Self {
            position: GeoPosition::default(),
            power_on: true,
            channel: 0,
            standby_channel: 0,
            kind,
        }
    }

    pub fn vhf() -> Self {
        Self::new(ReceiverKind::Vhf)
    }

    pub fn mf() -> Self {
        Self::new(ReceiverKind::Mf)
    }

    pub fn comm(close_spacing: bool) -> Self {
        Self::new(ReceiverKind::Comm { close_spacing })
    }

    pub fn with_channel(mut self, channel: i32) -> Self {
        self.set_channel(channel);
        self
    }

    pub fn with_position(mut self, position: GeoPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_power(mut self, power_on: bool) -> Self {
        self.power_on = power_on;
        self
    }

    pub fn is_on(&self) -> bool {
        self.power_on
    }

    pub fn kind(&self) -> ReceiverKind {
        self.kind
    }

    /// Switch radio family; both channels are folded into the new plan
    pub fn set_kind(&mut self, kind: ReceiverKind) {
        self.kind = kind;
        self.set_channel(self.channel);
        self.set_standby_channel(self.standby_channel);
    }

    pub fn receiver_type(&self) -> ReceiverType {
        self.kind.receiver_type()
    }

    pub fn codec(&self) -> &'static ChannelCodec {
        self.kind.plan().codec()
    }

    pub fn channel(&self) -> i32 {
        self.channel
    }

    pub fn standby_channel(&self) -> i32 {
        self.standby_channel
    }

    pub fn set_channel(&mut self, channel: i32) {
        self.channel = self.codec().normalize(channel);
    }

    pub fn set_standby_channel(&mut self, channel: i32) {
        self.standby_channel = self.codec().normalize(channel);
    }

    pub fn frequency(&self) -> f64 {
        self.codec().frequency(self.channel)
    }

    pub fn standby_frequency(&self) -> f64 {
        self.codec().frequency(self.standby_channel)
    }

    /// Exchange active and standby
    pub fn swap_channels(&mut self) {
        std::mem::swap(&mut self.channel, &mut self.standby_channel);
    }

    pub fn is_active_ils(&self) -> bool {
        self.kind == ReceiverKind::Vhf && channel::is_ils_channel(self.channel)
    }

    pub fn is_standby_ils(&self) -> bool {
        self.kind == ReceiverKind::Vhf && channel::is_ils_channel(self.standby_channel)
    }

    pub fn increment_channel(&mut self) {
        self.channel = self.codec().increment(self.channel, self.kind.close_spacing());
    }

    pub fn decrement_channel(&mut self) {
        self.channel = self.codec().decrement(self.channel, self.kind.close_spacing());
    }

    pub fn increment_channel_large(&mut self) {
        self.channel = self.codec().increment_large(self.channel);
    }

    pub fn decrement_channel_large(&mut self) {
        self.channel = self.codec().decrement_large(self.channel);
    }

    pub fn increment_standby_channel(&mut self) {
        self.standby_channel = self.codec().increment(self.standby_channel, self.kind.close_spacing());
    }

    pub fn decrement_standby_channel(&mut self) {
        self.standby_channel = self.codec().decrement(self.standby_channel, self.kind.close_spacing());
    }

    pub fn increment_standby_channel_large(&mut self) {
        self.standby_channel = self.codec().increment_large(self.standby_channel);
    }

    pub fn decrement_standby_channel_large(&mut self) {
        self.standby_channel = self.codec().decrement_large(self.standby_channel);
    }
}

impl Persist for Receiver {
    fn save(&self, node: &mut ConfigNode) {
        node.set(persist::KEY_CHANNEL, self.channel);
        node.set(persist::KEY_STANDBY_CHANNEL, self.standby_channel);
        node.set_bool(persist::KEY_POWER, self.power_on);
        if let ReceiverKind::Comm { close_spacing } = self.kind {
            node.set_bool(persist::KEY_CLOSE_SPACING, close_spacing);
        }
    }

    fn load(&mut self, node: &ConfigNode) {
        let (mut channel, mut standby) = (self.channel, self.standby_channel);
        node.load_into(persist::KEY_CHANNEL, &mut channel);
        node.load_into(persist::KEY_STANDBY_CHANNEL, &mut standby);
        node.load_bool_into(persist::KEY_POWER, &mut self.power_on);
        if let ReceiverKind::Comm { close_spacing } = &mut self.kind {
            node.load_bool_into(persist::KEY_CLOSE_SPACING, close_spacing);
        }
        self.set_channel(channel);
        self.set_standby_channel(standby);
    }
}
