//! Channel plans
//!
//! Every navaid and receiver family maps an integer channel onto a
//! broadcast frequency. Each plan is a static table of plain function
//! pointers; `ChannelPlan::codec` selects the table for a family.
//!
//! All transitions are modulo the plan's channel count, so a stepped
//! channel is always valid. Large steps are plan specific; the VOR plan
//! reinterleaves its 108 MHz, 112 MHz and 117 MHz sub-bands.

use serde::{Deserialize, Serialize};

/// Frequency families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelPlan {
    /// 8.33 kHz airband voice, 118.000 - 136.992 MHz
    Comm,
    /// 108.00 - 117.95 MHz omni-range channels
    Vor,
    /// Paired localizer / glideslope channels
    Ils,
    /// 190 - 1749 kHz beacons (shown as kHz)
    Ndb,
    /// 108.00 - 117.95 MHz navigation receiver, every 50 kHz
    Vhf,
}

/// Per-plan function set
#[derive(Debug)]
pub struct ChannelCodec {
    pub name: &'static str,
    pub channel_count: i32,
    /// Unit step with close spacing, and without
    pub fine_step: i32,
    pub coarse_step: i32,
    pub large_step: i32,
    frequency: fn(i32) -> f64,
    increment_large: fn(&ChannelCodec, i32) -> i32,
    decrement_large: fn(&ChannelCodec, i32) -> i32,
}

pub static COMM_CODEC: ChannelCodec = ChannelCodec {
    name: "COMM",
    channel_count: 2280,
    fine_step: 1,
    coarse_step: 3,
    large_step: 120,
    frequency: comm_frequency,
    increment_large: linear_increment_large,
    decrement_large: linear_decrement_large,
};

pub static VOR_CODEC: ChannelCodec = ChannelCodec {
    name: "VOR",
    channel_count: 160,
    fine_step: 1,
    coarse_step: 1,
    large_step: 20,
    frequency: vor_frequency,
    increment_large: vor_increment_large,
    decrement_large: vor_decrement_large,
};

pub static ILS_CODEC: ChannelCodec = ChannelCodec {
    name: "ILS",
    channel_count: 40,
    fine_step: 1,
    coarse_step: 1,
    large_step: 10,
    frequency: ils_frequency,
    increment_large: linear_increment_large,
    decrement_large: linear_decrement_large,
};

pub static NDB_CODEC: ChannelCodec = ChannelCodec {
    name: "NDB",
    channel_count: 1560,
    fine_step: 1,
    coarse_step: 1,
    large_step: 100,
    frequency: ndb_frequency,
    increment_large: linear_increment_large,
    decrement_large: linear_decrement_large,
};

pub static VHF_CODEC: ChannelCodec = ChannelCodec {
    name: "VHF",
    channel_count: 200,
    fine_step: 1,
    coarse_step: 1,
    large_step: 20,
    frequency: vhf_frequency,
    increment_large: linear_increment_large,
    decrement_large: linear_decrement_large,
};

impl ChannelPlan {
    pub const ALL: [ChannelPlan; 5] = [
        ChannelPlan::Comm,
        ChannelPlan::Vor,
        ChannelPlan::Ils,
        ChannelPlan::Ndb,
        ChannelPlan::Vhf,
    ];

    pub fn codec(self) -> &'static ChannelCodec {
        match self {
            ChannelPlan::Comm => &COMM_CODEC,
            ChannelPlan::Vor => &VOR_CODEC,
            ChannelPlan::Ils => &ILS_CODEC,
            ChannelPlan::Ndb => &NDB_CODEC,
            ChannelPlan::Vhf => &VHF_CODEC,
        }
    }
}

impl ChannelCodec {
    /// Broadcast frequency of `channel` (MHz, kHz for NDB)
    pub fn frequency(&self, channel: i32) -> f64 {
        (self.frequency)(channel)
    }

    /// Fold any integer into `0..channel_count`
    pub fn normalize(&self, channel: i32) -> i32 {
        channel.rem_euclid(self.channel_count)
    }

    pub fn step(&self, close_spacing: bool) -> i32 {
        if close_spacing {
            self.fine_step
        } else {
            self.coarse_step
        }
    }

    pub fn increment(&self, channel: i32, close_spacing: bool) -> i32 {
        self.normalize(channel + self.step(close_spacing))
    }

    pub fn decrement(&self, channel: i32, close_spacing: bool) -> i32 {
        self.normalize(channel - self.step(close_spacing))
    }

    pub fn increment_large(&self, channel: i32) -> i32 {
        (self.increment_large)(self, self.normalize(channel))
    }

    pub fn decrement_large(&self, channel: i32) -> i32 {
        (self.decrement_large)(self, self.normalize(channel))
    }
}

// ============================================================================
// Frequency tables
// ============================================================================

fn comm_frequency(channel: i32) -> f64 {
    118.0 + f64::from(channel) * 0.025 / 3.0
}

fn vor_frequency(channel: i32) -> f64 {
    if channel <= 39 {
        108.0 + f64::from(channel & 1) * 0.05 + f64::from(channel / 2) * 0.2
    } else {
        112.0 + f64::from(channel - 40) * 0.05
    }
}

fn ils_frequency(channel: i32) -> f64 {
    108.1 + f64::from(channel & 1) * 0.05 + f64::from(channel / 2) * 0.2
}

fn ndb_frequency(channel: i32) -> f64 {
    190.0 + f64::from(channel)
}

fn vhf_frequency(channel: i32) -> f64 {
    108.0 + f64::from(channel) * 0.05
}

/// VHF channels below 112 MHz whose 100 kHz digit is odd are ILS
pub fn is_ils_channel(vhf_channel: i32) -> bool {
    vhf_channel < 80 && (vhf_channel / 2) & 1 == 1
}

// ============================================================================
// Large steps
// ============================================================================

fn linear_increment_large(codec: &ChannelCodec, channel: i32) -> i32 {
    codec.normalize(channel + codec.large_step)
}

fn linear_decrement_large(codec: &ChannelCodec, channel: i32) -> i32 {
    codec.normalize(channel - codec.large_step)
}

/// Position of `channel` within a 108.x block of ten channels, expanded
/// onto the 50 kHz grid above 112 MHz. 108.x0/108.x5 land on 11y.x0/11y.x5.
fn spread_low_band(offset: i32) -> i32 {
    (offset - (offset & 1)) * 2 + (offset & 1)
}

/// Inverse of `spread_low_band`: 11y.x0/11y.x5 back onto the 108 MHz block
fn compress_high_band(offset: i32) -> i32 {
    (offset / 4) * 2 + (offset & 1)
}

/// +1 MHz. The 108 MHz band skips ILS frequencies so it advances ten
/// channels per MHz, the 112 MHz band advances twenty.
///
/// ```text
///   0 (108.00) ->  10 (109.00)     30 (111.00) ->  40 (112.00)
///  31 (111.05) ->  41 (112.05)     32 (111.20) ->  44 (112.20)
///  40 (112.00) ->  60 (113.00)    140 (117.00) ->   0 (108.00)
/// 142 (117.10) ->   0 (108.00)    144 (117.20) ->   2 (108.20)
/// ```
fn vor_increment_large(_: &ChannelCodec, channel: i32) -> i32 {
    match channel {
        0..=30 => channel + 10,
        31..=39 => 40 + spread_low_band(channel - 30),
        40..=139 => channel + 20,
        _ => compress_high_band(channel - 140),
    }
}

/// -1 MHz, the mirror of `vor_increment_large`
///
/// ```text
///  10 (109.00) ->   0 (108.00)     40 (112.00) ->  30 (111.00)
///  41 (112.05) ->  31 (111.05)     44 (112.20) ->  32 (111.20)
///  60 (113.00) ->  40 (112.00)      0 (108.00) -> 140 (117.00)
///   1 (108.05) -> 141 (117.05)      2 (108.20) -> 144 (117.20)
/// ```
fn vor_decrement_large(_: &ChannelCodec, channel: i32) -> i32 {
    match channel {
        0..=9 => 140 + spread_low_band(channel),
        10..=41 => channel - 10,
        42..=59 => 30 + compress_high_band(channel - 40),
        _ => channel - 20,
    }
}
