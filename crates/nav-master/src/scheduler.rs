//! Tuning scheduler
//!
//! Rebuilding a receiver's candidate list costs one flux evaluation per
//! registered station. Each tick rebuilds at most one receiver whose list
//! is older than the rescan interval. An overdue or never-scanned receiver
//! goes first, then one flagged for rescan, then the oldest list.

use std::cmp::Ordering;

use navaid_core::{Receiver, StationType};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::NavConfig;
use crate::registry::{ReceiverHandle, ReceiverRegistry, ReceiverSlot, StationHandle, StationRegistry};

/// Per-receiver scan state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    /// Receiver changed or its list went stale
    NeedsRescan,
    /// Candidate list is current
    Idle,
}

/// One station as heard by a receiver at scan time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub station: StationHandle,
    pub frequency_mhz: f64,
    pub flux_w_m2: f64,
}

/// Ascending frequency, then descending flux, then registration order
pub fn candidate_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.frequency_mhz
        .total_cmp(&b.frequency_mhz)
        .then_with(|| b.flux_w_m2.total_cmp(&a.flux_w_m2))
        .then_with(|| a.station.cmp(&b.station))
}

/// Every registered station as heard from `receiver`, sorted
pub fn build_candidates(receiver: &Receiver, stations: &StationRegistry) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = stations
        .iter()
        .map(|(handle, station)| Candidate {
            station: handle,
            frequency_mhz: station.frequency(),
            flux_w_m2: station.flux(&receiver.position),
        })
        .collect();
    candidates.sort_by(candidate_order);
    candidates
}

/// First candidate on `frequency_mhz` (and of `filter`, when given).
/// The list is flux-sorted within a frequency, so this is the strongest
/// matching signal; it resolves to nothing when even that one is below
/// the usable threshold.
pub fn resolve(
    candidates: &[Candidate],
    frequency_mhz: f64,
    filter: Option<StationType>,
    stations: &StationRegistry,
    config: &NavConfig,
) -> Option<StationHandle> {
    let best = candidates.iter().find(|c| {
        (c.frequency_mhz - frequency_mhz).abs() < config.frequency_tolerance_mhz
            && filter.map_or(true, |wanted| {
                stations
                    .get(c.station)
                    .map_or(false, |s| s.station_type() == wanted)
            })
    })?;
    (best.flux_w_m2 > config.usable_flux_w_m2).then_some(best.station)
}

/// A list this many rescan intervals old outranks flagged receivers
pub const OVERDUE_INTERVALS: f64 = 4.0;

#[derive(Debug, Default)]
pub struct TuningScheduler {
    last_tick: Option<f64>,
}

impl TuningScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }

    /// Process tick `now`. Ticks not later than the previous one are
    /// ignored. Returns the receiver rescanned this tick, if any.
    pub fn tick(
        &mut self,
        now: f64,
        stations: &StationRegistry,
        receivers: &mut ReceiverRegistry,
        config: &NavConfig,
    ) -> Option<ReceiverHandle> {
        if self.last_tick.is_some_and(|last| now <= last) {
            trace!("Skipping repeated tick {}", now);
            return None;
        }
        self.last_tick = Some(now);

        let mut chosen: Option<(ReceiverHandle, RescanKey)> = None;
        for (handle, slot) in receivers.iter_mut() {
            if !slot.active || !is_stale(slot, now, config.rescan_interval) {
                continue;
            }
            if slot.state == ScanState::Idle {
                slot.state = ScanState::NeedsRescan;
            }
            let key = rescan_key(slot, now, config.rescan_interval);
            let better = match &chosen {
                None => true,
                Some((_, best)) => priority(&key, best) == Ordering::Less,
            };
            if better {
                chosen = Some((handle, key));
            }
        }

        let (handle, _) = chosen?;
        let slot = receivers.slot_mut(handle).ok()?;
        slot.candidates = build_candidates(&slot.receiver, stations);
        slot.last_update = Some(now);
        slot.state = ScanState::Idle;
        slot.flagged = false;
        debug!(
            "Rescanned receiver #{} against {} stations at t={}",
            handle.0,
            slot.candidates.len(),
            now
        );
        Some(handle)
    }
}

fn is_stale(slot: &ReceiverSlot, now: f64, interval: f64) -> bool {
    slot.last_update.map_or(true, |last| now - last > interval)
}

/// Rescan urgency tier (lower first) and time of the last scan
type RescanKey = (u8, Option<f64>);

fn rescan_key(slot: &ReceiverSlot, now: f64, interval: f64) -> RescanKey {
    let tier = match slot.last_update {
        None => 0,
        Some(last) if now - last > OVERDUE_INTERVALS * interval => 0,
        Some(_) if slot.updated_since_scan() => 1,
        Some(_) => 2,
    };
    (tier, slot.last_update)
}

/// Lower tier first, then never-scanned, then oldest scan.
/// Ties keep registration order because the first seen wins.
fn priority(a: &RescanKey, b: &RescanKey) -> Ordering {
    a.0.cmp(&b.0).then_with(|| match (a.1, b.1) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    })
}
