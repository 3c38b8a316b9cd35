//! Station and receiver arenas
//!
//! Slots are append-only, so a handle stays valid for the life of the
//! registry. Deregistration zeroes a station's power or clears a
//! receiver's active flag; the slot itself is never reused.

use navaid_core::{Receiver, Station};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NavError, Result};
use crate::scheduler::{Candidate, ScanState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReceiverHandle(pub usize);

// ============================================================================
// Stations
// ============================================================================

#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, station: Station) -> StationHandle {
        let handle = StationHandle(self.stations.len());
        info!(
            "Registered {} station {} as #{} on {:.3}",
            station.station_type(),
            station.identity,
            handle.0,
            station.frequency()
        );
        self.stations.push(station);
        handle
    }

    pub fn get(&self, handle: StationHandle) -> Result<&Station> {
        self.stations
            .get(handle.0)
            .ok_or(NavError::UnknownStation(handle.0))
    }

    pub fn update(&mut self, handle: StationHandle, station: Station) -> Result<()> {
        let slot = self
            .stations
            .get_mut(handle.0)
            .ok_or(NavError::UnknownStation(handle.0))?;
        *slot = station;
        Ok(())
    }

    /// Soft delete: the station stays registered with zero power
    pub fn deregister(&mut self, handle: StationHandle) -> Result<()> {
        let slot = self
            .stations
            .get_mut(handle.0)
            .ok_or(NavError::UnknownStation(handle.0))?;
        slot.transmit_power_w = 0.0;
        debug!("Station #{} switched off", handle.0);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StationHandle, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(i, s)| (StationHandle(i), s))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ============================================================================
// Receivers
// ============================================================================

/// Registry-side bookkeeping for one receiver
#[derive(Debug, Clone)]
pub struct ReceiverSlot {
    pub receiver: Receiver,
    pub(crate) active: bool,
    pub(crate) last_update: Option<f64>,
    pub(crate) state: ScanState,
    pub(crate) flagged: bool,
    pub(crate) candidates: Vec<Candidate>,
}

impl ReceiverSlot {
    fn new(receiver: Receiver) -> Self {
        Self {
            receiver,
            active: true,
            last_update: None,
            state: ScanState::NeedsRescan,
            flagged: false,
            candidates: Vec::new(),
        }
    }

    /// Receiver was replaced since its last scan
    pub(crate) fn updated_since_scan(&self) -> bool {
        self.flagged
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tick of the last candidate rebuild
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Sorted by frequency, strongest first within a frequency
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

#[derive(Debug, Default)]
pub struct ReceiverRegistry {
    slots: Vec<ReceiverSlot>,
}

impl ReceiverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, receiver: Receiver) -> ReceiverHandle {
        let handle = ReceiverHandle(self.slots.len());
        info!(
            "Registered {:?} receiver #{} on {:.3}",
            receiver.receiver_type(),
            handle.0,
            receiver.frequency()
        );
        self.slots.push(ReceiverSlot::new(receiver));
        handle
    }

    pub fn slot(&self, handle: ReceiverHandle) -> Result<&ReceiverSlot> {
        self.slots
            .get(handle.0)
            .ok_or(NavError::UnknownReceiver(handle.0))
    }

    pub(crate) fn slot_mut(&mut self, handle: ReceiverHandle) -> Result<&mut ReceiverSlot> {
        self.slots
            .get_mut(handle.0)
            .ok_or(NavError::UnknownReceiver(handle.0))
    }

    pub fn get(&self, handle: ReceiverHandle) -> Result<&Receiver> {
        Ok(&self.slot(handle)?.receiver)
    }

    /// Replace the receiver and reactivate its slot. The cached
    /// candidates stay usable until the next rescan.
    pub fn update(&mut self, handle: ReceiverHandle, receiver: Receiver) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        slot.receiver = receiver;
        slot.active = true;
        slot.state = ScanState::NeedsRescan;
        slot.flagged = true;
        Ok(())
    }

    /// Soft delete: skipped by the scheduler, resolves nothing
    pub fn deregister(&mut self, handle: ReceiverHandle) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        slot.active = false;
        slot.candidates.clear();
        slot.state = ScanState::Idle;
        slot.flagged = false;
        debug!("Receiver #{} deactivated", handle.0);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReceiverHandle, &ReceiverSlot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (ReceiverHandle(i), s))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ReceiverHandle, &mut ReceiverSlot)> {
        self.slots
            .iter_mut()
            .enumerate()
            .map(|(i, s)| (ReceiverHandle(i), s))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
