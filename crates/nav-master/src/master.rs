//! Session-owned navigation world
//!
//! `NavMaster` owns both registries and the scheduler. Hosts push station
//! and receiver changes in, call `tick` once per frame and query which
//! station each receiver is tuned to.

use navaid_core::{Receiver, Station, StationType};
use tracing::warn;

use crate::config::NavConfig;
use crate::error::Result;
use crate::registry::{ReceiverHandle, ReceiverRegistry, ReceiverSlot, StationHandle, StationRegistry};
use crate::scheduler::{self, Candidate, ScanState, TuningScheduler};

#[derive(Debug, Default)]
pub struct NavMaster {
    config: NavConfig,
    stations: StationRegistry,
    receivers: ReceiverRegistry,
    scheduler: TuningScheduler,
}

impl NavMaster {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config: config.validated(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    pub fn receivers(&self) -> &ReceiverRegistry {
        &self.receivers
    }

    // ========================================================================
    // Stations
    // ========================================================================

    pub fn register_station(&mut self, station: Station) -> StationHandle {
        self.stations.register(station)
    }

    pub fn update_station(&mut self, handle: StationHandle, station: Station) -> Result<()> {
        self.stations.update(handle, station).inspect_err(|e| warn!("{}", e))
    }

    pub fn deregister_station(&mut self, handle: StationHandle) -> Result<()> {
        self.stations.deregister(handle).inspect_err(|e| warn!("{}", e))
    }

    pub fn station(&self, handle: StationHandle) -> Result<&Station> {
        self.stations.get(handle)
    }

    // ========================================================================
    // Receivers
    // ========================================================================

    pub fn register_receiver(&mut self, receiver: Receiver) -> ReceiverHandle {
        self.receivers.register(receiver)
    }

    pub fn update_receiver(&mut self, handle: ReceiverHandle, receiver: Receiver) -> Result<()> {
        self.receivers.update(handle, receiver).inspect_err(|e| warn!("{}", e))
    }

    pub fn deregister_receiver(&mut self, handle: ReceiverHandle) -> Result<()> {
        self.receivers.deregister(handle).inspect_err(|e| warn!("{}", e))
    }

    pub fn receiver(&self, handle: ReceiverHandle) -> Result<&Receiver> {
        self.receivers.get(handle)
    }

    pub fn receiver_slot(&self, handle: ReceiverHandle) -> Result<&ReceiverSlot> {
        self.receivers.slot(handle)
    }

    pub fn candidates(&self, handle: ReceiverHandle) -> Result<&[Candidate]> {
        Ok(self.receivers.slot(handle)?.candidates())
    }

    pub fn scan_state(&self, handle: ReceiverHandle) -> Result<ScanState> {
        Ok(self.receivers.slot(handle)?.state())
    }

    // ========================================================================
    // Scheduling and resolution
    // ========================================================================

    /// Advance to tick `now`; rescans at most one receiver
    pub fn tick(&mut self, now: f64) -> Option<ReceiverHandle> {
        self.scheduler
            .tick(now, &self.stations, &mut self.receivers, &self.config)
    }

    /// Strongest station on the receiver's active frequency. `Ok(None)`
    /// when nothing usable is tuned; `Err` only for an unknown handle.
    pub fn get_station(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        self.resolve(handle, None)
    }

    pub fn get_station_vor(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        self.resolve(handle, Some(StationType::Vor))
    }

    pub fn get_station_loc(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        self.resolve(handle, Some(StationType::Loc))
    }

    pub fn get_station_gls(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        self.resolve(handle, Some(StationType::Gls))
    }

    pub fn get_station_dme(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        self.resolve(handle, Some(StationType::Dme))
    }

    fn resolve(&self, handle: ReceiverHandle, filter: Option<StationType>) -> Result<Option<StationHandle>> {
        let slot = self.receivers.slot(handle)?;
        if !slot.is_active() {
            return Ok(None);
        }
        Ok(scheduler::resolve(
            slot.candidates(),
            slot.receiver.frequency(),
            filter,
            &self.stations,
            &self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;
    use navaid_core::{CelestialBody, GeoPosition, StationKind};

    fn kerbin_at(lat: f64, lon: f64, elev: f64) -> GeoPosition {
        GeoPosition::at(CelestialBody::kerbin(), lat, lon, elev)
    }

    fn vor(channel: i32, power: f64, position: GeoPosition) -> Station {
        Station::new(StationKind::vor())
            .with_identity("KSC")
            .with_channel(channel)
            .with_power(power)
            .with_position(position)
    }

    #[test]
    fn test_first_tick_scans_first_receiver() {
        let mut master = NavMaster::default();
        let a = master.register_receiver(Receiver::vhf());
        let b = master.register_receiver(Receiver::vhf());
        assert_eq!(master.tick(0.0), Some(a));
        assert_eq!(master.tick(0.1), Some(b));
        // Both lists are fresh until the interval passes
        assert_eq!(master.tick(0.5), None);
        assert_eq!(master.tick(1.05), Some(a));
    }

    #[test]
    fn test_repeated_tick_is_ignored() {
        let mut master = NavMaster::default();
        master.register_receiver(Receiver::vhf());
        master.register_receiver(Receiver::vhf());
        assert!(master.tick(3.0).is_some());
        assert_eq!(master.tick(3.0), None);
        assert_eq!(master.tick(2.0), None);
    }

    #[test]
    fn test_oldest_stale_receiver_goes_first() {
        let mut master = NavMaster::default();
        let a = master.register_receiver(Receiver::vhf());
        let b = master.register_receiver(Receiver::vhf());
        let c = master.register_receiver(Receiver::vhf());
        assert_eq!(master.tick(0.0), Some(a));
        assert_eq!(master.tick(0.5), Some(b));
        assert_eq!(master.tick(0.9), Some(c));
        // All stale now; `a` has the oldest list
        assert_eq!(master.tick(5.0), Some(a));
        assert_eq!(master.tick(5.1), Some(b));
        assert_eq!(master.tick(5.2), Some(c));
    }

    #[test]
    fn test_updated_receiver_jumps_the_queue() {
        let mut master = NavMaster::default();
        let a = master.register_receiver(Receiver::vhf());
        let b = master.register_receiver(Receiver::vhf());
        master.tick(0.0);
        master.tick(0.5);
        master.update_receiver(b, Receiver::vhf().with_channel(20)).unwrap();
        assert_eq!(master.scan_state(b).unwrap(), ScanState::NeedsRescan);
        // `b` still needs to be older than the interval
        assert_eq!(master.tick(1.2), Some(a));
        assert_eq!(master.tick(3.0), Some(b));
        assert_eq!(master.scan_state(b).unwrap(), ScanState::Idle);
    }

    #[test]
    fn test_overdue_receiver_beats_constant_updates() {
        let mut master = NavMaster::default();
        let a = master.register_receiver(Receiver::vhf());
        let b = master.register_receiver(Receiver::vhf());
        assert_eq!(master.tick(0.0), Some(a));
        assert_eq!(master.tick(0.1), Some(b));
        for now in [1.2, 2.4, 3.6] {
            master.update_receiver(b, Receiver::vhf()).unwrap();
            assert_eq!(master.tick(now), Some(b));
        }
        // `a` is now more than four intervals old
        master.update_receiver(b, Receiver::vhf()).unwrap();
        assert_eq!(master.tick(4.8), Some(a));
        assert_eq!(master.scan_state(a).unwrap(), ScanState::Idle);
    }

    #[test]
    fn test_inactive_receivers_are_skipped() {
        let mut master = NavMaster::default();
        let a = master.register_receiver(Receiver::vhf());
        let b = master.register_receiver(Receiver::vhf());
        master.deregister_receiver(a).unwrap();
        assert_eq!(master.tick(0.0), Some(b));
        assert_eq!(master.tick(0.1), None);
        assert_eq!(master.get_station(a).unwrap(), None);
    }

    #[test]
    fn test_resolves_registered_vor() {
        let mut master = NavMaster::default();
        let station = master.register_station(vor(10, 80.0, kerbin_at(0.0, 0.0, 0.0)));
        let rx = master.register_receiver(
            Receiver::vhf()
                .with_channel(20)
                .with_position(kerbin_at(0.001, 0.0, 1000.0)),
        );
        // VOR channel 10 and VHF channel 20 are both 109.00
        assert!((master.station(station).unwrap().frequency() - 109.0).abs() < 1e-9);

        assert_eq!(master.get_station_vor(rx).unwrap(), None);
        master.tick(0.0);
        assert_eq!(master.get_station_vor(rx).unwrap(), Some(station));
        assert_eq!(master.get_station(rx).unwrap(), Some(station));
        assert_eq!(master.get_station_dme(rx).unwrap(), None);
    }

    #[test]
    fn test_unknown_receiver_is_distinct_from_none() {
        let master = NavMaster::default();
        assert!(matches!(
            master.get_station_vor(ReceiverHandle(0)),
            Err(NavError::UnknownReceiver(0))
        ));
    }

    #[test]
    fn test_config_is_validated() {
        let master = NavMaster::new(NavConfig::new().rescan_interval(f64::NAN));
        assert_eq!(master.config().rescan_interval, 1.0);
    }
}
