//! Receiver-side view of the tuned stations
//!
//! Registry resolution works from the cached candidate list. A receiver
//! then re-checks each resolved station against its live position: the
//! station is kept only while its flux is usable and the body does not
//! block the path.

use navaid_core::{Receiver, ReceiverType};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::master::NavMaster;
use crate::registry::{ReceiverHandle, StationHandle};

pub const NO_IDENT: &str = "---";

/// Stations a VHF navigation receiver is locked onto
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunedNavaids {
    pub vor: Option<StationHandle>,
    pub loc: Option<StationHandle>,
    pub gls: Option<StationHandle>,
    pub dme: Option<StationHandle>,
    /// Call sign shown on the receiver head
    pub ident: String,
}

impl TunedNavaids {
    pub fn is_empty(&self) -> bool {
        self.vor.is_none() && self.loc.is_none() && self.gls.is_none() && self.dme.is_none()
    }
}

impl NavMaster {
    /// Drop `station` unless it is receivable from `receiver`'s live position
    fn receivable(&self, receiver: &Receiver, station: Option<StationHandle>) -> Option<StationHandle> {
        let handle = station?;
        let s = self.station(handle).ok()?;
        (s.flux(&receiver.position) > self.config().usable_flux_w_m2 && s.line_of_sight(&receiver.position))
            .then_some(handle)
    }

    /// VHF navigation: ILS channels resolve LOC and GLS, other channels a
    /// VOR; DME is always resolved. A non-VHF or unpowered receiver gets
    /// nothing.
    pub fn tuned_navaids(&self, handle: ReceiverHandle) -> Result<TunedNavaids> {
        let slot = self.receiver_slot(handle)?;
        let receiver = &slot.receiver;
        let mut tuned = TunedNavaids::default();
        if !slot.is_active() || !receiver.is_on() || receiver.receiver_type() != ReceiverType::Vhf {
            tuned.ident = NO_IDENT.to_string();
            return Ok(tuned);
        }

        if receiver.is_active_ils() {
            tuned.loc = self.receivable(receiver, self.get_station_loc(handle)?);
            tuned.gls = self.receivable(receiver, self.get_station_gls(handle)?);
        } else {
            tuned.vor = self.receivable(receiver, self.get_station_vor(handle)?);
        }
        tuned.dme = self.receivable(receiver, self.get_station_dme(handle)?);

        tuned.ident = [tuned.vor, tuned.loc, tuned.dme, tuned.gls]
            .into_iter()
            .flatten()
            .find_map(|h| self.station(h).ok())
            .map(|s| s.identity.to_string())
            .unwrap_or_else(|| NO_IDENT.to_string());
        Ok(tuned)
    }

    /// MF and COMM receivers: strongest receivable station on frequency
    pub fn tuned_station(&self, handle: ReceiverHandle) -> Result<Option<StationHandle>> {
        let receiver = self.receiver(handle)?;
        if !receiver.is_on() {
            return Ok(None);
        }
        Ok(self.receivable(receiver, self.get_station(handle)?))
    }
}
