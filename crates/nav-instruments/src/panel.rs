//! Instrument panel driven by one VHF navigation receiver

use nav_master::{NavMaster, ReceiverHandle, Result, TunedNavaids};
use serde::{Deserialize, Serialize};

use crate::dme::DmeIndicator;
use crate::ils::{glideslope_reading, localizer_reading, NeedleReading};
use crate::vor::{VorIndicator, VorReading};

/// Everything the panel shows after one refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelReadout {
    pub ident: String,
    pub vor: Option<VorReading>,
    pub localizer: Option<NeedleReading>,
    pub glideslope: Option<NeedleReading>,
    pub dme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavPanel {
    pub receiver: ReceiverHandle,
    pub vor: VorIndicator,
    pub dme: DmeIndicator,
}

impl NavPanel {
    pub fn new(receiver: ReceiverHandle) -> Self {
        Self {
            receiver,
            vor: VorIndicator::new(),
            dme: DmeIndicator::new(),
        }
    }

    /// Read every instrument from the stations the receiver is locked onto
    pub fn refresh(&mut self, master: &NavMaster, now: f64) -> Result<PanelReadout> {
        let TunedNavaids {
            vor,
            loc,
            gls,
            dme,
            ident,
        } = master.tuned_navaids(self.receiver)?;
        let position = &master.receiver(self.receiver)?.position;

        let vor = match vor {
            Some(h) => self.vor.read(master.station(h)?, position),
            None => None,
        };
        let localizer = match loc {
            Some(h) => localizer_reading(master.station(h)?, position),
            None => None,
        };
        let glideslope = match gls {
            Some(h) => glideslope_reading(master.station(h)?, position),
            None => None,
        };

        match dme {
            Some(h) => {
                let station = master.station(h)?;
                self.dme
                    .sample(Some(station.identity.as_str()), station.distance(position), now);
            }
            None => self.dme.sample(None, None, now),
        }

        Ok(PanelReadout {
            ident,
            vor,
            localizer,
            glideslope,
            dme: self.dme.readout(),
        })
    }
}
