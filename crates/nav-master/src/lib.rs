//! Nav Master
//!
//! Owns every registered navaid station and receiver for one simulation
//! session. Handles are dense indices that stay valid for the life of the
//! session; a throttled scheduler keeps each receiver's sorted candidate
//! list fresh and resolves which station it is tuned to.

pub mod config;
pub mod error;
pub mod master;
pub mod registry;
pub mod scheduler;
pub mod tuning;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use master::NavMaster;
pub use registry::{ReceiverHandle, ReceiverRegistry, ReceiverSlot, StationHandle, StationRegistry};
pub use scheduler::{Candidate, ScanState, TuningScheduler};
pub use tuning::{TunedNavaids, NO_IDENT};
