//! Navaid Fuzz Harness
//!
//! Reusable property-based testing infrastructure for the navaid crates.
//! Provides geographic, channel and signal strategies plus a small run
//! configuration that honours `NAV_FUZZ_CASES`.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(lat in latitude_deg(), lon in longitude_deg()) {
//!         prop_assert!(lat.abs() <= 90.0 && lon.abs() <= 180.0);
//!     }
//! }
//! ```

pub mod generators;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::runner::FuzzConfig;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
