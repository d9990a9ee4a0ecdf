#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

//! Multi-tile synchronization of RF data converter tiles.
//!
//! [`Controller`] synchronizes the DAC and ADC tile groups of an instance and reports the resulting
//! latencies and DTC scan statistics.

/// Two-group synchronization.
pub mod controller;
/// Commonly used types.
pub mod prelude;
/// Synchronization report.
pub mod report;

pub use rfdc_mts_driver as driver;
#[cfg(feature = "emulator")]
#[cfg_attr(docsrs, doc(cfg(feature = "emulator")))]
pub use rfdc_mts_emulator as emulator;

pub use controller::Controller;
