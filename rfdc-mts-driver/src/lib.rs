#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

//! Multi-tile synchronization driver.
//!
//! [`Rfdc`] owns an [`RfdcBackend`] and runs the SYSREF gating, DTC scans, marker detection and
//! latency alignment on top of it.
//!
//! [`RfdcBackend`]: rfdc_mts_core::backend::RfdcBackend

/// Options of the synchronization procedure.
pub mod option;
/// Instance handle.
pub mod rfdc;
/// Synchronization procedure.
pub mod sync;

pub use rfdc_mts_core as core;

pub use option::MtsOption;
pub use rfdc::{Rfdc, TileState};
