#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Core traits and types for multi-tile synchronization (MTS) of RF data converters.

/// A interface to the RF data converter hardware.
pub mod backend;
/// Synchronization request and result types.
pub mod config;
/// Converter type, tile id and per-tile containers.
pub mod converter;
/// Common constants.
pub mod defined;
/// Digital-to-time converter scan settings.
pub mod dtc;
/// Error type.
pub mod error;
/// Marker detection results.
pub mod marker;
/// Sleep abstraction used while polling the hardware.
pub mod sleep;
/// Status bitmask.
pub mod status;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        backend::{BackendError, RfdcBackend},
        config::{multi_converter_init, SyncConfig, SysrefEnable},
        converter::{ConverterType, PerTile, TileId, TileMask},
        defined::*,
        dtc::{DtcDomain, DtcSettings, ScanMode},
        error::MtsError,
        marker::{MarkerReading, MtsMarker},
        sleep::{Sleeper, StdSleeper},
        status::MtsStatus,
    };
}
