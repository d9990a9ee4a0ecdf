pub use crate::{
    controller::{Controller, MtsRequest, MtsRun, RunOption},
    report::SyncReport,
};

pub use rfdc_mts_core::prelude::*;
pub use rfdc_mts_driver::{sync::DtcScan, MtsOption, Rfdc, TileState};

#[cfg(feature = "emulator")]
pub use rfdc_mts_emulator::{RfdcEmulator, TileEmulator};
