use std::time::Duration;

use derive_more::{Deref, DerefMut};
use rfdc_mts_core::{
    backend::RfdcBackend,
    config::{SyncConfig, SysrefEnable},
    converter::{ConverterType, PerTile, TileId, TileMask},
    error::MtsError,
    sleep::{Sleeper, StdSleeper},
};
use rfdc_mts_driver::{MtsOption, Rfdc};

use crate::report::SyncReport;

/// The option used in [`Controller::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOption {
    /// Pause between the DAC and the ADC pass.
    pub group_interval: Duration,
}

impl Default for RunOption {
    fn default() -> Self {
        Self {
            group_interval: Duration::from_millis(500),
        }
    }
}

/// Tiles and target latencies of both converter types.
///
/// A group whose mask is empty is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MtsRequest {
    /// DAC tiles to synchronize.
    pub dac_tiles: TileMask,
    /// Common DAC latency in samples. `None` aligns to the slowest tile.
    pub dac_target_latency: Option<u32>,
    /// ADC tiles to synchronize.
    pub adc_tiles: TileMask,
    /// Common ADC latency in samples. `None` aligns to the slowest tile.
    pub adc_target_latency: Option<u32>,
}

/// Result of [`Controller::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct MtsRun {
    /// DAC pass. `None` if no DAC tile was requested.
    pub dac: Option<SyncReport>,
    /// ADC pass. `None` if no ADC tile was requested.
    pub adc: Option<SyncReport>,
}

impl MtsRun {
    /// Check if every executed pass succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.reports().all(SyncReport::is_ok)
    }

    /// Reports of the executed passes, DAC first.
    pub fn reports(&self) -> impl Iterator<Item = &SyncReport> {
        self.dac.iter().chain(self.adc.iter())
    }
}

/// A controller of an RF data converter instance.
///
/// Dereferences to [`Rfdc`], so every single-group operation is available as well.
#[derive(Deref, DerefMut)]
pub struct Controller<B: RfdcBackend, S: Sleeper = StdSleeper> {
    #[deref]
    #[deref_mut]
    rfdc: Rfdc<B, S>,
    /// The option used in [`Controller::run`].
    pub run_option: RunOption,
}

impl<B: RfdcBackend> Controller<B> {
    /// Equivalent to [`Self::open_with_option`] with default options and [`StdSleeper`].
    pub fn open(backend: B) -> Result<Self, MtsError> {
        Self::open_with_option(backend, MtsOption::default(), StdSleeper, RunOption::default())
    }
}

impl<B: RfdcBackend, S: Sleeper> Controller<B, S> {
    /// Opens the backend.
    pub fn open_with_option(
        backend: B,
        option: MtsOption,
        sleeper: S,
        run_option: RunOption,
    ) -> Result<Self, MtsError> {
        Ok(Self {
            rfdc: Rfdc::open_with_option(backend, option, sleeper)?,
            run_option,
        })
    }

    /// Closes the controller.
    pub fn close(self) -> Result<(), MtsError> {
        self.rfdc.close()
    }

    /// Synchronizes the DAC tiles and then the ADC tiles of `request`.
    ///
    /// Both groups use tile 0 as reference, fresh DTC scans and keep SYSREF enabled. A failing pass
    /// is reported in its [`SyncReport`] and does not prevent the other one.
    pub fn run(&mut self, request: &MtsRequest) -> Result<MtsRun, MtsError> {
        if !self.rfdc.is_open() {
            return Err(MtsError::Closed);
        }

        let dac = self.run_group(
            ConverterType::Dac,
            request.dac_tiles,
            request.dac_target_latency,
        )?;

        self.rfdc
            .sleeper()
            .sleep(self.run_option.group_interval);

        let adc = self.run_group(
            ConverterType::Adc,
            request.adc_tiles,
            request.adc_target_latency,
        )?;

        Ok(MtsRun { dac, adc })
    }

    fn run_group(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        target_latency: Option<u32>,
    ) -> Result<Option<SyncReport>, MtsError> {
        if tiles.is_empty() {
            tracing::debug!("No {} tile requested, skipping.", ty);
            return Ok(None);
        }

        let mut config = SyncConfig::new(None, None, TileId::T0);
        config.tiles = tiles;
        config.sysref_enable = SysrefEnable::Enable;
        config.target_latency = target_latency;

        let result = self.rfdc.multi_converter_sync(ty, &mut config);

        let mut fabric_factor = PerTile::splat(1);
        if result.is_ok() {
            for tile in tiles.tiles() {
                fabric_factor[tile] = self.rfdc.fabric_factor(ty, tile)?;
            }
        }

        let report = SyncReport {
            ty,
            config,
            fabric_factor,
            result,
        };
        if report.is_ok() {
            tracing::info!("\n{}", report);
        } else {
            tracing::warn!("{}", report);
        }
        Ok(Some(report))
    }
}
