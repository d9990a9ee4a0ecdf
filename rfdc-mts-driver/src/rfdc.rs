use getset::{Getters, MutGetters};
use rfdc_mts_core::{
    backend::{BackendError, RfdcBackend},
    converter::{ConverterType, PerTile, TileId, TileMask},
    error::MtsError,
    sleep::{Sleeper, StdSleeper},
};

use crate::option::MtsOption;

/// Synchronization state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum TileState {
    /// Not touched since the instance was opened.
    #[default]
    Unconfigured,
    /// DTC scan in progress or done, not aligned yet.
    Scanning,
    /// Latency aligned, SYSREF gated off.
    Aligned,
    /// Latency aligned and SYSREF gated on.
    Enabled,
    /// The last scan or synchronization failed.
    Failed,
}

/// A handle of an RF data converter instance.
///
/// All operations take `&mut self`, so one instance never runs two synchronization passes at the
/// same time. Wrap it in a [`std::sync::Mutex`] to share it between threads.
#[derive(Getters, MutGetters)]
pub struct Rfdc<B: RfdcBackend, S: Sleeper = StdSleeper> {
    /// The backend.
    #[getset(get = "pub", get_mut = "pub")]
    backend: B,
    /// The sleeper used while polling.
    #[getset(get = "pub")]
    sleeper: S,
    states: [PerTile<TileState>; 2],
    /// The option used for every operation.
    pub option: MtsOption,
}

impl<B: RfdcBackend> Rfdc<B> {
    /// Equivalent to [`Self::open_with_option`] with default [`MtsOption`] and [`StdSleeper`].
    pub fn open(backend: B) -> Result<Self, MtsError> {
        Self::open_with_option(backend, MtsOption::default(), StdSleeper)
    }
}

impl<B: RfdcBackend, S: Sleeper> Rfdc<B, S> {
    /// Opens the backend and returns the handle.
    pub fn open_with_option(mut backend: B, option: MtsOption, sleeper: S) -> Result<Self, MtsError> {
        tracing::debug!("Opening RF data converter backend.");
        backend.open()?;
        Ok(Self {
            backend,
            sleeper,
            states: [PerTile::default(); 2],
            option,
        })
    }

    /// Closes the backend.
    pub fn close(mut self) -> Result<(), MtsError> {
        self.close_impl()
    }

    /// Checks if the backend is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.backend.is_open()
    }

    /// Checks if `tile` participates in multi-tile synchronization.
    ///
    /// A tile that has never been synchronized reports `false`.
    pub fn mts_enable(&self, ty: ConverterType, tile: TileId) -> Result<bool, MtsError> {
        self.ensure_is_open()?;
        Ok(self.backend.mts_enable(ty, tile)?)
    }

    /// Tile acting as synchronization master of `ty`.
    pub fn master_tile(&self, ty: ConverterType) -> Result<TileId, MtsError> {
        self.ensure_is_open()?;
        Ok(self.backend.master_tile(ty)?)
    }

    /// Source of the SYSREF signal of `ty`.
    pub fn sysref_source(&self, ty: ConverterType) -> Result<u32, MtsError> {
        self.ensure_is_open()?;
        Ok(self.backend.sysref_source(ty)?)
    }

    /// Number of samples per fabric word of `tile`.
    pub fn fabric_factor(&self, ty: ConverterType, tile: TileId) -> Result<u32, MtsError> {
        self.ensure_is_open()?;
        Ok(self.backend.fabric_factor(ty, tile)?)
    }

    /// Synchronization state of `tile`.
    #[must_use]
    pub fn tile_state(&self, ty: ConverterType, tile: TileId) -> TileState {
        self.states[ty as usize][tile]
    }

    pub(crate) fn set_state(&mut self, ty: ConverterType, tiles: TileMask, state: TileState) {
        tiles
            .tiles()
            .for_each(|tile| self.states[ty as usize][tile] = state);
    }

    pub(crate) fn transit_state(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        from: TileState,
        to: TileState,
    ) {
        tiles.tiles().for_each(|tile| {
            let state = &mut self.states[ty as usize][tile];
            if *state == from {
                *state = to;
            }
        });
    }

    pub(crate) fn ensure_is_open(&self) -> Result<(), MtsError> {
        if self.backend.is_open() {
            Ok(())
        } else {
            Err(MtsError::Closed)
        }
    }

    /// Polls `f` until it returns `Some` or [`MtsOption::timeout`] elapses.
    pub(crate) fn poll<T>(
        &mut self,
        mut f: impl FnMut(&mut B) -> Result<Option<T>, BackendError>,
    ) -> Result<Option<T>, MtsError> {
        let attempts = self.option.attempts();
        for i in 0..attempts {
            if let Some(v) = f(&mut self.backend)? {
                return Ok(Some(v));
            }
            if i + 1 < attempts {
                self.sleeper.sleep(self.option.poll_interval);
            }
        }
        Ok(None)
    }

    fn close_impl(&mut self) -> Result<(), MtsError> {
        if !self.backend.is_open() {
            return Ok(());
        }
        tracing::debug!("Closing RF data converter backend.");
        self.backend.close()?;
        Ok(())
    }
}

impl<B: RfdcBackend, S: Sleeper> Drop for Rfdc<B, S> {
    fn drop(&mut self) {
        if !self.backend.is_open() {
            return;
        }
        let _ = self.close_impl();
    }
}

#[cfg(test)]
mod tests {
    use rfdc_mts_emulator::RfdcEmulator;

    use super::*;

    #[test]
    fn open_close() -> anyhow::Result<()> {
        let rfdc = Rfdc::open(RfdcEmulator::new())?;
        assert!(rfdc.is_open());
        rfdc.close()?;
        Ok(())
    }

    #[test]
    fn closed() -> anyhow::Result<()> {
        let mut rfdc = Rfdc::open(RfdcEmulator::new())?;
        rfdc.backend_mut().close()?;
        assert_eq!(
            Err(MtsError::Closed),
            rfdc.mts_enable(ConverterType::Adc, TileId::T0)
        );
        assert_eq!(Err(MtsError::Closed), rfdc.master_tile(ConverterType::Adc));
        assert_eq!(Err(MtsError::Closed), rfdc.sysref_source(ConverterType::Dac));
        Ok(())
    }

    #[rstest::rstest]
    #[test]
    fn queries(
        #[values(ConverterType::Adc, ConverterType::Dac)] ty: ConverterType,
    ) -> anyhow::Result<()> {
        let mut emulator = RfdcEmulator::new();
        emulator.set_master_tile(ty, TileId::T1);
        emulator.set_sysref_source(ty, 2);
        let rfdc = Rfdc::open(emulator)?;

        assert_eq!(TileId::T1, rfdc.master_tile(ty)?);
        assert_eq!(2, rfdc.sysref_source(ty)?);
        TileId::all().try_for_each(|tile| -> anyhow::Result<()> {
            assert!(!rfdc.mts_enable(ty, tile)?);
            assert_eq!(TileState::Unconfigured, rfdc.tile_state(ty, tile));
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn transit_state() -> anyhow::Result<()> {
        let mut rfdc = Rfdc::open(RfdcEmulator::new())?;
        rfdc.set_state(
            ConverterType::Adc,
            TileMask::TILE0 | TileMask::TILE1,
            TileState::Aligned,
        );
        rfdc.set_state(ConverterType::Adc, TileMask::TILE1, TileState::Failed);
        rfdc.transit_state(
            ConverterType::Adc,
            TileMask::all(),
            TileState::Aligned,
            TileState::Enabled,
        );
        assert_eq!(
            TileState::Enabled,
            rfdc.tile_state(ConverterType::Adc, TileId::T0)
        );
        assert_eq!(
            TileState::Failed,
            rfdc.tile_state(ConverterType::Adc, TileId::T1)
        );
        assert_eq!(
            TileState::Unconfigured,
            rfdc.tile_state(ConverterType::Dac, TileId::T0)
        );
        Ok(())
    }
}
