use rfdc_mts_core::{
    backend::{BackendError, RfdcBackend},
    converter::{ConverterType, PerTile, TileId, TileMask},
    dtc::DtcDomain,
    marker::MarkerReading,
};

use crate::tile::TileEmulator;

/// Emulated RF data converter with four ADC and four DAC tiles.
#[derive(Debug, Clone)]
pub struct RfdcEmulator {
    is_open: bool,
    broken: bool,
    mts_supported: [bool; 2],
    master_tile: [TileId; 2],
    sysref_source: [u32; 2],
    sysref_freq_done: bool,
    tiles: [PerTile<TileEmulator>; 2],
}

impl RfdcEmulator {
    /// Creates an emulator whose tiles are all enabled and ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_open: false,
            broken: false,
            mts_supported: [true; 2],
            master_tile: [TileId::T0; 2],
            sysref_source: [0; 2],
            sysref_freq_done: true,
            tiles: [
                PerTile(std::array::from_fn(|_| TileEmulator::new())),
                PerTile(std::array::from_fn(|_| TileEmulator::new())),
            ],
        }
    }

    /// Makes every hardware access fail.
    pub const fn break_down(&mut self) {
        self.broken = true;
    }

    /// Undoes [`Self::break_down`].
    pub const fn repair(&mut self) {
        self.broken = false;
    }

    /// Tile `tile` of `ty`.
    #[must_use]
    pub fn tile(&self, ty: ConverterType, tile: TileId) -> &TileEmulator {
        &self.tiles[ty as usize][tile]
    }

    /// Mutable tile `tile` of `ty`.
    pub fn tile_mut(&mut self, ty: ConverterType, tile: TileId) -> &mut TileEmulator {
        &mut self.tiles[ty as usize][tile]
    }

    /// All tiles of `ty`.
    pub fn tiles_mut(&mut self, ty: ConverterType) -> impl Iterator<Item = &mut TileEmulator> {
        self.tiles[ty as usize].iter_mut()
    }

    /// Sets whether `ty` supports multi-tile synchronization.
    pub const fn set_mts_supported(&mut self, ty: ConverterType, supported: bool) {
        self.mts_supported[ty as usize] = supported;
    }

    /// Sets the master tile of `ty`.
    pub const fn set_master_tile(&mut self, ty: ConverterType, tile: TileId) {
        self.master_tile[ty as usize] = tile;
    }

    /// Sets the SYSREF source of `ty`.
    pub const fn set_sysref_source(&mut self, ty: ConverterType, source: u32) {
        self.sysref_source[ty as usize] = source;
    }

    /// Sets whether the SYSREF frequency measurement completes.
    pub const fn set_sysref_freq_done(&mut self, done: bool) {
        self.sysref_freq_done = done;
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.broken {
            return Err(BackendError::new("broken".to_string()));
        }
        if !self.is_open {
            return Err(BackendError::new("emulator is not open".to_string()));
        }
        Ok(())
    }
}

impl Default for RfdcEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RfdcBackend for RfdcEmulator {
    fn open(&mut self) -> Result<(), BackendError> {
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.is_open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn is_mts_supported(&self, ty: ConverterType) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.mts_supported[ty as usize])
    }

    fn is_tile_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).enabled())
    }

    fn is_ip_ready(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).ip_ready())
    }

    fn is_pll_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).pll_enabled())
    }

    fn master_tile(&self, ty: ConverterType) -> Result<TileId, BackendError> {
        self.check()?;
        Ok(self.master_tile[ty as usize])
    }

    fn sysref_source(&self, ty: ConverterType) -> Result<u32, BackendError> {
        self.check()?;
        Ok(self.sysref_source[ty as usize])
    }

    fn fabric_factor(&self, ty: ConverterType, tile: TileId) -> Result<u32, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).fabric_factor())
    }

    fn mts_enable(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).mts_enable())
    }

    fn set_mts_enable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.tile_mut(ty, tile).write_mts_enable(enable);
        Ok(())
    }

    fn sysref_gate(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).sysref_gate())
    }

    fn set_sysref_gate(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.tile_mut(ty, tile).write_sysref_gate(enable);
        Ok(())
    }

    fn is_sysref_freq_done(&self) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.sysref_freq_done)
    }

    fn is_sysref_captured(
        &mut self,
        ty: ConverterType,
        tile: TileId,
    ) -> Result<bool, BackendError> {
        self.check()?;
        let tile = self.tile(ty, tile);
        if tile.capture_unreadable() {
            return Err(BackendError::new(
                "SYSREF capture status is unreadable".to_string(),
            ));
        }
        Ok(tile.sysref_captured())
    }

    fn set_dtc_code(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
        code: u8,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.tile_mut(ty, tile).set_dtc_code(domain, code);
        Ok(())
    }

    fn is_sysref_unstable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
    ) -> Result<bool, BackendError> {
        self.check()?;
        Ok(self.tile_mut(ty, tile).sample_sysref(domain))
    }

    fn arm_marker(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        marker_delay: u32,
    ) -> Result<(), BackendError> {
        self.check()?;
        tiles
            .tiles()
            .for_each(|tile| self.tile_mut(ty, tile).arm_marker(marker_delay));
        Ok(())
    }

    fn read_marker(
        &mut self,
        ty: ConverterType,
        tile: TileId,
    ) -> Result<Option<MarkerReading>, BackendError> {
        self.check()?;
        Ok(self.tile(ty, tile).read_marker())
    }

    fn set_fifo_delay(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        delay: u32,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.tile_mut(ty, tile).write_fifo_delay(delay);
        Ok(())
    }
}
