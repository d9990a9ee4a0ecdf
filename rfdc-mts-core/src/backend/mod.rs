mod error;

pub use error::BackendError;

use crate::{
    converter::{ConverterType, TileId, TileMask},
    dtc::DtcDomain,
    marker::MarkerReading,
};

/// A trait that provides the interface with the RF data converter.
///
/// Implementors own the hardware instance. All methods address a tile of one converter type; the
/// synchronization procedure built on top of them lives in the driver.
pub trait RfdcBackend: Send {
    /// Opens the backend.
    fn open(&mut self) -> Result<(), BackendError>;

    /// Closes the backend.
    fn close(&mut self) -> Result<(), BackendError>;

    /// Checks if the backend is open.
    #[must_use]
    fn is_open(&self) -> bool;

    /// Checks if multi-tile synchronization is available for `ty`.
    fn is_mts_supported(&self, ty: ConverterType) -> Result<bool, BackendError>;

    /// Checks if the tile is present and powered.
    fn is_tile_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError>;

    /// Checks if the tile's IP finished its power-on sequence.
    fn is_ip_ready(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError>;

    /// Checks if the tile runs from its internal PLL.
    fn is_pll_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError>;

    /// Tile distributing the clock to the others.
    fn master_tile(&self, ty: ConverterType) -> Result<TileId, BackendError>;

    /// Source of the SYSREF signal.
    fn sysref_source(&self, ty: ConverterType) -> Result<u32, BackendError>;

    /// Number of samples per fabric word.
    fn fabric_factor(&self, ty: ConverterType, tile: TileId) -> Result<u32, BackendError>;

    /// Checks if the tile participates in multi-tile synchronization.
    fn mts_enable(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError>;

    /// Sets whether the tile participates in multi-tile synchronization.
    fn set_mts_enable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError>;

    /// Reads back the SYSREF gate of the tile.
    fn sysref_gate(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError>;

    /// Gates SYSREF on or off for the tile.
    fn set_sysref_gate(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError>;

    /// Checks if the SYSREF frequency measurement completed.
    fn is_sysref_freq_done(&self) -> Result<bool, BackendError>;

    /// Checks if the tile captured a SYSREF edge since its gate was opened.
    fn is_sysref_captured(&mut self, ty: ConverterType, tile: TileId)
        -> Result<bool, BackendError>;

    /// Applies a DTC code.
    fn set_dtc_code(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
        code: u8,
    ) -> Result<(), BackendError>;

    /// Samples SYSREF at the current DTC code and checks whether the capture was unstable.
    fn is_sysref_unstable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
    ) -> Result<bool, BackendError>;

    /// Starts marker detection on `tiles`.
    fn arm_marker(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        marker_delay: u32,
    ) -> Result<(), BackendError>;

    /// Reads the marker of the tile. `None` while detection is still running.
    fn read_marker(
        &mut self,
        ty: ConverterType,
        tile: TileId,
    ) -> Result<Option<MarkerReading>, BackendError>;

    /// Programs the FIFO delay in fabric words.
    fn set_fifo_delay(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        delay: u32,
    ) -> Result<(), BackendError>;
}

impl RfdcBackend for Box<dyn RfdcBackend> {
    fn open(&mut self) -> Result<(), BackendError> {
        self.as_mut().open()
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.as_mut().close()
    }

    fn is_open(&self) -> bool {
        self.as_ref().is_open()
    }

    fn is_mts_supported(&self, ty: ConverterType) -> Result<bool, BackendError> {
        self.as_ref().is_mts_supported(ty)
    }

    fn is_tile_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.as_ref().is_tile_enabled(ty, tile)
    }

    fn is_ip_ready(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.as_ref().is_ip_ready(ty, tile)
    }

    fn is_pll_enabled(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.as_ref().is_pll_enabled(ty, tile)
    }

    fn master_tile(&self, ty: ConverterType) -> Result<TileId, BackendError> {
        self.as_ref().master_tile(ty)
    }

    fn sysref_source(&self, ty: ConverterType) -> Result<u32, BackendError> {
        self.as_ref().sysref_source(ty)
    }

    fn fabric_factor(&self, ty: ConverterType, tile: TileId) -> Result<u32, BackendError> {
        self.as_ref().fabric_factor(ty, tile)
    }

    fn mts_enable(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.as_ref().mts_enable(ty, tile)
    }

    fn set_mts_enable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError> {
        self.as_mut().set_mts_enable(ty, tile, enable)
    }

    fn sysref_gate(&self, ty: ConverterType, tile: TileId) -> Result<bool, BackendError> {
        self.as_ref().sysref_gate(ty, tile)
    }

    fn set_sysref_gate(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        enable: bool,
    ) -> Result<(), BackendError> {
        self.as_mut().set_sysref_gate(ty, tile, enable)
    }

    fn is_sysref_freq_done(&self) -> Result<bool, BackendError> {
        self.as_ref().is_sysref_freq_done()
    }

    fn is_sysref_captured(
        &mut self,
        ty: ConverterType,
        tile: TileId,
    ) -> Result<bool, BackendError> {
        self.as_mut().is_sysref_captured(ty, tile)
    }

    fn set_dtc_code(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
        code: u8,
    ) -> Result<(), BackendError> {
        self.as_mut().set_dtc_code(ty, tile, domain, code)
    }

    fn is_sysref_unstable(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        domain: DtcDomain,
    ) -> Result<bool, BackendError> {
        self.as_mut().is_sysref_unstable(ty, tile, domain)
    }

    fn arm_marker(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        marker_delay: u32,
    ) -> Result<(), BackendError> {
        self.as_mut().arm_marker(ty, tiles, marker_delay)
    }

    fn read_marker(
        &mut self,
        ty: ConverterType,
        tile: TileId,
    ) -> Result<Option<MarkerReading>, BackendError> {
        self.as_mut().read_marker(ty, tile)
    }

    fn set_fifo_delay(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        delay: u32,
    ) -> Result<(), BackendError> {
        self.as_mut().set_fifo_delay(ty, tile, delay)
    }
}
