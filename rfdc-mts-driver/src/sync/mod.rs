mod dtc;
mod latency;
mod marker;
mod sysref;

pub use dtc::DtcScan;
pub use latency::{align, Alignment};

use rfdc_mts_core::{
    backend::RfdcBackend,
    config::SyncConfig,
    converter::{ConverterType, PerTile, TileMask},
    dtc::DtcDomain,
    error::MtsError,
    sleep::Sleeper,
    status::MtsStatus,
};

use crate::{rfdc::TileState, Rfdc};

impl<B: RfdcBackend, S: Sleeper> Rfdc<B, S> {
    /// Synchronizes the tiles of `config.tiles`.
    ///
    /// On success, `config.offset`, `config.latency` and the DTC scan results are written and the
    /// tiles participate in multi-tile synchronization. On failure, `config` is left untouched, the
    /// tiles are excluded from multi-tile synchronization and the error carries every failure flag
    /// that was detected.
    pub fn multi_converter_sync(
        &mut self,
        ty: ConverterType,
        config: &mut SyncConfig,
    ) -> Result<(), MtsError> {
        self.ensure_is_open()?;
        tracing::info!(
            "Starting {} multi-tile synchronization of tiles {:#06b} with reference tile {}.",
            ty,
            config.tiles.bits(),
            config.ref_tile
        );

        if let Err(e) = self.validate(ty, config) {
            tracing::warn!("{} multi-tile synchronization rejected: {}", ty, e);
            let touched = config
                .tiles
                .tiles()
                .filter(|&tile| self.tile_state(ty, tile) != TileState::Unconfigured)
                .collect();
            self.exclude(ty, touched);
            return Err(e);
        }

        let mut work = *config;
        work.dtc_set_pll.ref_tile = work.ref_tile;
        work.dtc_set_t1.ref_tile = work.ref_tile;
        self.set_state(ty, work.tiles, TileState::Scanning);

        match self.sync_impl(ty, &mut work) {
            Ok(()) => {
                *config = work;
                tracing::info!("{} multi-tile synchronization completed.", ty);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{} multi-tile synchronization failed: {}", ty, e);
                self.exclude(ty, config.tiles);
                Err(e)
            }
        }
    }

    fn validate(&self, ty: ConverterType, config: &SyncConfig) -> Result<(), MtsError> {
        if !self.backend().is_mts_supported(ty)? {
            return Err(MtsStatus::NOT_SUPPORTED.into());
        }
        if config.tiles.is_empty() {
            return Err(MtsStatus::NOT_ENABLED.into());
        }

        let mut status = MtsStatus::OK;
        if !config.tiles.contains_tile(config.ref_tile) {
            status |= MtsStatus::BAD_REF_TILE;
        }
        for tile in config.tiles.tiles() {
            if !self.backend().is_tile_enabled(ty, tile)? {
                status |= MtsStatus::NOT_ENABLED;
                if tile == config.ref_tile {
                    status |= MtsStatus::BAD_REF_TILE;
                }
            } else if !self.backend().is_ip_ready(ty, tile)? {
                status |= MtsStatus::IP_NOT_READY;
            }
        }
        status.into_result()
    }

    fn sync_impl(&mut self, ty: ConverterType, work: &mut SyncConfig) -> Result<(), MtsError> {
        let tiles = work.tiles;

        self.gate_group(ty, tiles, false).into_result()?;

        let mut status = MtsStatus::OK;
        for domain in [DtcDomain::Pll, DtcDomain::T1] {
            for tile in tiles.tiles_from(work.ref_tile) {
                if domain == DtcDomain::Pll && !self.backend().is_pll_enabled(ty, tile)? {
                    tracing::trace!("{} tile {} does not use its PLL, skipping PLL scan.", ty, tile);
                    continue;
                }
                match self.scan_tile(ty, tile, work.dtc_settings_mut(domain)) {
                    Ok(()) => {}
                    Err(MtsError::Status(s)) => status |= s,
                    Err(e) => return Err(e),
                }
            }
        }
        status.into_result()?;

        self.gate_group(ty, tiles, true).into_result()?;
        match self.wait_sysref_captured(ty, tiles) {
            Ok(()) => {}
            Err(MtsError::Status(s)) => status |= s,
            Err(e) => return Err(e),
        }

        let markers = match self.read_markers(ty, tiles, work.marker_delay) {
            Ok(markers) => markers,
            Err(MtsError::Status(s)) => return Err((status | s).into()),
            Err(e) => return Err(e),
        };

        let mut factors = PerTile::splat(1);
        for tile in tiles.tiles() {
            factors[tile] = self.backend().fabric_factor(ty, tile)?;
        }
        let alignment = match align(&markers, tiles, work.ref_tile, &factors, work.target_latency) {
            Ok(alignment) if status.is_ok() => alignment,
            Ok(_) => return Err(status.into()),
            Err(s) => return Err((status | s).into()),
        };
        tracing::info!(
            "{} tiles aligned to a latency of {} samples.",
            ty,
            alignment.target
        );

        for tile in tiles.tiles() {
            self.backend_mut()
                .set_fifo_delay(ty, tile, alignment.offset[tile])?;
            self.backend_mut().set_mts_enable(ty, tile, true)?;
            work.offset[tile] = alignment.offset[tile];
            work.latency[tile] = alignment.latency[tile];
        }
        self.set_state(ty, tiles, TileState::Aligned);

        if work.sysref_enable.is_enabled() {
            self.set_state(ty, tiles, TileState::Enabled);
        } else {
            self.gate_group(ty, tiles, false).into_result()?;
        }

        Ok(())
    }

    fn exclude(&mut self, ty: ConverterType, tiles: TileMask) {
        for tile in tiles.tiles() {
            if let Err(e) = self.backend_mut().set_mts_enable(ty, tile, false) {
                tracing::trace!("Failed to disable MTS of {} tile {}: {}", ty, tile, e);
            }
        }
        self.set_state(ty, tiles, TileState::Failed);
    }
}
