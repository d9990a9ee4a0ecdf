use std::fmt;

use rfdc_mts_core::{
    config::SyncConfig,
    converter::{ConverterType, PerTile, TileId},
    dtc::DtcSettings,
    error::MtsError,
    status::MtsStatus,
};

/// Outcome of the synchronization of one converter type.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Converter type of the group.
    pub ty: ConverterType,
    /// The config after the pass. Outputs are only populated if [`Self::result`] is `Ok`.
    pub config: SyncConfig,
    /// Samples per fabric word of each participating tile.
    pub fabric_factor: PerTile<u32>,
    /// Result of the pass.
    pub result: Result<(), MtsError>,
}

impl SyncReport {
    /// Check if the pass succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Status of the pass.
    #[must_use]
    pub fn status(&self) -> MtsStatus {
        self.result
            .as_ref()
            .map_or_else(MtsError::status, |_| MtsStatus::OK)
    }

    /// Resulting latency of each participating tile in ascending tile order.
    #[must_use]
    pub fn latencies(&self) -> Vec<u32> {
        self.config
            .latency
            .masked(self.config.tiles)
            .map(|(_, &latency)| latency)
            .collect()
    }
}

fn write_dtc(
    f: &mut fmt::Formatter<'_>,
    ty: ConverterType,
    tile: TileId,
    settings: &DtcSettings,
) -> fmt::Result {
    writeln!(f, "=== MTS {} Tile{} {} Report ===", ty, tile, settings.domain)?;
    match settings.dtc_code[tile] {
        Some(code) => writeln!(f, "    {}{}: {} DTC Code = {}", ty, tile, settings.domain, code)?,
        None => writeln!(f, "    {}{}: {} DTC Code = -", ty, tile, settings.domain)?,
    }
    writeln!(
        f,
        "    {}{}: {} Num Windows = {}",
        ty, tile, settings.domain, settings.num_windows[tile]
    )?;
    writeln!(
        f,
        "    {}{}: {} Max Gap = {}",
        ty, tile, settings.domain, settings.max_gap[tile]
    )?;
    writeln!(
        f,
        "    {}{}: {} Min Gap = {}",
        ty, tile, settings.domain, settings.min_gap[tile]
    )?;
    writeln!(
        f,
        "    {}{}: {} Max Overlap = {}",
        ty, tile, settings.domain, settings.max_overlap[tile]
    )
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.ty;
        if let Err(e) = &self.result {
            return write!(f, "{} Multi-Tile-Sync did not complete successfully: {}", ty, e);
        }

        writeln!(f, "{} Multi-Tile-Sync completed successfully", ty)?;
        writeln!(f, "========== {} Multi-Tile Sync Report ==========", ty)?;
        for tile in self.config.tiles.tiles() {
            writeln!(
                f,
                "{}{}: Latency(T1) = {}, Adjusted Delay Offset({}) = {}, Marker Delay = {}",
                ty,
                tile,
                self.config.latency[tile],
                self.fabric_factor[tile],
                self.config.offset[tile],
                self.config.marker_delay
            )?;
            write_dtc(f, ty, tile, &self.config.dtc_set_pll)?;
            write_dtc(f, ty, tile, &self.config.dtc_set_t1)?;
        }
        write!(f, "{} Multi-Tile Synchronization is complete.", ty)
    }
}
