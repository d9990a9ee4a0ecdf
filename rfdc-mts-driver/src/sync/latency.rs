use rfdc_mts_core::{
    converter::{PerTile, TileId, TileMask},
    defined::MAX_FIFO_DELAY,
    marker::MtsMarker,
    status::MtsStatus,
};

/// Outcome of the latency alignment of a tile group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    /// FIFO delay in fabric words.
    pub offset: PerTile<u32>,
    /// Latency after the FIFO delay, in samples.
    pub latency: PerTile<u32>,
    /// Common latency the tiles were aligned to, in samples.
    pub target: u32,
}

/// Computes the FIFO delays that bring every tile of `tiles` to a common latency.
///
/// The measured latency of a tile is its marker location. Without `target_latency`, the tiles are
/// aligned to the largest measured latency.
pub fn align(
    markers: &MtsMarker,
    tiles: TileMask,
    ref_tile: TileId,
    factors: &PerTile<u32>,
    target_latency: Option<u32>,
) -> Result<Alignment, MtsStatus> {
    let mut status = MtsStatus::OK;

    let ref_count = markers.count[ref_tile];
    if tiles.tiles().any(|tile| markers.count[tile] != ref_count) {
        status |= MtsStatus::MARKER_MISM;
    }

    let max_latency = markers
        .loc
        .masked(tiles)
        .map(|(_, &loc)| loc)
        .max()
        .unwrap_or(0);
    let target = target_latency.unwrap_or(max_latency);
    if target < max_latency {
        status |= MtsStatus::TARGET_LOW;
    }

    let mut alignment = Alignment {
        target,
        ..Default::default()
    };
    for tile in tiles.tiles() {
        let factor = factors[tile].max(1);
        let measured = markers.loc[tile];
        let offset = target.saturating_sub(measured) / factor;
        if offset > MAX_FIFO_DELAY {
            tracing::debug!(
                "Tile {} requires a FIFO delay of {} words, exceeding {}.",
                tile,
                offset,
                MAX_FIFO_DELAY
            );
            status |= MtsStatus::DELAY_OVER;
        }
        alignment.offset[tile] = offset;
        alignment.latency[tile] = measured + offset * factor;
    }

    if status.is_ok() {
        Ok(alignment)
    } else {
        Err(status)
    }
}
