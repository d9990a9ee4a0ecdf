use rfdc_mts_core::{
    backend::RfdcBackend,
    converter::{ConverterType, TileMask},
    error::MtsError,
    marker::MtsMarker,
    sleep::Sleeper,
    status::MtsStatus,
};

use crate::Rfdc;

impl<B: RfdcBackend, S: Sleeper> Rfdc<B, S> {
    pub(super) fn read_markers(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
        marker_delay: u32,
    ) -> Result<MtsMarker, MtsError> {
        self.backend_mut().arm_marker(ty, tiles, marker_delay)?;

        let mut markers = MtsMarker::default();
        let mut pending = tiles;
        let done = self.poll(|backend| {
            for tile in pending.tiles() {
                if let Some(reading) = backend.read_marker(ty, tile)? {
                    markers.record(tile, reading);
                    pending.remove(TileMask::from_tile(tile));
                }
            }
            Ok(pending.is_empty().then_some(()))
        })?;

        if done.is_none() {
            tracing::warn!(
                "Marker detection of {} tiles {:#06b} still running.",
                ty,
                pending.bits()
            );
            return Err(MtsStatus::MARKER_RUN.into());
        }

        markers.count.masked(tiles).for_each(|(tile, count)| {
            tracing::debug!(
                "{} tile {}: marker count = {}, loc = {}",
                ty,
                tile,
                count,
                markers.loc[tile]
            );
        });
        Ok(markers)
    }
}
