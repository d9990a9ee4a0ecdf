use rfdc_mts_core::{
    backend::RfdcBackend,
    config::{SyncConfig, SysrefEnable},
    converter::{ConverterType, TileMask},
    error::MtsError,
    sleep::Sleeper,
    status::MtsStatus,
};

use crate::{rfdc::TileState, Rfdc};

impl<B: RfdcBackend, S: Sleeper> Rfdc<B, S> {
    /// Gates SYSREF on or off for the tiles of both groups.
    ///
    /// When enabling, the SYSREF frequency measurement must complete within the timeout. On success,
    /// `sysref_enable` of both configs is updated.
    pub fn sysref_config(
        &mut self,
        dac: &mut SyncConfig,
        adc: &mut SyncConfig,
        enable: SysrefEnable,
    ) -> Result<(), MtsError> {
        self.ensure_is_open()?;
        tracing::debug!(
            "Setting SYSREF of DAC tiles {:#06b} and ADC tiles {:#06b} to {:?}.",
            dac.tiles.bits(),
            adc.tiles.bits(),
            enable
        );

        let mut status = self.gate_group(ConverterType::Dac, dac.tiles, enable.is_enabled())
            | self.gate_group(ConverterType::Adc, adc.tiles, enable.is_enabled());

        if enable.is_enabled() {
            let done = self.poll(|backend| Ok(backend.is_sysref_freq_done()?.then_some(())))?;
            if done.is_none() {
                tracing::warn!("SYSREF frequency measurement did not complete.");
                status |= MtsStatus::SYSREF_FREQ_NDONE;
            }
        }
        status.into_result()?;

        dac.sysref_enable = enable;
        adc.sysref_enable = enable;
        let (from, to) = match enable {
            SysrefEnable::Enable => (TileState::Aligned, TileState::Enabled),
            SysrefEnable::Disable => (TileState::Enabled, TileState::Aligned),
        };
        self.transit_state(ConverterType::Dac, dac.tiles, from, to);
        self.transit_state(ConverterType::Adc, adc.tiles, from, to);
        Ok(())
    }

    pub(crate) fn gate_group(&mut self, ty: ConverterType, tiles: TileMask, enable: bool) -> MtsStatus {
        tiles.tiles().fold(MtsStatus::OK, |status, tile| {
            let backend = self.backend_mut();
            match backend
                .set_sysref_gate(ty, tile, enable)
                .and_then(|()| backend.sysref_gate(ty, tile))
            {
                Ok(gate) if gate == enable => status,
                Ok(gate) => {
                    tracing::warn!(
                        "SYSREF gate of {} tile {} reads back {} after setting it to {}.",
                        ty,
                        tile,
                        gate,
                        enable
                    );
                    status | MtsStatus::SYSREF_GATE_ERROR
                }
                Err(e) => {
                    tracing::warn!("Failed to gate SYSREF of {} tile {}: {}", ty, tile, e);
                    status | MtsStatus::SYSREF_GATE_ERROR
                }
            }
        })
    }

    pub(super) fn wait_sysref_captured(
        &mut self,
        ty: ConverterType,
        tiles: TileMask,
    ) -> Result<(), MtsError> {
        let mut pending = tiles;
        let done = self.poll(|backend| {
            for tile in pending.tiles() {
                if backend.is_sysref_captured(ty, tile)? {
                    pending.remove(TileMask::from_tile(tile));
                }
            }
            Ok(pending.is_empty().then_some(()))
        })?;
        if done.is_none() {
            tracing::warn!(
                "{} tiles {:#06b} did not capture SYSREF.",
                ty,
                pending.bits()
            );
            return Err(MtsStatus::TIMEOUT.into());
        }
        Ok(())
    }
}
