use crate::{
    converter::{PerTile, TileId, TileMask},
    defined::DEFAULT_MARKER_DELAY,
    dtc::{DtcDomain, DtcSettings},
};

/// Gating of the SYSREF signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum SysrefEnable {
    /// SYSREF is gated off.
    Disable = 0,
    /// SYSREF is gated on.
    #[default]
    Enable = 1,
}

impl SysrefEnable {
    /// Check if SYSREF is gated on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, SysrefEnable::Enable)
    }
}

impl From<bool> for SysrefEnable {
    fn from(value: bool) -> Self {
        if value {
            SysrefEnable::Enable
        } else {
            SysrefEnable::Disable
        }
    }
}

/// Request and result of a multi-tile synchronization of one converter type.
///
/// `ref_tile`, `tiles`, `target_latency`, `marker_delay`, `sysref_enable` and the scan modes are
/// inputs. `offset`, `latency` and the scan results in `dtc_set_pll`/`dtc_set_t1` are outputs,
/// written only by a successful synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncConfig {
    /// Reference tile of the group.
    pub ref_tile: TileId,
    /// Participating tiles.
    pub tiles: TileMask,
    /// Common latency in samples. `None` aligns all tiles to the slowest one.
    pub target_latency: Option<u32>,
    /// Applied FIFO delay in fabric words.
    pub offset: PerTile<u32>,
    /// Resulting latency in samples.
    pub latency: PerTile<u32>,
    /// Delay applied to the marker.
    pub marker_delay: u32,
    /// Whether SYSREF stays gated on after synchronization.
    pub sysref_enable: SysrefEnable,
    /// DTC scan of the PLL domain.
    pub dtc_set_pll: DtcSettings,
    /// DTC scan of the T1 domain.
    pub dtc_set_t1: DtcSettings,
}

impl SyncConfig {
    /// Creates a config for `ref_tile`.
    ///
    /// If code tables are given, the corresponding scan reloads them instead of scanning.
    #[must_use]
    pub fn new(
        pll_codes: Option<&PerTile<u8>>,
        t1_codes: Option<&PerTile<u8>>,
        ref_tile: TileId,
    ) -> Self {
        Self {
            ref_tile,
            tiles: TileMask::NONE,
            target_latency: None,
            offset: PerTile::default(),
            latency: PerTile::default(),
            marker_delay: DEFAULT_MARKER_DELAY,
            sysref_enable: SysrefEnable::Enable,
            dtc_set_pll: DtcSettings::new(DtcDomain::Pll, pll_codes, ref_tile),
            dtc_set_t1: DtcSettings::new(DtcDomain::T1, t1_codes, ref_tile),
        }
    }

    /// Re-initializes the config in place. See [`SyncConfig::new`].
    pub fn init(
        &mut self,
        pll_codes: Option<&PerTile<u8>>,
        t1_codes: Option<&PerTile<u8>>,
        ref_tile: TileId,
    ) {
        *self = Self::new(pll_codes, t1_codes, ref_tile);
    }

    /// Settings of `domain`.
    #[must_use]
    pub const fn dtc_settings(&self, domain: DtcDomain) -> &DtcSettings {
        match domain {
            DtcDomain::Pll => &self.dtc_set_pll,
            DtcDomain::T1 => &self.dtc_set_t1,
        }
    }

    /// Mutable settings of `domain`.
    pub fn dtc_settings_mut(&mut self, domain: DtcDomain) -> &mut DtcSettings {
        match domain {
            DtcDomain::Pll => &mut self.dtc_set_pll,
            DtcDomain::T1 => &mut self.dtc_set_t1,
        }
    }
}

/// Initializes `config` for a subsequent synchronization. See [`SyncConfig::new`].
pub fn multi_converter_init(
    config: &mut SyncConfig,
    pll_codes: Option<&PerTile<u8>>,
    t1_codes: Option<&PerTile<u8>>,
    ref_tile: TileId,
) {
    config.init(pll_codes, t1_codes, ref_tile);
}
