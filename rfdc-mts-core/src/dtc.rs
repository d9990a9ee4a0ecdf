use crate::converter::{PerTile, TileId};

/// Clock domain scanned by the digital-to-time converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DtcDomain {
    /// PLL reference clock domain.
    #[display("PLL")]
    Pll,
    /// T1 (data) clock domain.
    #[display("T1")]
    T1,
}

/// Scan mode of [`DtcSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ScanMode {
    /// Scan all codes and choose a new one.
    #[default]
    Init = 0,
    /// Apply previously stored codes without scanning.
    Reload = 1,
}

/// Settings and results of the DTC scan of one clock domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtcSettings {
    /// Tile acting as timing reference.
    pub ref_tile: TileId,
    /// Scanned clock domain.
    pub domain: DtcDomain,
    /// Code each tile aimed at. `None` until the tile was scanned.
    pub target: PerTile<Option<u8>>,
    /// Scan mode.
    pub scan_mode: ScanMode,
    /// Chosen or stored code. `None` if unknown.
    pub dtc_code: PerTile<Option<u8>>,
    /// Number of unstable windows found by the scan.
    pub num_windows: PerTile<u32>,
    /// Widest stable gap.
    pub max_gap: PerTile<u32>,
    /// Narrowest stable gap.
    pub min_gap: PerTile<u32>,
    /// Widest unstable window.
    pub max_overlap: PerTile<u32>,
}

impl DtcSettings {
    /// Creates settings for `domain`.
    ///
    /// If `codes` is given, the settings reload these codes, otherwise they request a fresh scan.
    #[must_use]
    pub fn new(domain: DtcDomain, codes: Option<&PerTile<u8>>, ref_tile: TileId) -> Self {
        Self {
            ref_tile,
            domain,
            target: PerTile::splat(None),
            scan_mode: if codes.is_some() {
                ScanMode::Reload
            } else {
                ScanMode::Init
            },
            dtc_code: codes.map_or(PerTile::splat(None), |codes| {
                PerTile(codes.map(Some))
            }),
            num_windows: PerTile::default(),
            max_gap: PerTile::default(),
            min_gap: PerTile::default(),
            max_overlap: PerTile::default(),
        }
    }

    /// Codes of all tiles, if every tile has one.
    #[must_use]
    pub fn codes(&self) -> Option<PerTile<u8>> {
        let mut codes = PerTile::default();
        for tile in TileId::all() {
            codes[tile] = self.dtc_code[tile]?;
        }
        Some(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_init() {
        let s = DtcSettings::new(DtcDomain::T1, None, TileId::T1);
        assert_eq!(ScanMode::Init, s.scan_mode);
        assert_eq!(DtcDomain::T1, s.domain);
        assert_eq!(TileId::T1, s.ref_tile);
        assert_eq!(PerTile::splat(None), s.dtc_code);
        assert_eq!(None, s.codes());
    }

    #[test]
    fn new_reload() {
        let codes = PerTile([1, 2, 3, 4]);
        let s = DtcSettings::new(DtcDomain::Pll, Some(&codes), TileId::T0);
        assert_eq!(ScanMode::Reload, s.scan_mode);
        assert_eq!(PerTile([Some(1), Some(2), Some(3), Some(4)]), s.dtc_code);
        assert_eq!(Some(codes), s.codes());
    }
}
