use std::ops::Range;

use itertools::Itertools;
use rfdc_mts_core::{
    backend::{BackendError, RfdcBackend},
    converter::{ConverterType, TileId, TileMask},
    defined::NUM_DTC_CODES,
    dtc::{DtcSettings, ScanMode},
    error::MtsError,
    sleep::Sleeper,
    status::MtsStatus,
};

use crate::{rfdc::TileState, Rfdc};

/// Result of sampling SYSREF at every DTC code.
///
/// Runs of codes where the capture was unstable are windows, runs of stable codes are gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtcScan {
    unstable: Vec<bool>,
    windows: Vec<Range<usize>>,
    gaps: Vec<Range<usize>>,
}

impl DtcScan {
    /// Splits the samples into windows and gaps.
    #[must_use]
    pub fn new(unstable: &[bool]) -> Self {
        let mut windows = Vec::new();
        let mut gaps = Vec::new();
        for (is_unstable, run) in &unstable.iter().enumerate().chunk_by(|&(_, &u)| u) {
            let mut run = run.map(|(i, _)| i);
            let start = run.next().unwrap_or_default();
            let range = start..start + 1 + run.count();
            if is_unstable {
                windows.push(range);
            } else {
                gaps.push(range);
            }
        }
        Self {
            unstable: unstable.to_vec(),
            windows,
            gaps,
        }
    }

    /// Number of unstable windows.
    #[must_use]
    pub fn num_windows(&self) -> u32 {
        self.windows.len() as u32
    }

    /// Widest unstable window.
    #[must_use]
    pub fn max_overlap(&self) -> u32 {
        self.windows.iter().map(|w| w.len()).max().unwrap_or(0) as u32
    }

    /// Widest stable gap.
    #[must_use]
    pub fn max_gap(&self) -> u32 {
        self.gaps.iter().map(|g| g.len()).max().unwrap_or(0) as u32
    }

    /// Narrowest stable gap.
    #[must_use]
    pub fn min_gap(&self) -> u32 {
        self.gaps.iter().map(|g| g.len()).min().unwrap_or(0) as u32
    }

    /// Centre of the widest gap, the lowest one on ties.
    #[must_use]
    pub fn widest_gap_center(&self) -> Option<u8> {
        self.gaps
            .iter()
            .rev()
            .max_by_key(|g| g.len())
            .map(|g| (g.start + g.len() / 2) as u8)
    }

    /// Distance from `code` to the closest unstable code. `usize::MAX` if no code is unstable.
    #[must_use]
    pub fn clearance(&self, code: usize) -> usize {
        self.unstable
            .iter()
            .positions(|&u| u)
            .map(|i| i.abs_diff(code))
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Stable code closest to `target` that keeps at least `margin` codes away from every unstable
    /// code, the lower one on ties.
    #[must_use]
    pub fn nearest_stable(&self, target: u8, margin: u32) -> Option<u8> {
        (0..self.unstable.len())
            .filter(|&code| self.clearance(code) >= (margin as usize).max(1))
            .min_by_key(|&code| (code.abs_diff(target as usize), code))
            .map(|code| code as u8)
    }
}

impl<B: RfdcBackend, S: Sleeper> Rfdc<B, S> {
    /// Runs the DTC scan of `settings.domain` on `tile`.
    ///
    /// With [`ScanMode::Reload`] the stored code is applied; with [`ScanMode::Init`] every code is
    /// sampled and the chosen code and window statistics are written into `settings`.
    pub fn dtc_scan(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        settings: &mut DtcSettings,
    ) -> Result<(), MtsError> {
        self.ensure_is_open()?;
        let tiles = TileMask::from_tile(tile);
        self.set_state(ty, tiles, TileState::Scanning);
        let res = self.scan_tile(ty, tile, settings);
        if res.is_err() {
            self.set_state(ty, tiles, TileState::Failed);
        }
        res
    }

    pub(crate) fn scan_tile(
        &mut self,
        ty: ConverterType,
        tile: TileId,
        settings: &mut DtcSettings,
    ) -> Result<(), MtsError> {
        let domain = settings.domain;
        match settings.scan_mode {
            ScanMode::Reload => {
                let Some(code) = settings.dtc_code[tile].filter(|&c| (c as usize) < NUM_DTC_CODES)
                else {
                    tracing::warn!("No valid {} DTC code to reload for {} tile {}.", domain, ty, tile);
                    return Err(MtsStatus::DTC_INVALID.into());
                };
                tracing::debug!("Reloading {} DTC code {} of {} tile {}.", domain, code, ty, tile);
                self.backend_mut().set_dtc_code(ty, tile, domain, code)?;
                Ok(())
            }
            ScanMode::Init => {
                tracing::debug!("Scanning {} DTC of {} tile {}.", domain, ty, tile);
                let unstable = (0..NUM_DTC_CODES as u8)
                    .map(|code| {
                        self.backend_mut().set_dtc_code(ty, tile, domain, code)?;
                        let unstable = self.backend_mut().is_sysref_unstable(ty, tile, domain)?;
                        tracing::trace!("{} DTC code {}: unstable = {}", domain, code, unstable);
                        Ok(unstable)
                    })
                    .collect::<Result<Vec<_>, BackendError>>()?;

                let scan = DtcScan::new(&unstable);
                settings.num_windows[tile] = scan.num_windows();
                settings.max_gap[tile] = scan.max_gap();
                settings.min_gap[tile] = scan.min_gap();
                settings.max_overlap[tile] = scan.max_overlap();
                tracing::debug!(
                    "{} DTC scan of {} tile {}: windows = {}, max gap = {}, min gap = {}, max overlap = {}",
                    domain,
                    ty,
                    tile,
                    scan.num_windows(),
                    scan.max_gap(),
                    scan.min_gap(),
                    scan.max_overlap()
                );

                let ref_tile = settings.ref_tile;
                let target = match settings.target[ref_tile] {
                    Some(target) if tile != ref_tile => Some(target),
                    _ => scan.widest_gap_center(),
                };
                let min_gap = self.option.min_gap(domain);
                let code = target
                    .filter(|_| scan.max_gap() >= min_gap)
                    .and_then(|target| scan.nearest_stable(target, min_gap / 2));

                match (target, code) {
                    (Some(target), Some(code)) => {
                        self.backend_mut().set_dtc_code(ty, tile, domain, code)?;
                        settings.target[tile] = Some(target);
                        settings.dtc_code[tile] = Some(code);
                        tracing::debug!(
                            "{} DTC code of {} tile {} set to {} (target {}).",
                            domain,
                            ty,
                            tile,
                            code,
                            target
                        );
                        Ok(())
                    }
                    _ => {
                        settings.dtc_code[tile] = None;
                        tracing::warn!("No valid {} DTC code found for {} tile {}.", domain, ty, tile);
                        Err(MtsStatus::DTC_INVALID.into())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(len: usize, unstable: &[Range<usize>]) -> Vec<bool> {
        (0..len)
            .map(|i| unstable.iter().any(|r| r.contains(&i)))
            .collect()
    }

    #[test]
    fn windows_and_gaps() {
        let scan = DtcScan::new(&flags(32, &[4..8, 20..23]));
        assert_eq!(2, scan.num_windows());
        assert_eq!(4, scan.max_overlap());
        assert_eq!(12, scan.max_gap());
        assert_eq!(4, scan.min_gap());
        assert_eq!(Some(14), scan.widest_gap_center());
    }

    #[test]
    fn all_stable() {
        let scan = DtcScan::new(&flags(NUM_DTC_CODES, &[]));
        assert_eq!(0, scan.num_windows());
        assert_eq!(0, scan.max_overlap());
        assert_eq!(NUM_DTC_CODES as u32, scan.max_gap());
        assert_eq!(Some(64), scan.widest_gap_center());
        assert_eq!(usize::MAX, scan.clearance(0));
        assert_eq!(Some(10), scan.nearest_stable(10, 5));
    }

    #[test]
    fn all_unstable() {
        let scan = DtcScan::new(&flags(16, &[0..16]));
        assert_eq!(1, scan.num_windows());
        assert_eq!(0, scan.max_gap());
        assert_eq!(0, scan.min_gap());
        assert_eq!(None, scan.widest_gap_center());
        assert_eq!(None, scan.nearest_stable(8, 0));
    }

    #[test]
    fn widest_gap_center_ties_lowest() {
        let scan = DtcScan::new(&flags(21, &[10..11]));
        assert_eq!(Some(5), scan.widest_gap_center());
    }

    #[rstest::rstest]
    #[test]
    #[case(Some(14), 14, 2)]
    #[case(Some(9), 6, 2)]
    #[case(Some(18), 21, 2)]
    #[case(Some(11), 6, 4)]
    #[case(Some(29), 6, 7)]
    #[case(None, 6, 10)]
    fn nearest_stable(#[case] expected: Option<u8>, #[case] target: u8, #[case] margin: u32) {
        let scan = DtcScan::new(&flags(32, &[4..8, 20..23]));
        assert_eq!(expected, scan.nearest_stable(target, margin));
    }
}
