use std::ops::Range;

use getset::{CopyGetters, Setters};
use rfdc_mts_core::{dtc::DtcDomain, marker::MarkerReading};

/// Emulated converter tile.
///
/// The SYSREF capture of a DTC code is unstable if the code falls into one of the unstable ranges
/// of its domain. The marker location is measured at the FIFO input, so it does not depend on the
/// FIFO delay.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters, Setters)]
pub struct TileEmulator {
    /// Whether the tile is powered up.
    #[getset(get_copy = "pub", set = "pub")]
    enabled: bool,
    /// Whether the IP of the tile is ready.
    #[getset(get_copy = "pub", set = "pub")]
    ip_ready: bool,
    /// Whether the tile uses its internal PLL.
    #[getset(get_copy = "pub", set = "pub")]
    pll_enabled: bool,
    /// Samples per fabric word.
    #[getset(get_copy = "pub", set = "pub")]
    fabric_factor: u32,
    /// Marker location in samples.
    #[getset(get_copy = "pub", set = "pub")]
    base_latency: u32,
    /// Marker count reported once detection completes.
    #[getset(get_copy = "pub", set = "pub")]
    marker_count: u32,
    /// If set, the gate ignores writes.
    #[getset(get_copy = "pub", set = "pub")]
    gate_stuck: bool,
    /// If set, marker detection never completes.
    #[getset(get_copy = "pub", set = "pub")]
    marker_stalled: bool,
    /// If set, no SYSREF edge arrives at the tile.
    #[getset(get_copy = "pub", set = "pub")]
    sysref_lost: bool,
    /// If set, reading the SYSREF capture status fails.
    #[getset(get_copy = "pub", set = "pub")]
    capture_unreadable: bool,
    /// Programmed FIFO delay in fabric words.
    #[getset(get_copy = "pub")]
    fifo_delay: u32,
    /// Whether the tile participates in multi-tile synchronization.
    #[getset(get_copy = "pub")]
    mts_enable: bool,
    /// SYSREF gate.
    #[getset(get_copy = "pub")]
    sysref_gate: bool,
    /// Marker delay of the last arm.
    #[getset(get_copy = "pub")]
    marker_delay: u32,
    /// Whether marker detection was started.
    #[getset(get_copy = "pub")]
    marker_armed: bool,
    unstable: [Vec<Range<u8>>; 2],
    dtc_code: [u8; 2],
    num_samples: [usize; 2],
}

const fn domain_idx(domain: DtcDomain) -> usize {
    match domain {
        DtcDomain::Pll => 0,
        DtcDomain::T1 => 1,
    }
}

impl TileEmulator {
    /// Creates an enabled tile with a fabric factor of 8, a latency of 64 samples and one unstable
    /// window per domain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ip_ready: true,
            pll_enabled: true,
            fabric_factor: 8,
            base_latency: 64,
            marker_count: 1,
            gate_stuck: false,
            marker_stalled: false,
            sysref_lost: false,
            capture_unreadable: false,
            fifo_delay: 0,
            mts_enable: false,
            sysref_gate: false,
            marker_delay: 0,
            marker_armed: false,
            unstable: [vec![40..46], vec![90..98]],
            dtc_code: [0; 2],
            num_samples: [0; 2],
        }
    }

    /// Unstable DTC code ranges of `domain`.
    #[must_use]
    pub fn unstable(&self, domain: DtcDomain) -> &[Range<u8>] {
        &self.unstable[domain_idx(domain)]
    }

    /// Replaces the unstable DTC code ranges of `domain`.
    pub fn set_unstable(&mut self, domain: DtcDomain, ranges: Vec<Range<u8>>) -> &mut Self {
        self.unstable[domain_idx(domain)] = ranges;
        self
    }

    /// Currently applied DTC code of `domain`.
    #[must_use]
    pub const fn dtc_code(&self, domain: DtcDomain) -> u8 {
        self.dtc_code[domain_idx(domain)]
    }

    /// Number of times SYSREF was sampled in `domain`.
    #[must_use]
    pub const fn num_samples(&self, domain: DtcDomain) -> usize {
        self.num_samples[domain_idx(domain)]
    }

    /// Latency of the tile output including the FIFO delay, in samples.
    #[must_use]
    pub const fn latency(&self) -> u32 {
        self.base_latency + self.fifo_delay * self.fabric_factor
    }

    pub(crate) fn set_dtc_code(&mut self, domain: DtcDomain, code: u8) {
        self.dtc_code[domain_idx(domain)] = code;
    }

    pub(crate) fn sample_sysref(&mut self, domain: DtcDomain) -> bool {
        let idx = domain_idx(domain);
        self.num_samples[idx] += 1;
        let code = self.dtc_code[idx];
        self.unstable[idx].iter().any(|r| r.contains(&code))
    }

    pub(crate) fn write_sysref_gate(&mut self, enable: bool) {
        if !self.gate_stuck {
            self.sysref_gate = enable;
        }
    }

    pub(crate) const fn sysref_captured(&self) -> bool {
        self.sysref_gate && !self.sysref_lost
    }

    pub(crate) const fn write_mts_enable(&mut self, enable: bool) {
        self.mts_enable = enable;
    }

    pub(crate) const fn write_fifo_delay(&mut self, delay: u32) {
        self.fifo_delay = delay;
    }

    pub(crate) const fn arm_marker(&mut self, marker_delay: u32) {
        self.marker_armed = true;
        self.marker_delay = marker_delay;
    }

    pub(crate) fn read_marker(&self) -> Option<MarkerReading> {
        (self.marker_armed && self.sysref_gate && !self.marker_stalled)
            .then(|| MarkerReading::new(self.marker_count, self.base_latency))
    }
}

impl Default for TileEmulator {
    fn default() -> Self {
        Self::new()
    }
}
