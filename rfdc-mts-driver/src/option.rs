use std::time::Duration;

use rfdc_mts_core::{
    defined::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, MIN_GAP_PLL, MIN_GAP_T1},
    dtc::DtcDomain,
};

/// The option used in [`Rfdc`].
///
/// [`Rfdc`]: crate::Rfdc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MtsOption {
    /// Timeout of every hardware wait (SYSREF capture, marker detection, SYSREF frequency measurement).
    pub timeout: Duration,
    /// The duration between two polls of the hardware. If zero, the hardware is polled only once.
    pub poll_interval: Duration,
    /// Minimum stable gap of a PLL domain DTC scan.
    pub min_gap_pll: u32,
    /// Minimum stable gap of a T1 domain DTC scan.
    pub min_gap_t1: u32,
}

impl Default for MtsOption {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            min_gap_pll: MIN_GAP_PLL,
            min_gap_t1: MIN_GAP_T1,
        }
    }
}

impl MtsOption {
    /// Minimum stable gap of `domain`.
    #[must_use]
    pub const fn min_gap(&self, domain: DtcDomain) -> u32 {
        match domain {
            DtcDomain::Pll => self.min_gap_pll,
            DtcDomain::T1 => self.min_gap_t1,
        }
    }

    pub(crate) fn attempts(&self) -> u128 {
        if self.poll_interval.is_zero() {
            return 1;
        }
        self.timeout
            .as_nanos()
            .div_ceil(self.poll_interval.as_nanos())
            .max(1)
    }
}
