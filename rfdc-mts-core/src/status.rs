/// Status of a multi-tile synchronization operation.
///
/// Every flag is an independent failure cause and any combination may be
/// reported by a single call. [`MtsStatus::OK`] (no flag set) means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct MtsStatus(u32);

bitflags::bitflags! {
    impl MtsStatus : u32 {
        const OK                = 0;
        const NOT_SUPPORTED     = 1 << 0;
        const TIMEOUT           = 1 << 1;
        const MARKER_RUN        = 1 << 2;
        const MARKER_MISM       = 1 << 3;
        const DELAY_OVER        = 1 << 4;
        const TARGET_LOW        = 1 << 5;
        const IP_NOT_READY      = 1 << 6;
        const DTC_INVALID       = 1 << 7;
        const NOT_ENABLED       = 1 << 9;
        const SYSREF_GATE_ERROR = 1 << 11;
        const SYSREF_FREQ_NDONE = 1 << 12;
        const BAD_REF_TILE      = 1 << 13;
    }
}

impl MtsStatus {
    /// Check if no failure flag is set.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.is_empty()
    }

    /// Converts the status into a [`Result`].
    pub fn into_result(self) -> Result<(), crate::error::MtsError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(crate::error::MtsError::Status(self))
        }
    }

    /// Human readable description of the set flags, one per flag.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> {
        self.iter().filter_map(|flag| {
            Some(match flag {
                MtsStatus::NOT_SUPPORTED => "Multi-Tile-Sync not supported",
                MtsStatus::TIMEOUT => "Multi-Tile-Sync timed out",
                MtsStatus::MARKER_RUN => "Marker detection still running",
                MtsStatus::MARKER_MISM => "Marker readings mismatch across tiles",
                MtsStatus::DELAY_OVER => "Required delay exceeds the FIFO delay range",
                MtsStatus::TARGET_LOW => "Target latency is lower than the measured latency",
                MtsStatus::IP_NOT_READY => "RF data converter IP not ready",
                MtsStatus::DTC_INVALID => "DTC invalid",
                MtsStatus::NOT_ENABLED => "Multi-Tile-Sync is not enabled",
                MtsStatus::SYSREF_GATE_ERROR => "Sysref gate error",
                MtsStatus::SYSREF_FREQ_NDONE => "Sysref frequency error",
                MtsStatus::BAD_REF_TILE => "Bad reference tile",
                _ => return None,
            })
        })
    }
}

impl std::fmt::Display for MtsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_ok() {
            return write!(f, "Multi-Tile-Sync completed successfully");
        }
        write!(f, "{}", self.messages().collect::<Vec<_>>().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[test]
    #[case(0, MtsStatus::OK)]
    #[case(1, MtsStatus::NOT_SUPPORTED)]
    #[case(2, MtsStatus::TIMEOUT)]
    #[case(4, MtsStatus::MARKER_RUN)]
    #[case(8, MtsStatus::MARKER_MISM)]
    #[case(16, MtsStatus::DELAY_OVER)]
    #[case(32, MtsStatus::TARGET_LOW)]
    #[case(64, MtsStatus::IP_NOT_READY)]
    #[case(128, MtsStatus::DTC_INVALID)]
    #[case(512, MtsStatus::NOT_ENABLED)]
    #[case(2048, MtsStatus::SYSREF_GATE_ERROR)]
    #[case(4096, MtsStatus::SYSREF_FREQ_NDONE)]
    #[case(8192, MtsStatus::BAD_REF_TILE)]
    fn bits(#[case] expected: u32, #[case] status: MtsStatus) {
        assert_eq!(expected, status.bits());
    }

    #[test]
    fn compose() {
        let status = MtsStatus::from_bits_retain(2 | 8);
        assert!(status.contains(MtsStatus::TIMEOUT));
        assert!(status.contains(MtsStatus::MARKER_MISM));
        assert!(!status.contains(MtsStatus::MARKER_RUN));
        assert_eq!(MtsStatus::TIMEOUT, status & MtsStatus::TIMEOUT);
        assert_eq!(MtsStatus::MARKER_MISM, status & MtsStatus::MARKER_MISM);
    }

    #[test]
    fn display() {
        assert_eq!(
            "Multi-Tile-Sync completed successfully",
            MtsStatus::OK.to_string()
        );
        assert_eq!(
            "Multi-Tile-Sync timed out, Bad reference tile",
            (MtsStatus::TIMEOUT | MtsStatus::BAD_REF_TILE).to_string()
        );
    }

    #[test]
    fn into_result() {
        assert!(MtsStatus::OK.into_result().is_ok());
        assert_eq!(
            Err(crate::error::MtsError::Status(MtsStatus::DTC_INVALID)),
            MtsStatus::DTC_INVALID.into_result()
        );
    }
}
