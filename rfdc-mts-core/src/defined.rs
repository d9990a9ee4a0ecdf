use std::time::Duration;

/// Maximum number of tiles of one converter type.
pub const MAX_TILES: usize = 4;

/// Number of codes of the digital-to-time converter.
pub const NUM_DTC_CODES: usize = 128;

/// Maximum FIFO delay in fabric words.
pub const MAX_FIFO_DELAY: u32 = 31;

/// Default marker delay written by [`SyncConfig::new`].
///
/// [`SyncConfig::new`]: crate::config::SyncConfig::new
pub const DEFAULT_MARKER_DELAY: u32 = 15;

/// Default minimum stable gap of a PLL domain DTC scan.
pub const MIN_GAP_PLL: u32 = 5;

/// Default minimum stable gap of a T1 domain DTC scan.
pub const MIN_GAP_T1: u32 = 10;

/// Default timeout of hardware waits.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Default interval between two polls of the hardware.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);
