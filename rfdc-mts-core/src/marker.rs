use derive_new::new;

use crate::converter::{PerTile, TileId};

/// Marker reading of a single tile.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerReading {
    /// Number of marker occurrences observed.
    pub count: u32,
    /// Location of the marker in samples.
    pub loc: u32,
}

/// Marker detection result of a tile group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MtsMarker {
    /// Number of marker occurrences observed per tile.
    pub count: PerTile<u32>,
    /// Location of the marker in samples per tile.
    pub loc: PerTile<u32>,
}

impl MtsMarker {
    /// Stores the reading of `tile`.
    pub fn record(&mut self, tile: TileId, reading: MarkerReading) {
        self.count[tile] = reading.count;
        self.loc[tile] = reading.loc;
    }
}
