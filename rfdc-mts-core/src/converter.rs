use std::ops::{Index, IndexMut};

use derive_more::{Deref, DerefMut, Display};

use crate::{defined::MAX_TILES, error::MtsError};

/// Converter type of a tile group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ConverterType {
    /// Analog-to-digital converter tiles.
    #[display("ADC")]
    Adc = 0,
    /// Digital-to-analog converter tiles.
    #[display("DAC")]
    Dac = 1,
}

impl ConverterType {
    /// Both converter types.
    pub const ALL: [ConverterType; 2] = [ConverterType::Adc, ConverterType::Dac];
}

impl TryFrom<u32> for ConverterType {
    type Error = MtsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConverterType::Adc),
            1 => Ok(ConverterType::Dac),
            v => Err(MtsError::InvalidConverterType(v)),
        }
    }
}

/// Identifier of a tile in `0..MAX_TILES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[display("{}", _0)]
pub struct TileId(u8);

impl TileId {
    /// Tile 0
    pub const T0: TileId = TileId(0);
    /// Tile 1
    pub const T1: TileId = TileId(1);
    /// Tile 2
    pub const T2: TileId = TileId(2);
    /// Tile 3
    pub const T3: TileId = TileId(3);

    /// Returns the raw index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Iterates over all tile ids in ascending order.
    pub fn all() -> impl Iterator<Item = TileId> {
        (0..MAX_TILES as u8).map(TileId)
    }
}

impl TryFrom<u32> for TileId {
    type Error = MtsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (value as usize) < MAX_TILES {
            Ok(TileId(value as u8))
        } else {
            Err(MtsError::InvalidTile(value))
        }
    }
}

impl From<TileId> for u32 {
    fn from(value: TileId) -> Self {
        value.0 as u32
    }
}

impl From<TileId> for usize {
    fn from(value: TileId) -> Self {
        value.0 as usize
    }
}

/// Bitmask of tiles, bit `n` selects tile `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct TileMask(u32);

bitflags::bitflags! {
    impl TileMask : u32 {
        const NONE  = 0;
        const TILE0 = 1 << 0;
        const TILE1 = 1 << 1;
        const TILE2 = 1 << 2;
        const TILE3 = 1 << 3;
    }
}

impl TileMask {
    /// Mask selecting a single tile.
    #[must_use]
    pub const fn from_tile(tile: TileId) -> Self {
        Self(1 << tile.0)
    }

    /// Check if `tile` is selected.
    #[must_use]
    pub const fn contains_tile(&self, tile: TileId) -> bool {
        (self.0 & (1 << tile.0)) != 0
    }

    /// Iterates over the selected tiles in ascending order.
    pub fn tiles(self) -> impl Iterator<Item = TileId> {
        TileId::all().filter(move |&tile| self.contains_tile(tile))
    }

    /// Iterates over the selected tiles, `first` leading if it is selected.
    pub fn tiles_from(self, first: TileId) -> impl Iterator<Item = TileId> {
        self.contains_tile(first)
            .then_some(first)
            .into_iter()
            .chain(self.tiles().filter(move |&tile| tile != first))
    }
}

impl From<TileId> for TileMask {
    fn from(tile: TileId) -> Self {
        Self::from_tile(tile)
    }
}

impl FromIterator<TileId> for TileMask {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TileMask::NONE, |acc, tile| acc | TileMask::from_tile(tile))
    }
}

/// A value for each of the [`MAX_TILES`] tiles, indexed by [`TileId`].
///
/// Only the slots selected by the governing [`TileMask`] carry meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deref, DerefMut)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerTile<T>(pub [T; MAX_TILES]);

impl<T: Copy> PerTile<T> {
    /// Fills every slot with `value`.
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self([value; MAX_TILES])
    }
}

impl<T> PerTile<T> {
    /// Iterates over the slots selected by `mask`.
    pub fn masked(&self, mask: TileMask) -> impl Iterator<Item = (TileId, &T)> + '_ {
        TileId::all()
            .filter(move |&tile| mask.contains_tile(tile))
            .map(move |tile| (tile, &self[tile]))
    }
}

impl<T> From<[T; MAX_TILES]> for PerTile<T> {
    fn from(value: [T; MAX_TILES]) -> Self {
        Self(value)
    }
}

impl<T> Index<TileId> for PerTile<T> {
    type Output = T;

    fn index(&self, tile: TileId) -> &Self::Output {
        &self.0[tile.0 as usize]
    }
}

impl<T> IndexMut<TileId> for PerTile<T> {
    fn index_mut(&mut self, tile: TileId) -> &mut Self::Output {
        &mut self.0[tile.0 as usize]
    }
}
