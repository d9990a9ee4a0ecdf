#![warn(missing_docs)]

//! Emulator of an RF data converter for testing multi-tile synchronization without hardware.

mod emulator;
mod tile;

pub use emulator::RfdcEmulator;
pub use tile::TileEmulator;
