//! # Block Type Module
//!
//! The kinds of block the world generator can place.

use std::fmt;

/// Enumerates all block kinds in the voxel field.
///
/// Each kind has its own appearance, resolved once at startup by the
/// [`BlockCatalog`](super::catalog::BlockCatalog).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Surface block, placed on the top layer of every chunk.
    GRASS,

    /// Filler block, placed on every layer below the surface.
    STONE,
}

impl BlockType {
    /// Returns every block type, in declaration order.
    pub fn all() -> [BlockType; 2] {
        [BlockType::GRASS, BlockType::STONE]
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::GRASS => "grass",
            BlockType::STONE => "stone",
        };
        write!(f, "{name}")
    }
}
