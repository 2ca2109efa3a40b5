//! # World Module
//!
//! The world is the flat list of every block generated so far. Blocks are only
//! ever appended; the list is dropped as a whole at teardown.

use super::block::BlockInstance;

/// All blocks currently in the voxel field, in generation order.
///
/// # Examples
///
/// ```
/// use voxel_field::engine_state::voxels::world::World;
///
/// let world = World::new();
/// assert!(world.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct World {
    blocks: Vec<BlockInstance>,
}

impl World {
    /// Creates a world with no blocks.
    pub fn new() -> Self {
        World { blocks: Vec::new() }
    }

    /// Appends newly generated blocks after every existing block.
    pub fn append_blocks(&mut self, blocks: Vec<BlockInstance>) {
        self.blocks.extend(blocks);
    }

    /// Every block, in the order it was generated.
    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
