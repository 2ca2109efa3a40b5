//! # World Generator
//!
//! Decides which blocks a chunk contains. Generation is a pure function of the
//! chunk key: the chunk is filled completely, with grass on its top layer and
//! stone on every layer below.

use cgmath::Vector3;
use log::debug;

use super::{
    block::{block_type::BlockType, catalog::BlockCatalog, BlockInstance, BlockTransform},
    chunk::{ChunkExtent, ChunkKey},
};

/// Fills chunks with blocks.
///
/// Calling [`WorldGenerator::generate`] twice for the same key yields the same
/// blocks twice; [`ChunkManager`](super::chunk_manager::ChunkManager) is what keeps
/// that from happening.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    extent: ChunkExtent,
    vertical_bias: Vector3<f32>,
    tint: [f32; 3],
    catalog: BlockCatalog,
}

impl WorldGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `extent` - Chunk size in blocks
    /// * `vertical_bias` - Offset added to every block position, used to sink the field below the camera
    /// * `tint` - Tint given to every block
    /// * `catalog` - Source of block geometry and appearance
    pub fn new(
        extent: ChunkExtent,
        vertical_bias: Vector3<f32>,
        tint: [f32; 3],
        catalog: BlockCatalog,
    ) -> Self {
        Self {
            extent,
            vertical_bias,
            tint,
            catalog,
        }
    }

    pub fn extent(&self) -> ChunkExtent {
        self.extent
    }

    /// Returns every block of the chunk identified by `key`.
    pub fn generate(&self, key: ChunkKey) -> Vec<BlockInstance> {
        let top_layer = self.extent.y() - 1;
        let origin = key.origin() + self.vertical_bias;

        let blocks: Vec<BlockInstance> = self
            .extent
            .offsets()
            .map(|offset| {
                let block_type = if offset.y == top_layer {
                    BlockType::GRASS
                } else {
                    BlockType::STONE
                };
                let translation =
                    origin + Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32);
                self.catalog
                    .place(block_type, BlockTransform::at(translation), self.tint)
            })
            .collect();

        debug!("Generated {} blocks for chunk {:?}", blocks.len(), key);
        blocks
    }
}
