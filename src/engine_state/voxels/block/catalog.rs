//! # Block Catalog
//!
//! Produces the geometry and appearance of a single block placed at a given
//! transform. Appearances are resolved up front, one per block type, so placing a
//! block can never fail.

use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::{anyhow, Context};

use crate::{
    config::BlockConfig,
    engine_state::rendering::texture::{AppearanceHandle, TextureCache},
};

use super::{block_type::BlockType, BlockInstance, BlockTransform, RawGeometry};

/// Geometry and appearance for every block type.
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    geometry: Arc<RawGeometry>,
    appearances: HashMap<BlockType, AppearanceHandle>,
}

impl BlockCatalog {
    /// Creates a catalog from already resolved appearances.
    ///
    /// # Errors
    /// Fails if any block type has no appearance.
    pub fn new(appearances: HashMap<BlockType, AppearanceHandle>) -> anyhow::Result<Self> {
        for block_type in BlockType::all() {
            if !appearances.contains_key(&block_type) {
                return Err(anyhow!("no appearance resolved for {block_type} blocks"));
            }
        }

        Ok(Self {
            geometry: Arc::new(RawGeometry::unit_cube()),
            appearances,
        })
    }

    /// Resolves the configured texture of every block type through `textures`.
    ///
    /// # Errors
    /// Fails if any texture cannot be read or decoded.
    pub fn load(config: &BlockConfig, textures: &mut TextureCache) -> anyhow::Result<Self> {
        let mut appearances = HashMap::new();
        for block_type in BlockType::all() {
            let path: &Path = match block_type {
                BlockType::GRASS => &config.grass_texture,
                BlockType::STONE => &config.stone_texture,
            };
            let appearance = textures
                .resolve(path)
                .with_context(|| format!("resolving appearance of {block_type} blocks"))?;
            appearances.insert(block_type, appearance);
        }

        Self::new(appearances)
    }

    /// Appearance used by `block_type`.
    pub fn appearance(&self, block_type: BlockType) -> AppearanceHandle {
        self.appearances[&block_type]
    }

    /// Creates a block of `block_type` at `transform`.
    pub fn place(
        &self,
        block_type: BlockType,
        transform: BlockTransform,
        tint: [f32; 3],
    ) -> BlockInstance {
        BlockInstance {
            block_type,
            transform,
            tint,
            geometry: self.geometry.clone(),
            appearance: self.appearance(block_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use cgmath::Vector3;

    use crate::engine_state::{
        rendering::texture::AppearanceHandle,
        voxels::block::{block_type::BlockType, BlockTransform},
    };

    use super::BlockCatalog;

    fn catalog() -> BlockCatalog {
        BlockCatalog::new(HashMap::from([
            (BlockType::GRASS, AppearanceHandle::new(0)),
            (BlockType::STONE, AppearanceHandle::new(1)),
        ]))
        .unwrap()
    }

    #[test]
    fn missing_appearance_is_rejected() {
        let appearances = HashMap::from([(BlockType::GRASS, AppearanceHandle::new(0))]);
        assert!(BlockCatalog::new(appearances).is_err());
    }

    #[test]
    fn placed_blocks_share_geometry_and_carry_their_appearance() {
        let catalog = catalog();
        let transform = BlockTransform::at(Vector3::new(1.0, 2.0, 3.0));

        let grass = catalog.place(BlockType::GRASS, transform, [0.6, 0.0, 0.6]);
        let stone = catalog.place(BlockType::STONE, transform, [0.6, 0.0, 0.6]);

        assert!(Arc::ptr_eq(&grass.geometry, &stone.geometry));
        assert_eq!(grass.appearance, AppearanceHandle::new(0));
        assert_eq!(stone.appearance, AppearanceHandle::new(1));
        assert_eq!(stone.transform.translation, Vector3::new(1.0, 2.0, 3.0));
    }
}
