//! # Chunk Manager
//!
//! Decides, as the camera moves, which chunks must be generated. The set of
//! generated chunk keys only grows, and it is the only thing standing between a
//! chunk and duplicate geometry: a key is generated the first time the camera
//! enters its cell and never again.

use std::collections::HashSet;

use cgmath::Point3;
use log::info;

use super::{
    chunk::{ChunkExtent, ChunkKey},
    world::World,
    world_generator::WorldGenerator,
};

/// Tracks generated chunks and drives the world generator.
///
/// # Examples
///
/// ```ignore
/// let mut chunk_manager = ChunkManager::new(generator);
/// let mut world = World::new();
///
/// // Safe to call every frame: only the first call per chunk generates anything.
/// if chunk_manager.tick(camera.position, &mut world) {
///     // geometry changed, rebuild the combined mesh
/// }
/// ```
#[derive(Debug)]
pub struct ChunkManager {
    generator: WorldGenerator,
    generated_chunks: HashSet<ChunkKey>,
}

impl ChunkManager {
    pub fn new(generator: WorldGenerator) -> Self {
        Self {
            generator,
            generated_chunks: HashSet::new(),
        }
    }

    pub fn extent(&self) -> ChunkExtent {
        self.generator.extent()
    }

    /// Key of the chunk the camera stands in. The world is one layer of chunks
    /// deep, so the Y component is always 0.
    pub fn chunk_key_of(&self, position: Point3<f32>) -> ChunkKey {
        ChunkKey::from_world_position_flat(position, self.extent())
    }

    /// Generates the camera's chunk if it has not been generated yet.
    ///
    /// # Returns
    /// `true` if blocks were appended to `world` and the combined mesh is stale.
    pub fn tick(&mut self, camera_position: Point3<f32>, world: &mut World) -> bool {
        let key = self.chunk_key_of(camera_position);
        if self.generated_chunks.contains(&key) {
            return false;
        }

        world.append_blocks(self.generator.generate(key));
        self.generated_chunks.insert(key);
        info!(
            "Generated chunk {:?} ({} chunks, {} blocks)",
            key,
            self.generated_chunks.len(),
            world.len()
        );
        true
    }

    /// Whether `key` has already been generated.
    pub fn is_generated(&self, key: ChunkKey) -> bool {
        self.generated_chunks.contains(&key)
    }

    /// Number of generated chunks.
    pub fn generated_count(&self) -> usize {
        self.generated_chunks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cgmath::{Point3, Vector3};

    use crate::engine_state::{
        rendering::texture::AppearanceHandle,
        voxels::{
            block::{block_type::BlockType, catalog::BlockCatalog},
            chunk::{ChunkExtent, ChunkKey},
            world::World,
            world_generator::WorldGenerator,
        },
    };

    use super::ChunkManager;

    fn chunk_manager() -> ChunkManager {
        let catalog = BlockCatalog::new(HashMap::from([
            (BlockType::GRASS, AppearanceHandle::new(0)),
            (BlockType::STONE, AppearanceHandle::new(1)),
        ]))
        .unwrap();
        ChunkManager::new(WorldGenerator::new(
            ChunkExtent::new(4, 1, 4).unwrap(),
            Vector3::new(0.0, -5.0, 0.0),
            [1.0, 1.0, 1.0],
            catalog,
        ))
    }

    #[test]
    fn first_tick_generates_the_camera_chunk() {
        let mut chunk_manager = chunk_manager();
        let mut world = World::new();

        assert!(chunk_manager.tick(Point3::new(2.0, 5.0, 2.0), &mut world));
        assert!(chunk_manager.is_generated(ChunkKey::new(0, 0, 0)));
        assert_eq!(world.len(), 16);
    }

    #[test]
    fn repeated_ticks_in_the_same_chunk_do_nothing() {
        let mut chunk_manager = chunk_manager();
        let mut world = World::new();

        chunk_manager.tick(Point3::new(2.0, 5.0, 2.0), &mut world);
        for _ in 0..10 {
            assert!(!chunk_manager.tick(Point3::new(3.9, -20.0, 0.1), &mut world));
        }

        assert_eq!(chunk_manager.generated_count(), 1);
        assert_eq!(world.len(), 16);
    }

    #[test]
    fn crossing_into_a_new_chunk_generates_it() {
        let mut chunk_manager = chunk_manager();
        let mut world = World::new();

        chunk_manager.tick(Point3::new(2.0, 5.0, 2.0), &mut world);
        assert!(chunk_manager.tick(Point3::new(5.0, 5.0, 2.0), &mut world));

        assert!(chunk_manager.is_generated(ChunkKey::new(4, 0, 0)));
        assert_eq!(chunk_manager.generated_count(), 2);
        assert_eq!(world.len(), 32);
    }

    #[test]
    fn returning_to_a_visited_chunk_does_not_regenerate_it() {
        let mut chunk_manager = chunk_manager();
        let mut world = World::new();

        chunk_manager.tick(Point3::new(2.0, 0.0, 2.0), &mut world);
        chunk_manager.tick(Point3::new(-2.0, 0.0, 2.0), &mut world);
        assert!(!chunk_manager.tick(Point3::new(1.0, 0.0, 1.0), &mut world));

        assert_eq!(chunk_manager.generated_count(), 2);
        assert_eq!(world.len(), 32);
    }
}
