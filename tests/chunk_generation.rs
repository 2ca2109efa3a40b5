//! Properties of chunk keys and chunk generation over arbitrary camera paths.

use std::collections::{HashMap, HashSet};

use cgmath::{InnerSpace, Point3, Vector3};
use proptest::prelude::*;

use voxel_field::engine_state::{
    camera_state::camera::{Camera, CameraController, CameraPose},
    rendering::texture::AppearanceHandle,
    voxels::{
        block::{block_type::BlockType, catalog::BlockCatalog},
        chunk::{ChunkExtent, ChunkKey},
        chunk_manager::ChunkManager,
        world::World,
        world_generator::WorldGenerator,
    },
};

fn chunk_manager(extent: ChunkExtent) -> ChunkManager {
    let catalog = BlockCatalog::new(HashMap::from([
        (BlockType::GRASS, AppearanceHandle::new(0)),
        (BlockType::STONE, AppearanceHandle::new(1)),
    ]))
    .unwrap();
    let generator = WorldGenerator::new(extent, Vector3::new(0.0, -5.0, 0.0), [0.6, 0.0, 0.6], catalog);
    ChunkManager::new(generator)
}

fn extent() -> impl Strategy<Value = ChunkExtent> {
    (1..=16i32, 1..=4i32, 1..=16i32).prop_map(|(x, y, z)| ChunkExtent::new(x, y, z).unwrap())
}

proptest! {
    #[test]
    fn positions_in_one_cell_share_a_key(
        extent in extent(),
        cell in (-50..50i32, -5..5i32, -50..50i32),
        fraction in (0.0..0.999f32, 0.0..0.999f32, 0.0..0.999f32),
    ) {
        let corner = Point3::new(
            (cell.0 * extent.x()) as f32,
            (cell.1 * extent.y()) as f32,
            (cell.2 * extent.z()) as f32,
        );
        let inside = corner + Vector3::new(
            fraction.0 * extent.x() as f32,
            fraction.1 * extent.y() as f32,
            fraction.2 * extent.z() as f32,
        );

        let key = ChunkKey::from_world_position(inside, extent);

        prop_assert_eq!(key, ChunkKey::from_world_position(corner, extent));
        prop_assert_eq!(key, ChunkKey::new(
            cell.0 * extent.x(),
            cell.1 * extent.y(),
            cell.2 * extent.z(),
        ));
    }

    #[test]
    fn every_chunk_is_generated_at_most_once(
        extent in extent(),
        path in proptest::collection::vec((-40.0..40.0f32, -3.0..3.0f32, -40.0..40.0f32), 1..64),
    ) {
        let mut chunk_manager = chunk_manager(extent);
        let mut world = World::new();
        let mut visited = HashSet::new();

        for (x, y, z) in path {
            let position = Point3::new(x, y, z);
            let key = chunk_manager.chunk_key_of(position);
            let first_visit = visited.insert(key);

            prop_assert_eq!(chunk_manager.tick(position, &mut world), first_visit);
            prop_assert!(chunk_manager.is_generated(key));
        }

        prop_assert_eq!(chunk_manager.generated_count(), visited.len());
        prop_assert_eq!(world.len(), visited.len() * extent.volume());
    }

    #[test]
    fn pitch_stays_clamped_and_front_stays_unit_length(
        samples in proptest::collection::vec((-5000.0..5000.0f64, -5000.0..5000.0f64), 1..64),
        sensitivity in 0.01..2.0f32,
    ) {
        let pose = CameraPose {
            position: Point3::new(0.0, 0.0, 5.0),
            yaw: cgmath::Deg(-90.0),
            pitch: cgmath::Deg(0.0),
        };
        let mut camera = Camera::new(pose, 0.05, sensitivity);
        let mut controller = CameraController::new(0.05, 0.35);

        for sample in samples {
            controller.apply_look(&mut camera, sample);

            prop_assert!(camera.pitch().0 >= -89.0 && camera.pitch().0 <= 89.0);
            prop_assert!((camera.front().magnitude() - 1.0).abs() < 1e-4);
        }
    }
}
