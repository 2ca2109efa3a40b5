//! Mesh combination for block rendering.
//!
//! Every block carries its own small vertex and index arrays. The renderer wants one
//! vertex buffer and one index buffer so the whole field is drawn with a single
//! indexed draw call. `MeshCombiner` merges the per-block arrays:
//!
//! 1. Each vertex position is multiplied by the block's model matrix, and the block's
//!    tint and texture layer are written into the vertex.
//! 2. Each local index is increased by the running vertex offset.
//! 3. The offset advances by the block's own vertex count, so blocks with different
//!    vertex layouts can be mixed.
//!
//! The combined mesh is rebuilt wholesale whenever the block list changes.

use cgmath::{Point3, Transform};
use log::debug;

use crate::engine_state::voxels::block::BlockInstance;

use super::vertex::Vertex;

mod renderer;

pub use renderer::*;

/// Name of the combined vertex buffer in the buffer state
pub const COMBINED_VERTEX_BUFFER_NAME: &str = "combined_vertex_buffer";
/// Name of the combined index buffer in the buffer state
pub const COMBINED_INDEX_BUFFER_NAME: &str = "combined_index_buffer";

/// One vertex sequence and one index sequence covering every block.
///
/// Every index is smaller than the number of vertices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CombinedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    /// Running vertex offset recorded after each block
    block_offsets: Vec<u32>,
}

impl CombinedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one block, renumbering its indices past the vertices already present.
    pub fn append_block(&mut self, block: &BlockInstance) {
        let model = block.transform.model_matrix();
        let geometry = &block.geometry;
        let layer = block.appearance.layer();
        let offset = self.vertex_offset();
        let first_new_index = self.indices.len();

        for vertex in 0..geometry.vertex_count() {
            let [x, y, z] = geometry.position(vertex);
            let world = model.transform_point(Point3::new(x, y, z));
            self.vertices.push(Vertex::new(
                world.into(),
                geometry.tex_coords(vertex),
                block.tint,
                layer,
            ));
        }

        self.indices
            .extend(geometry.indices().iter().map(|index| index + offset));

        let next_offset = offset + geometry.vertex_count() as u32;
        self.block_offsets.push(next_offset);

        debug_assert_eq!(next_offset as usize, self.vertices.len());
        debug_assert!(
            self.indices[first_new_index..]
                .iter()
                .all(|&index| index < next_offset),
            "combined index past the end of the vertex buffer"
        );
    }

    /// Removes all geometry while keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.block_offsets.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex offset recorded after each block, in block order.
    ///
    /// The entry for block `k` is the total vertex count of blocks `0..=k`.
    pub fn block_offsets(&self) -> &[u32] {
        &self.block_offsets
    }

    /// Offset the next appended block's indices will be shifted by.
    pub fn vertex_offset(&self) -> u32 {
        self.block_offsets.last().copied().unwrap_or(0)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Rebuilds the combined mesh from the world's block list.
///
/// The combiner keeps its mesh between rebuilds so the vertex and index
/// allocations are reused as the field grows.
#[derive(Debug, Default)]
pub struct MeshCombiner {
    mesh: CombinedMesh,
}

impl MeshCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the previous mesh and combines `blocks` in list order.
    pub fn rebuild(&mut self, blocks: &[BlockInstance]) -> &CombinedMesh {
        self.mesh.clear();

        let vertex_total: usize = blocks.iter().map(|block| block.geometry.vertex_count()).sum();
        let index_total: usize = blocks.iter().map(|block| block.geometry.indices().len()).sum();
        self.mesh.vertices.reserve(vertex_total);
        self.mesh.indices.reserve(index_total);
        self.mesh.block_offsets.reserve(blocks.len());

        for block in blocks {
            self.mesh.append_block(block);
        }

        debug!(
            "Combined {} blocks into {} vertices and {} indices",
            blocks.len(),
            self.mesh.vertices.len(),
            self.mesh.indices.len()
        );

        &self.mesh
    }

    /// The most recently built mesh.
    pub fn mesh(&self) -> &CombinedMesh {
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Vector3;
    use proptest::prelude::*;

    use crate::engine_state::{
        rendering::texture::AppearanceHandle,
        voxels::block::{
            block_type::BlockType, BlockInstance, BlockTransform, RawGeometry, CUBE_INDEX_COUNT,
            CUBE_VERTEX_COUNT,
        },
    };

    use super::MeshCombiner;

    fn block_with(geometry: Arc<RawGeometry>, at: Vector3<f32>, layer: u32) -> BlockInstance {
        BlockInstance {
            block_type: BlockType::STONE,
            transform: BlockTransform::at(at),
            tint: [0.6, 0.0, 0.6],
            geometry,
            appearance: AppearanceHandle::new(layer),
        }
    }

    fn cube_at(at: Vector3<f32>) -> BlockInstance {
        block_with(Arc::new(RawGeometry::unit_cube()), at, 0)
    }

    #[test]
    fn two_cubes_share_one_buffer() {
        let blocks = vec![
            cube_at(Vector3::new(0.0, 0.0, 0.0)),
            cube_at(Vector3::new(1.0, 0.0, 0.0)),
        ];
        let mut combiner = MeshCombiner::new();
        let mesh = combiner.rebuild(&blocks);

        assert_eq!(mesh.vertices().len(), 2 * CUBE_VERTEX_COUNT);
        assert_eq!(mesh.indices().len(), 2 * CUBE_INDEX_COUNT);
        assert_eq!(mesh.block_offsets(), &[24, 48]);

        let (first, second) = mesh.indices().split_at(CUBE_INDEX_COUNT);
        for (a, b) in first.iter().zip(second) {
            assert_eq!(*b, *a + 24);
        }
    }

    #[test]
    fn vertices_are_pre_transformed_and_tagged() {
        let blocks = vec![block_with(
            Arc::new(RawGeometry::unit_cube()),
            Vector3::new(3.0, -5.0, 7.0),
            1,
        )];
        let mut combiner = MeshCombiner::new();
        let mesh = combiner.rebuild(&blocks);

        let vertex = mesh.vertices()[1];
        assert_eq!(vertex.position(), [4.0, -5.0, 7.0]);
        assert_eq!(vertex.tex_coords(), [1.0, 0.0]);
        assert_eq!(vertex.color(), [0.6, 0.0, 0.6]);
        assert_eq!(vertex.texture_index(), 1);
    }

    #[test]
    fn heterogeneous_layouts_advance_by_their_own_vertex_count() {
        let triangle = Arc::new(RawGeometry::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
            3,
        ));
        let blocks = vec![
            block_with(triangle, Vector3::new(0.0, 0.0, 0.0), 0),
            cube_at(Vector3::new(0.0, 0.0, 0.0)),
        ];
        let mut combiner = MeshCombiner::new();
        let mesh = combiner.rebuild(&blocks);

        assert_eq!(mesh.block_offsets(), &[3, 27]);
        assert_eq!(mesh.indices()[3], 3);
        assert_eq!(mesh.vertices().len(), 27);
    }

    #[test]
    fn rebuild_replaces_the_previous_mesh() {
        let mut combiner = MeshCombiner::new();
        combiner.rebuild(&[cube_at(Vector3::new(0.0, 0.0, 0.0))]);
        let mesh = combiner.rebuild(&[]);

        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_offset(), 0);
        assert!(combiner.mesh().vertices().is_empty());
    }

    proptest! {
        #[test]
        fn offsets_are_prefix_sums_and_indices_stay_in_range(
            layouts in proptest::collection::vec(prop_oneof![Just(3usize), Just(5usize)], 0..24)
        ) {
            let cube = Arc::new(RawGeometry::unit_cube());
            let triangle = Arc::new(RawGeometry::new(
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                vec![0, 1, 2],
                3,
            ));
            let blocks: Vec<_> = layouts
                .iter()
                .enumerate()
                .map(|(i, stride)| {
                    let geometry = if *stride == 5 { cube.clone() } else { triangle.clone() };
                    block_with(geometry, Vector3::new(i as f32, 0.0, 0.0), 0)
                })
                .collect();

            let mut combiner = MeshCombiner::new();
            let mesh = combiner.rebuild(&blocks);

            let mut running = 0u32;
            for (block, offset) in blocks.iter().zip(mesh.block_offsets()) {
                running += block.geometry.vertex_count() as u32;
                prop_assert_eq!(*offset, running);
            }
            prop_assert_eq!(mesh.vertices().len() as u32, running);
            prop_assert!(mesh.indices().iter().all(|&index| index < running));
        }
    }
}
