//! # Block Module
//!
//! A block is one placed cube. This module holds the per-block data the world
//! generator produces and the raw cube geometry every block shares.
//!
//! Raw geometry is a flat `f32` array with a fixed stride: three position floats
//! followed, when the stride allows, by two texture-coordinate floats.

use std::sync::Arc;

use cgmath::{Matrix4, Vector3};

use crate::engine_state::rendering::texture::AppearanceHandle;

use block_type::BlockType;

pub mod block_type;
pub mod catalog;

/// Floats per vertex in the unit cube: position (3) + texture coordinates (2).
pub const CUBE_FLOATS_PER_VERTEX: usize = 5;
/// Vertices in the unit cube: four per face, six faces.
pub const CUBE_VERTEX_COUNT: usize = 24;
/// Indices in the unit cube: two triangles per face, six faces.
pub const CUBE_INDEX_COUNT: usize = 36;

#[rustfmt::skip]
const CUBE_VERTICES: [f32; CUBE_VERTEX_COUNT * CUBE_FLOATS_PER_VERTEX] = [
    // Back
    1.0, 1.0, 0.0,  1.0, 1.0,
    1.0, 0.0, 0.0,  1.0, 0.0,
    0.0, 0.0, 0.0,  0.0, 0.0,
    0.0, 1.0, 0.0,  0.0, 1.0,
    // Front
    0.0, 1.0, 1.0,  0.0, 1.0,
    0.0, 0.0, 1.0,  0.0, 0.0,
    1.0, 0.0, 1.0,  1.0, 0.0,
    1.0, 1.0, 1.0,  1.0, 1.0,
    // Right
    1.0, 1.0, 1.0,  1.0, 1.0,
    1.0, 0.0, 1.0,  1.0, 0.0,
    1.0, 0.0, 0.0,  0.0, 0.0,
    1.0, 1.0, 0.0,  0.0, 1.0,
    // Left
    0.0, 1.0, 0.0,  0.0, 1.0,
    0.0, 0.0, 0.0,  0.0, 0.0,
    0.0, 0.0, 1.0,  1.0, 0.0,
    0.0, 1.0, 1.0,  1.0, 1.0,
    // Top
    0.0, 1.0, 1.0,  0.0, 1.0,
    1.0, 1.0, 1.0,  1.0, 1.0,
    1.0, 1.0, 0.0,  1.0, 0.0,
    0.0, 1.0, 0.0,  0.0, 0.0,
    // Bottom
    0.0, 0.0, 1.0,  0.0, 1.0,
    0.0, 0.0, 0.0,  0.0, 0.0,
    1.0, 0.0, 0.0,  1.0, 0.0,
    1.0, 0.0, 1.0,  1.0, 1.0,
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; CUBE_INDEX_COUNT] = [
    0, 1, 3, 3, 1, 2,       // Back
    4, 5, 7, 7, 5, 6,       // Front
    8, 9, 11, 11, 9, 10,    // Right
    12, 13, 15, 15, 13, 14, // Left
    16, 17, 19, 19, 17, 18, // Top
    20, 21, 23, 23, 21, 22, // Bottom
];

/// Raw, untransformed vertex and index arrays for one block.
///
/// Indices are local: they address vertices of this geometry only.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeometry {
    vertices: Vec<f32>,
    indices: Vec<u32>,
    floats_per_vertex: usize,
}

impl RawGeometry {
    /// Creates raw geometry from flat arrays.
    ///
    /// # Panics
    /// Panics if the stride is smaller than a position, if the vertex array is not
    /// a whole number of vertices, or if an index addresses a missing vertex.
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>, floats_per_vertex: usize) -> Self {
        assert!(floats_per_vertex >= 3, "a vertex needs at least a position");
        assert_eq!(
            vertices.len() % floats_per_vertex,
            0,
            "vertex array is not a whole number of vertices"
        );
        let vertex_count = vertices.len() / floats_per_vertex;
        assert!(
            indices.iter().all(|&index| (index as usize) < vertex_count),
            "index out of range of the geometry's own vertices"
        );

        Self {
            vertices,
            indices,
            floats_per_vertex,
        }
    }

    /// The 24-vertex, 36-index unit cube spanning `[0, 1]` on every axis.
    pub fn unit_cube() -> Self {
        Self::new(
            CUBE_VERTICES.to_vec(),
            CUBE_INDICES.to_vec(),
            CUBE_FLOATS_PER_VERTEX,
        )
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.floats_per_vertex
    }

    /// Number of vertices, derived from the float count and the stride.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.floats_per_vertex
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> [f32; 3] {
        let start = index * self.floats_per_vertex;
        [
            self.vertices[start],
            self.vertices[start + 1],
            self.vertices[start + 2],
        ]
    }

    /// Texture coordinates of vertex `index`, or `[0, 0]` for position-only layouts.
    pub fn tex_coords(&self, index: usize) -> [f32; 2] {
        if self.floats_per_vertex < 5 {
            return [0.0, 0.0];
        }
        let start = index * self.floats_per_vertex + 3;
        [self.vertices[start], self.vertices[start + 1]]
    }
}

/// World-space placement of a block: scale first, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTransform {
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl BlockTransform {
    /// A unit-scale transform at `translation`.
    pub fn at(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Model matrix mapping the raw geometry into world space.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// One placed cube.
///
/// Block instances are created by the world generator and never change
/// afterwards. All blocks of the same kind share one geometry allocation.
#[derive(Debug, Clone)]
pub struct BlockInstance {
    pub block_type: BlockType,
    pub transform: BlockTransform,
    /// Constant tint, linear RGB
    pub tint: [f32; 3],
    pub geometry: Arc<RawGeometry>,
    pub appearance: AppearanceHandle,
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Transform, Vector3};

    use super::{BlockTransform, RawGeometry, CUBE_INDEX_COUNT, CUBE_VERTEX_COUNT};

    #[test]
    fn unit_cube_has_fixed_topology() {
        let cube = RawGeometry::unit_cube();
        assert_eq!(cube.vertex_count(), CUBE_VERTEX_COUNT);
        assert_eq!(cube.indices().len(), CUBE_INDEX_COUNT);
        assert_eq!(cube.floats_per_vertex(), 5);
        assert_eq!(*cube.indices().iter().max().unwrap(), 23);
    }

    #[test]
    fn attribute_accessors_follow_the_stride() {
        let cube = RawGeometry::unit_cube();
        assert_eq!(cube.position(1), [1.0, 0.0, 0.0]);
        assert_eq!(cube.tex_coords(1), [1.0, 0.0]);

        let positions_only = RawGeometry::new(vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0], vec![0, 1, 1], 3);
        assert_eq!(positions_only.vertex_count(), 2);
        assert_eq!(positions_only.position(1), [1.0, 2.0, 3.0]);
        assert_eq!(positions_only.tex_coords(1), [0.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn geometry_rejects_dangling_indices() {
        RawGeometry::new(vec![0.0; 9], vec![0, 1, 3], 3);
    }

    #[test]
    fn model_matrix_scales_then_translates() {
        let transform = BlockTransform {
            translation: Vector3::new(10.0, -5.0, 2.0),
            scale: Vector3::new(2.0, 1.0, 3.0),
        };
        let corner = transform.model_matrix().transform_point(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(corner, Point3::new(12.0, -4.0, 5.0));
    }
}
