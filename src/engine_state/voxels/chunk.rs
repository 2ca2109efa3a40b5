//! # Chunk Keys
//!
//! A chunk is a fixed-size, axis-aligned cell of world space and the unit of
//! on-demand generation. Each chunk is identified by a [`ChunkKey`]: the world
//! coordinate of its minimum corner, which is always a multiple of the extent.

use anyhow::bail;
use cgmath::{Point3, Vector3};

/// Largest absolute world coordinate a configured position may have.
///
/// Beyond this, `f32` positions are too coarse to place unit blocks.
pub const MAX_WORLD_COORDINATE: f32 = 1.0e6;

/// Size of a chunk in blocks along each axis. Every component is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkExtent {
    x: i32,
    y: i32,
    z: i32,
}

impl ChunkExtent {
    /// Creates a chunk extent.
    ///
    /// # Errors
    /// Fails if any component is zero or negative.
    pub fn new(x: i32, y: i32, z: i32) -> anyhow::Result<Self> {
        if x <= 0 || y <= 0 || z <= 0 {
            bail!("chunk extent must be positive on every axis, got ({x}, {y}, {z})");
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Number of blocks in one chunk.
    pub fn volume(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Iterates over every local block offset in the chunk, x fastest, then z, then y.
    pub fn offsets(&self) -> impl Iterator<Item = Vector3<i32>> {
        let (sx, sy, sz) = (self.x, self.y, self.z);
        (0..sy).flat_map(move |y| (0..sz).flat_map(move |z| (0..sx).map(move |x| Vector3::new(x, y, z))))
    }
}

/// Identity of a chunk: the world-space minimum corner of its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Maps a world position to the key of the chunk containing it.
    ///
    /// Uses floor division, so `-0.5` on an axis with extent 4 lands in the cell
    /// starting at `-4`, not the one starting at `0`.
    pub fn from_world_position(position: Point3<f32>, extent: ChunkExtent) -> Self {
        Self {
            x: floor_to_multiple(position.x, extent.x),
            y: floor_to_multiple(position.y, extent.y),
            z: floor_to_multiple(position.z, extent.z),
        }
    }

    /// Same as [`ChunkKey::from_world_position`] with the Y component pinned to 0,
    /// for a world that is a single flat layer of chunks.
    pub fn from_world_position_flat(position: Point3<f32>, extent: ChunkExtent) -> Self {
        Self {
            y: 0,
            ..Self::from_world_position(position, extent)
        }
    }

    /// The key as a world-space vector.
    pub fn origin(&self) -> Vector3<f32> {
        Vector3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Floors `value` to a multiple of `size`.
///
/// Cells past the `i32` range saturate to the outermost representable cell, so the
/// result is always a multiple of `size`.
fn floor_to_multiple(value: f32, size: i32) -> i32 {
    let size = i64::from(size);
    let cell = (f64::from(value) / size as f64).floor() as i64;
    let min_cell = i64::from(i32::MIN) / size;
    let max_cell = i64::from(i32::MAX) / size;
    (cell.clamp(min_cell, max_cell) * size) as i32
}
