//! # Voxel Field
//!
//! Everything that decides what blocks exist.
//!
//! ## Architecture
//!
//! * **Block**: one placed cube, its raw geometry and the catalog that creates it
//! * **Chunk**: chunk extents and the keys identifying chunk cells
//! * **World Generator**: fills a chunk with blocks
//! * **Chunk Manager**: generates the camera's chunk the first time it is entered
//! * **World**: the list of every generated block
//!
//! ## Data Flow
//!
//! 1. The chunk manager maps the camera position to a chunk key
//! 2. Unseen keys are handed to the world generator
//! 3. The generated blocks are appended to the world
//! 4. The combined mesh is rebuilt from the world's block list

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod world;
pub mod world_generator;
