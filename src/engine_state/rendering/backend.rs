//! The seam between the engine's frame logic and the GPU.
//!
//! `EngineState` only issues commands through [`RenderBackend`]. The wgpu
//! implementation is [`MeshRendererManager`](super::MeshRendererManager); tests
//! drive the same frame logic against a backend that records the calls.

use cgmath::{Matrix4, Point3};

use super::meshing::CombinedMesh;

/// Commands the frame loop issues to a renderer.
pub trait RenderBackend {
    /// Replaces the GPU copy of the combined mesh. The previous buffers are released.
    fn upload_mesh(&mut self, mesh: &CombinedMesh);

    /// Sets the view matrix and eye position used by the next draw.
    fn set_view(&mut self, view: Matrix4<f32>, eye: Point3<f32>);

    /// Switches between filled faces and triangle edges.
    fn set_wireframe(&mut self, enabled: bool);

    /// Draws the uploaded mesh with a single indexed draw call and presents the frame.
    fn draw(&mut self) -> anyhow::Result<()>;
}
