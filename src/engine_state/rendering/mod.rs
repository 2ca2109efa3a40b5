//! Rendering system for the block field.
//!
//! This module contains everything between the combined mesh and the screen:
//! the texture cache, the vertex format, the mesh combiner, bind groups, pipelines
//! and the `MeshRendererManager` that implements [`RenderBackend`] with WebGPU.

use cgmath::{Matrix4, Point3};
use log::{debug, warn};
use pipeline_manager::PipelineManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceError};

use crate::core::StSystem;

use super::{
    buffer_state::BufferState,
    camera_state::camera::{CameraUniform, Projection},
};

pub mod backend;
mod bind_group_state;
pub mod meshing;
mod pipeline_manager;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use backend::RenderBackend;
pub use meshing::{CombinedMesh, MeshCombiner};
pub use vertex::Vertex;

use meshing::{COMBINED_INDEX_BUFFER_NAME, COMBINED_VERTEX_BUFFER_NAME};
use texture::TextureCache;

/// Name of the GPU buffer used for camera uniform data
pub const CAMERA_BUFFER_NAME: &str = "camera_buffer";

/// Owns the surface and all GPU resources used to draw the block field.
pub struct MeshRendererManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: StSystem<Device>,
    /// The WebGPU queue for submitting command buffers
    pub queue: StSystem<Queue>,
    /// Named GPU buffers
    pub buffer_state: StSystem<BufferState>,
    /// Manages the rendering pipeline and shaders
    pub pipeline_manager: PipelineManager,
    /// Camera projection settings
    pub camera_projection: Projection,
    /// CPU copy of the camera uniform
    camera_uniform: CameraUniform,
    /// Number of indices in the uploaded combined mesh
    index_count: u32,
    /// Whether edges are drawn instead of filled faces
    wireframe: bool,
}

impl MeshRendererManager {
    /// Creates the camera buffer, bind groups, depth texture and pipelines.
    ///
    /// # Arguments
    /// * `surface` - The configured WebGPU surface to render to
    /// * `surface_config` - Configuration for the surface
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `shader_string` - WGSL source code for the block shader
    /// * `textures` - Decoded block textures, uploaded once as a texture array
    /// * `camera_projection` - Initial camera projection settings
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        shader_string: &str,
        textures: &TextureCache,
        camera_projection: Projection,
    ) -> anyhow::Result<Self> {
        let buffer_state = StSystem::new(Box::new(BufferState::new(device.clone(), queue.clone())));

        let camera_uniform = CameraUniform::new();
        buffer_state.get_mut().create_buffer_init(
            CAMERA_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CAMERA_BUFFER_NAME),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let pipeline_manager = PipelineManager::new(
            device.clone(),
            queue.clone(),
            &surface_config,
            surface_config.format,
            buffer_state.clone(),
            shader_string,
            textures,
        )?;

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state,
            pipeline_manager,
            camera_projection,
            camera_uniform,
            index_count: 0,
            wireframe: false,
        })
    }

    /// Handles window resize events.
    ///
    /// Updates the surface configuration, camera projection and depth texture. A zero
    /// sized window (minimized) is ignored.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure_surface();

        self.camera_projection.resize(size.width, size.height);
        self.pipeline_manager
            .resize(&self.device, &self.surface_config);
    }

    fn reconfigure_surface(&self) {
        self.surface
            .configure(&self.device.get(), &self.surface_config);
    }

    /// Logs the buffer registry's memory usage.
    pub fn log_buffer_usage(&self) {
        let buffer_state = self.buffer_state.get();
        debug!(
            "GPU buffers: {} bytes allocated, {} bytes used",
            buffer_state.get_total_allocated_memory(),
            buffer_state.get_total_used_memory()
        );
    }
}

impl RenderBackend for MeshRendererManager {
    fn upload_mesh(&mut self, mesh: &CombinedMesh) {
        let mut buffer_state = self.buffer_state.get_mut();

        if mesh.is_empty() {
            buffer_state.remove_buffer(COMBINED_VERTEX_BUFFER_NAME);
            buffer_state.remove_buffer(COMBINED_INDEX_BUFFER_NAME);
            self.index_count = 0;
            return;
        }

        buffer_state.create_buffer_init(
            COMBINED_VERTEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(COMBINED_VERTEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        buffer_state.create_buffer_init(
            COMBINED_INDEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(COMBINED_INDEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(mesh.indices()),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        self.index_count = mesh.index_count();

        debug!(
            "Uploaded combined mesh: {} vertices, {} indices",
            mesh.vertices().len(),
            self.index_count
        );
        drop(buffer_state);
        self.log_buffer_usage();
    }

    fn set_view(&mut self, view: Matrix4<f32>, eye: Point3<f32>) {
        self.camera_uniform
            .update_view_proj_and_pos(view, eye, &self.camera_projection);

        if let Err(err) = self.buffer_state.get().write_buffer(
            CAMERA_BUFFER_NAME,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        ) {
            warn!("Failed to update camera buffer: {err:#}");
        }
    }

    fn set_wireframe(&mut self, enabled: bool) {
        if enabled && !self.pipeline_manager.meshing_renderer.supports_wireframe() {
            warn!("Wireframe requested but not supported by this device");
        }
        self.wireframe = enabled;
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        match self.pipeline_manager.render(
            &self.surface,
            &self.device,
            &self.queue,
            self.index_count,
            self.wireframe,
        ) {
            Ok(()) => Ok(()),
            Err(err @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                warn!("Surface {err}, reconfiguring and skipping frame");
                self.reconfigure_surface();
                Ok(())
            }
            Err(SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame, skipping it");
                Ok(())
            }
            Err(err) => Err(anyhow::anyhow!("failed to acquire the next frame: {err}")),
        }
    }
}
