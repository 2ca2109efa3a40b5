//! Manages the WebGPU render pass and the resources shared by block rendering.
//!
//! The pipeline manager owns the bind groups, the depth texture and the
//! `MeshingRenderer`. Each frame it acquires the surface texture, opens one render
//! pass with color and depth attachments, lets the meshing renderer record its draw
//! call, then submits and presents.

use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceError, TextureFormat};

use crate::{core::StSystem, engine_state::buffer_state::BufferState};

use super::{
    bind_group_state::BindGroupState,
    meshing::MeshingRenderer,
    texture::{self, TextureCache},
};

/// Background color behind the block field
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Coordinates the render pass and the resources shared by the renderers.
pub struct PipelineManager {
    /// Manages all bind groups used in the pipeline
    pub bind_group_state: StSystem<BindGroupState>,
    /// Shared state for buffer management
    pub buffer_state: StSystem<BufferState>,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    /// Renderer for the combined block mesh
    pub meshing_renderer: MeshingRenderer,
}

impl PipelineManager {
    /// Creates a new `PipelineManager` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for resource uploads
    /// * `config` - Surface configuration containing size and format
    /// * `texture_format` - The texture format to use for rendering
    /// * `buffer_state` - Shared state for buffer management
    /// * `shader_string` - The WGSL shader source code for block rendering
    /// * `textures` - Decoded block textures
    pub fn new(
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        textures: &TextureCache,
    ) -> anyhow::Result<Self> {
        let bind_group_state = StSystem::new(Box::new(BindGroupState::new(
            device.clone(),
            buffer_state.clone(),
            queue,
            textures,
        )?));

        let depth_texture =
            texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");

        let depth_stencil = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let meshing_renderer = MeshingRenderer::new(
            device,
            buffer_state.clone(),
            shader_string,
            texture_format,
            bind_group_state.clone(),
            depth_stencil,
        )?;

        Ok(Self {
            bind_group_state,
            buffer_state,
            depth_texture,
            meshing_renderer,
        })
    }

    /// Renders a frame to the given surface.
    ///
    /// # Arguments
    /// * `surface` - The target surface to render to
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for command submission
    /// * `index_count` - Number of indices in the uploaded combined mesh
    /// * `wireframe` - Whether to draw triangle edges instead of filled faces
    ///
    /// # Errors
    /// Returns the surface error if the next frame could not be acquired.
    pub fn render(
        &self,
        surface: &Surface,
        device: &StSystem<Device>,
        queue: &StSystem<Queue>,
        index_count: u32,
        wireframe: bool,
    ) -> Result<(), SurfaceError> {
        let frame = surface.get_current_texture()?;

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.get().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Block Render Encoder"),
        });
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Block Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });

            self.meshing_renderer.render(&mut rpass, index_count, wireframe);
        }

        queue.get().submit([encoder.finish()]);
        frame.present();

        Ok(())
    }

    /// Recreates the depth texture to match a resized surface.
    pub fn resize(&mut self, device: &StSystem<Device>, config: &SurfaceConfiguration) {
        self.depth_texture =
            texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");
    }
}
