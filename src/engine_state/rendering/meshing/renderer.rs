//! Combined mesh renderer.
//!
//! Owns the render pipelines for block geometry and records the single indexed
//! draw call against the combined vertex and index buffers.
//!
//! Two pipelines are created from the same shader module: a filled one and, when the
//! device supports `POLYGON_MODE_LINE`, a wireframe one that draws triangle edges in
//! the block tint.

use anyhow::Context;
use log::warn;
use wgpu::{Device, Features, RenderPass, RenderPipeline, ShaderModule, TextureFormat};

use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::BufferState,
        rendering::{
            bind_group_state::{
                BindGroupState, CAMERA_BIND_GROUP, CAMERA_BIND_GROUP_LAYOUT, TEXTURE_BIND_GROUP,
                TEXTURE_BIND_GROUP_LAYOUT,
            },
            Vertex,
        },
    },
};

use super::{COMBINED_INDEX_BUFFER_NAME, COMBINED_VERTEX_BUFFER_NAME};

/// Renders the combined block mesh.
pub struct MeshingRenderer {
    /// Pipeline drawing filled, textured triangles
    fill_pipeline: RenderPipeline,
    /// Pipeline drawing triangle edges, if the device supports it
    wireframe_pipeline: Option<RenderPipeline>,
    /// Shared state for buffer management
    buffer_state: StSystem<BufferState>,
    /// Shared state for bind group management
    bind_group_state: StSystem<BindGroupState>,
}

impl MeshingRenderer {
    /// Creates a new `MeshingRenderer` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `shader_string` - The WGSL shader source code
    /// * `texture_format` - The surface texture format
    /// * `bind_group_state` - State for managing bind groups
    /// * `depth_stencil` - Optional depth stencil state
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        texture_format: TextureFormat,
        bind_group_state: StSystem<BindGroupState>,
        depth_stencil: Option<wgpu::DepthStencilState>,
    ) -> anyhow::Result<Self> {
        let device_ref = device.get();

        let pipeline_layout = {
            let bind_groups = bind_group_state.get();
            let camera_layout = bind_groups
                .get_bind_group_layout(CAMERA_BIND_GROUP_LAYOUT)
                .context("camera bind group layout is missing")?;
            let texture_layout = bind_groups
                .get_bind_group_layout(TEXTURE_BIND_GROUP_LAYOUT)
                .context("texture bind group layout is missing")?;
            device_ref.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Block Render Pipeline Layout"),
                bind_group_layouts: &[camera_layout, texture_layout],
                push_constant_ranges: &[],
            })
        };

        let shader = device_ref.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Block Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_string.into()),
        });

        let fill_pipeline = Self::create_pipeline(
            &device_ref,
            &pipeline_layout,
            &shader,
            texture_format,
            depth_stencil.clone(),
            wgpu::PolygonMode::Fill,
        );

        let wireframe_pipeline = if device_ref.features().contains(Features::POLYGON_MODE_LINE) {
            Some(Self::create_pipeline(
                &device_ref,
                &pipeline_layout,
                &shader,
                texture_format,
                depth_stencil,
                wgpu::PolygonMode::Line,
            ))
        } else {
            warn!("POLYGON_MODE_LINE is not supported, wireframe mode is unavailable");
            None
        };

        Ok(Self {
            fill_pipeline,
            wireframe_pipeline,
            buffer_state,
            bind_group_state,
        })
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &ShaderModule,
        texture_format: TextureFormat,
        depth_stencil: Option<wgpu::DepthStencilState>,
        polygon_mode: wgpu::PolygonMode,
    ) -> RenderPipeline {
        let (label, fragment_entry_point, cull_mode) = match polygon_mode {
            wgpu::PolygonMode::Fill => ("Block Render Pipeline", "fs_main", Some(wgpu::Face::Back)),
            _ => ("Block Wireframe Pipeline", "fs_wireframe", None),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry_point),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Whether a wireframe pipeline exists on this device.
    pub fn supports_wireframe(&self) -> bool {
        self.wireframe_pipeline.is_some()
    }

    /// Draws the combined mesh with one indexed draw call.
    ///
    /// Does nothing until a non-empty mesh has been uploaded. Falls back to the filled
    /// pipeline when wireframe is requested but unsupported.
    pub fn render(&self, render_pass: &mut RenderPass<'_>, index_count: u32, wireframe: bool) {
        if index_count == 0 {
            return;
        }

        let buffer_state = self.buffer_state.get();
        let (Some(vertex_buffer), Some(index_buffer)) = (
            buffer_state.get_buffer(COMBINED_VERTEX_BUFFER_NAME),
            buffer_state.get_buffer(COMBINED_INDEX_BUFFER_NAME),
        ) else {
            return;
        };

        let bind_groups = self.bind_group_state.get();
        let (Some(camera_bind_group), Some(texture_bind_group)) = (
            bind_groups.get_bind_group(CAMERA_BIND_GROUP),
            bind_groups.get_bind_group(TEXTURE_BIND_GROUP),
        ) else {
            return;
        };

        let pipeline = match (&self.wireframe_pipeline, wireframe) {
            (Some(wireframe_pipeline), true) => wireframe_pipeline,
            _ => &self.fill_pipeline,
        };
        render_pass.set_pipeline(pipeline);

        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, texture_bind_group, &[]);

        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..index_count, 0, 0..1);
    }
}
