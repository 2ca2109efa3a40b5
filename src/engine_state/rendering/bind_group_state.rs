//! Manages WebGPU bind groups and their layouts.
//!
//! Bind groups and layouts are stored by name so pipelines and renderers can look
//! them up without owning them.

use std::collections::HashMap;

use anyhow::Context;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue};

use crate::{core::StSystem, engine_state::buffer_state::BufferState};

use super::{
    texture::{Texture, TextureCache},
    CAMERA_BUFFER_NAME,
};

/// Name of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Name of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Name of the texture bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Name of the texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";

/// Named registry of bind groups and their layouts.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, wgpu::BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, wgpu::BindGroupLayout>,
    /// Keeps the block texture array alive for as long as its bind group exists
    #[allow(dead_code)]
    block_textures: Texture,
}

impl BindGroupState {
    /// Creates the camera and block texture bind groups.
    ///
    /// The camera uniform buffer must already exist in `buffer_state`.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `queue` - The WebGPU queue for the texture upload
    /// * `textures` - Decoded block textures, one array layer each
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        queue: StSystem<Queue>,
        textures: &TextureCache,
    ) -> anyhow::Result<Self> {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let device = device.get();

        let (camera_bind_group, camera_bind_group_layout) =
            Self::generate_camera_bindgroups(&device, &buffer_state.get())?;

        bind_groups.insert(CAMERA_BIND_GROUP, camera_bind_group);
        bind_group_layouts.insert(CAMERA_BIND_GROUP_LAYOUT, camera_bind_group_layout);

        let block_textures = Texture::create_block_texture_array(&device, &queue.get(), textures)?;
        let (texture_bind_group, texture_bind_group_layout) =
            Self::generate_texture_bindgroups(&device, &block_textures);

        bind_groups.insert(TEXTURE_BIND_GROUP, texture_bind_group);
        bind_group_layouts.insert(TEXTURE_BIND_GROUP_LAYOUT, texture_bind_group_layout);

        Ok(Self {
            bind_groups,
            bind_group_layouts,
            block_textures,
        })
    }

    /// Retrieves a bind group by name.
    pub fn get_bind_group(&self, name: &'static str) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(name)
    }

    /// Retrieves a bind group layout by name.
    pub fn get_bind_group_layout(&self, name: &'static str) -> Option<&wgpu::BindGroupLayout> {
        self.bind_group_layouts.get(name)
    }

    /// Creates the bind group for the camera uniform, visible to both shader stages.
    fn generate_camera_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
    ) -> anyhow::Result<(BindGroup, BindGroupLayout)> {
        let camera_buffer = buffer_state
            .get_buffer(CAMERA_BUFFER_NAME)
            .context("camera buffer must be created before its bind group")?;

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(CAMERA_BIND_GROUP_LAYOUT),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some(CAMERA_BIND_GROUP),
        });

        Ok((camera_bind_group, camera_bind_group_layout))
    }

    /// Creates the bind group for the block texture array and its sampler.
    fn generate_texture_bindgroups(
        device: &Device,
        block_textures: &Texture,
    ) -> (BindGroup, BindGroupLayout) {
        let texture_array_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // This should match the filterable field of the corresponding Texture entry above.
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(TEXTURE_BIND_GROUP_LAYOUT),
            });

        let texture_array_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_array_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&block_textures.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&block_textures.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        });

        (texture_array_bind_group, texture_array_bind_group_layout)
    }
}
