//! Texture handling for the rendering pipeline.
//!
//! This module provides:
//! - `TextureCache`: decodes block textures once per distinct path and keeps them as
//!   equally sized RGBA layers
//! - `AppearanceHandle`: the layer a block samples from
//! - `Texture`: GPU textures, including the depth buffer and the block texture array

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{imageops::FilterType, RgbaImage};
use log::{debug, info};
use wgpu::util::DeviceExt;

/// Width and height in pixels of every layer in the block texture array.
pub const TEXTURE_DIMENSION: u32 = 16;

/// Handle to a decoded block texture, expressed as its layer in the texture array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppearanceHandle(u32);

impl AppearanceHandle {
    pub fn new(layer: u32) -> Self {
        Self(layer)
    }

    /// Index of the layer in the block texture array.
    pub fn layer(&self) -> u32 {
        self.0
    }
}

/// Decoded block textures, deduplicated by path.
///
/// Every image is converted to RGBA8 and resized to `TEXTURE_DIMENSION` squared so
/// all of them fit into one texture array. Resolving the same path twice returns the
/// same handle without decoding again.
#[derive(Debug, Default)]
pub struct TextureCache {
    layers: Vec<RgbaImage>,
    handles: HashMap<PathBuf, AppearanceHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for the texture at `path`, decoding it on first use.
    ///
    /// # Errors
    /// Fails if the file cannot be opened or decoded.
    pub fn resolve(&mut self, path: &Path) -> anyhow::Result<AppearanceHandle> {
        if let Some(handle) = self.handles.get(path) {
            return Ok(*handle);
        }

        let decoded = image::open(path)
            .with_context(|| format!("decoding texture {}", path.display()))?
            .to_rgba8();

        let layer = if decoded.dimensions() == (TEXTURE_DIMENSION, TEXTURE_DIMENSION) {
            decoded
        } else {
            debug!(
                "Resizing texture {} from {:?} to {TEXTURE_DIMENSION}x{TEXTURE_DIMENSION}",
                path.display(),
                decoded.dimensions()
            );
            image::imageops::resize(&decoded, TEXTURE_DIMENSION, TEXTURE_DIMENSION, FilterType::Nearest)
        };

        let handle = AppearanceHandle::new(self.layers.len() as u32);
        self.layers.push(layer);
        self.handles.insert(path.to_path_buf(), handle);
        info!("Loaded texture {} as layer {}", path.display(), handle.layer());

        Ok(handle)
    }

    /// Number of distinct textures decoded so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers concatenated in layer order, ready for a layer-major upload.
    pub fn layer_major_bytes(&self) -> Vec<u8> {
        self.layers
            .iter()
            .flat_map(|layer| layer.as_raw().iter().copied())
            .collect()
    }
}

/// Represents a GPU texture with associated view and sampler.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for texture filtering and addressing.
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a new depth texture matching the surface size.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - The surface configuration containing dimensions
    /// * `label` - Debug label for the texture
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads every layer of `cache` into a single 2D array texture.
    ///
    /// The view is always a `D2Array` view, even when only one layer exists.
    pub fn create_block_texture_array(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cache: &TextureCache,
    ) -> anyhow::Result<Self> {
        if cache.is_empty() {
            anyhow::bail!("no block textures were loaded");
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Block Texture Array"),
                size: wgpu::Extent3d {
                    width: TEXTURE_DIMENSION,
                    height: TEXTURE_DIMENSION,
                    depth_or_array_layers: cache.len() as u32,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &cache.layer_major_bytes(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Block Texture Array View"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::{Rgba, RgbaImage};

    use super::{TextureCache, TEXTURE_DIMENSION};

    fn write_png(name: &str, width: u32, height: u32, pixel: [u8; 4]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("voxel_field_{}_{name}.png", std::process::id()));
        RgbaImage::from_pixel(width, height, Rgba(pixel))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn same_path_resolves_to_the_same_layer() {
        let grass = write_png("dedupe_grass", 16, 16, [0, 255, 0, 255]);
        let stone = write_png("dedupe_stone", 16, 16, [128, 128, 128, 255]);
        let mut cache = TextureCache::new();

        let first = cache.resolve(&grass).unwrap();
        let second = cache.resolve(&stone).unwrap();
        let again = cache.resolve(&grass).unwrap();

        assert_eq!(first.layer(), 0);
        assert_eq!(second.layer(), 1);
        assert_eq!(first, again);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn textures_are_resized_to_the_layer_dimension() {
        let large = write_png("resize", 64, 32, [10, 20, 30, 255]);
        let mut cache = TextureCache::new();

        cache.resolve(&large).unwrap();

        let bytes = cache.layer_major_bytes();
        assert_eq!(bytes.len(), (TEXTURE_DIMENSION * TEXTURE_DIMENSION * 4) as usize);
        assert_eq!(&bytes[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut cache = TextureCache::new();
        let error = cache
            .resolve(&std::env::temp_dir().join("voxel_field_does_not_exist.png"))
            .unwrap_err();

        assert!(format!("{error:#}").contains("decoding texture"));
        assert!(cache.is_empty());
    }
}
