//! Vertex data structures and layouts for block rendering.

/// A vertex of the combined block mesh.
///
/// Positions are already in world space; the block's model matrix is applied when
/// the mesh is combined, so the shader only multiplies by the camera's view-projection.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Color: [f32; 3] (12 bytes)
/// - Texture Index: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// World-space position
    position: [f32; 3],
    /// UV texture coordinates
    tex_coords: [f32; 2],
    /// Block tint
    color: [f32; 3],
    /// Layer of the block texture array
    texture_index: u32,
}

impl Vertex {
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], color: [f32; 3], texture_index: u32) -> Self {
        Self {
            position,
            tex_coords,
            color,
            texture_index,
        }
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn texture_index(&self) -> u32 {
        self.texture_index
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: color (vec3<f32>)
    /// - `location = 3`: texture_index (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}
