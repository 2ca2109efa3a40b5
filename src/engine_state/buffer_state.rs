//! # Buffer State Module
//!
//! A centralized registry of named GPU buffers.
//!
//! Buffers are referenced by a static name and can be created, replaced, written to
//! and removed. Replacing a buffer under an existing name drops the old one. The
//! registry also keeps per-buffer analytics (allocated bytes, used bytes, number of
//! writes) that are logged on request.

use std::collections::HashMap;

use anyhow::{bail, Context};
use log::debug;
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::{StResource, StSystem};

/// Analytics data for a GPU buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Actual memory used in the buffer in bytes (based on writes)
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// Central manager for GPU buffers
///
/// # Examples
///
/// ```ignore
/// let mut buffer_state = BufferState::new(device, queue);
///
/// buffer_state.create_buffer_init(
///     "vertex_buffer",
///     wgpu::util::BufferInitDescriptor {
///         label: Some("Vertex Buffer"),
///         contents: bytemuck::cast_slice(&vertices),
///         usage: wgpu::BufferUsages::VERTEX,
///     },
/// );
///
/// let vertex_buffer = buffer_state.get_buffer("vertex_buffer");
/// ```
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    /// Map of buffer names to buffer objects
    buffers: HashMap<&'static str, Buffer>,
    /// Analytics data for each buffer
    buffer_analytics: StResource<HashMap<&'static str, BufferAnalytics>>,
}

impl BufferState {
    /// Creates an empty buffer registry.
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: StResource::new(HashMap::new()),
        }
    }

    /// Creates a buffer initialized with data, replacing any buffer with the same name.
    ///
    /// # Arguments
    ///
    /// * `buffer_name` - Unique name for the buffer
    /// * `init_descriptor` - Buffer initialization descriptor with data
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let contents_size = init_descriptor.contents.len() as u64;
        let buffer = self.device.get().create_buffer_init(&init_descriptor);

        let buffer_analytics = BufferAnalytics {
            allocated_memory: buffer.size(),
            used_memory: contents_size,
            times_written: 1,
        };

        if self.buffers.insert(buffer_name, buffer).is_some() {
            debug!("Replaced buffer '{buffer_name}' ({contents_size} bytes)");
        }
        self.buffer_analytics
            .get_mut()
            .insert(buffer_name, buffer_analytics);
    }

    /// Writes data to an existing buffer at the given byte offset.
    ///
    /// # Errors
    ///
    /// Fails if the buffer does not exist or the write would go past its end.
    pub fn write_buffer(
        &self,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) -> anyhow::Result<()> {
        let buffer = self
            .buffers
            .get(buffer_name)
            .with_context(|| format!("no buffer named '{buffer_name}'"))?;
        let mut buffer_dictionary = self.buffer_analytics.get_mut();
        let buffer_analytics = buffer_dictionary.entry(buffer_name).or_default();

        let data_size = data.len() as u64;
        if offset + data_size > buffer.size() {
            bail!("buffer write out of bounds for buffer name '{buffer_name}'");
        }

        self.queue.get().write_buffer(buffer, offset, data);
        buffer_analytics.used_memory = buffer_analytics.used_memory.max(offset + data_size);
        buffer_analytics.times_written += 1;

        Ok(())
    }

    /// Drops the buffer with the given name, if any.
    pub fn remove_buffer(&mut self, buffer_name: &'static str) -> bool {
        self.buffer_analytics.get_mut().remove(buffer_name);
        self.buffers.remove(buffer_name).is_some()
    }

    /// Gets a reference to a buffer by name
    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    /// Gets the total allocated memory across all buffers in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.allocated_memory)
    }

    /// Gets the total used memory across all buffers in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.used_memory)
    }
}
