//! # Graphics Resources Builder
//!
//! Creates the window and the WebGPU context.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Builds them once the event loop is running and sends them back
//!   as a user event
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use log::info;
use wgpu::{Device, Features, Instance, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::config::WindowConfig;

/// Outcome of graphics initialization, delivered to the application as a user event.
pub type GraphicsResult = anyhow::Result<Graphics>;

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    pub window: Arc<Window>,
    #[allow(dead_code)]
    pub instance: Instance,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
}

/// Creates the window and surface, then returns a future that finishes the WebGPU setup.
///
/// `POLYGON_MODE_LINE` is requested only if the adapter offers it; without it the
/// wireframe toggle falls back to filled faces.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    window_config: &WindowConfig,
) -> anyhow::Result<impl Future<Output = GraphicsResult> + 'static> {
    let window_attrs = Window::default_attributes()
        .with_title(window_config.title.clone())
        .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

    let window = Arc::new(
        event_loop
            .create_window(window_attrs)
            .context("creating the window")?,
    );

    // The instance is a handle to our GPU
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .context("creating the window surface")?;

    Ok(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter found")?;

        let mut required_features = Features::empty();
        if adapter.features().contains(Features::POLYGON_MODE_LINE) {
            required_features |= Features::POLYGON_MODE_LINE;
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features,
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the GPU device")?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("the surface reports no supported formats")?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        info!(
            "Graphics ready on {} ({:?}), surface {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        Ok::<_, anyhow::Error>(Graphics {
            window,
            instance,
            surface,
            surface_config,
            device,
            queue,
        })
    })
}

/// Helper struct for building the graphics resources once the event loop is active.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
    window_config: WindowConfig,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume so the window can be created
    Builder(GraphicsBuilder),

    /// Graphics resources are ready but not yet handed to the engine
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the event loop
    /// * `window_config` - Size and title of the window to create
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, window_config: WindowConfig) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            window_config,
        }
    }

    /// Builds the graphics resources and sends the result to the event loop.
    ///
    /// Does nothing if the resources were already built.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let graphics = create_graphics(event_loop, &self.window_config).and_then(pollster::block_on);

        if event_loop_proxy.send_event(graphics).is_err() {
            event_loop.exit();
        }
    }
}
