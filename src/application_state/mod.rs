//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Loading configuration, textures and the shader before the window opens
//! - Window and graphics initialization
//! - Input handling and focus tracking
//! - Running one engine frame per redraw and applying its window requests

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use anyhow::Context;
use cgmath::Deg;
use graphics_resources_builder::{Graphics, GraphicsResult, MaybeGraphics};
use input_manager::{FocusChange, InputManager};
use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::EngineConfig,
    core::StSystem,
    engine_state::{
        camera_state::camera::Projection,
        rendering::{texture::TextureCache, MeshRendererManager},
        voxels::block::catalog::BlockCatalog,
        EngineState, FrameOutcome,
    },
};

/// Everything loaded from disk before the event loop starts.
///
/// Any failure here is fatal and no window is opened.
pub struct StartupAssets {
    pub config: EngineConfig,
    pub textures: TextureCache,
    pub catalog: BlockCatalog,
    pub shader_source: String,
}

impl StartupAssets {
    /// Decodes the block textures and reads the shader named by `config`.
    pub fn load(config: EngineConfig) -> anyhow::Result<Self> {
        let mut textures = TextureCache::new();
        let catalog = BlockCatalog::load(&config.blocks, &mut textures)?;
        let shader_source = std::fs::read_to_string(&config.shader_path)
            .with_context(|| format!("reading shader {}", config.shader_path.display()))?;

        info!(
            "Loaded {} block textures and shader {}",
            textures.len(),
            config.shader_path.display()
        );

        Ok(Self {
            config,
            textures,
            catalog,
            shader_source,
        })
    }
}

/// The main application state container that manages the application's lifecycle.
///
/// Implements `ApplicationHandler` to handle window and device events.
pub struct ApplicationState {
    /// The current graphics state
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Assets waiting for the graphics context
    assets: Option<StartupAssets>,

    /// Fatal error that stopped the event loop
    error: Option<anyhow::Error>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The frame loop, drawing through WebGPU
    pub engine_state: EngineState<MeshRendererManager>,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state, focus and event processing
    pub input_manager: InputManager,
}

impl ApplicationState {
    pub fn new(graphics: MaybeGraphics, assets: StartupAssets) -> Self {
        Self {
            graphics,
            state: None,
            assets: Some(assets),
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }

    /// Keeps the not yet handed over surface in sync with the window size.
    fn resized(&mut self, size: PhysicalSize<u32>) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
    }

    /// Hands the graphics resources and startup assets to a new engine state.
    fn initialize_application_state(&mut self) -> anyhow::Result<()> {
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return Ok(());
        };
        let assets = self
            .assets
            .take()
            .context("startup assets were already consumed")?;
        let config = &assets.config;

        let projection = Projection::new(
            gfx.surface_config.width,
            gfx.surface_config.height,
            Deg(config.projection.fovy),
            config.projection.znear,
            config.projection.zfar,
        );

        let renderer = MeshRendererManager::new(
            gfx.surface,
            gfx.surface_config,
            StSystem::new(Box::new(gfx.device)),
            StSystem::new(Box::new(gfx.queue)),
            &assets.shader_source,
            &assets.textures,
            projection,
        )?;

        let engine_state = EngineState::new(config, assets.catalog, renderer)?;

        set_cursor_capture(&gfx.window, engine_state.flags().cursor_captured);
        gfx.window.request_redraw();

        self.state = Some(InitializedApplicationState {
            engine_state,
            window: gfx.window,
            input_manager: InputManager::new(),
        });

        Ok(())
    }
}

/// Hides the cursor and locks it to the window, or releases it.
///
/// Not every platform supports locking; confining the cursor is the fallback.
fn set_cursor_capture(window: &Window, captured: bool) {
    let grab = if captured {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };

    if let Err(err) = grab {
        warn!("Could not change cursor grab: {err}");
    }
    window.set_cursor_visible(!captured);
}

impl InitializedApplicationState {
    fn apply_frame_outcome(&self, event_loop: &ActiveEventLoop, outcome: FrameOutcome) {
        if let Some(captured) = outcome.cursor_capture {
            set_cursor_capture(&self.window, captured);
        }
        if outcome.close_requested {
            info!("Close requested");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            match event {
                WindowEvent::Resized(size) => self.resized(size),
                WindowEvent::CloseRequested => event_loop.exit(),
                _ => (),
            }
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.render_backend.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                // The platform drops the cursor grab on focus loss, so it is taken
                // again here. Redraws stopped while unfocused and restart here too.
                if state.input_manager.set_focused(is_focused) == FocusChange::Gained {
                    set_cursor_capture(&state.window, state.engine_state.flags().cursor_captured);
                    state.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let focused = state.input_manager.is_focused();
                let input = state.input_manager.get_and_reset_processed_input();
                let outcome = state.engine_state.frame(&input, focused);
                state.apply_frame_outcome(event_loop, outcome);
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    /// Accumulates raw mouse motion.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(state), DeviceEvent::MouseMotion { delta }) = (&mut self.state, event) {
            state.input_manager.intake_mouse_motion(delta);
        }
    }

    /// Builds the graphics resources the first time the application is resumed.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the graphics resources and starts the engine.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let result = graphics.and_then(|graphics: Graphics| {
            self.graphics = MaybeGraphics::Graphics(graphics);
            self.initialize_application_state()
        });

        if let Err(err) = result {
            self.fail(event_loop, err.context("starting the renderer"));
        }
    }

    /// Requests the next frame while focused. An unfocused loop waits for the next
    /// event instead.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.input_manager.is_focused() {
                state.window.request_redraw();
            }
        }
    }
}
