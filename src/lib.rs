#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Field
//!
//! A first-person viewer for an endless field of textured blocks, built with Rust and WGPU.
//!
//! The camera flies freely over the field. Whenever it enters a chunk that has not been
//! visited yet, a grid of blocks is generated around that chunk, every block is merged
//! into one combined mesh, and the whole field is drawn with a single indexed draw call.
//!
//! ## Key Modules
//!
//! * `application_state` - Manages the window, graphics initialization and input events
//! * `config` - Engine settings with built-in defaults and an optional JSON override
//! * `core` - Shared ownership wrappers used throughout the engine
//! * `engine_state` - The frame loop: camera, chunk generation, mesh combination and rendering
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     voxel_field::run()
//! }
//! ```
//!
//! Set `VOXEL_FIELD_CONFIG` to a JSON file to override settings, and `RUST_LOG` to
//! control log output.

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState, StartupAssets,
};
use anyhow::Context;
use log::info;
use winit::event_loop::EventLoop;

use config::EngineConfig;

pub mod application_state;
pub mod config;
pub mod core;
pub mod engine_state;

/// Initializes logging, loads the configuration and assets, then runs the event loop
/// until the window closes.
///
/// # Errors
/// Fails if the configuration, a texture or the shader cannot be loaded, or if the
/// graphics context cannot be created. No window is shown in the first case.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = EngineConfig::from_env()?;
    let window_config = config.window.clone();
    let assets = StartupAssets::load(config)?;

    let event_loop = EventLoop::with_user_event()
        .build()
        .context("creating the event loop")?;

    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy(), window_config)),
        assets,
    );

    event_loop
        .run_app(&mut state)
        .context("running the event loop")?;

    match state.take_error() {
        Some(err) => Err(err),
        None => {
            info!("Shut down cleanly");
            Ok(())
        }
    }
}
