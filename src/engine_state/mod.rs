//! # Engine State Module
//!
//! The frame loop of the block field renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - owns the camera, the chunk manager, the world and the renderer
//! * `buffer_state` - named GPU buffers
//! * `camera_state` - first-person camera and its controller
//! * `rendering` - mesh combination and the WebGPU backend
//! * `voxels` - chunks, blocks and world generation
//!
//! ## Frame Order
//!
//! Each frame runs strictly in this order:
//!
//! 1. Skip everything if the window is not focused
//! 2. Apply movement, mouse look and the auxiliary bindings
//! 3. Tick the chunk manager with the updated camera position
//! 4. If a chunk was generated, rebuild the combined mesh and upload it
//! 5. Recompute the view matrix
//! 6. Draw the combined mesh with one indexed draw call

use cgmath::Vector3;
use log::{debug, error, info};
use winit::keyboard::KeyCode;

use camera_state::{camera::MovementInput, CameraState};
use rendering::{MeshCombiner, RenderBackend};
use voxels::{
    block::catalog::BlockCatalog, chunk_manager::ChunkManager, world::World,
    world_generator::WorldGenerator,
};

use crate::{application_state::input_state::ProcessedInputState, config::EngineConfig};

pub mod buffer_state;
pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// Seconds between frame rate reports
const FRAME_REPORT_INTERVAL: web_time::Duration = web_time::Duration::from_secs(5);

/// Toggleable engine behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineFlags {
    /// Whether triangle edges are drawn instead of filled faces
    pub wireframe: bool,
    /// Whether the cursor is hidden and locked to the window
    pub cursor_captured: bool,
}

impl Default for EngineFlags {
    fn default() -> Self {
        Self {
            wireframe: false,
            cursor_captured: true,
        }
    }
}

/// Requests a frame makes of the window, which the application layer owns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// The application should exit
    pub close_requested: bool,
    /// The cursor capture state changed to the contained value
    pub cursor_capture: Option<bool>,
}

/// The frame loop state.
///
/// Generic over the renderer so the frame logic runs unchanged against the WebGPU
/// backend and against test doubles.
pub struct EngineState<B: RenderBackend> {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// Tracks generated chunks and generates new ones
    pub chunk_manager: ChunkManager,
    /// Every block generated so far
    pub world: World,
    /// Builds the combined mesh from the world's blocks
    mesh_combiner: MeshCombiner,
    /// Receives upload, view and draw commands
    pub render_backend: B,
    /// Engine configuration flags
    flags: EngineFlags,
    /// Frame rate bookkeeping
    frame_timer: FrameTimer,
}

impl<B: RenderBackend> EngineState<B> {
    /// Creates the engine state. No chunk is generated until the first frame.
    ///
    /// # Errors
    /// Fails if the configured chunk extent is invalid.
    pub fn new(
        config: &EngineConfig,
        catalog: BlockCatalog,
        mut render_backend: B,
    ) -> anyhow::Result<Self> {
        let extent = config.chunk_extent()?;
        let [bias_x, bias_y, bias_z] = config.vertical_bias;
        let generator = WorldGenerator::new(
            extent,
            Vector3::new(bias_x, bias_y, bias_z),
            config.blocks.tint,
            catalog,
        );

        let flags = EngineFlags::default();
        render_backend.set_wireframe(flags.wireframe);

        info!(
            "Engine state ready: chunk extent {}x{}x{}",
            extent.x(),
            extent.y(),
            extent.z()
        );

        Ok(Self {
            camera_state: CameraState::new(&config.camera),
            chunk_manager: ChunkManager::new(generator),
            world: World::new(),
            mesh_combiner: MeshCombiner::new(),
            render_backend,
            flags,
            frame_timer: FrameTimer::new(),
        })
    }

    /// Runs one frame.
    ///
    /// Nothing happens while `focused` is false. Drawing errors are logged and do
    /// not stop the loop.
    pub fn frame(&mut self, input: &ProcessedInputState, focused: bool) -> FrameOutcome {
        if !focused {
            return FrameOutcome::default();
        }

        let actions = PlayerAction::from_input(input);
        let outcome = self.apply_actions(&actions);

        if self
            .chunk_manager
            .tick(self.camera_state.position(), &mut self.world)
        {
            let mesh = self.mesh_combiner.rebuild(self.world.blocks());
            self.render_backend.upload_mesh(mesh);
        }

        self.render_backend
            .set_view(self.camera_state.view_matrix(), self.camera_state.position());

        if let Err(err) = self.render_backend.draw() {
            error!("Failed to draw frame: {err:#}");
        }

        self.frame_timer.tick();

        outcome
    }

    fn apply_actions(&mut self, actions: &PlayerAction) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            close_requested: actions.close_requested,
            cursor_capture: None,
        };

        self.camera_state.apply_actions(actions);

        if actions.toggle_wireframe {
            self.flags.wireframe = !self.flags.wireframe;
            self.render_backend.set_wireframe(self.flags.wireframe);
            debug!("Wireframe {}", if self.flags.wireframe { "on" } else { "off" });
        }

        if actions.toggle_cursor_capture {
            self.flags.cursor_captured = !self.flags.cursor_captured;
            outcome.cursor_capture = Some(self.flags.cursor_captured);
        }

        if actions.reset_camera {
            self.camera_state.reset();
            debug!("Camera reset to spawn");
        }

        outcome
    }

    pub fn flags(&self) -> EngineFlags {
        self.flags
    }
}

/// Player actions for one frame, translated from the input snapshot.
///
/// Movement and boost are level-triggered. Wireframe, cursor capture and camera
/// reset fire only on the frame the key goes down. Close is level-triggered.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerAction {
    /// Movement keys and boost modifier
    pub movement: MovementInput,
    /// Cumulative cursor position, if any motion has been seen
    pub cursor_position: Option<(f64, f64)>,
    pub toggle_wireframe: bool,
    pub toggle_cursor_capture: bool,
    pub reset_camera: bool,
    pub close_requested: bool,
}

impl PlayerAction {
    /// Translates the processed input state into player actions.
    ///
    /// | Key | Action |
    /// |-----|--------|
    /// | `W` / `S` | forward / back |
    /// | `A` / `D` | strafe left / right |
    /// | `Q` / `E` | up / down |
    /// | `Left Shift` | boost |
    /// | `1` | toggle cursor capture |
    /// | `2` | toggle wireframe |
    /// | `3` | reset camera |
    /// | `Escape` | close |
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let active = |key| input.get_key_state(key).is_active();
        let just_pressed = |key| input.get_key_state(key).is_just_pressed();

        Self {
            movement: MovementInput {
                forward: active(KeyCode::KeyW),
                backward: active(KeyCode::KeyS),
                left: active(KeyCode::KeyA),
                right: active(KeyCode::KeyD),
                up: active(KeyCode::KeyQ),
                down: active(KeyCode::KeyE),
                boost: active(KeyCode::ShiftLeft),
            },
            cursor_position: input.get_cursor_position(),
            toggle_cursor_capture: just_pressed(KeyCode::Digit1),
            toggle_wireframe: just_pressed(KeyCode::Digit2),
            reset_camera: just_pressed(KeyCode::Digit3),
            close_requested: active(KeyCode::Escape),
        }
    }
}

/// Counts frames and reports the rate at `debug` level.
struct FrameTimer {
    window_start: web_time::Instant,
    frames: u32,
}

impl FrameTimer {
    fn new() -> Self {
        Self {
            window_start: web_time::Instant::now(),
            frames: 0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= FRAME_REPORT_INTERVAL {
            debug!(
                "{:.1} fps over the last {:.1}s",
                self.frames as f64 / elapsed.as_secs_f64(),
                elapsed.as_secs_f64()
            );
            self.window_start = web_time::Instant::now();
            self.frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use crate::application_state::input_state::{ProcessedInputState, RawInputState};

    use super::PlayerAction;

    #[test]
    fn held_keys_move_and_pressed_keys_toggle() {
        let input = ProcessedInputState::default()
            .with_key(KeyCode::KeyW, RawInputState::Held)
            .with_key(KeyCode::KeyQ, RawInputState::Pressed)
            .with_key(KeyCode::ShiftLeft, RawInputState::Held)
            .with_key(KeyCode::Digit2, RawInputState::Pressed)
            .with_key(KeyCode::Digit1, RawInputState::Held)
            .with_cursor(3.0, 4.0);

        let actions = PlayerAction::from_input(&input);

        assert!(actions.movement.forward);
        assert!(actions.movement.up);
        assert!(actions.movement.boost);
        assert!(!actions.movement.backward);
        assert!(actions.toggle_wireframe);
        assert!(!actions.toggle_cursor_capture);
        assert!(!actions.reset_camera);
        assert_eq!(actions.cursor_position, Some((3.0, 4.0)));
    }

    #[test]
    fn escape_closes_while_held() {
        let input = ProcessedInputState::default().with_key(KeyCode::Escape, RawInputState::Held);
        assert!(PlayerAction::from_input(&input).close_requested);

        let released = ProcessedInputState::default().with_key(KeyCode::Escape, RawInputState::Released);
        assert!(!PlayerAction::from_input(&released).close_requested);
    }
}
