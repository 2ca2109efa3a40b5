//! # Camera State Management
//!
//! Ties the first-person camera to its controller and spawn pose:
//! - `Camera`: position, yaw/pitch and the derived look direction
//! - `CameraController`: per-frame keyboard movement and mouse look
//! - `Projection` and `CameraUniform`: consumed by the renderer
//!
//! `CameraState` applies one frame of [`PlayerAction`] in a fixed order: positional
//! update first, then orientation.

use cgmath::{Deg, Matrix4, Point3};

use crate::config::CameraConfig;

use super::PlayerAction;

pub mod camera;

use camera::{Camera, CameraController, CameraPose};

/// The camera, its controller and the pose it resets to.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Applies player input to the camera
    pub camera_controller: CameraController,
    /// Spawn pose, also used by the reset binding
    spawn: CameraPose,
}

impl CameraState {
    /// Creates a camera at the configured spawn pose.
    pub fn new(config: &CameraConfig) -> Self {
        let [x, y, z] = config.spawn_position;
        let spawn = CameraPose {
            position: Point3::new(x, y, z),
            yaw: Deg(config.spawn_yaw),
            pitch: Deg(config.spawn_pitch),
        };

        Self {
            camera: Camera::new(spawn, config.base_speed, config.sensitivity),
            camera_controller: CameraController::new(config.base_speed, config.boosted_speed),
            spawn,
        }
    }

    /// Applies one frame of movement and mouse look.
    pub fn apply_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller
            .apply_movement(&mut self.camera, &actions.movement);

        if let Some(cursor) = actions.cursor_position {
            self.camera_controller.apply_look(&mut self.camera, cursor);
        }
    }

    /// Moves the camera back to its spawn pose.
    pub fn reset(&mut self) {
        self.camera.reset(self.spawn);
    }

    pub fn spawn(&self) -> CameraPose {
        self.spawn
    }

    pub fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    /// View matrix for the current camera pose.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.calc_matrix()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Point3};

    use crate::{
        config::CameraConfig,
        engine_state::{camera_state::camera::MovementInput, PlayerAction},
    };

    use super::CameraState;

    #[test]
    fn movement_is_applied_before_orientation() {
        let mut state = CameraState::new(&CameraConfig::default());
        let actions = PlayerAction {
            movement: MovementInput {
                forward: true,
                ..Default::default()
            },
            cursor_position: Some((0.0, 0.0)),
            ..Default::default()
        };

        state.apply_actions(&actions);

        // The first cursor sample never rotates, so the move went straight along -Z.
        assert!((state.position().z - (5.0 - 0.05)).abs() < 1e-6);
        assert_eq!(state.camera.yaw(), Deg(-90.0));
    }

    #[test]
    fn reset_returns_to_the_spawn_pose() {
        let mut state = CameraState::new(&CameraConfig::default());
        state.camera.position = Point3::new(10.0, 10.0, 10.0);
        state.camera.rotate(Deg(45.0), Deg(30.0));

        state.reset();

        assert_eq!(state.position(), Point3::new(0.0, 0.0, 5.0));
        assert_eq!(state.camera.pitch(), Deg(0.0));
        assert_eq!(state.spawn().yaw, Deg(-90.0));
    }
}
