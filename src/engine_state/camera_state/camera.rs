//! # Camera Implementation
//!
//! This module contains the first-person camera and everything that moves it:
//! - `Camera`: position, speed, yaw/pitch in degrees and the derived basis vectors
//! - `CameraController`: applies per-frame movement and mouse-look input to a camera
//! - `Projection`: perspective projection settings
//! - `CameraUniform`: packed camera data for the GPU
//!
//! Yaw is unbounded; it wraps through the periodicity of the trigonometric
//! functions. Pitch is clamped to `[-89°, 89°]` because at ±90° the cosine of the
//! pitch reaches zero and yaw stops affecting the look direction.

use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU's normalized device coordinates put Z in `[0, 1]` instead of `[-1, 1]`:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit in degrees.
pub const PITCH_LIMIT: f32 = 89.0;

/// Position and orientation the camera spawns at and resets to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
}

/// A first-person camera.
///
/// `front` is always unit length and is derived solely from `yaw` and `pitch`;
/// `up` is the fixed world up vector.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Distance moved per frame by a held movement key
    pub speed: f32,
    /// Horizontal rotation
    yaw: Deg<f32>,
    /// Vertical rotation, always within `[-PITCH_LIMIT, PITCH_LIMIT]`
    pitch: Deg<f32>,
    /// Degrees of rotation per unit of cursor motion
    pub sensitivity: f32,
    /// Unit look direction
    front: Vector3<f32>,
    /// World up
    up: Vector3<f32>,
}

impl Camera {
    /// Creates a camera at `pose`. The pitch is clamped into range.
    pub fn new(pose: CameraPose, speed: f32, sensitivity: f32) -> Self {
        let mut camera = Self {
            position: pose.position,
            speed,
            yaw: pose.yaw,
            pitch: pose.pitch,
            sensitivity,
            front: Vector3::unit_z(),
            up: Vector3::unit_y(),
        };
        camera.clamp_pitch();
        camera.update_front();
        camera
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    /// Unit look direction.
    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vector3<f32> {
        self.front.cross(self.up).normalize()
    }

    /// Moves the camera back to `pose`.
    pub fn reset(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.yaw = pose.yaw;
        self.pitch = pose.pitch;
        self.clamp_pitch();
        self.update_front();
    }

    /// Adds the given angles to yaw and pitch, clamps pitch, then recomputes `front`.
    pub fn rotate(&mut self, yaw_offset: Deg<f32>, pitch_offset: Deg<f32>) {
        self.yaw += yaw_offset;
        self.pitch += pitch_offset;
        self.clamp_pitch();
        self.update_front();
    }

    /// View matrix looking from `position` along `front`.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front, self.up)
    }

    fn clamp_pitch(&mut self) {
        self.pitch = Deg(self.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT));
    }

    fn update_front(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        self.front = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Calculates the projection matrix, including the OpenGL to WGPU transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

// A minimized window reports a zero height.
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Movement requested for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Boost modifier, read fresh every frame
    pub boost: bool,
}

/// Applies keyboard movement and mouse look to a [`Camera`].
///
/// Mouse look works on the cumulative cursor position. The first sample only
/// records the position, so the camera does not jump by the cursor's distance
/// from the origin on the first frame.
#[derive(Debug)]
pub struct CameraController {
    base_speed: f32,
    boosted_speed: f32,
    last_cursor: Option<(f64, f64)>,
}

impl CameraController {
    /// Creates a new camera controller.
    ///
    /// # Arguments
    /// * `base_speed` - Distance moved per frame
    /// * `boosted_speed` - Distance moved per frame while the boost modifier is held
    pub fn new(base_speed: f32, boosted_speed: f32) -> Self {
        Self {
            base_speed,
            boosted_speed,
            last_cursor: None,
        }
    }

    /// Moves the camera along its basis vectors.
    ///
    /// Opposite keys cancel out. The boost state decides the speed for this frame
    /// before any movement is applied.
    pub fn apply_movement(&self, camera: &mut Camera, input: &MovementInput) {
        camera.speed = if input.boost {
            self.boosted_speed
        } else {
            self.base_speed
        };

        let speed = camera.speed;
        let front = camera.front();
        let right = camera.right();
        let up = camera.up();

        if input.forward {
            camera.position += front * speed;
        }
        if input.backward {
            camera.position -= front * speed;
        }
        if input.left {
            camera.position -= right * speed;
        }
        if input.right {
            camera.position += right * speed;
        }
        if input.up {
            camera.position += up * speed;
        }
        if input.down {
            camera.position -= up * speed;
        }
    }

    /// Rotates the camera by the cursor motion since the previous sample.
    ///
    /// Moving the cursor right increases yaw; moving it down the screen decreases pitch.
    pub fn apply_look(&mut self, camera: &mut Camera, cursor: (f64, f64)) {
        let (last_x, last_y) = *self.last_cursor.get_or_insert(cursor);
        let offset_x = (cursor.0 - last_x) as f32 * camera.sensitivity;
        let offset_y = (last_y - cursor.1) as f32 * camera.sensitivity;
        self.last_cursor = Some(cursor);

        camera.rotate(Deg(offset_x), Deg(offset_y));
    }

    /// The last recorded cursor sample, if any.
    pub fn last_cursor(&self) -> Option<(f64, f64)> {
        self.last_cursor
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // We can't use cgmath with bytemuck directly so we'll have to convert the Matrix4 into a 4x4 f32 array
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and eye position.
    pub fn update_view_proj_and_pos(
        &mut self,
        view: Matrix4<f32>,
        eye: Point3<f32>,
        projection: &Projection,
    ) {
        self.view_proj = (projection.calc_matrix() * view).into();
        self.position = [eye.x, eye.y, eye.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, Point3, Vector3};

    use super::{Camera, CameraController, CameraPose, MovementInput};

    const EPSILON: f32 = 1e-5;

    fn pose() -> CameraPose {
        CameraPose {
            position: Point3::new(0.0, 0.0, 5.0),
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
        }
    }

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < EPSILON, "{a:?} != {b:?}");
    }

    #[test]
    fn spawn_pose_looks_down_negative_z() {
        let camera = Camera::new(pose(), 0.1, 0.05);
        assert_vec_eq(camera.front(), Vector3::new(0.0, 0.0, -1.0));
        assert_vec_eq(camera.right(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn first_cursor_sample_does_not_rotate() {
        let mut camera = Camera::new(pose(), 0.1, 0.05);
        let mut controller = CameraController::new(0.1, 0.5);

        controller.apply_look(&mut camera, (640.0, 360.0));

        assert_eq!(camera.yaw(), Deg(-90.0));
        assert_eq!(camera.pitch(), Deg(0.0));
        assert_eq!(controller.last_cursor(), Some((640.0, 360.0)));
    }

    #[test]
    fn cursor_motion_scales_by_sensitivity() {
        let mut camera = Camera::new(pose(), 0.1, 0.05);
        let mut controller = CameraController::new(0.1, 0.5);

        controller.apply_look(&mut camera, (100.0, 100.0));
        controller.apply_look(&mut camera, (110.0, 105.0));

        assert!((camera.yaw().0 - (-89.5)).abs() < EPSILON);
        assert!((camera.pitch().0 - (-0.25)).abs() < EPSILON);
    }

    #[test]
    fn pitch_is_clamped_after_the_delta_is_added() {
        let mut camera = Camera::new(pose(), 0.1, 1.0);
        let mut controller = CameraController::new(0.1, 0.5);

        controller.apply_look(&mut camera, (0.0, 0.0));
        controller.apply_look(&mut camera, (0.0, -500.0));
        assert_eq!(camera.pitch(), Deg(89.0));

        // Accumulation continues from the clamped value, not from the raw sum.
        controller.apply_look(&mut camera, (0.0, -490.0));
        assert_eq!(camera.pitch(), Deg(79.0));

        controller.apply_look(&mut camera, (0.0, 10_000.0));
        assert_eq!(camera.pitch(), Deg(-89.0));
        assert!((camera.front().magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut camera = Camera::new(pose(), 0.1, 1.0);
        camera.rotate(Deg(720.0), Deg(0.0));
        assert_eq!(camera.yaw(), Deg(630.0));
        assert_vec_eq(camera.front(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn movement_follows_the_basis_vectors() {
        let mut camera = Camera::new(pose(), 0.0, 0.05);
        let controller = CameraController::new(1.0, 4.0);

        controller.apply_movement(
            &mut camera,
            &MovementInput {
                forward: true,
                ..Default::default()
            },
        );
        assert_vec_eq(camera.position - Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 4.0));

        controller.apply_movement(
            &mut camera,
            &MovementInput {
                right: true,
                up: true,
                ..Default::default()
            },
        );
        assert_vec_eq(camera.position - Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut camera = Camera::new(pose(), 0.0, 0.05);
        let controller = CameraController::new(1.0, 4.0);

        controller.apply_movement(
            &mut camera,
            &MovementInput {
                forward: true,
                backward: true,
                left: true,
                right: true,
                up: true,
                down: true,
                boost: false,
            },
        );
        assert_vec_eq(camera.position - Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn boost_is_read_fresh_every_frame() {
        let mut camera = Camera::new(pose(), 0.0, 0.05);
        let controller = CameraController::new(1.0, 4.0);

        let boosted = MovementInput {
            forward: true,
            boost: true,
            ..Default::default()
        };
        controller.apply_movement(&mut camera, &boosted);
        assert_eq!(camera.speed, 4.0);
        assert!((camera.position.z - 1.0).abs() < EPSILON);

        controller.apply_movement(&mut camera, &MovementInput::default());
        assert_eq!(camera.speed, 1.0);
    }

    #[test]
    fn reset_restores_the_pose() {
        let mut camera = Camera::new(pose(), 0.1, 1.0);
        camera.position = Point3::new(40.0, 2.0, -3.0);
        camera.rotate(Deg(33.0), Deg(-20.0));

        camera.reset(pose());

        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.yaw(), Deg(-90.0));
        assert_eq!(camera.pitch(), Deg(0.0));
        assert_vec_eq(camera.front(), Vector3::new(0.0, 0.0, -1.0));
    }
}
