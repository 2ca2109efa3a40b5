//! # Engine Configuration
//!
//! Plain numeric settings consumed by the engine: chunk extents, camera speeds and
//! sensitivity, spawn pose, vertical placement of the generated field, block
//! appearance and the window/projection parameters.
//!
//! Every setting has a built-in default. A JSON file named by the
//! `VOXEL_FIELD_CONFIG` environment variable may override any subset of them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;
use serde::Deserialize;

use crate::engine_state::voxels::chunk::{ChunkExtent, MAX_WORLD_COORDINATE};

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_FIELD_CONFIG";

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk extent in blocks along each axis
    pub chunk_size: [i32; 3],
    /// Offset added to every generated block position
    pub vertical_bias: [f32; 3],
    /// Camera settings
    pub camera: CameraConfig,
    /// Block appearance settings
    pub blocks: BlockConfig,
    /// Window settings
    pub window: WindowConfig,
    /// Projection settings
    pub projection: ProjectionConfig,
    /// Path of the WGSL shader used for block rendering
    pub shader_path: PathBuf,
}

/// Camera movement and spawn settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance moved per frame while a movement key is held
    pub base_speed: f32,
    /// Distance moved per frame while the boost key is also held
    pub boosted_speed: f32,
    /// Degrees of rotation per unit of cursor motion
    pub sensitivity: f32,
    /// Spawn and reset position
    pub spawn_position: [f32; 3],
    /// Spawn and reset yaw, in degrees
    pub spawn_yaw: f32,
    /// Spawn and reset pitch, in degrees
    pub spawn_pitch: f32,
}

/// Block appearance settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Tint applied to every generated block
    pub tint: [f32; 3],
    /// Texture used by grass blocks
    pub grass_texture: PathBuf,
    /// Texture used by stone blocks
    pub stone_texture: PathBuf,
}

/// Window settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

/// Perspective projection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: [16, 1, 16],
            vertical_bias: [0.0, -5.0, 0.0],
            camera: CameraConfig::default(),
            blocks: BlockConfig::default(),
            window: WindowConfig::default(),
            projection: ProjectionConfig::default(),
            shader_path: PathBuf::from("assets/shaders/block_shader.wgsl"),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.05,
            boosted_speed: 0.35,
            sensitivity: 0.05,
            spawn_position: [0.0, 0.0, 5.0],
            spawn_yaw: -90.0,
            spawn_pitch: 0.0,
        }
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            tint: [0.6, 0.0, 0.6],
            grass_texture: PathBuf::from("assets/textures/grass.png"),
            stone_texture: PathBuf::from("assets/textures/stone.png"),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: String::from("Voxel Field"),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from the file named by `VOXEL_FIELD_CONFIG`, or
    /// returns the defaults when the variable is unset. The result is validated.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                info!("{CONFIG_ENV_VAR} not set, using default configuration");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration file {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("parsing configuration file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The configured chunk extent.
    ///
    /// # Errors
    /// Fails if any component is not strictly positive.
    pub fn chunk_extent(&self) -> anyhow::Result<ChunkExtent> {
        let [x, y, z] = self.chunk_size;
        ChunkExtent::new(x, y, z)
    }

    /// Rejects settings the engine cannot run with.
    ///
    /// NaN never passes a check.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.chunk_extent()?;

        let camera = &self.camera;
        if not_positive(camera.base_speed) {
            bail!("camera base speed must be positive, got {}", camera.base_speed);
        }
        if camera.boosted_speed.is_nan() || camera.boosted_speed < camera.base_speed {
            bail!(
                "camera boosted speed {} is lower than base speed {}",
                camera.boosted_speed,
                camera.base_speed
            );
        }
        if not_positive(camera.sensitivity) {
            bail!("mouse sensitivity must be positive, got {}", camera.sensitivity);
        }
        if camera
            .spawn_position
            .iter()
            .any(|coordinate| !coordinate.is_finite() || coordinate.abs() > MAX_WORLD_COORDINATE)
        {
            bail!(
                "spawn position {:?} must be finite and within {MAX_WORLD_COORDINATE} of the origin",
                camera.spawn_position
            );
        }

        let projection = &self.projection;
        if not_positive(projection.fovy) || projection.fovy >= 180.0 {
            bail!("field of view must be within (0, 180) degrees, got {}", projection.fovy);
        }
        if not_positive(projection.znear) || projection.zfar.is_nan() || projection.zfar <= projection.znear {
            bail!(
                "clip planes must satisfy 0 < near < far, got near {} far {}",
                projection.znear,
                projection.zfar
            );
        }

        if self.window.width == 0 || self.window.height == 0 {
            bail!("window size must be non-zero");
        }

        Ok(())
    }
}

fn not_positive(value: f32) -> bool {
    value.is_nan() || value <= 0.0
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, [16, 1, 16]);
        assert_eq!(config.camera.spawn_yaw, -90.0);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = EngineConfig::from_json(r#"{ "chunk_size": [4, 1, 4], "camera": { "sensitivity": 0.1 } }"#)
            .unwrap();

        assert_eq!(config.chunk_size, [4, 1, 4]);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.camera.base_speed, 0.05);
        assert_eq!(config.window.width, 1200);
    }

    #[test]
    fn non_positive_chunk_extent_is_rejected() {
        let error = EngineConfig::from_json(r#"{ "chunk_size": [4, 0, 4] }"#).unwrap_err();
        assert!(error.to_string().contains("chunk extent"));

        assert!(EngineConfig::from_json(r#"{ "chunk_size": [-1, 1, 4] }"#).is_err());
    }

    #[test]
    fn boosted_speed_below_base_speed_is_rejected() {
        let json = r#"{ "camera": { "base_speed": 1.0, "boosted_speed": 0.5 } }"#;
        assert!(EngineConfig::from_json(json).is_err());
    }

    #[test]
    fn non_positive_sensitivity_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "camera": { "sensitivity": 0.0 } }"#).is_err());
    }

    #[test]
    fn degenerate_projection_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "projection": { "znear": 1.0, "zfar": 0.5 } }"#).is_err());
    }

    #[test]
    fn far_spawn_position_is_rejected() {
        let error = EngineConfig::from_json(r#"{ "camera": { "spawn_position": [3.0e9, 0, 0] } }"#)
            .unwrap_err();
        assert!(error.to_string().contains("spawn position"));

        assert!(EngineConfig::from_json(r#"{ "camera": { "spawn_position": [1.0e6, 0, -1.0e6] } }"#).is_ok());
    }

    #[test]
    fn nan_settings_are_rejected() {
        let mut config = EngineConfig::default();
        config.camera.base_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.camera.boosted_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.projection.zfar = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.camera.spawn_position = [0.0, f32::NAN, 0.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EngineConfig::from_json("{ chunk_size: ").is_err());
    }
}
