use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete viewer configuration. Every field has a default, so a config file
/// only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Floppa pyramid".into(),
        }
    }
}

/// Initial camera placement and motion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position in world units.
    pub position: Vec3,
    /// Starting yaw in degrees. 0 looks down +X.
    pub yaw_deg: f32,
    /// Starting pitch in degrees.
    pub pitch_deg: f32,
    /// Translation speed in world units per second.
    pub speed: f32,
    /// Look speed in degrees per cursor pixel per second.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-2.0, 0.0, 0.0),
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            speed: 1.0,
            sensitivity: 15.0,
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Truncate width/height to an integer before using it as the aspect
    /// ratio. Off by default; 800x600 then yields 1.0 and a stretched image.
    pub integer_aspect: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 100.0,
            integer_aspect: false,
        }
    }
}

impl ProjectionConfig {
    /// Aspect ratio for a viewport. A zero extent (minimised window) is
    /// treated as one pixel, so the result is always positive.
    pub fn aspect_ratio(&self, width: u32, height: u32) -> f32 {
        let (width, height) = (width.max(1), height.max(1));
        if self.integer_aspect {
            (width / height).max(1) as f32
        } else {
            width as f32 / height as f32
        }
    }
}

/// What is drawn and how it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Spin of the pyramid about +Y, in degrees per second.
    pub spin_deg_per_sec: f32,
    /// Image applied to the pyramid faces.
    pub texture: String,
    /// Flip the image vertically on load so row 0 is the bottom.
    pub flip_texture: bool,
    pub clear_color: Vec4,
    /// Multiplier applied to the final fragment colour.
    pub brightness: Vec4,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            spin_deg_per_sec: 30.0,
            texture: "assets/floppa.png".into(),
            flip_texture: true,
            clear_color: Vec4::new(0.2, 0.2, 0.2, 1.0),
            brightness: Vec4::ONE,
        }
    }
}

impl ViewerConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would produce a degenerate projection or camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        if w.width == 0 || w.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                w.width, w.height
            )));
        }

        let p = &self.projection;
        if !(p.fov_deg > 0.0 && p.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_deg must be in (0, 180), got {}",
                p.fov_deg
            )));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::Invalid(format!(
                "expected 0 < near < far, got near={} far={}",
                p.near, p.far
            )));
        }

        let c = &self.camera;
        if !c.position.is_finite() || !c.yaw_deg.is_finite() || !c.pitch_deg.is_finite() {
            return Err(ConfigError::Invalid("camera placement must be finite".into()));
        }
        for (name, value) in [("speed", c.speed), ("sensitivity", c.sensitivity)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "camera.{name} must be finite and positive, got {value}"
                )));
            }
        }

        let spin = self.scene.spin_deg_per_sec;
        if !(spin.is_finite() && spin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scene.spin_deg_per_sec must be finite and non-negative, got {spin}"
            )));
        }

        Ok(())
    }
}
