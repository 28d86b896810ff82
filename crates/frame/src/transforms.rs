use glam::Mat4;
use pyramid_camera::CameraState;
use pyramid_common::ProjectionConfig;

/// Continuous spin of the displayed object about +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    /// Accumulated angle in degrees. Only ever grows for a positive rate.
    angle_deg: f64,
    pub rate_deg_per_sec: f32,
}

impl Spin {
    pub fn new(rate_deg_per_sec: f32) -> Self {
        Self {
            angle_deg: 0.0,
            rate_deg_per_sec,
        }
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.angle_deg += f64::from(self.rate_deg_per_sec) * f64::from(dt);
        }
    }

    /// Model matrix for the current angle. The angle is reduced modulo 360
    /// first so precision does not decay over long sessions.
    pub fn model_matrix(&self) -> Mat4 {
        let wrapped = self.angle_deg.rem_euclid(360.0) as f32;
        Mat4::from_rotation_y(wrapped.to_radians())
    }
}

/// Matrices handed to the shader for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSet {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

impl TransformSet {
    pub fn compute(
        camera: &CameraState,
        spin: &Spin,
        projection: &ProjectionConfig,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            model: spin.model_matrix(),
            view: camera.view_matrix(),
            proj: projection_matrix(projection, viewport),
        }
    }

    /// Combined clip-space transform, `proj * view * model`.
    pub fn mvp(&self) -> Mat4 {
        self.proj * self.view * self.model
    }
}

/// Right-handed perspective with a [0, 1] depth range.
pub fn projection_matrix(projection: &ProjectionConfig, (width, height): (u32, u32)) -> Mat4 {
    Mat4::perspective_rh(
        projection.fov_deg.to_radians(),
        projection.aspect_ratio(width, height),
        projection.near,
        projection.far,
    )
}
