use glam::{Mat4, Vec3};

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT_DEG: f32 = 89.9;

/// Which translation directions are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

/// Fly camera with position, yaw/pitch-derived view direction, and a fixed up
/// vector. Angles are stored in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    orientation: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per cursor pixel per second.
    pub sensitivity: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(-2.0, 0.0, 0.0), 0.0, 0.0)
    }
}

impl CameraState {
    /// Camera at `position` looking along the direction given by `yaw` and
    /// `pitch` (degrees). Pitch is clamped.
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            orientation: Vec3::X,
            up: Vec3::Y,
            yaw,
            pitch,
            speed: 1.0,
            sensitivity: 15.0,
        };
        camera.clamp_and_reorient();
        camera
    }

    /// Camera at `position` looking along `direction`. Yaw and pitch are
    /// recovered from the direction so later rotation continues from it.
    /// A zero direction falls back to +X.
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let dir = direction.try_normalize().unwrap_or(Vec3::X);
        let yaw = dir.z.atan2(dir.x).to_degrees();
        let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
        Self::new(position, yaw, pitch)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Unit view direction.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Yaw in degrees, unbounded.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, within ±`PITCH_LIMIT_DEG`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit strafe direction, or `None` if the view direction is parallel to up.
    pub fn right(&self) -> Option<Vec3> {
        self.orientation.cross(self.up).try_normalize()
    }

    /// Set both angles directly. Pitch is clamped.
    pub fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.clamp_and_reorient();
    }

    /// Move along the held directions for `dt` seconds. Directions add up, so
    /// diagonal movement is faster than movement along one axis.
    pub fn translate(&mut self, intent: MoveIntent, dt: f32) {
        if !usable_dt(dt) || intent.is_idle() {
            return;
        }

        let step = self.speed * dt;
        if intent.forward {
            self.position += self.orientation * step;
        }
        if intent.backward {
            self.position -= self.orientation * step;
        }
        if intent.left || intent.right {
            if let Some(right) = self.right() {
                if intent.left {
                    self.position -= right * step;
                }
                if intent.right {
                    self.position += right * step;
                }
            }
        }
    }

    /// Turn by a cursor delta in pixels (`dy` positive looks up). The angular
    /// change scales with `dt`, so look speed does not depend on frame rate.
    pub fn rotate(&mut self, dx: f32, dy: f32, dt: f32) {
        if usable_dt(dt) && dx.is_finite() && dy.is_finite() {
            self.yaw += dx * self.sensitivity * dt;
            self.pitch += dy * self.sensitivity * dt;
        }
        self.clamp_and_reorient();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    fn clamp_and_reorient(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        match direction.try_normalize() {
            Some(dir) => self.orientation = dir,
            None => tracing::warn!(
                yaw = self.yaw,
                pitch = self.pitch,
                "degenerate view direction, keeping previous"
            ),
        }
    }
}

fn usable_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn forward() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..MoveIntent::default()
        }
    }

    #[test]
    fn default_camera() {
        let cam = CameraState::default();
        assert_eq!(cam.position, Vec3::new(-2.0, 0.0, 0.0));
        assert!(cam.orientation().abs_diff_eq(Vec3::X, EPS));
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
    }

    #[test]
    fn orientation_is_unit_for_any_yaw() {
        let mut cam = CameraState::default();
        for i in -720..=720 {
            let yaw = i as f32 * 1.37;
            cam.set_angles(yaw, (i % 180) as f32);
            assert!((cam.orientation().length() - 1.0).abs() < EPS, "yaw {yaw}");
        }
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = CameraState::default();
        cam.set_angles(0.0, 95.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT_DEG);
        cam.set_angles(0.0, -1000.0);
        assert_eq!(cam.pitch(), -PITCH_LIMIT_DEG);

        cam.set_angles(0.0, 89.0);
        cam.rotate(0.0, 100.0, 1.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT_DEG);
        assert!(cam.right().is_some());
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut cam = CameraState::default().with_sensitivity(1.0);
        cam.rotate(400.0, 0.0, 1.0);
        assert_eq!(cam.yaw(), 400.0);
        assert!(cam.orientation().abs_diff_eq(
            CameraState::new(Vec3::ZERO, 40.0, 0.0).orientation(),
            EPS
        ));
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut cam =
            CameraState::looking_along(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 0.5, -1.0));
        let before = cam.clone();
        let all = MoveIntent {
            forward: true,
            backward: false,
            left: true,
            right: false,
        };
        cam.translate(all, 0.0);
        cam.rotate(50.0, -30.0, 0.0);
        assert_eq!(cam.position, before.position);
        assert_eq!(cam.orientation(), before.orientation());
    }

    #[test]
    fn negative_or_nan_dt_changes_nothing() {
        let mut cam = CameraState::default();
        let before = cam.clone();
        cam.translate(forward(), -0.5);
        cam.translate(forward(), f32::NAN);
        cam.rotate(10.0, 10.0, -1.0);
        cam.rotate(10.0, 10.0, f32::INFINITY);
        assert_eq!(cam, before);
    }

    #[test]
    fn forward_moves_along_orientation() {
        let mut cam = CameraState::looking_along(Vec3::ZERO, Vec3::Z);
        let t = 2.5;
        cam.translate(forward(), t);
        assert!((cam.position.z - t).abs() < EPS);
        assert!(cam.position.x.abs() < EPS);
        assert!(cam.position.y.abs() < EPS);
    }

    #[test]
    fn forward_and_backward_cancel() {
        let mut cam = CameraState::default();
        let both = MoveIntent {
            forward: true,
            backward: true,
            ..MoveIntent::default()
        };
        cam.translate(both, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn strafe_right_is_cross_of_orientation_and_up() {
        let mut cam = CameraState::looking_along(Vec3::ZERO, Vec3::Z);
        let right = MoveIntent {
            right: true,
            ..MoveIntent::default()
        };
        cam.translate(right, 1.0);
        // Z x Y = -X
        assert!(cam.position.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn diagonal_is_sqrt2_faster() {
        let mut single = CameraState::default();
        single.translate(forward(), 1.0);
        let single_len = (single.position - Vec3::new(-2.0, 0.0, 0.0)).length();

        let mut diagonal = CameraState::default();
        diagonal.translate(
            MoveIntent {
                forward: true,
                left: true,
                ..MoveIntent::default()
            },
            1.0,
        );
        let diagonal_len = (diagonal.position - Vec3::new(-2.0, 0.0, 0.0)).length();

        assert!((diagonal_len - single_len * 2.0_f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn rotation_scales_with_sensitivity_and_dt() {
        let mut cam = CameraState::default().with_sensitivity(15.0);
        cam.rotate(4.0, 2.0, 0.5);
        assert!((cam.yaw() - 30.0).abs() < EPS);
        assert!((cam.pitch() - 15.0).abs() < EPS);
    }

    #[test]
    fn positive_dx_turns_toward_right() {
        for yaw in [0.0, 90.0, -135.0, 270.0] {
            let mut cam = CameraState::new(Vec3::ZERO, yaw, 0.0);
            let right = cam.right().unwrap();
            let before = cam.orientation().dot(right);
            cam.rotate(2.0, 0.0, 0.1);
            assert!(cam.orientation().dot(right) > before, "yaw {yaw}");
        }
    }

    #[test]
    fn positive_dy_looks_up() {
        let mut cam = CameraState::default();
        cam.rotate(0.0, 2.0, 0.1);
        assert!(cam.orientation().y > 0.0);
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        cam.rotate(0.0, -4.0, 0.1);
        assert!(cam.orientation().y < 0.0);
    }

    #[test]
    fn looking_along_recovers_angles() {
        let cam = CameraState::looking_along(Vec3::ZERO, Vec3::Z);
        assert!((cam.yaw() - 90.0).abs() < 1e-4);
        assert!(cam.pitch().abs() < 1e-4);
        assert!(cam.orientation().abs_diff_eq(Vec3::Z, EPS));

        let up = CameraState::looking_along(Vec3::ZERO, Vec3::Y);
        assert_eq!(up.pitch(), PITCH_LIMIT_DEG);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = CameraState::looking_along(Vec3::new(-2.0, 0.0, 0.0), Vec3::X);
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPS));
    }
}
