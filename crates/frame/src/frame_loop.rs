use crate::timing::FrameTiming;
use crate::transforms::{Spin, TransformSet};
use glam::Vec4;
use pyramid_camera::{CameraState, MoveIntent};
use pyramid_common::{ProjectionConfig, ViewerConfig};
use pyramid_input::{InputSource, Key, MouseState};
use pyramid_render::{MeshData, MeshHandle, RenderBackend, TextureData, TextureHandle, uniforms};

/// Lifecycle of the frame loop. There is no way back from `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Backend resources the loop draws every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
}

impl Scene {
    /// Upload the mesh and texture and set the uniforms that never change:
    /// the sampler unit and the brightness multiplier.
    pub fn upload<B: RenderBackend>(
        backend: &mut B,
        mesh: &MeshData,
        texture: &TextureData,
        brightness: Vec4,
    ) -> Result<Self, B::Error> {
        let mesh = backend.upload_mesh(mesh)?;
        let texture = backend.upload_texture(texture)?;
        backend.set_uniform_int(uniforms::TEXTURE_UNIT, 0);
        backend.set_uniform_vec4(uniforms::BRIGHTNESS, brightness);
        tracing::info!(
            mesh = mesh.id,
            indices = mesh.index_count,
            texture = texture.0,
            "scene uploaded"
        );
        Ok(Self { mesh, texture })
    }
}

/// Owns all per-session state: camera, cursor tracking, clock and spin.
///
/// Each call to `step` runs exactly one iteration: time, input, camera,
/// transforms, draw. Nothing happens between calls.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    camera: CameraState,
    mouse: MouseState,
    timing: FrameTiming,
    spin: Spin,
    projection: ProjectionConfig,
    viewport: (u32, u32),
    scene: Scene,
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    /// Build the loop from configuration. `start_time` is the clock reading
    /// the first frame's delta is measured from.
    pub fn new(config: &ViewerConfig, scene: Scene, start_time: f64) -> Self {
        let c = &config.camera;
        let camera = CameraState::new(c.position, c.yaw_deg, c.pitch_deg)
            .with_speed(c.speed)
            .with_sensitivity(c.sensitivity);

        Self {
            camera,
            mouse: MouseState::new(),
            timing: FrameTiming::new(start_time),
            spin: Spin::new(config.scene.spin_deg_per_sec),
            projection: config.projection.clone(),
            viewport: (config.window.width, config.window.height),
            scene,
            state: LoopState::Running,
            frames: 0,
        }
    }

    /// Replace the camera, e.g. to start from a specific pose.
    pub fn with_camera(mut self, camera: CameraState) -> Self {
        self.camera = camera;
        self
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames that were drawn.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// A zero-sized viewport (minimised window) keeps the last valid one.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring empty viewport");
            return;
        }
        self.viewport = (width, height);
    }

    /// The cursor was captured again; its next sample must not turn the camera.
    pub fn reactivate_cursor(&mut self) {
        self.mouse.reset();
    }

    /// Run one iteration. Returns the state after it.
    pub fn step<I, B>(&mut self, input: &mut I, backend: &mut B) -> LoopState
    where
        I: InputSource,
        B: RenderBackend,
    {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        // Time
        let dt = self.timing.advance(input.elapsed_time_seconds());
        if let Some(title) = self.timing.title() {
            input.set_window_title(&title);
        }

        // Input and quit
        input.poll_events();
        if input.is_key_down(Key::Quit) {
            input.request_termination();
            self.state = LoopState::Terminated;
            tracing::info!(frames = self.frames, "quit key pressed");
            return self.state;
        }

        // Translation
        self.camera.translate(move_intent(input), dt);

        // Look
        let (x, y) = input.cursor_position();
        let (dx, dy) = self.mouse.sample(x, y).unwrap_or((0.0, 0.0));
        self.camera.rotate(dx, dy, dt);

        // Spin
        self.spin.advance(dt);

        // Transforms
        let transforms =
            TransformSet::compute(&self.camera, &self.spin, &self.projection, self.viewport);

        // Draw
        submit(backend, &self.scene, &transforms);
        self.frames += 1;

        tracing::trace!(
            frame = self.frames,
            dt,
            position = ?self.camera.position,
            yaw = self.camera.yaw(),
            pitch = self.camera.pitch(),
            "frame"
        );

        self.state
    }

    /// Step until the input source reports termination or the quit key is
    /// pressed. Returns the number of frames drawn.
    pub fn run<I, B>(&mut self, input: &mut I, backend: &mut B) -> u64
    where
        I: InputSource,
        B: RenderBackend,
    {
        while self.state == LoopState::Running {
            if input.should_terminate() {
                self.state = LoopState::Terminated;
                break;
            }
            self.step(input, backend);
        }
        tracing::info!(frames = self.frames, "frame loop terminated");
        self.frames
    }
}

fn move_intent<I: InputSource>(input: &I) -> MoveIntent {
    MoveIntent {
        forward: input.is_key_down(Key::Forward),
        backward: input.is_key_down(Key::Backward),
        left: input.is_key_down(Key::Left),
        right: input.is_key_down(Key::Right),
    }
}

fn submit<B: RenderBackend>(backend: &mut B, scene: &Scene, transforms: &TransformSet) {
    backend.bind_texture(scene.texture);
    backend.set_uniform_mat4(uniforms::MODEL, transforms.model);
    backend.set_uniform_mat4(uniforms::VIEW, transforms.view);
    backend.set_uniform_mat4(uniforms::PROJ, transforms.proj);
    backend.draw_indexed(scene.mesh, scene.mesh.index_count);
    backend.swap_buffers();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use pyramid_input::ScriptedInput;
    use pyramid_render::{BackendCall, RecordingBackend, pyramid};

    const EPS: f32 = 1e-4;

    fn setup(config: &ViewerConfig) -> (FrameLoop, RecordingBackend) {
        let mut backend = RecordingBackend::new();
        let texture = TextureData::checkerboard(8, [0; 4], [255; 4]);
        let scene = Scene::upload(&mut backend, &pyramid(), &texture, Vec4::ONE).unwrap();
        backend.clear_calls();
        (FrameLoop::new(config, scene, 0.0), backend)
    }

    #[test]
    fn scene_upload_sets_static_uniforms() {
        let mut backend = RecordingBackend::new();
        let texture = TextureData::checkerboard(8, [0; 4], [255; 4]);
        let scene =
            Scene::upload(&mut backend, &pyramid(), &texture, Vec4::splat(0.5)).unwrap();
        assert_eq!(scene.mesh.index_count, 12);
        assert_eq!(backend.uniform_int(uniforms::TEXTURE_UNIT), Some(0));
        assert_eq!(backend.uniform_vec4(uniforms::BRIGHTNESS), Some(Vec4::splat(0.5)));
    }

    #[test]
    fn forward_for_one_second_end_to_end() {
        let (frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut frame_loop = frame_loop.with_camera(
            CameraState::looking_along(Vec3::new(-2.0, 0.0, 0.0), Vec3::Z).with_speed(1.0),
        );
        let mut input = ScriptedInput::new(1.0 / 60.0)
            .with_frames(60)
            .holding(Key::Forward);

        let frames = frame_loop.run(&mut input, &mut backend);

        assert_eq!(frames, 60);
        assert_eq!(frame_loop.state(), LoopState::Terminated);
        let p = frame_loop.camera().position;
        assert!(p.abs_diff_eq(Vec3::new(-2.0, 0.0, 1.0), EPS), "{p}");
        assert_eq!(backend.frames_presented(), 60);
    }

    #[test]
    fn one_frame_submits_in_order() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1);

        assert_eq!(frame_loop.step(&mut input, &mut backend), LoopState::Running);

        let names: Vec<&str> = backend
            .calls()
            .iter()
            .map(|c| match c {
                BackendCall::BindTexture(_) => "bind",
                BackendCall::SetMat4 { name, .. } => name.as_str(),
                BackendCall::DrawIndexed { .. } => "draw",
                BackendCall::SwapBuffers => "swap",
                _ => "other",
            })
            .collect();
        assert_eq!(names, ["bind", "model", "view", "proj", "draw", "swap"]);
        assert!(matches!(
            backend.calls()[4],
            BackendCall::DrawIndexed { index_count: 12, .. }
        ));
    }

    #[test]
    fn quit_key_stops_before_drawing() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1).quit_after(3);

        let frames = frame_loop.run(&mut input, &mut backend);

        assert_eq!(frames, 3);
        assert_eq!(backend.draw_count(), 3);
        assert!(input.should_terminate());
        assert_eq!(frame_loop.step(&mut input, &mut backend), LoopState::Terminated);
        assert_eq!(backend.draw_count(), 3);
    }

    #[test]
    fn external_close_is_seen_at_iteration_boundary() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1);
        input.request_termination();
        assert_eq!(frame_loop.run(&mut input, &mut backend), 0);
        assert_eq!(backend.draw_count(), 0);
    }

    #[test]
    fn first_cursor_sample_does_not_rotate() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let start = frame_loop.camera().clone();
        let mut input = ScriptedInput::new(0.1).with_cursor((5000.0, -3000.0), (4.0, -2.0));

        frame_loop.step(&mut input, &mut backend);
        assert_eq!(frame_loop.camera().yaw(), start.yaw());
        assert_eq!(frame_loop.camera().pitch(), start.pitch());

        frame_loop.step(&mut input, &mut backend);
        let s = start.sensitivity;
        let dt = frame_loop.timing().delta_time();
        // Cursor moved right 4 px and up 2 px (screen y decreased).
        assert!((frame_loop.camera().yaw() - 4.0 * s * dt).abs() < EPS);
        assert!((frame_loop.camera().pitch() - 2.0 * s * dt).abs() < EPS);
    }

    #[test]
    fn reactivated_cursor_reseeds() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1).with_cursor((0.0, 0.0), (10.0, 0.0));
        frame_loop.step(&mut input, &mut backend);
        frame_loop.step(&mut input, &mut backend);
        let yaw = frame_loop.camera().yaw();
        assert!(yaw > 0.0);

        frame_loop.reactivate_cursor();
        frame_loop.step(&mut input, &mut backend);
        assert_eq!(frame_loop.camera().yaw(), yaw);
    }

    #[test]
    fn stalled_clock_moves_nothing_and_keeps_title() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.0)
            .holding(Key::Forward)
            .with_cursor((0.0, 0.0), (50.0, 50.0));
        let before = frame_loop.camera().clone();

        for _ in 0..5 {
            frame_loop.step(&mut input, &mut backend);
        }

        assert_eq!(frame_loop.camera().position, before.position);
        assert_eq!(frame_loop.camera().orientation(), before.orientation());
        assert_eq!(frame_loop.spin().angle_deg(), 0.0);
        assert_eq!(input.title(), None);
        // Frames are still drawn.
        assert_eq!(backend.draw_count(), 5);
    }

    #[test]
    fn title_reports_frame_rate() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.5);
        frame_loop.step(&mut input, &mut backend);
        assert_eq!(input.title(), Some("FPS: 2.000000 | dt: 0.500000"));
    }

    #[test]
    fn spin_drives_model_uniform() {
        let mut config = ViewerConfig::default();
        config.scene.spin_deg_per_sec = 90.0;
        let (mut frame_loop, mut backend) = setup(&config);
        let mut input = ScriptedInput::new(1.0);

        frame_loop.step(&mut input, &mut backend);

        assert_eq!(frame_loop.spin().angle_deg(), 90.0);
        let model = backend.uniform_mat4(uniforms::MODEL).unwrap();
        assert!(model.abs_diff_eq(Mat4::from_rotation_y(90.0_f32.to_radians()), 1e-5));
    }

    #[test]
    fn resize_changes_projection_aspect() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1);
        frame_loop.step(&mut input, &mut backend);
        let before = backend.uniform_mat4(uniforms::PROJ).unwrap();

        frame_loop.resize(1600, 600);
        frame_loop.step(&mut input, &mut backend);
        let after = backend.uniform_mat4(uniforms::PROJ).unwrap();

        assert_eq!(frame_loop.viewport(), (1600, 600));
        assert!((before.x_axis.x / after.x_axis.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn minimised_window_keeps_last_viewport() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let mut input = ScriptedInput::new(0.1);
        frame_loop.resize(1024, 512);
        frame_loop.resize(0, 0);
        frame_loop.resize(0, 600);
        assert_eq!(frame_loop.viewport(), (1024, 512));

        frame_loop.step(&mut input, &mut backend);
        let proj = backend.uniform_mat4(uniforms::PROJ).unwrap();
        assert!(proj.is_finite());
    }

    #[test]
    fn cursor_right_and_up_turn_right_and_up() {
        let (mut frame_loop, mut backend) = setup(&ViewerConfig::default());
        let start = frame_loop.camera().clone();
        let right = start.right().unwrap();
        let mut input = ScriptedInput::new(0.1).with_cursor((0.0, 0.0), (3.0, -3.0));

        frame_loop.step(&mut input, &mut backend);
        frame_loop.step(&mut input, &mut backend);

        let o = frame_loop.camera().orientation();
        assert!(o.dot(right) > start.orientation().dot(right));
        assert!(o.y > start.orientation().y);
    }

    #[test]
    fn diagonal_keys_move_faster() {
        let mut config = ViewerConfig::default();
        config.camera.speed = 2.0;
        let (mut frame_loop, mut backend) = setup(&config);
        let mut input = ScriptedInput::new(0.5)
            .with_frames(1)
            .holding(Key::Forward)
            .holding(Key::Right);

        frame_loop.run(&mut input, &mut backend);

        let moved = frame_loop.camera().position - config.camera.position;
        assert!((moved.length() - 2.0_f32.sqrt()).abs() < EPS);
    }
}
