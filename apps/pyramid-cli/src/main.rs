use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pyramid_common::ViewerConfig;
use pyramid_frame::{FrameLoop, Scene};
use pyramid_input::{Key, ScriptedInput};
use pyramid_render::{RecordingBackend, TextureData, pyramid};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pyramid-cli", about = "Headless tooling for the pyramid viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective settings
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Run the frame loop against scripted input without a window
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    /// Number of frames to run
    #[arg(short, long, default_value = "60")]
    frames: u64,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
    /// Hold the forward key
    #[arg(long)]
    forward: bool,
    /// Hold the backward key
    #[arg(long)]
    backward: bool,
    /// Hold the strafe-left key
    #[arg(long)]
    left: bool,
    /// Hold the strafe-right key
    #[arg(long)]
    right: bool,
    /// Cursor motion per frame in pixels (screen y points down)
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_hyphen_values = true)]
    look: Option<Vec<f64>>,
}

impl SimulateArgs {
    fn scripted_input(&self) -> anyhow::Result<ScriptedInput> {
        anyhow::ensure!(
            self.dt.is_finite() && self.dt >= 0.0,
            "--dt must be a non-negative number"
        );

        let mut input = ScriptedInput::new(self.dt).with_frames(self.frames);
        for (held, key) in [
            (self.forward, Key::Forward),
            (self.backward, Key::Backward),
            (self.left, Key::Left),
            (self.right, Key::Right),
        ] {
            if held {
                input.press(key);
            }
        }
        if let Some(look) = &self.look {
            input = input.with_cursor((0.0, 0.0), (look[0], look[1]));
        }
        Ok(input)
    }
}

/// Everything a scripted run leaves behind.
struct Simulation {
    frame_loop: FrameLoop,
    backend: RecordingBackend,
    input: ScriptedInput,
    drawn: u64,
}

fn simulate(config: &ViewerConfig, args: &SimulateArgs) -> anyhow::Result<Simulation> {
    let mut input = args.scripted_input()?;
    let mut backend = RecordingBackend::new();
    let texture = TextureData::checkerboard(8, [255; 4], [0, 0, 0, 255]);
    let scene = Scene::upload(&mut backend, &pyramid(), &texture, config.scene.brightness)?;
    let mut frame_loop = FrameLoop::new(config, scene, 0.0);

    tracing::debug!(frames = args.frames, dt = args.dt, "starting scripted simulation");
    let drawn = frame_loop.run(&mut input, &mut backend);

    Ok(Simulation {
        frame_loop,
        backend,
        input,
        drawn,
    })
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("pyramid-cli v{}", env!("CARGO_PKG_VERSION"));
            let w = &config.window;
            let c = &config.camera;
            let p = &config.projection;
            println!("window: {}x{} \"{}\"", w.width, w.height, w.title);
            println!(
                "camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} speed={} sensitivity={}",
                c.position.x, c.position.y, c.position.z, c.yaw_deg, c.pitch_deg, c.speed, c.sensitivity
            );
            println!(
                "projection: fov={} near={} far={} aspect={:.4}{}",
                p.fov_deg,
                p.near,
                p.far,
                p.aspect_ratio(w.width, w.height),
                if p.integer_aspect { " (truncated)" } else { "" }
            );
            println!(
                "scene: spin={} deg/s texture={}",
                config.scene.spin_deg_per_sec, config.scene.texture
            );
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate(args) => {
            let sim = simulate(&config, &args)?;

            let cam = sim.frame_loop.camera();
            let o = cam.orientation();
            println!("frames: {}", sim.drawn);
            println!(
                "position: ({:.4}, {:.4}, {:.4})",
                cam.position.x, cam.position.y, cam.position.z
            );
            println!("orientation: ({:.4}, {:.4}, {:.4})", o.x, o.y, o.z);
            println!("yaw: {:.3} pitch: {:.3}", cam.yaw(), cam.pitch());
            println!("spin: {:.3} deg", sim.frame_loop.spin().angle_deg());
            println!("draw calls: {}", sim.backend.draw_count());
            if let Some(title) = sim.input.title() {
                println!("last title: {title}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn parse_simulate(args: &[&str]) -> SimulateArgs {
        let mut argv = vec!["pyramid-cli", "simulate"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Simulate(args) => args,
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn forward_flag_walks_toward_pyramid() {
        let args = parse_simulate(&["--forward"]);
        let sim = simulate(&ViewerConfig::default(), &args).unwrap();

        assert_eq!(sim.drawn, 60);
        assert_eq!(sim.backend.draw_count(), 60);
        let pos = sim.frame_loop.camera().position;
        assert!(pos.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-4), "{pos:?}");
    }

    #[test]
    fn opposing_flags_cancel() {
        let args = parse_simulate(&["--frames", "10", "--left", "--right"]);
        let sim = simulate(&ViewerConfig::default(), &args).unwrap();
        let pos = sim.frame_loop.camera().position;
        assert!(pos.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn look_accepts_negative_deltas() {
        let args = parse_simulate(&["--frames", "3", "--dt", "0.1", "--look", "2", "-4"]);
        assert_eq!(args.look, Some(vec![2.0, -4.0]));

        let sim = simulate(&ViewerConfig::default(), &args).unwrap();
        let cam = sim.frame_loop.camera();
        // Two deltas after the seeding frame; screen y moving up looks up.
        let s = ViewerConfig::default().camera.sensitivity;
        let dt = 0.1_f32;
        assert!((cam.yaw() - 2.0 * 2.0 * s * dt).abs() < 1e-3);
        assert!((cam.pitch() - 2.0 * 4.0 * s * dt).abs() < 1e-3);
    }

    #[test]
    fn negative_dt_is_rejected() {
        let args = parse_simulate(&["--dt=-0.5"]);
        assert!(simulate(&ViewerConfig::default(), &args).is_err());
    }
}
