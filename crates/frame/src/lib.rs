//! Frame Loop: the per-frame pipeline of the pyramid viewer.
//!
//! Each iteration samples the clock, polls input, moves and turns the camera,
//! advances the pyramid spin, builds model/view/projection matrices and issues
//! one indexed draw.
//!
//! # Invariants
//! - Delta time is computed before any motion in the same iteration.
//! - Termination takes effect at an iteration boundary, never mid-frame.
//! - All state is owned by `FrameLoop`; there are no globals.

mod frame_loop;
mod timing;
mod transforms;

pub use frame_loop::{FrameLoop, LoopState, Scene};
pub use timing::{FrameTiming, MIN_DISPLAY_DT};
pub use transforms::{Spin, TransformSet, projection_matrix};
