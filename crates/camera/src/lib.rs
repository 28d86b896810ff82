//! Free-look camera state for the pyramid viewer.
//!
//! # Invariants
//! - `orientation` is unit length and derived from yaw/pitch only.
//! - Pitch stays within ±89.9 degrees, so the fixed up vector never lines up
//!   with the view direction.
//! - A non-positive or non-finite frame time moves nothing.

mod camera;

pub use camera::{CameraState, MoveIntent, PITCH_LIMIT_DEG};
