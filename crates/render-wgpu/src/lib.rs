//! wgpu render backend for the pyramid viewer.
//!
//! Implements `RenderBackend` on top of a wgpu surface: one textured,
//! depth-tested pipeline, a uniform block holding model/view/proj and a
//! brightness multiplier, and one bind group per uploaded texture.
//!
//! # Invariants
//! - Surface loss is recovered by reconfiguring; the frame is dropped.
//! - Only one surface texture is held at a time, released by `swap_buffers`.

mod gpu;
mod shaders;

pub use gpu::{GpuError, Uniforms, WgpuBackend};
