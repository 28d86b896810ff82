//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - The frame loop talks to the GPU only through `RenderBackend`.
//! - Mesh and texture data are uploaded once, before the first frame.
//!
//! `RecordingBackend` implements the trait without a GPU and records every
//! call, which is what headless runs and tests use.

mod backend;
mod mesh;
mod recording;
mod texture;

pub use backend::{MeshHandle, RenderBackend, TextureHandle, uniforms};
pub use mesh::{MeshData, Vertex, VertexAttribute, pyramid};
pub use recording::{BackendCall, RecordingBackend};
pub use texture::{TextureData, TextureError};
