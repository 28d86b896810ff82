use crate::mesh::MeshData;
use crate::texture::TextureData;
use glam::{Mat4, Vec4};

/// Uniform names understood by the pyramid shader.
pub mod uniforms {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJ: &str = "proj";
    pub const BRIGHTNESS: &str = "brightness";
    pub const TEXTURE_UNIT: &str = "tex";
}

/// Opaque handle to a mesh living in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    pub id: u32,
    pub index_count: u32,
}

/// Opaque handle to a texture living in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Renderer-agnostic interface. All backends implement this trait.
///
/// Uploads may fail and report through `Self::Error`. Per-frame calls do not
/// return errors: a backend recovers from transient failures itself (lost
/// surface, unknown uniform) and at worst drops a frame.
pub trait RenderBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Upload vertex and index data. Called once before the loop.
    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, Self::Error>;

    /// Upload an RGBA8 image. Called once before the loop.
    fn upload_texture(&mut self, texture: &TextureData) -> Result<TextureHandle, Self::Error>;

    fn bind_texture(&mut self, texture: TextureHandle);

    fn set_uniform_mat4(&mut self, name: &str, value: Mat4);

    fn set_uniform_vec4(&mut self, name: &str, value: Vec4);

    fn set_uniform_int(&mut self, name: &str, value: i32);

    /// Draw `index_count` indices of `mesh` as a triangle list with the
    /// currently bound texture and uniforms.
    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32);

    /// Present the finished frame.
    fn swap_buffers(&mut self);
}
