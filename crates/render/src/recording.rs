use crate::backend::{MeshHandle, RenderBackend, TextureHandle};
use crate::mesh::MeshData;
use crate::texture::TextureData;
use glam::{Mat4, Vec4};
use std::collections::BTreeMap;
use std::convert::Infallible;

/// One call made against a backend, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UploadMesh { name: String, index_count: u32 },
    UploadTexture { name: String, width: u32, height: u32 },
    BindTexture(TextureHandle),
    SetMat4 { name: String, value: Mat4 },
    SetVec4 { name: String, value: Vec4 },
    SetInt { name: String, value: i32 },
    DrawIndexed { mesh: MeshHandle, index_count: u32 },
    SwapBuffers,
}

/// GPU-less backend that records every call.
///
/// Also keeps the latest value of each uniform, the way a shader program
/// would, so callers can read back what the last frame used.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    mat4: BTreeMap<String, Mat4>,
    vec4: BTreeMap<String, Vec4>,
    ints: BTreeMap<String, i32>,
    meshes: u32,
    textures: u32,
    frames: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drop the call log, keeping uniform values and counters.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn uniform_mat4(&self, name: &str) -> Option<Mat4> {
        self.mat4.get(name).copied()
    }

    pub fn uniform_vec4(&self, name: &str) -> Option<Vec4> {
        self.vec4.get(name).copied()
    }

    pub fn uniform_int(&self, name: &str) -> Option<i32> {
        self.ints.get(name).copied()
    }

    /// Number of `swap_buffers` calls so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::DrawIndexed { .. }))
            .count()
    }
}

impl RenderBackend for RecordingBackend {
    type Error = Infallible;

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, Infallible> {
        let handle = MeshHandle {
            id: self.meshes,
            index_count: mesh.index_count(),
        };
        self.meshes += 1;
        self.calls.push(BackendCall::UploadMesh {
            name: mesh.name.clone(),
            index_count: handle.index_count,
        });
        Ok(handle)
    }

    fn upload_texture(&mut self, texture: &TextureData) -> Result<TextureHandle, Infallible> {
        let handle = TextureHandle(self.textures);
        self.textures += 1;
        self.calls.push(BackendCall::UploadTexture {
            name: texture.name.clone(),
            width: texture.width,
            height: texture.height,
        });
        Ok(handle)
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.calls.push(BackendCall::BindTexture(texture));
    }

    fn set_uniform_mat4(&mut self, name: &str, value: Mat4) {
        self.mat4.insert(name.to_owned(), value);
        self.calls.push(BackendCall::SetMat4 {
            name: name.to_owned(),
            value,
        });
    }

    fn set_uniform_vec4(&mut self, name: &str, value: Vec4) {
        self.vec4.insert(name.to_owned(), value);
        self.calls.push(BackendCall::SetVec4 {
            name: name.to_owned(),
            value,
        });
    }

    fn set_uniform_int(&mut self, name: &str, value: i32) {
        self.ints.insert(name.to_owned(), value);
        self.calls.push(BackendCall::SetInt {
            name: name.to_owned(),
            value,
        });
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) {
        self.calls.push(BackendCall::DrawIndexed { mesh, index_count });
    }

    fn swap_buffers(&mut self) {
        self.frames += 1;
        self.calls.push(BackendCall::SwapBuffers);
    }
}
