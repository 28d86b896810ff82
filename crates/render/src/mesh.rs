use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, colour, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub texcoord: [f32; 2],
}

/// One float attribute inside the interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of f32 components.
    pub components: u32,
    /// Byte offset inside the vertex.
    pub offset: u64,
}

impl Vertex {
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            offset: 12,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: 24,
        },
    ];
}

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// True when every index points at an existing vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }
}

/// The textured, vertex-coloured pyramid: four side faces meeting at an apex
/// at y = 0.5 over a square base at y = -0.5. Each face has its own three
/// vertices so texture coordinates do not have to be shared.
pub fn pyramid() -> MeshData {
    const APEX: [f32; 3] = [0.0, 0.5, 0.0];
    const APEX_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
    const APEX_UV: [f32; 2] = [0.5, 1.0];

    // Base corners of each face, in winding order.
    let faces: [([f32; 3], [f32; 3]); 4] = [
        ([-0.5, -0.5, 0.5], [0.5, -0.5, 0.5]),
        ([-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5]),
        ([0.5, -0.5, -0.5], [-0.5, -0.5, -0.5]),
        ([0.5, -0.5, 0.5], [0.5, -0.5, -0.5]),
    ];

    let mut vertices = Vec::with_capacity(12);
    for (left, right) in faces {
        vertices.push(Vertex {
            position: APEX,
            color: APEX_COLOR,
            texcoord: APEX_UV,
        });
        vertices.push(Vertex {
            position: left,
            color: [1.0, 0.0, 1.0],
            texcoord: [0.0, 0.0],
        });
        vertices.push(Vertex {
            position: right,
            color: [0.0, 1.0, 1.0],
            texcoord: [1.0, 0.0],
        });
    }

    let indices = (0..vertices.len() as u32).collect();

    MeshData {
        name: "pyramid".into(),
        vertices,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_attributes() {
        assert_eq!(Vertex::STRIDE, 32);
        let last = Vertex::ATTRIBUTES[2];
        assert_eq!(last.offset + last.components as u64 * 4, Vertex::STRIDE);
    }

    #[test]
    fn pyramid_has_four_faces() {
        let mesh = pyramid();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.index_count(), 12);
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn pyramid_faces_share_the_apex() {
        let mesh = pyramid();
        for face in mesh.vertices.chunks(3) {
            assert_eq!(face[0].position, [0.0, 0.5, 0.0]);
            assert_eq!(face[1].position[1], -0.5);
            assert_eq!(face[2].position[1], -0.5);
        }
    }

    #[test]
    fn pyramid_bytes_are_tightly_packed() {
        let mesh = pyramid();
        let bytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        assert_eq!(bytes.len(), 12 * 32);
    }
}
