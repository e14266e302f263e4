//! Mesh representation for 3D models
//!
//! Pure CPU-side geometry. Backends receive it through
//! [`RenderBackend::upload_mesh`](crate::render::api::RenderBackend::upload_mesh)
//! and hand back an opaque handle.

use bytemuck::{Pod, Zeroable};

/// Vertex with position, normal and texture coordinate.
///
/// `#[repr(C)]` with no padding so the vertex buffer can be uploaded as raw
/// bytes.
#[allow(unsafe_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Object-space normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from vertices and triangle-list indices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Cube spanning `[-1, 1]` on every axis with per-face normals
    pub fn cube() -> Self {
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // (normal, u axis, v axis)
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        ];
        const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in FACES {
            let base = vertices.len() as u32;
            for (su, sv) in CORNERS {
                let position = [
                    normal[0] + su * u[0] + sv * v[0],
                    normal[1] + su * u[1] + sv * v[1],
                    normal[2] + su * u[2] + sv * v[2],
                ];
                vertices.push(Vertex::new(position, normal, [(su + 1.0) * 0.5, (sv + 1.0) * 0.5]));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertex buffer as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Whether every index addresses an existing vertex and the index count
    /// is a whole number of triangles
    pub fn is_valid(&self) -> bool {
        let count = self.vertices.len();
        self.indices.len() % 3 == 0 && self.indices.iter().all(|&i| (i as usize) < count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_closed_and_valid() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.is_valid());
        for vertex in &cube.vertices {
            assert!(vertex.position.iter().all(|c| c.abs() <= 1.0));
        }
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let cube = Mesh::cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
                nalgebra::Vector3::from(cube.vertices[i as usize].position)
            });
            let n = nalgebra::Vector3::from(cube.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(&(c - a)).dot(&n) > 0.0);
        }
    }

    #[test]
    fn vertex_bytes_are_tightly_packed() {
        let cube = Mesh::cube();
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(cube.vertex_bytes().len(), 24 * 32);
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mesh = Mesh::new(vec![Vertex::new([0.0; 3], [0.0; 3], [0.0; 2])], vec![0, 0, 1]);
        assert!(!mesh.is_valid());
    }
}
