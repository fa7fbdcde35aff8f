//! Mesh representation for 3D models
//!
//! Pure geometry data structures. Backend-specific vertex layout
//! information (buffer bindings, attribute formats) belongs to whichever
//! renderer implementation consumes these, not here.

use crate::foundation::math::Vec3;

/// 3D vertex data structure for rendering
///
/// Represents a single vertex with position, normal, and texture coordinate
/// data. The `#[repr(C)]` attribute ensures consistent memory layout, which
/// renderer implementations rely on for GPU buffer uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Indexed triangle mesh
///
/// Meshes are registered with the scene container under a name; leaf nodes
/// reference them by that name and the renderer looks them up at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Triangle indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from vertex and index data
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recompute per-vertex normals from face geometry.
    ///
    /// Each triangle contributes its area-weighted face normal to its three
    /// vertices; the accumulated vectors are then normalized. Degenerate
    /// triangles contribute nothing.
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vec3::zeros(); self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);

            // Cross product magnitude is proportional to twice the face area
            let face_normal = (p1 - p0).cross(&(p2 - p0));
            accumulated[i0] += face_normal;
            accumulated[i1] += face_normal;
            accumulated[i2] += face_normal;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(&accumulated) {
            if normal.magnitude() > f32::EPSILON {
                let n = normal.normalize();
                vertex.normal = [n.x, n.y, n.z];
            }
        }
    }

    /// Axis-aligned bounds of the vertex positions, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(self.vertices.first()?.position);
        let mut min = first;
        let mut max = first;
        for vertex in &self.vertices[1..] {
            let p = Vec3::from(vertex.position);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> Mesh {
        // Unit square in the XZ plane, facing +Y
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0]),
            Vertex::new([0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 1.0]),
            Vertex::new([1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Mesh::new(vertices, indices)
    }

    #[test]
    fn test_compute_normals_planar_quad() {
        let mut mesh = quad();
        mesh.compute_normals();
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.normal[0], 0.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[1], 1.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[2], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bounds() {
        let mesh = quad();
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min, Vec3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_bounds_empty_mesh() {
        let mesh = Mesh::new(Vec::new(), Vec::new());
        assert!(mesh.bounds().is_none());
        assert_eq!(mesh.triangle_count(), 0);
    }
}
