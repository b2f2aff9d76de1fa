//! Unit mesh generation for 3D primitives
//!
//! All meshes are centred on the origin with counter-clockwise front faces pointing
//! outward. Instances scale them to size.

use glam::Vec3;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(self.vertices[i as usize].position))
        })
    }
}

/// Unit sphere (radius 1) with `segments` latitude and longitude bands
pub fn sphere(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let ring = segments + 1;
    let mut vertices = Vec::with_capacity((ring * ring) as usize);

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..=segments {
            let phi = j as f32 / segments as f32 * 2.0 * PI;
            let (sin_p, cos_p) = phi.sin_cos();
            let n = [sin_t * cos_p, cos_t, sin_t * sin_p];
            vertices.push(Vertex::new(n, n));
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for i in 0..segments {
        for j in 0..segments {
            let first = (i * ring + j) as u16;
            let second = first + ring as u16;
            indices.extend_from_slice(&[first, first + 1, second]);
            indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Unit cube (edge 1)
pub fn cuboid() -> MeshData {
    // (normal, u, v) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        let c = normal * 0.5;
        let (hu, hv) = (u * 0.5, v * 0.5);
        for corner in [c - hu - hv, c + hu - hv, c + hu + hv, c - hu + hv] {
            vertices.push(Vertex::new(corner.to_array(), normal.to_array()));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Unit square in the xz plane facing +y
pub fn plane() -> MeshData {
    let h = 0.5;
    let up = [0.0, 1.0, 0.0];
    MeshData {
        vertices: vec![
            Vertex::new([-h, 0.0, -h], up),
            Vertex::new([h, 0.0, -h], up),
            Vertex::new([h, 0.0, h], up),
            Vertex::new([-h, 0.0, h], up),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle winds counter-clockwise seen from outside
    fn assert_outward(mesh: &MeshData) {
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(c - a);
            if normal.length_squared() < 1e-10 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid) >= -1e-6,
                "inward triangle {a} {b} {c}"
            );
        }
    }

    #[test]
    fn test_sphere_is_unit_and_outward() {
        let mesh = sphere(12);
        assert_eq!(mesh.vertices.len(), 13 * 13);
        assert_eq!(mesh.triangle_count(), 12 * 12 * 2);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_cuboid_is_outward() {
        let mesh = cuboid();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = plane();
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(c - a).normalize();
            assert!((normal - Vec3::Y).length() < 1e-6);
        }
    }
}
