//! Handing shaded buffers to a GPU.
//!
//! A renderer wants plain `f32` triples it can copy straight into a vertex
//! buffer. [`GpuVertex`] is the interleaved layout; the planar accessors on
//! [`ShadedMesh`] serve pipelines that bind positions and normals separately.

use bytemuck::{Pod, Zeroable};

use crate::algo::synthesize::ShadedMesh;

/// Interleaved GPU vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Vertex position.
    pub position: [f32; 3],
    /// Smoothed unit normal.
    pub normal: [f32; 3],
}

impl GpuVertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<GpuVertex>();

    /// Byte offset of the normal within a vertex.
    pub const NORMAL_OFFSET: usize = std::mem::size_of::<[f32; 3]>();
}

impl ShadedMesh {
    /// Interleave positions and normals.
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| GpuVertex {
                position: [p.x, p.y, p.z],
                normal: [n.x, n.y, n.z],
            })
            .collect()
    }

    /// Positions as `[x, y, z]` triples.
    pub fn position_array(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Normals as `[x, y, z]` triples.
    pub fn normal_array(&self) -> Vec<[f32; 3]> {
        self.normals.iter().map(|n| [n.x, n.y, n.z]).collect()
    }

    /// Planar position buffer as native-endian bytes.
    pub fn position_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.position_array()).to_vec()
    }

    /// Planar normal buffer as native-endian bytes.
    pub fn normal_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.normal_array()).to_vec()
    }

    /// Interleaved vertex data as native-endian bytes, ready for upload.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.gpu_vertices()).to_vec()
    }
}

/// View vertices as raw bytes without copying.
pub fn as_bytes(vertices: &[GpuVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::synthesize::{synthesize_normals, SynthesisOptions};
    use crate::mesh::{Facet, Mesh};
    use nalgebra::{Point3, Vector3};

    fn shaded_triangle() -> ShadedMesh {
        let mesh = Mesh::from_facets(vec![Facet::new(
            Vector3::new(0.0, 0.0, 1.0),
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        )]);
        synthesize_normals(&mesh, &SynthesisOptions::default()).unwrap()
    }

    #[test]
    fn test_layout() {
        assert_eq!(GpuVertex::STRIDE, 24);
        assert_eq!(GpuVertex::NORMAL_OFFSET, 12);
    }

    #[test]
    fn test_interleaving() {
        let verts = shaded_triangle().gpu_vertices();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_planar_arrays() {
        let shaded = shaded_triangle();
        assert_eq!(shaded.position_array()[2], [0.0, 1.0, 0.0]);
        assert_eq!(shaded.normal_array(), vec![[0.0, 0.0, 1.0]; 3]);

        let positions = shaded.position_bytes();
        assert_eq!(positions.len(), 36);
        assert_eq!(f32::from_ne_bytes(positions[28..32].try_into().unwrap()), 1.0);
        assert_eq!(shaded.normal_bytes().len(), 36);
    }

    #[test]
    fn test_bytes() {
        let shaded = shaded_triangle();
        let bytes = shaded.to_bytes();
        assert_eq!(bytes.len(), 3 * GpuVertex::STRIDE);

        let verts = shaded.gpu_vertices();
        assert_eq!(as_bytes(&verts), &bytes[..]);

        // z of the first normal
        let z = f32::from_ne_bytes(bytes[20..24].try_into().unwrap());
        assert_eq!(z, 1.0);
    }
}
