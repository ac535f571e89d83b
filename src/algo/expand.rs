//! Flattening a facet list into per-corner buffers.
//!
//! Every facet contributes three consecutive entries to the vertex buffer and
//! three copies of its normal to the facet-normal buffer, so corner `i` of
//! either buffer belongs to facet `i / 3`.

use nalgebra::{Point3, Vector3};

use crate::mesh::{CornerId, Facet, FacetId, Mesh};

/// Which normal each facet contributes to the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacetNormalSource {
    /// The normal stored in the file.
    #[default]
    Stored,
    /// The unit normal implied by the vertex winding (zero when degenerate).
    Geometric,
    /// The stored normal, unless it is zero-length or non-finite.
    StoredOrGeometric,
}

impl FacetNormalSource {
    /// Select the normal a facet contributes.
    pub fn normal_of(self, facet: &Facet) -> Vector3<f32> {
        match self {
            FacetNormalSource::Stored => facet.normal,
            FacetNormalSource::Geometric => facet.geometric_normal(),
            FacetNormalSource::StoredOrGeometric => {
                let n = facet.normal;
                let usable = n.iter().all(|c| c.is_finite()) && n.norm_squared() > 0.0;
                if usable {
                    n
                } else {
                    facet.geometric_normal()
                }
            }
        }
    }
}

/// The flattened triangle soup: one entry per facet corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedMesh {
    /// Vertex positions, three per facet.
    pub positions: Vec<Point3<f32>>,
    /// The owning facet's normal, repeated for each of its corners.
    pub facet_normals: Vec<Vector3<f32>>,
}

impl ExpandedMesh {
    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of facets.
    #[inline]
    pub fn num_facets(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position of a corner.
    #[inline]
    pub fn position(&self, c: CornerId) -> &Point3<f32> {
        &self.positions[c.index()]
    }

    /// Normal contributed by a facet.
    #[inline]
    pub fn facet_normal(&self, f: FacetId) -> &Vector3<f32> {
        &self.facet_normals[f.corner(0).index()]
    }

    /// Vertex positions grouped back into facets.
    pub fn triangles(&self) -> impl Iterator<Item = (FacetId, &[Point3<f32>])> + '_ {
        self.positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, tri)| (FacetId::new(i), tri))
    }
}

/// Flatten a mesh using the stored facet normals.
///
/// # Example
///
/// ```
/// use shademesh::algo::expand::expand;
/// use shademesh::mesh::{Facet, Mesh};
/// use nalgebra::Point3;
///
/// let mesh = Mesh::from_facets(vec![Facet::from_vertices([
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ])]);
/// let soup = expand(&mesh);
/// assert_eq!(soup.positions.len(), 3);
/// assert_eq!(soup.facet_normals.len(), 3);
/// ```
pub fn expand(mesh: &Mesh) -> ExpandedMesh {
    expand_with(mesh, FacetNormalSource::Stored)
}

/// Flatten a mesh, choosing each facet's normal from `source`.
pub fn expand_with(mesh: &Mesh, source: FacetNormalSource) -> ExpandedMesh {
    let n = mesh.num_vertices();
    let mut positions = Vec::with_capacity(n);
    let mut facet_normals = Vec::with_capacity(n);

    for facet in mesh.facets() {
        let normal = source.normal_of(facet);
        for v in &facet.vertices {
            positions.push(*v);
            facet_normals.push(normal);
        }
    }

    ExpandedMesh {
        positions,
        facet_normals,
    }
}
