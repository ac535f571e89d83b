//! Triangle-soup mesh: an ordered list of independent facets.

use nalgebra::Point3;

use super::{Facet, FacetId};

/// An ordered sequence of facets with no shared-index topology.
///
/// Facets that touch keep their own copies of the shared positions; nothing
/// is deduplicated here. A `Mesh` is built once and then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    facets: Vec<Facet>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from facets, keeping their order.
    pub fn from_facets(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// All facets in file order.
    #[inline]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Get a facet by ID.
    #[inline]
    pub fn facet(&self, f: FacetId) -> &Facet {
        &self.facets[f.index()]
    }

    /// Number of facets.
    #[inline]
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Number of vertex copies (three per facet).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.facets.len() * 3
    }

    /// Whether the mesh has no facets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Iterate over all facet IDs.
    pub fn facet_ids(&self) -> impl Iterator<Item = FacetId> + '_ {
        (0..self.facets.len()).map(FacetId::new)
    }

    /// Facets with zero area.
    pub fn degenerate_facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.facet_ids().filter(|&f| self.facet(f).is_degenerate())
    }

    /// Get the axis-aligned bounding box of the mesh.
    ///
    /// Returns `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.facets.first()?.vertices[0];
        let mut min = first;
        let mut max = first;

        for p in self.facets.iter().flat_map(|f| f.vertices.iter()) {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(|f| f64::from(f.area())).sum()
    }

    /// Consume the mesh and return its facets.
    pub fn into_facets(self) -> Vec<Facet> {
        self.facets
    }
}

impl FromIterator<Facet> for Mesh {
    fn from_iter<T: IntoIterator<Item = Facet>>(iter: T) -> Self {
        Self::from_facets(iter.into_iter().collect())
    }
}
