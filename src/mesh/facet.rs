//! A single triangular facet as stored in a triangle soup.

use nalgebra::{Point3, Vector3};

/// Relative threshold below which a facet counts as having zero area.
///
/// Compared against `|e1 × e2| / (|e1| |e2|)`, i.e. the sine of the angle
/// between the two edges leaving the first vertex.
const DEGENERATE_SINE: f32 = 1e-7;

/// One triangular surface element: a normal plus three vertex positions.
///
/// The normal is whatever the source file stored; it is not required to be
/// unit length or to agree with the winding of the vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Facet normal as stored.
    pub normal: Vector3<f32>,
    /// Vertex positions in winding order.
    pub vertices: [Point3<f32>; 3],
}

impl Facet {
    /// Create a facet from a stored normal and three vertices.
    pub fn new(normal: Vector3<f32>, vertices: [Point3<f32>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Create a facet whose stored normal is derived from its winding.
    pub fn from_vertices(vertices: [Point3<f32>; 3]) -> Self {
        let mut facet = Self::new(Vector3::zeros(), vertices);
        facet.normal = facet.geometric_normal();
        facet
    }

    /// Unnormalized cross product of the two edges leaving the first vertex.
    ///
    /// Its length is twice the facet area.
    #[inline]
    pub fn cross(&self) -> Vector3<f32> {
        let [p0, p1, p2] = &self.vertices;
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the area of the facet.
    pub fn area(&self) -> f32 {
        0.5 * self.cross().norm()
    }

    /// Whether the facet has (numerically) zero area.
    pub fn is_degenerate(&self) -> bool {
        let [p0, p1, p2] = &self.vertices;
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let cross = e1.cross(&e2).norm();
        cross == 0.0 || cross <= DEGENERATE_SINE * e1.norm() * e2.norm()
    }

    /// Unit normal implied by the winding order.
    ///
    /// Degenerate facets yield the zero vector.
    pub fn geometric_normal(&self) -> Vector3<f32> {
        if self.is_degenerate() {
            return Vector3::zeros();
        }
        self.cross().normalize()
    }
}
