//! # Shademesh
//!
//! Smooth per-vertex normals for binary STL triangle soups.
//!
//! STL files store one flat normal per facet, which makes curved surfaces
//! look faceted when rendered. Shademesh flattens the facets into a vertex
//! buffer and gives every vertex the normalized sum of the normals of all
//! facets that touch its position, producing buffers a renderer can upload
//! directly for smooth shading.
//!
//! ## Features
//!
//! - **Strict STL reader**: binary layout only, length checked against the facet count
//! - **Exact or tolerant matching**: IEEE equality by default, opt-in distance tolerance
//! - **Indexed incidence**: hash and grid indices, bit-identical to the quadratic scan
//! - **Parallel execution**: per-vertex work spread across threads with rayon
//! - **GPU hand-off**: `bytemuck` vertex layout for upload
//!
//! ## Quick Start
//!
//! ```no_run
//! use shademesh::prelude::*;
//!
//! // Load and shade in one step
//! let shaded = load_and_synthesize("model.stl", &SynthesisOptions::default()).unwrap();
//!
//! println!("Vertices: {}", shaded.vertices.len());
//! for (p, n) in shaded.vertices.iter().zip(&shaded.normals) {
//!     println!("{:?} -> {:?}", p, n);
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use shademesh::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! // Two facets folded along the x axis
//! let mesh = Mesh::from_facets(vec![
//!     Facet::new(
//!         Vector3::new(0.0, 0.0, 1.0),
//!         [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
//!     ),
//!     Facet::new(
//!         Vector3::new(0.0, -1.0, 0.0),
//!         [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -1.0), Point3::new(1.0, 0.0, 0.0)],
//!     ),
//! ]);
//!
//! let shaded = synthesize_normals(&mesh, &SynthesisOptions::default()).unwrap();
//! assert_eq!(shaded.normals.len(), 6);
//!
//! // Vertices on the fold get the bisecting normal
//! let h = std::f32::consts::FRAC_1_SQRT_2;
//! assert!((shaded.normals[0] - Vector3::new(0.0, -h, h)).norm() < 1e-6);
//! ```
//!
//! ## Choosing a Matcher
//!
//! ```
//! use shademesh::prelude::*;
//!
//! let options = SynthesisOptions::default()
//!     .with_strategy(MatchStrategy::Scan)
//!     .with_tolerance(1e-5)
//!     .sequential();
//! assert!(options.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod render;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use shademesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::expand::FacetNormalSource;
    pub use crate::algo::incidence::{MatchStrategy, VertexMatch};
    pub use crate::algo::{
        load_and_synthesize, synthesize_normals, Progress, ShadedMesh, SynthesisOptions,
    };
    pub use crate::error::{FormatError, MeshError, Result};
    pub use crate::mesh::{CornerId, Facet, FacetId, Mesh};
    pub use crate::render::GpuVertex;
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_tetrahedron() {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = [
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];
        let mesh: Mesh = faces
            .iter()
            .map(|&[a, b, c]| Facet::from_vertices([p[a], p[b], p[c]]))
            .collect();

        let shaded = synthesize_normals(&mesh, &SynthesisOptions::default()).unwrap();
        assert_eq!(shaded.len(), 12);
        assert!(shaded.diagnostics.is_clean());

        // every corner of the same position gets the same normal
        for i in 0..shaded.len() {
            for j in 0..shaded.len() {
                if shaded.vertices[i] == shaded.vertices[j] {
                    assert_eq!(shaded.normals[i], shaded.normals[j]);
                }
            }
        }

        // normals point away from the interior
        let centroid = Vector3::new(0.5, 0.5, 0.25);
        for (v, n) in shaded.vertices.iter().zip(&shaded.normals) {
            assert!(n.dot(&(v.coords - centroid)) > 0.0);
        }
    }
}
