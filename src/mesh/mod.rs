//! Core mesh data structures.
//!
//! This module provides the triangle-soup representation read from STL files.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], an ordered list of [`Facet`]s. Each facet
//! stores its own normal and its own three vertex positions, so two facets
//! sharing an edge hold numerically identical but independent copies of the
//! edge endpoints. No topology is built.
//!
//! # Index Types
//!
//! Elements are identified by type-safe index wrappers:
//! - [`FacetId`] - Identifies a facet
//! - [`CornerId`] - Identifies one of the three vertex copies of a facet, i.e. a
//!   slot in the flattened vertex buffer
//!
//! # Construction
//!
//! ```
//! use shademesh::mesh::{Facet, Mesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let facet = Facet::new(
//!     Vector3::new(0.0, 0.0, 1.0),
//!     [
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//! );
//! let mesh = Mesh::from_facets(vec![facet]);
//! assert_eq!(mesh.num_vertices(), 3);
//! ```

mod facet;
mod index;
mod soup;

pub use facet::Facet;
pub use index::{CornerId, FacetId, CORNERS_PER_FACET, MAX_FACETS};
pub use soup::Mesh;
