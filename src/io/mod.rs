//! Mesh file I/O.
//!
//! Meshes are read from and written to binary STL, the one format that stores
//! exactly what the normal synthesis needs: a flat list of triangles, each
//! with its own normal.
//!
//! # Usage
//!
//! ```no_run
//! use shademesh::io::{load, save};
//!
//! let mesh = load("model.stl").unwrap();
//! save(&mesh, "copy.stl").unwrap();
//! ```

pub mod stl;

pub use stl::{load, save};
