//! Normal synthesis algorithms.
//!
//! The pipeline is split into small stages that can be used on their own:
//!
//! - **Expansion**: flatten facets into per-corner position and normal buffers
//! - **Incidence**: find every facet that touches a position (scan, hash index, tolerance grid)
//! - **Averaging**: reduce incident facet normals to one unit vertex normal
//! - **Synthesis**: run the stages above over a whole mesh, optionally in parallel

pub mod average;
pub mod expand;
pub mod incidence;
pub mod progress;
pub mod synthesize;

pub use progress::{Progress, Stage};
pub use synthesize::{
    load_and_synthesize, synthesize_normals, synthesize_normals_with_progress, ShadedMesh,
    SynthesisDiagnostics, SynthesisOptions,
};
