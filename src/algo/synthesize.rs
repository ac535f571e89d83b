//! Smooth per-vertex normals for a triangle soup.
//!
//! This is the full pipeline: flatten the facets into per-corner buffers,
//! find the facets incident to every corner position, and average their
//! normals. The output buffers are index-aligned with the flattened vertex
//! buffer, ready to be handed to a renderer.
//!
//! # Example
//!
//! ```
//! use shademesh::algo::synthesize::{synthesize_normals, SynthesisOptions};
//! use shademesh::mesh::{Facet, Mesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let mesh = Mesh::from_facets(vec![Facet::new(
//!     Vector3::new(0.0, 0.0, 1.0),
//!     [
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//! )]);
//!
//! let shaded = synthesize_normals(&mesh, &SynthesisOptions::default()).unwrap();
//! assert_eq!(shaded.normals, vec![Vector3::new(0.0, 0.0, 1.0); 3]);
//! ```
//!
//! # Complexity
//!
//! With [`MatchStrategy::Scan`] every corner scans every facet, so a mesh of
//! F facets costs O(F²). [`MatchStrategy::Indexed`] (the default) builds a
//! hash index first and answers each query in expected O(k) for k incident
//! facets. Both produce bit-identical buffers.

use std::path::Path;
use std::time::Instant;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::io;
use crate::mesh::Mesh;

use super::average::average_normals;
use super::expand::{expand_with, ExpandedMesh, FacetNormalSource};
use super::incidence::{build_matcher, IncidenceMatcher, MatchStrategy, VertexMatch};
use super::progress::{Progress, Stage};

/// Corners averaged between progress reports.
const PROGRESS_CHUNK: usize = 4096;

/// Vertex positions, three per facet in facet order.
pub type VertexBuffer = Vec<Point3<f32>>;

/// One smoothed normal per entry of a [`VertexBuffer`].
pub type NormalBuffer = Vec<Vector3<f32>>;

/// Options for normal synthesis.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// How incidence queries are answered.
    pub strategy: MatchStrategy,

    /// Match positions within this distance instead of exactly.
    ///
    /// `None` (the default) means exact component-wise equality. A tolerance
    /// lets vertices that differ in the last bits share a smooth normal.
    pub tolerance: Option<f32>,

    /// Which normal each facet contributes.
    pub facet_normals: FacetNormalSource,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Indexed,
            tolerance: None,
            facet_normals: FacetNormalSource::Stored,
            parallel: true,
        }
    }
}

impl SynthesisOptions {
    /// Set the incidence strategy.
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Match vertices within `tolerance` instead of exactly.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Match vertices exactly (the default).
    pub fn exact(mut self) -> Self {
        self.tolerance = None;
        self
    }

    /// Set where facet normals come from.
    pub fn with_facet_normals(mut self, source: FacetNormalSource) -> Self {
        self.facet_normals = source;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The vertex matching rule these options select.
    pub fn vertex_match(&self) -> VertexMatch {
        match self.tolerance {
            Some(tol) => VertexMatch::Within(tol),
            None => VertexMatch::Exact,
        }
    }

    /// Check option values.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidParameter`] if the tolerance is not a finite,
    /// normal, positive number.
    pub fn validate(&self) -> Result<()> {
        if let Some(tol) = self.tolerance {
            if !tol.is_finite() || tol < f32::MIN_POSITIVE {
                return Err(MeshError::invalid_param(
                    "tolerance",
                    tol,
                    "must be a finite positive number",
                ));
            }
        }
        Ok(())
    }
}

/// Counts of numerically degraded output, for callers that want to report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisDiagnostics {
    /// Facets with zero area.
    pub degenerate_facets: usize,
    /// Corners no facet matched; their normal is zero.
    pub unmatched_vertices: usize,
    /// Corners whose averaged normal has NaN or infinite components.
    pub non_finite_normals: usize,
}

impl SynthesisDiagnostics {
    /// Whether every output normal is well-formed and every facet has area.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Vertex and normal buffers for a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadedMesh {
    /// Vertex positions, three per facet.
    pub vertices: VertexBuffer,
    /// Smoothed normal for each vertex.
    pub normals: NormalBuffer,
    /// What went numerically wrong, if anything.
    pub diagnostics: SynthesisDiagnostics,
}

impl ShadedMesh {
    /// Number of vertices (and normals).
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the buffers are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Compute a smoothed normal for every vertex of a triangle soup.
///
/// `normals[i]` is the normalized sum of the normals of all facets with a
/// vertex matching `vertices[i]`. The mesh is not modified.
///
/// # Errors
///
/// Only when `options` fail [`SynthesisOptions::validate`]. Degenerate facets,
/// unmatched vertices and cancelling normals are reported through
/// [`ShadedMesh::diagnostics`] instead.
pub fn synthesize_normals(mesh: &Mesh, options: &SynthesisOptions) -> Result<ShadedMesh> {
    synthesize_normals_with_progress(mesh, options, &Progress::none())
}

/// Compute smoothed normals with progress reporting.
///
/// See [`synthesize_normals`].
pub fn synthesize_normals_with_progress(
    mesh: &Mesh,
    options: &SynthesisOptions,
    progress: &Progress,
) -> Result<ShadedMesh> {
    options.validate()?;
    let start = Instant::now();

    progress.report(0, 1, Stage::Indexing);
    let soup = expand_with(mesh, options.facet_normals);
    let matcher = build_matcher(&soup.positions, options.strategy, options.vertex_match());
    progress.report(1, 1, Stage::Indexing);

    let num_corners = soup.len();
    log::debug!(
        "averaging normals for {} corners with {} matcher ({})",
        num_corners,
        matcher.name(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let mut normals = Vec::with_capacity(num_corners);
    let mut diagnostics = SynthesisDiagnostics {
        degenerate_facets: mesh.degenerate_facets().count(),
        ..Default::default()
    };

    let mut chunk_start = 0;
    while chunk_start < num_corners {
        let chunk_end = (chunk_start + PROGRESS_CHUNK).min(num_corners);
        progress.report(chunk_start, num_corners, Stage::Averaging);

        let shaded: Vec<(Vector3<f32>, bool)> = if options.parallel {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|i| shade_corner(&soup, matcher.as_ref(), i))
                .collect()
        } else {
            (chunk_start..chunk_end)
                .map(|i| shade_corner(&soup, matcher.as_ref(), i))
                .collect()
        };

        for (normal, matched) in shaded {
            if !matched {
                diagnostics.unmatched_vertices += 1;
            } else if !normal.iter().all(|c| c.is_finite()) {
                diagnostics.non_finite_normals += 1;
            }
            normals.push(normal);
        }

        chunk_start = chunk_end;
    }
    progress.report(num_corners, num_corners, Stage::Averaging);

    log::debug!("synthesized {} normals in {:.2?}", normals.len(), start.elapsed());
    warn_about(&diagnostics);

    // the matcher borrows the positions handed out below
    drop(matcher);
    Ok(ShadedMesh {
        vertices: soup.positions,
        normals,
        diagnostics,
    })
}

/// Load a binary STL file and synthesize its normals.
///
/// # Errors
///
/// [`MeshError::FileNotFound`] and [`MeshError::MalformedMesh`] from the
/// loader, or [`MeshError::InvalidParameter`] for bad options. No partial
/// result is returned.
///
/// # Example
///
/// ```no_run
/// use shademesh::algo::synthesize::{load_and_synthesize, SynthesisOptions};
///
/// let shaded = load_and_synthesize("sphere.stl", &SynthesisOptions::default()).unwrap();
/// println!("{} vertices", shaded.len());
/// ```
pub fn load_and_synthesize<P: AsRef<Path>>(
    path: P,
    options: &SynthesisOptions,
) -> Result<ShadedMesh> {
    options.validate()?;
    let mesh = io::stl::load(path)?;
    synthesize_normals(&mesh, options)
}

/// Average the normals of the facets incident to corner `i`.
///
/// Returns the normal and whether any facet matched.
#[inline]
fn shade_corner(
    soup: &ExpandedMesh,
    matcher: &dyn IncidenceMatcher,
    i: usize,
) -> (Vector3<f32>, bool) {
    let facets = matcher.incident_facets(&soup.positions[i]);
    let matched = !facets.is_empty();
    let normal = average_normals(facets.iter().map(|&f| *soup.facet_normal(f)));
    (normal, matched)
}

fn warn_about(diagnostics: &SynthesisDiagnostics) {
    if diagnostics.degenerate_facets > 0 {
        log::warn!("{} degenerate facets have zero area", diagnostics.degenerate_facets);
    }
    if diagnostics.unmatched_vertices > 0 {
        log::warn!(
            "{} vertices matched no facet and got a zero normal",
            diagnostics.unmatched_vertices
        );
    }
    if diagnostics.non_finite_normals > 0 {
        log::warn!(
            "{} vertex normals are not finite (incident normals cancel)",
            diagnostics.non_finite_normals
        );
    }
}
