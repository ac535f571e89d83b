//! Facet incidence queries over a triangle soup.
//!
//! A facet is incident to a position when any of its three vertices matches
//! that position. Every matcher answers with facet IDs in ascending order,
//! each facet at most once, so callers that fold over the result see the same
//! summation order whichever matcher they use.
//!
//! # Matchers
//!
//! - [`LinearScan`]: checks every facet for every query, O(F) per query and
//!   O(V·F) for a whole mesh. The reference behaviour.
//! - [`ExactIndex`]: hash map from the exact bit pattern of a position to the
//!   facets using it. Same answers as the exact scan.
//! - [`ToleranceGrid`]: uniform grid for matching within a distance. Same
//!   answers as a scan with the same tolerance.
//!
//! # Exact matching
//!
//! Exact matching is IEEE `==` on each component. Two consequences follow
//! and both matchers honour them: `-0.0` matches `0.0`, and a position with a
//! NaN component matches nothing, not even itself.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::mesh::{CornerId, FacetId};

/// Rule deciding whether two positions denote the same vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VertexMatch {
    /// Component-wise exact equality.
    #[default]
    Exact,
    /// Euclidean distance at most the given tolerance.
    Within(f32),
}

impl VertexMatch {
    /// Whether `a` and `b` match under this rule.
    #[inline]
    pub fn matches(self, a: &Point3<f32>, b: &Point3<f32>) -> bool {
        match self {
            VertexMatch::Exact => a == b,
            VertexMatch::Within(tol) => (a - b).norm() <= tol,
        }
    }
}

/// How incidence queries are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Scan all facets for every query.
    Scan,
    /// Build a spatial index once, then look queries up in it.
    #[default]
    Indexed,
}

/// Answers "which facets touch this position?".
pub trait IncidenceMatcher: Send + Sync {
    /// Facets with at least one vertex matching `query`, ascending, without
    /// repeats.
    fn incident_facets(&self, query: &Point3<f32>) -> Vec<FacetId>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Build the matcher for a strategy and rule over a flattened vertex buffer.
///
/// `positions` holds three consecutive entries per facet.
pub fn build_matcher<'a>(
    positions: &'a [Point3<f32>],
    strategy: MatchStrategy,
    rule: VertexMatch,
) -> Box<dyn IncidenceMatcher + 'a> {
    match (strategy, rule) {
        (MatchStrategy::Scan, rule) => Box::new(LinearScan::with_rule(positions, rule)),
        (MatchStrategy::Indexed, VertexMatch::Exact) => Box::new(ExactIndex::new(positions)),
        (MatchStrategy::Indexed, VertexMatch::Within(tol)) => {
            Box::new(ToleranceGrid::new(positions, tol))
        }
    }
}

// ==================== Linear scan ====================

/// Reference matcher: tests every facet for every query.
#[derive(Debug, Clone)]
pub struct LinearScan<'a> {
    positions: &'a [Point3<f32>],
    rule: VertexMatch,
}

impl<'a> LinearScan<'a> {
    /// Exact-equality scan.
    pub fn new(positions: &'a [Point3<f32>]) -> Self {
        Self::with_rule(positions, VertexMatch::Exact)
    }

    /// Scan using an arbitrary matching rule.
    pub fn with_rule(positions: &'a [Point3<f32>], rule: VertexMatch) -> Self {
        Self { positions, rule }
    }
}

impl IncidenceMatcher for LinearScan<'_> {
    fn incident_facets(&self, query: &Point3<f32>) -> Vec<FacetId> {
        self.positions
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, tri)| tri.iter().any(|v| self.rule.matches(v, query)))
            .map(|(i, _)| FacetId::new(i))
            .collect()
    }

    fn name(&self) -> &str {
        "scan"
    }
}

// ==================== Exact hash index ====================

/// Hash key for exact position matching.
type PositionKey = [u32; 3];

/// Bit pattern of a position, with signed zeros folded together.
///
/// Returns `None` for positions containing NaN, which never compare equal.
#[inline]
fn position_key(p: &Point3<f32>) -> Option<PositionKey> {
    if p.coords.iter().any(|c| c.is_nan()) {
        return None;
    }
    let bits = |c: f32| if c == 0.0 { 0.0f32.to_bits() } else { c.to_bits() };
    Some([bits(p.x), bits(p.y), bits(p.z)])
}

/// Hash index from exact positions to the facets that use them.
#[derive(Debug, Clone, Default)]
pub struct ExactIndex {
    buckets: HashMap<PositionKey, Vec<FacetId>>,
}

impl ExactIndex {
    /// Index a flattened vertex buffer.
    pub fn new(positions: &[Point3<f32>]) -> Self {
        let mut buckets: HashMap<PositionKey, Vec<FacetId>> = HashMap::new();

        for (i, tri) in positions.chunks_exact(3).enumerate() {
            let f = FacetId::new(i);
            for p in tri {
                let Some(key) = position_key(p) else {
                    continue;
                };
                let facets = buckets.entry(key).or_default();
                // facets arrive in ascending order, so a repeat within one
                // facet can only be the last entry
                if facets.last() != Some(&f) {
                    facets.push(f);
                }
            }
        }

        Self { buckets }
    }

    /// Number of distinct (matchable) positions.
    pub fn num_positions(&self) -> usize {
        self.buckets.len()
    }

    /// Facets touching a position, without allocating.
    pub fn facets_at(&self, query: &Point3<f32>) -> &[FacetId] {
        position_key(query)
            .and_then(|key| self.buckets.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl IncidenceMatcher for ExactIndex {
    fn incident_facets(&self, query: &Point3<f32>) -> Vec<FacetId> {
        self.facets_at(query).to_vec()
    }

    fn name(&self) -> &str {
        "exact-index"
    }
}

// ==================== Tolerance grid ====================

type CellKey = (i64, i64, i64);

/// Uniform grid for matching positions within a distance.
///
/// Cells are twice the tolerance wide, so any two matching positions land in
/// the same or adjacent cells even after rounding. Non-finite positions are
/// not stored and match nothing, as with the scan.
#[derive(Debug, Clone)]
pub struct ToleranceGrid<'a> {
    positions: &'a [Point3<f32>],
    tolerance: f32,
    inv_cell_size: f32,
    cells: HashMap<CellKey, Vec<CornerId>>,
}

impl<'a> ToleranceGrid<'a> {
    /// Bin every corner of a flattened vertex buffer.
    ///
    /// `tolerance` must be positive and finite; see
    /// [`SynthesisOptions::validate`](crate::algo::synthesize::SynthesisOptions::validate).
    pub fn new(positions: &'a [Point3<f32>], tolerance: f32) -> Self {
        debug_assert!(tolerance.is_finite() && tolerance > 0.0);
        let mut grid = Self {
            positions,
            tolerance,
            inv_cell_size: 1.0 / (2.0 * tolerance),
            cells: HashMap::new(),
        };

        let corners = positions.len() - positions.len() % 3;
        for (i, p) in positions[..corners].iter().enumerate() {
            if let Some(key) = grid.cell_key(p) {
                grid.cells.entry(key).or_default().push(CornerId::new(i));
            }
        }

        grid
    }

    /// Number of occupied cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    fn cell_key(&self, p: &Point3<f32>) -> Option<CellKey> {
        if !p.coords.iter().all(|c| c.is_finite()) {
            return None;
        }
        let cell = |c: f32| (c * self.inv_cell_size).floor() as i64;
        Some((cell(p.x), cell(p.y), cell(p.z)))
    }
}

impl IncidenceMatcher for ToleranceGrid<'_> {
    fn incident_facets(&self, query: &Point3<f32>) -> Vec<FacetId> {
        let Some((cx, cy, cz)) = self.cell_key(query) else {
            return Vec::new();
        };
        let rule = VertexMatch::Within(self.tolerance);

        let mut facets = Vec::new();
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                for dz in -1..=1_i64 {
                    let key = (cx.wrapping_add(dx), cy.wrapping_add(dy), cz.wrapping_add(dz));
                    let Some(corners) = self.cells.get(&key) else {
                        continue;
                    };
                    facets.extend(
                        corners
                            .iter()
                            .filter(|c| rule.matches(&self.positions[c.index()], query))
                            .map(|c| c.facet()),
                    );
                }
            }
        }

        facets.sort_unstable();
        facets.dedup();
        facets
    }

    fn name(&self) -> &str {
        "tolerance-grid"
    }
}
