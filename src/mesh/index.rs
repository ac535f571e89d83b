//! Index types for triangle-soup elements.
//!
//! A triangle soup has two kinds of element worth naming: facets, and the
//! corners of those facets as they appear in the flattened vertex buffer.
//! Corner `i` belongs to facet `i / 3` at slot `i % 3`.

use std::fmt::{self, Debug};

/// Number of corners per facet.
pub const CORNERS_PER_FACET: usize = 3;

/// Largest facet count whose corners all fit a `u32` [`CornerId`].
///
/// The STL reader rejects files declaring more facets than this.
pub const MAX_FACETS: usize = u32::MAX as usize / CORNERS_PER_FACET;

/// A type-safe facet index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FacetId(u32);

/// A type-safe corner index (a position in the flattened vertex buffer).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CornerId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit in `u32`.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large for u32", index);
                Self(index as u32)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(FacetId, "F");
impl_index_type!(CornerId, "C");

impl FacetId {
    /// The corner at `slot` (0, 1 or 2) of this facet.
    #[inline]
    pub fn corner(self, slot: usize) -> CornerId {
        debug_assert!(slot < CORNERS_PER_FACET);
        CornerId::new(self.index() * CORNERS_PER_FACET + slot)
    }

    /// The three corners of this facet in winding order.
    #[inline]
    pub fn corners(self) -> [CornerId; 3] {
        [self.corner(0), self.corner(1), self.corner(2)]
    }
}

impl CornerId {
    /// The facet this corner belongs to.
    #[inline]
    pub fn facet(self) -> FacetId {
        FacetId::new(self.index() / CORNERS_PER_FACET)
    }

    /// Slot of this corner within its facet (0, 1 or 2).
    #[inline]
    pub fn slot(self) -> usize {
        self.index() % CORNERS_PER_FACET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_facet_mapping() {
        let c = CornerId::new(7);
        assert_eq!(c.facet(), FacetId::new(2));
        assert_eq!(c.slot(), 1);
        assert_eq!(FacetId::new(2).corner(1), c);
    }

    #[test]
    fn test_corners_in_order() {
        let [a, b, c] = FacetId::new(4).corners();
        assert_eq!((a.index(), b.index(), c.index()), (12, 13, 14));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_last_corner_of_largest_mesh_fits() {
        let last = FacetId::new(MAX_FACETS - 1).corner(2);
        assert_eq!(last.index(), u32::MAX as usize - 1);
        assert_eq!(last.facet().index(), MAX_FACETS - 1);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", FacetId::new(42)), "F(42)");
        assert_eq!(format!("{:?}", CornerId::new(3)), "C(3)");
    }
}
