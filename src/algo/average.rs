//! Reducing incident facet normals to one vertex normal.

use nalgebra::Vector3;

/// Sum the normals and scale the sum to unit length.
///
/// An empty input gives the zero vector. Normals that cancel exactly give a
/// zero sum, which normalizes to NaN components; callers that care can test
/// the result with `is_finite`.
///
/// The sum is unweighted: every incident facet counts once, whatever its area.
///
/// # Example
///
/// ```
/// use shademesh::algo::average::average_normals;
/// use nalgebra::Vector3;
///
/// let n = average_normals([Vector3::x(), Vector3::y()]);
/// assert!((n.norm() - 1.0).abs() < 1e-6);
/// ```
pub fn average_normals<I>(normals: I) -> Vector3<f32>
where
    I: IntoIterator<Item = Vector3<f32>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for n in normals {
        sum += n;
        count += 1;
    }

    if count == 0 {
        return Vector3::zeros();
    }
    sum.normalize()
}
