//! Triangle query primitives used by the BVH and the grid build.

use nalgebra::{Point3, Vector3};

/// Tolerance for the Möller–Trumbore test.
///
/// Serves double duty: rays with |det| below it are treated as parallel, and
/// hits with `t` at or below it are discarded. The latter is what keeps a
/// parity ray started exactly on the surface from counting its own origin.
const RAY_EPSILON: f64 = 1e-7;

/// Compute the closest point on a triangle to a query point.
///
/// Seven-region barycentric minimisation: `|v0 + s·e0 + t·e1 − p|²` over
/// `s ≥ 0, t ≥ 0, s + t ≤ 1`, clamping `(s, t)` to whichever of the face,
/// three edges, or three vertex wedges the unconstrained minimum falls in.
/// The divisions by `a`, `c`, and `a − 2b + c` only happen on branches where
/// those quantities are strictly positive for a non-degenerate triangle;
/// callers must not pass degenerate triangles.
///
/// # Example
///
/// ```
/// use field_sdf::query::closest_point_on_triangle;
/// use nalgebra::Point3;
///
/// let closest = closest_point_on_triangle(
///     &Point3::new(0.25, 0.25, 5.0),
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!((closest.z - 0.0).abs() < 1e-12);
/// ```
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn closest_point_on_triangle(
    point: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Point3<f64> {
    let edge0 = v1 - v0;
    let edge1 = v2 - v0;
    let diff = v0 - point;

    let a = edge0.dot(&edge0);
    let b = edge0.dot(&edge1);
    let c = edge1.dot(&edge1);
    let d = edge0.dot(&diff);
    let e = edge1.dot(&diff);

    let det = a * c - b * b;
    let mut s = b * e - c * d;
    let mut t = b * d - a * e;

    if s + t < det {
        if s < 0.0 {
            if t < 0.0 {
                // Region 4: behind both edges, split on which edge faces p.
                if d < 0.0 {
                    s = (-d / a).clamp(0.0, 1.0);
                    t = 0.0;
                } else {
                    s = 0.0;
                    t = (-e / c).clamp(0.0, 1.0);
                }
            } else {
                // Region 3: edge v0-v2.
                s = 0.0;
                t = (-e / c).clamp(0.0, 1.0);
            }
        } else if t < 0.0 {
            // Region 5: edge v0-v1.
            s = (-d / a).clamp(0.0, 1.0);
            t = 0.0;
        } else {
            // Region 0: interior.
            let inv_det = 1.0 / det;
            s *= inv_det;
            t *= inv_det;
        }
    } else if s < 0.0 {
        // Region 2: wedge at v2.
        let tmp0 = b + d;
        let tmp1 = c + e;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a - 2.0 * b + c;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = 0.0;
            t = (-e / c).clamp(0.0, 1.0);
        }
    } else if t < 0.0 {
        // Region 6: wedge at v1.
        if a + d > b + e {
            let numer = c + e - b - d;
            let denom = a - 2.0 * b + c;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = (-d / a).clamp(0.0, 1.0);
            t = 0.0;
        }
    } else {
        // Region 1: edge v1-v2.
        let numer = c + e - b - d;
        let denom = a - 2.0 * b + c;
        s = (numer / denom).clamp(0.0, 1.0);
        t = 1.0 - s;
    }

    v0 + edge0 * s + edge1 * t
}

/// Euclidean distance from a point to a triangle (face, edges, and vertices
/// included).
#[inline]
#[must_use]
pub fn point_triangle_distance(
    point: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> f64 {
    (point - closest_point_on_triangle(point, v0, v1, v2)).norm()
}

/// Möller–Trumbore ray/triangle intersection.
///
/// `dir` need not be normalised. Returns the ray parameter `t` of the hit,
/// or `None` when the ray is parallel to the triangle plane, the
/// barycentrics fall outside `u ∈ [0,1], v ≥ 0, u + v ≤ 1`, or the hit lies
/// at `t ≤ 1e-7` (which excludes origin-on-surface hits, the classic
/// failure mode of parity inside/outside tests).
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn ray_triangle_intersection(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let det = edge1.dot(&h);

    if det.abs() < RAY_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - v0;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    (t > RAY_EPSILON).then_some(t)
}
