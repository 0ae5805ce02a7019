//! Geometry primitives shared by the polygon builder and the evaluator.
//!
//! - `segment_distance` / `segment_residue`: distance to a closed segment.
//! - `point_in_polygon`: even-odd crossing test (boundary points are not
//!   guaranteed either way).
//! - `intersect_lines`: 2×2 solve for two implicit lines `n·p = c`.

use nalgebra::{matrix, Vector2};

/// Distance from `p` to the closest point of the closed segment `ab`.
///
/// A zero-length segment degrades to the distance from `p` to `a`.
#[inline]
pub fn segment_distance(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= 0.0 {
        return (p - a).norm();
    }
    let u = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * u)).norm()
}

/// Sum of `segment_distance` over `points`.
pub fn segment_residue<I>(points: I, a: Vector2<f64>, b: Vector2<f64>) -> f64
where
    I: IntoIterator<Item = Vector2<f64>>,
{
    points
        .into_iter()
        .map(|p| segment_distance(p, a, b))
        .sum()
}

/// Even-odd crossing test of `p` against the closed polygon `poly`.
///
/// Polygons with fewer than 3 vertices contain nothing.
pub fn point_in_polygon(p: Vector2<f64>, poly: &[Vector2<f64>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Intersection of `n0·p = c0` and `n1·p = c1`; `None` if `|det| <= eps_det`.
pub fn intersect_lines(
    n0: Vector2<f64>,
    c0: f64,
    n1: Vector2<f64>,
    c1: f64,
    eps_det: f64,
) -> Option<Vector2<f64>> {
    let a = matrix![n0.x, n0.y; n1.x, n1.y];
    let det = a.determinant();
    if !det.is_finite() || det.abs() <= eps_det {
        return None;
    }
    let inv = a.try_inverse()?;
    let p = inv * Vector2::new(c0, c1);
    if p.x.is_finite() && p.y.is_finite() {
        Some(p)
    } else {
        None
    }
}
