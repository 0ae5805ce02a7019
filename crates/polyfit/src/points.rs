//! Point set preparation: centroid, polar angles, stable angular sort.
//!
//! A `PointSet` is built once per problem instance and is read-only
//! afterwards; every evaluation indexes into its angle-sorted points.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Vector2;

use crate::error::ConfigError;

/// Points sorted by polar angle around their centroid.
///
/// Invariants:
/// - `sorted[k] == input[order[k]]` for every `k`.
/// - `angles` is non-decreasing and each angle lies in `[0, 2π)`.
/// - Ties keep input order.
#[derive(Clone, Debug)]
pub struct PointSet {
    sorted: Vec<Vector2<f64>>,
    angles: Vec<f64>,
    order: Vec<usize>,
    centroid: Vector2<f64>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl PointSet {
    pub fn new(points: Vec<Vector2<f64>>) -> Result<Self, ConfigError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(ConfigError::NonFinitePoint { index });
        }
        let centroid = centroid(&points).ok_or(ConfigError::EmptyPointSet)?;

        let raw: Vec<f64> = points.iter().map(|p| polar_angle(*p, centroid)).collect();
        let mut order: Vec<usize> = (0..points.len()).collect();
        // `sort_by` is stable, so equal angles keep input order.
        order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));

        let sorted: Vec<Vector2<f64>> = order.iter().map(|&i| points[i]).collect();
        let angles: Vec<f64> = order.iter().map(|&i| raw[i]).collect();
        let x_range = min_max(points.iter().map(|p| p.x));
        let y_range = min_max(points.iter().map(|p| p.y));

        tracing::debug!(
            points = sorted.len(),
            cx = centroid.x,
            cy = centroid.y,
            "prepared point set"
        );
        Ok(Self {
            sorted,
            angles,
            order,
            centroid,
            x_range,
            y_range,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    #[inline]
    pub fn centroid(&self) -> Vector2<f64> {
        self.centroid
    }

    /// Points in ascending angle order.
    #[inline]
    pub fn sorted(&self) -> &[Vector2<f64>] {
        &self.sorted
    }

    /// Polar angles, index-aligned with `sorted()`.
    #[inline]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Input index of each sorted point.
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// `(min, max)` of the x coordinates.
    #[inline]
    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    /// `(min, max)` of the y coordinates.
    #[inline]
    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    /// Length of the bounding-box diagonal; the unit for relative tolerances.
    #[inline]
    pub fn extent(&self) -> f64 {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        (x1 - x0).hypot(y1 - y0)
    }

    /// Sorted x coordinates (allocates).
    pub fn xs(&self) -> Vec<f64> {
        self.sorted.iter().map(|p| p.x).collect()
    }

    /// Sorted y coordinates (allocates).
    pub fn ys(&self) -> Vec<f64> {
        self.sorted.iter().map(|p| p.y).collect()
    }
}

/// Arithmetic mean of x and y independently; `None` for no points.
pub fn centroid(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector2<f64> = points.iter().sum();
    Some(sum / points.len() as f64)
}

/// Polar angle of `p` around `center`, in `[0, 2π)`.
///
/// Points on the vertical through `center` get exactly π/2 (above) or 3π/2
/// (below, including `p == center`).
pub fn polar_angle(p: Vector2<f64>, center: Vector2<f64>) -> f64 {
    let d = p - center;
    if d.x == 0.0 {
        return if d.y > 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
    }
    let mut a = d.y.atan2(d.x);
    if a < 0.0 {
        a += TAU;
    }
    if a >= TAU {
        a -= TAU;
    }
    // Fold -0.0 so it ties with +0.0 under `total_cmp`.
    if a == 0.0 {
        0.0
    } else {
        a
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
