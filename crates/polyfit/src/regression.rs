//! Orthogonal (total-least-squares, Deming with equal variances) line fits.
//!
//! The fitted line is the principal axis of the bin's scatter matrix. It is
//! stored in implicit unit-normal form `n·p = c` so vertical sides need no
//! special casing; `slope()`/`intercept()` recover the explicit form
//! `y = slope·x + intercept` whenever the line is not vertical.

use nalgebra::Vector2;

/// A fitted line `n·p = c` with unit normal `n`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedLine {
    pub normal: Vector2<f64>,
    pub offset: f64,
}

impl FittedLine {
    /// Line through `point` with unit direction proportional to `dir`.
    ///
    /// `None` if `dir` is zero or non-finite.
    pub fn through(point: Vector2<f64>, dir: Vector2<f64>) -> Option<Self> {
        let norm = dir.x.hypot(dir.y);
        if !norm.is_finite() || norm <= 0.0 {
            return None;
        }
        let normal = Vector2::new(-dir.y, dir.x) / norm;
        Some(Self {
            normal,
            offset: normal.dot(&point),
        })
    }

    /// Unsigned perpendicular distance from `p`.
    #[inline]
    pub fn distance(&self, p: Vector2<f64>) -> f64 {
        (self.normal.dot(&p) - self.offset).abs()
    }

    /// Slope of `y = slope·x + intercept`; `None` for vertical lines.
    #[inline]
    pub fn slope(&self) -> Option<f64> {
        (self.normal.y != 0.0).then(|| -self.normal.x / self.normal.y)
    }

    /// Intercept of `y = slope·x + intercept`; `None` for vertical lines.
    #[inline]
    pub fn intercept(&self) -> Option<f64> {
        (self.normal.y != 0.0).then(|| self.offset / self.normal.y)
    }
}

/// Result of one orthogonal regression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoFit {
    pub line: FittedLine,
    /// Sum of perpendicular distances of the input points to `line`, if requested.
    pub residue: Option<f64>,
}

/// Orthogonal regression over a re-iterable sequence of points.
///
/// Uses sample moments (divisor `n-1`). The axis direction is
/// `(2 S_xy, S_yy − S_xx + r)` or the equivalent `(S_xx − S_yy + r, 2 S_xy)`
/// with `r = sqrt((S_yy − S_xx)² + 4 S_xy²)`, whichever is better conditioned,
/// so `slope()` equals `(S_yy − S_xx + r) / (2 S_xy)` whenever `S_xy ≠ 0`.
///
/// Returns `None` if:
/// - fewer than 2 points,
/// - the scatter is isotropic (`r <= eps_scatter · (S_xx + S_yy)`), which
///   includes all points coinciding: no principal axis exists,
/// - any moment is non-finite.
pub fn fit_line<I>(points: I, with_residue: bool, eps_scatter: f64) -> Option<OrthoFit>
where
    I: IntoIterator<Item = Vector2<f64>>,
    I::IntoIter: Clone,
{
    let iter = points.into_iter();
    let mut n = 0usize;
    let mut sum = Vector2::zeros();
    for p in iter.clone() {
        sum += p;
        n += 1;
    }
    if n < 2 {
        return None;
    }
    let mean = sum / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in iter.clone() {
        let d = p - mean;
        sxx += d.x * d.x;
        syy += d.y * d.y;
        sxy += d.x * d.y;
    }
    let dof = (n - 1) as f64;
    let (sxx, syy, sxy) = (sxx / dof, syy / dof, sxy / dof);

    let diff = syy - sxx;
    let r = diff.hypot(2.0 * sxy);
    if !r.is_finite() || r <= eps_scatter * (sxx + syy) {
        return None;
    }
    let dir = if diff >= 0.0 {
        Vector2::new(2.0 * sxy, diff + r)
    } else {
        Vector2::new(r - diff, 2.0 * sxy)
    };
    let line = FittedLine::through(mean, dir)?;

    let residue = with_residue.then(|| iter.map(|p| line.distance(p)).sum::<f64>());
    Some(OrthoFit { line, residue })
}

/// Orthogonal regression over parallel coordinate slices.
///
/// `x` and `y` must have equal length.
pub fn orthogonal_regression(
    x: &[f64],
    y: &[f64],
    with_residue: bool,
    eps_scatter: f64,
) -> Option<OrthoFit> {
    debug_assert_eq!(x.len(), y.len(), "coordinate slices must be index-aligned");
    fit_line(
        x.iter().zip(y).map(|(&x, &y)| Vector2::new(x, y)),
        with_residue,
        eps_scatter,
    )
}
