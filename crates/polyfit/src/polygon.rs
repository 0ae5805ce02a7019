//! Candidate polygon construction from boundary indices.
//!
//! Pipeline per candidate `t[0..N]` over the angle-sorted points:
//! - bin i covers `[t[i], t[i+1 mod N])`, wrapping past the end at most once,
//! - each bin gets an orthogonal-regression line,
//! - corner i is the intersection of lines i and i+1 (cyclic),
//! - in segment mode, bin i is charged against the edge `corner[i-1] → corner[i]`.
//!
//! Everything lives in the returned `PolygonFit`; nothing is cached on the
//! point set, so concurrent builds never share scratch state.

use std::fmt;

use nalgebra::Vector2;

use crate::config::{FitCfg, ResidueMethod};
use crate::geom::{intersect_lines, segment_residue};
use crate::points::PointSet;
use crate::regression::{fit_line, FittedLine};

/// Contiguous, possibly wrap-around range of angle-sorted points.
///
/// `start < end` selects `[start, end)`; otherwise `[start, len) ++ [0, end)`,
/// so equal boundaries select every point once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bin {
    pub start: usize,
    pub end: usize,
}

impl Bin {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn wraps(&self) -> bool {
        self.start >= self.end
    }

    /// Number of points in the bin for a set of `total` points.
    #[inline]
    pub fn len(&self, total: usize) -> usize {
        if self.wraps() {
            total - self.start + self.end
        } else {
            self.end - self.start
        }
    }

    /// The bin as (head, tail) slices; `tail` is empty unless the bin wraps.
    #[inline]
    pub fn parts<'a, T>(&self, sorted: &'a [T]) -> (&'a [T], &'a [T]) {
        if self.wraps() {
            (&sorted[self.start..], &sorted[..self.end])
        } else {
            (&sorted[self.start..self.end], &sorted[..0])
        }
    }

    /// Points of the bin in angular order.
    pub fn points<'a>(
        &self,
        sorted: &'a [Vector2<f64>],
    ) -> impl Iterator<Item = Vector2<f64>> + Clone + 'a {
        let (head, tail) = self.parts(sorted);
        head.iter().chain(tail).copied()
    }
}

/// Why a candidate is structurally unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Bin `bin` holds fewer than 2 points.
    TooFewPoints { bin: usize },
    /// Bin `bin` has no principal axis (coincident points, isotropic scatter).
    DegenerateFit { bin: usize },
    /// Lines `corner` and `corner + 1` are parallel.
    ParallelSides { corner: usize },
    /// Edge `side` has zero length, so its segment residue is undefined.
    CollapsedSide { side: usize },
    /// The point set's centroid is outside the corner polygon.
    CentroidOutside,
    /// The aggregated error overflowed or became NaN.
    NonFiniteError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { bin } => write!(f, "bin {bin} has fewer than 2 points"),
            Self::DegenerateFit { bin } => write!(f, "bin {bin} has no principal axis"),
            Self::ParallelSides { corner } => {
                write!(f, "sides meeting at corner {corner} are parallel")
            }
            Self::CollapsedSide { side } => write!(f, "side {side} has zero length"),
            Self::CentroidOutside => write!(f, "centroid lies outside the polygon"),
            Self::NonFiniteError => write!(f, "aggregated error is not finite"),
        }
    }
}

/// Everything computed for one candidate.
///
/// `lines[i]` belongs to `bins[i]`; `corners[i]` joins lines i and i+1.
/// Slots are `None` where the stage could not produce a value.
#[derive(Clone, Debug)]
pub struct PolygonFit {
    pub bins: Vec<Bin>,
    pub lines: Vec<Option<FittedLine>>,
    pub corners: Vec<Option<Vector2<f64>>>,
    /// Accumulated residue. Meaningful only when `rejection` is `None`.
    pub error: f64,
    /// First problem found, in pipeline order.
    pub rejection: Option<Rejection>,
}

impl PolygonFit {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    /// The full corner cycle, if every corner exists.
    pub fn polygon(&self) -> Option<Vec<Vector2<f64>>> {
        self.corners.iter().copied().collect()
    }

    /// The corners that could be computed, in order.
    pub fn corner_points(&self) -> Vec<Vector2<f64>> {
        self.corners.iter().flatten().copied().collect()
    }

    /// Number of bins that received a line.
    pub fn fitted_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.is_some()).count()
    }

    pub(crate) fn reject(&mut self, why: Rejection) {
        if self.rejection.is_none() {
            self.rejection = Some(why);
        }
    }
}

/// Build the candidate polygon for `indices` over `points`.
///
/// Preconditions (checked by the evaluator): `indices.len() >= 1` and every
/// index is `< points.len()`. Degenerate candidates are never an error: all
/// bins are processed and the first problem is recorded in `rejection`.
pub fn build_polygon(
    points: &PointSet,
    indices: &[usize],
    method: ResidueMethod,
    cfg: &FitCfg,
) -> PolygonFit {
    let sorted = points.sorted();
    let n = indices.len();
    debug_assert!(indices.iter().all(|&t| t < sorted.len()));

    let mut fit = PolygonFit {
        bins: Vec::with_capacity(n),
        lines: Vec::with_capacity(n),
        corners: Vec::with_capacity(n),
        error: 0.0,
        rejection: None,
    };
    let with_residue = method == ResidueMethod::Line;

    for (i, &t0) in indices.iter().enumerate() {
        let bin = Bin::new(t0, indices[(i + 1) % n]);
        let line = if bin.len(sorted.len()) < 2 {
            fit.reject(Rejection::TooFewPoints { bin: i });
            None
        } else {
            match fit_line(bin.points(sorted), with_residue, cfg.eps_scatter) {
                Some(ortho) => {
                    fit.error += ortho.residue.unwrap_or(0.0);
                    Some(ortho.line)
                }
                None => {
                    fit.reject(Rejection::DegenerateFit { bin: i });
                    None
                }
            }
        };
        fit.bins.push(bin);
        fit.lines.push(line);
    }

    for i in 0..n {
        let corner = match (fit.lines[i], fit.lines[(i + 1) % n]) {
            (Some(l0), Some(l1)) => {
                let p = intersect_lines(l0.normal, l0.offset, l1.normal, l1.offset, cfg.eps_det);
                if p.is_none() {
                    fit.reject(Rejection::ParallelSides { corner: i });
                }
                p
            }
            _ => None,
        };
        fit.corners.push(corner);
    }

    if method == ResidueMethod::Segment {
        let min_side = cfg.eps_len * points.extent();
        for i in 0..n {
            let (Some(a), Some(b)) = (fit.corners[(i + n - 1) % n], fit.corners[i]) else {
                continue;
            };
            let side = b - a;
            if side.x.hypot(side.y) <= min_side {
                fit.reject(Rejection::CollapsedSide { side: i });
                continue;
            }
            fit.error += segment_residue(fit.bins[i].points(sorted), a, b);
        }
    }

    fit
}
