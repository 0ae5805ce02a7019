//! Fitness evaluation of candidate boundary-index vectors.
//!
//! `PolygonEvaluator` owns the prepared, read-only `PointSet` plus constants.
//! Every call builds its own `PolygonFit`, so one evaluator can be shared by
//! reference across threads (`evaluate_batch` does exactly that with rayon).

use nalgebra::Vector2;
use rayon::prelude::*;

use crate::config::{FitCfg, ResidueMethod};
use crate::error::{ConfigError, EvalError};
use crate::geom::point_in_polygon;
use crate::points::PointSet;
use crate::polygon::{build_polygon, PolygonFit, Rejection};

/// Fitness reported for structurally unusable candidates.
///
/// Finite, so optimizers can compare it like any other score.
pub const INVALID_FITNESS: f64 = 1e308;

/// Tagged evaluation outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fitness {
    /// Aggregated error, lower is better.
    Valid(f64),
    Invalid(Rejection),
}

impl Fitness {
    /// Scalar for optimizers: the error, or `INVALID_FITNESS`.
    #[inline]
    pub fn score(&self) -> f64 {
        match self {
            Self::Valid(e) => *e,
            Self::Invalid(_) => INVALID_FITNESS,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[inline]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(r) => Some(*r),
        }
    }
}

impl From<&PolygonFit> for Fitness {
    fn from(fit: &PolygonFit) -> Self {
        match fit.rejection {
            None => Self::Valid(fit.error),
            Some(why) => Self::Invalid(why),
        }
    }
}

/// Polygon-fit evaluator over one prepared point set.
#[derive(Clone, Debug)]
pub struct PolygonEvaluator {
    points: PointSet,
    num_sides: usize,
    method: ResidueMethod,
    cfg: FitCfg,
}

impl PolygonEvaluator {
    /// Prepare `points` for fitting `num_sides`-gons with default tolerances.
    pub fn new(
        points: Vec<Vector2<f64>>,
        num_sides: usize,
        method: ResidueMethod,
    ) -> Result<Self, ConfigError> {
        Self::with_cfg(points, num_sides, method, FitCfg::default())
    }

    pub fn with_cfg(
        points: Vec<Vector2<f64>>,
        num_sides: usize,
        method: ResidueMethod,
        cfg: FitCfg,
    ) -> Result<Self, ConfigError> {
        if num_sides < 3 {
            return Err(ConfigError::TooFewSides { num_sides });
        }
        if points.len() < num_sides {
            return Err(ConfigError::TooFewPoints {
                points: points.len(),
                num_sides,
            });
        }
        let points = PointSet::new(points)?;
        tracing::debug!(num_sides, method = %method, "evaluator ready");
        Ok(Self {
            points,
            num_sides,
            method,
            cfg,
        })
    }

    #[inline]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    #[inline]
    pub fn num_sides(&self) -> usize {
        self.num_sides
    }

    #[inline]
    pub fn residue_method(&self) -> ResidueMethod {
        self.method
    }

    #[inline]
    pub fn cfg(&self) -> &FitCfg {
        &self.cfg
    }

    /// Per-variable search bounds `(lower, upper)`; upper is exclusive.
    pub fn bounds(&self) -> (Vec<usize>, Vec<usize>) {
        (
            vec![0; self.num_sides],
            vec![self.points.len(); self.num_sides],
        )
    }

    /// Evenly spaced boundaries `floor(i·len / N)`, a neutral starting candidate.
    pub fn uniform_indices(&self) -> Vec<usize> {
        let len = self.points.len();
        (0..self.num_sides)
            .map(|i| i * len / self.num_sides)
            .collect()
    }

    /// Check the shape and range of a candidate vector.
    pub fn validate(&self, indices: &[usize]) -> Result<(), EvalError> {
        if indices.len() != self.num_sides {
            return Err(EvalError::WrongLength {
                expected: self.num_sides,
                got: indices.len(),
            });
        }
        let len = self.points.len();
        if let Some((position, &index)) = indices.iter().enumerate().find(|&(_, &t)| t >= len) {
            return Err(EvalError::IndexOutOfRange {
                position,
                index,
                len,
            });
        }
        Ok(())
    }

    /// Build the candidate polygon and apply the sanity check.
    ///
    /// The returned fit carries the rejection reason, including
    /// `CentroidOutside` and `NonFiniteError`.
    pub fn fit(&self, indices: &[usize]) -> Result<PolygonFit, EvalError> {
        self.validate(indices)?;
        let mut fit = build_polygon(&self.points, indices, self.method, &self.cfg);
        if fit.is_valid() {
            let inside = fit
                .polygon()
                .is_some_and(|poly| point_in_polygon(self.points.centroid(), &poly));
            if !inside {
                fit.reject(Rejection::CentroidOutside);
            } else if !fit.error.is_finite() {
                fit.reject(Rejection::NonFiniteError);
            }
        }
        if let Some(why) = fit.rejection {
            tracing::trace!(?indices, %why, "candidate rejected");
        }
        Ok(fit)
    }

    /// Tagged fitness of a candidate.
    pub fn assess(&self, indices: &[usize]) -> Result<Fitness, EvalError> {
        self.fit(indices).map(|fit| Fitness::from(&fit))
    }

    /// Scalar fitness: the aggregated error, or `INVALID_FITNESS`.
    pub fn evaluate(&self, indices: &[usize]) -> Result<f64, EvalError> {
        self.assess(indices).map(|f| f.score())
    }

    /// Corners of the candidate polygon that could be computed, in order.
    pub fn corners(&self, indices: &[usize]) -> Result<Vec<Vector2<f64>>, EvalError> {
        self.fit(indices).map(|fit| fit.corner_points())
    }

    /// `evaluate` over many candidates in parallel; output order matches input.
    pub fn evaluate_batch<C>(&self, candidates: &[C]) -> Vec<Result<f64, EvalError>>
    where
        C: AsRef<[usize]> + Sync,
    {
        candidates
            .par_iter()
            .map(|c| self.evaluate(c.as_ref()))
            .collect()
    }
}
