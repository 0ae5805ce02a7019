//! Polygon fitness evaluation for point clouds.
//!
//! Given an unordered 2D point cloud and a side count `N`, an external
//! optimizer proposes `N` boundary indices into the angle-sorted points. The
//! evaluator bins the points, fits one orthogonal-regression line per bin,
//! intersects adjacent lines into corners and scores the candidate by how far
//! the points lie from the resulting polygon.
//!
//! Layout
//! - `geom`: segment distance, point-in-polygon, line intersection.
//! - `regression`: total-least-squares line fits.
//! - `points`: centroid, polar angles, stable angular sort.
//! - `polygon`: bins, per-bin fits, corners, residue accumulation.
//! - `evaluator`: validation, sanity check, scalar and tagged fitness.
//! - `sample`: reproducible synthetic outlines.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod geom;
pub mod points;
pub mod polygon;
pub mod regression;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::{FitCfg, ResidueMethod};
pub use error::{ConfigError, EvalError};
pub use evaluator::{Fitness, PolygonEvaluator, INVALID_FITNESS};
pub use nalgebra::Vector2 as Vec2;
pub use points::PointSet;
pub use polygon::{Bin, PolygonFit, Rejection};
pub use regression::{FittedLine, OrthoFit};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::config::{FitCfg, ResidueMethod};
    pub use crate::error::{ConfigError, EvalError};
    pub use crate::evaluator::{Fitness, PolygonEvaluator, INVALID_FITNESS};
    pub use crate::geom::{point_in_polygon, segment_distance, segment_residue};
    pub use crate::points::PointSet;
    pub use crate::polygon::{build_polygon, Bin, PolygonFit, Rejection};
    pub use crate::regression::{fit_line, orthogonal_regression, FittedLine, OrthoFit};
    pub use crate::sample::{regular_polygon, sample_outline, OutlineCfg, ReplayToken};
    pub use nalgebra::Vector2 as Vec2;
}

#[cfg(test)]
mod tests;
