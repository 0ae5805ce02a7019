//! PyO3 bindings for the `polyfit` evaluator.
//!
//! Notes
//! - Python GA drivers call a `PolygonTester` instance with a list of boundary
//!   indices and minimize the returned float; `lb`/`ub` are their search bounds.
//! - Points arrive as `(x, y)` tuples. File loading stays in the CLI.
//! - Evaluation releases the GIL; the evaluator is immutable and `Sync`.

use polyfit::{ConfigError, EvalError, PolygonEvaluator, ResidueMethod, Vec2};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

fn map_config_err(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn map_eval_err(err: EvalError) -> PyErr {
    match err {
        EvalError::WrongLength { .. } => PyValueError::new_err(err.to_string()),
        EvalError::IndexOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
    }
}

/// Fitness oracle for `num_vars`-sided polygons over a fixed point cloud.
#[pyclass(frozen, module = "polyfit_native")]
struct PolygonTester {
    eval: PolygonEvaluator,
}

#[pymethods]
impl PolygonTester {
    #[new]
    #[pyo3(signature = (points, num_vars, residue_method = "segment"))]
    fn new(points: Vec<(f64, f64)>, num_vars: usize, residue_method: &str) -> PyResult<Self> {
        let method: ResidueMethod = residue_method.parse().map_err(map_config_err)?;
        let points = points.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
        let eval = PolygonEvaluator::new(points, num_vars, method).map_err(map_config_err)?;
        Ok(Self { eval })
    }

    /// Total error of the candidate polygon, or `1e308` when it is unusable.
    fn __call__(&self, py: Python<'_>, indices: Vec<usize>) -> PyResult<f64> {
        py.allow_threads(|| self.eval.evaluate(&indices))
            .map_err(map_eval_err)
    }

    /// Scores for many candidates, evaluated in parallel.
    fn evaluate_batch(&self, py: Python<'_>, candidates: Vec<Vec<usize>>) -> PyResult<Vec<f64>> {
        py.allow_threads(|| self.eval.evaluate_batch(&candidates))
            .into_iter()
            .map(|r| r.map_err(map_eval_err))
            .collect()
    }

    /// Corners of the candidate polygon that could be computed, as `(x, y)`.
    fn corners(&self, indices: Vec<usize>) -> PyResult<Vec<(f64, f64)>> {
        let corners = self.eval.corners(&indices).map_err(map_eval_err)?;
        Ok(corners.into_iter().map(|c| (c.x, c.y)).collect())
    }

    /// Rejection reason for the candidate, `None` when it is valid.
    fn rejection(&self, indices: Vec<usize>) -> PyResult<Option<String>> {
        let fitness = self.eval.assess(&indices).map_err(map_eval_err)?;
        Ok(fitness.rejection().map(|r| r.to_string()))
    }

    #[getter]
    fn lb(&self) -> Vec<usize> {
        self.eval.bounds().0
    }

    #[getter]
    fn ub(&self) -> Vec<usize> {
        self.eval.bounds().1
    }

    #[getter]
    fn num_vars(&self) -> usize {
        self.eval.num_sides()
    }

    #[getter]
    fn residue_method(&self) -> &'static str {
        self.eval.residue_method().as_str()
    }

    #[getter]
    fn centroid(&self) -> (f64, f64) {
        let c = self.eval.points().centroid();
        (c.x, c.y)
    }

    /// Angle-sorted points, the coordinate system of the indices.
    #[getter]
    fn sorted_points(&self) -> Vec<(f64, f64)> {
        self.eval.points().sorted().iter().map(|p| (p.x, p.y)).collect()
    }

    fn __len__(&self) -> usize {
        self.eval.points().len()
    }
}

#[pymodule]
fn polyfit_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PolygonTester>()?;
    m.add("INVALID_FITNESS", polyfit::INVALID_FITNESS)?;
    m.add("__version__", polyfit::VERSION)?;
    Ok(())
}
