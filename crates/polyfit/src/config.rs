//! Evaluation settings: residue method and numeric tolerances.
//!
//! - `ResidueMethod`: how the per-candidate error is measured.
//! - `FitCfg`: centralizes the epsilons for parallel-side, collapsed-side and
//!   isotropic-scatter checks.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How bin points are charged against the candidate polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResidueMethod {
    /// Distance to the closed polygon edge between the two bounding corners.
    #[default]
    Segment,
    /// Perpendicular distance to the infinite fitted line of the bin.
    Line,
}

impl ResidueMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Segment => "segment",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for ResidueMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResidueMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "segment" => Ok(Self::Segment),
            "line" => Ok(Self::Line),
            other => Err(ConfigError::UnknownResidueMethod {
                name: other.to_string(),
            }),
        }
    }
}

/// Numeric tolerances for degenerate-geometry detection.
#[derive(Clone, Copy, Debug)]
pub struct FitCfg {
    /// Adjacent unit normals with `|det| <= eps_det` are treated as parallel.
    pub eps_det: f64,
    /// Polygon sides no longer than `eps_len` times the point set's
    /// bounding-box diagonal are collapsed.
    pub eps_len: f64,
    /// Bins whose scatter anisotropy is `<= eps_scatter` have no principal axis.
    pub eps_scatter: f64,
}

impl Default for FitCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_len: 1e-12,
            eps_scatter: 1e-12,
        }
    }
}
