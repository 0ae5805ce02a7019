//! Error types for evaluator construction and candidate validation.
//!
//! Degenerate geometry is not an error: it is reported through
//! `Fitness::Invalid` so the optimizer can rank every candidate uniformly.

use std::fmt;

/// Bad construction parameters. Fatal; not retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    UnknownResidueMethod { name: String },
    TooFewSides { num_sides: usize },
    TooFewPoints { points: usize, num_sides: usize },
    NonFinitePoint { index: usize },
    EmptyPointSet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResidueMethod { name } => write!(
                f,
                "unknown residue method {name:?} (expected \"segment\" or \"line\")"
            ),
            Self::TooFewSides { num_sides } => {
                write!(f, "a polygon needs at least 3 sides, got {num_sides}")
            }
            Self::TooFewPoints { points, num_sides } => write!(
                f,
                "{points} points cannot support a polygon with {num_sides} sides"
            ),
            Self::NonFinitePoint { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            Self::EmptyPointSet => write!(f, "point set is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Malformed candidate vector. Fatal for the call that received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    WrongLength { expected: usize, got: usize },
    IndexOutOfRange { position: usize, index: usize, len: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, got } => {
                write!(f, "expected {expected} boundary indices, got {got}")
            }
            Self::IndexOutOfRange {
                position,
                index,
                len,
            } => write!(
                f,
                "boundary index {index} at position {position} is outside 0..{len}"
            ),
        }
    }
}

impl std::error::Error for EvalError {}
