//! Synthetic polygon outlines (edge sampling + jitter + replay tokens).
//!
//! Purpose
//! - Produce reproducible noisy point clouds along known polygons, for tests,
//!   benchmarks and demos of the evaluator.
//!
//! Model
//! - Each edge `corner[k] → corner[k+1]` gets `per_side` points at the
//!   interior parameters `(j + 1) / (per_side + 1)`, each displaced by a
//!   uniform jitter in `[-noise, noise]` along both axes.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//! - With `shuffle`, the output order is randomized; the evaluator's angular
//!   sort makes input order irrelevant apart from ties.

use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Edge-sampling configuration.
#[derive(Clone, Copy, Debug)]
pub struct OutlineCfg {
    /// Points per edge, corners excluded.
    pub per_side: usize,
    /// Half-width of the uniform jitter on each coordinate. `0` gives exact samples.
    pub noise: f64,
    pub shuffle: bool,
}

impl Default for OutlineCfg {
    fn default() -> Self {
        Self {
            per_side: 25,
            noise: 0.0,
            shuffle: false,
        }
    }
}

/// Addresses one outline of a seeded family.
///
/// Tests and benches rebuild outline `index` of `seed` directly, e.g. the
/// failing member of a candidate sweep, without drawing the ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        let stream = splitmix64(self.index.wrapping_add(0x9e3779b97f4a7c15));
        StdRng::seed_from_u64(splitmix64(self.seed ^ stream))
    }
}

/// SplitMix64 finalizer; neighbouring indices land on unrelated seeds.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Vertices of a regular `n`-gon, counterclockwise from angle `phase`.
pub fn regular_polygon(n: usize, center: Vector2<f64>, radius: f64, phase: f64) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| {
            let th = phase + TAU * k as f64 / n as f64;
            center + Vector2::new(th.cos(), th.sin()) * radius
        })
        .collect()
}

/// Sample points along the closed polygon `corners`.
///
/// Output is edge-major (edge 0 first) unless `cfg.shuffle` is set.
pub fn sample_outline(corners: &[Vector2<f64>], cfg: OutlineCfg, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.to_std_rng();
    let n = corners.len();
    let noise = cfg.noise.max(0.0);
    let mut pts = Vec::with_capacity(n * cfg.per_side);
    for k in 0..n {
        let a = corners[k];
        let b = corners[(k + 1) % n];
        for j in 0..cfg.per_side {
            let u = (j + 1) as f64 / (cfg.per_side + 1) as f64;
            let mut p = a + (b - a) * u;
            if noise > 0.0 {
                p.x += rng.gen_range(-noise..=noise);
                p.y += rng.gen_range(-noise..=noise);
            }
            pts.push(p);
        }
    }
    if cfg.shuffle {
        pts.shuffle(&mut rng);
    }
    pts
}
