//! Fit a square to a noisy outline and compare a few candidates.
//!
//! Usage:
//!   cargo run -p polyfit --example square_fit -- [noise]
//!
//! Prints the fitness of the ideal partition, a shifted one and a
//! degenerate one, plus the recovered corners.

use polyfit::prelude::*;

fn main() {
    let noise: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1);
    let per_side = 25;
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 10.0),
        Vec2::new(0.0, 10.0),
    ];
    let cfg = OutlineCfg {
        per_side,
        noise,
        shuffle: false,
    };
    let pts = sample_outline(&corners, cfg, ReplayToken { seed: 2025, index: 0 });
    let eval = match PolygonEvaluator::new(pts, 4, ResidueMethod::Segment) {
        Ok(e) => e,
        Err(err) => {
            eprintln!("square_fit: {err}");
            return;
        }
    };

    // Input point i lies on edge i / per_side; the ideal candidate starts a
    // bin wherever that label changes along the angular order.
    let order = eval.points().order();
    let len = order.len();
    let ideal: Vec<usize> = (0..len)
        .filter(|&k| order[k] / per_side != order[(k + len - 1) % len] / per_side)
        .collect();
    if ideal.len() != 4 {
        eprintln!("square_fit: noise {noise} scrambles the side order, try a smaller value");
        return;
    }
    let shifted: Vec<usize> = ideal.iter().map(|t| (t + 5) % len).collect();
    let degenerate = vec![ideal[0], ideal[0] + 1, ideal[2], ideal[3]];

    for (name, cand) in [("ideal", &ideal), ("shifted", &shifted), ("degenerate", &degenerate)] {
        match eval.assess(cand) {
            Ok(Fitness::Valid(e)) => println!("{name:>10} {cand:?}: error {e:.4}"),
            Ok(Fitness::Invalid(why)) => println!("{name:>10} {cand:?}: invalid ({why})"),
            Err(err) => println!("{name:>10} {cand:?}: {err}"),
        }
    }
    if let Ok(cs) = eval.corners(&ideal) {
        for (i, c) in cs.iter().enumerate() {
            println!("corner {i}: ({:.3}, {:.3})", c.x, c.y);
        }
    }
}
