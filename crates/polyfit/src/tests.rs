use super::prelude::*;
use nalgebra::{vector, Rotation2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Square (0,0)-(10,10) sampled at integer steps, corners excluded.
///
/// Angle-sorted around (5,5) the sides occupy: right (upper half) 0..5,
/// top 5..14, left 14..23, bottom 23..32, right (lower half) 32..36.
fn square_outline() -> Vec<Vec2<f64>> {
    let mut pts = Vec::new();
    for k in 1..=9 {
        let t = k as f64;
        pts.push(vector![t, 0.0]);
        pts.push(vector![10.0, t]);
        pts.push(vector![t, 10.0]);
        pts.push(vector![0.0, t]);
    }
    pts
}

const SQUARE_SIDES: [usize; 4] = [5, 14, 23, 32];

/// Sorted positions where the side label changes, i.e. the ideal candidate.
fn side_boundaries(eval: &PolygonEvaluator, side_of: impl Fn(usize) -> usize) -> Vec<usize> {
    let order = eval.points().order();
    let n = order.len();
    (0..n)
        .filter(|&k| side_of(order[k]) != side_of(order[(k + n - 1) % n]))
        .collect()
}

fn assert_near_some(p: Vec2<f64>, truth: &[Vec2<f64>], tol: f64) {
    assert!(
        truth.iter().any(|q| (p - q).norm() < tol),
        "corner {p:?} is not within {tol} of any of {truth:?}"
    );
}

fn random_candidates(len: usize, k: usize, count: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let mut c: Vec<usize> = (0..k).map(|_| rng.gen_range(0..len)).collect();
            // Mix sorted and unsorted candidates; both are legal.
            if i % 2 == 0 {
                c.sort_unstable();
            }
            c
        })
        .collect()
}

#[test]
fn perfect_square_fits_with_zero_error() {
    let eval = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Segment).unwrap();
    assert_eq!(eval.points().centroid(), vector![5.0, 5.0]);

    let fitness = eval.assess(&SQUARE_SIDES).unwrap();
    assert!(fitness.is_valid(), "{fitness:?}");
    assert!(fitness.score().abs() < 1e-9);

    let corners = eval.corners(&SQUARE_SIDES).unwrap();
    let expected = [
        vector![0.0, 10.0],
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 10.0],
    ];
    assert_eq!(corners.len(), 4);
    for (c, e) in corners.iter().zip(&expected) {
        assert!((c - e).norm() < 1e-9, "{c:?} vs {e:?}");
    }

    let line_mode = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Line).unwrap();
    assert!(line_mode.evaluate(&SQUARE_SIDES).unwrap().abs() < 1e-9);
}

#[test]
fn square_fit_does_not_depend_on_units() {
    let unit = [
        vector![0.0, 10.0],
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 10.0],
    ];
    for s in [1e100, 1e-6, 1e-13, 1e-20] {
        let pts: Vec<Vec2<f64>> = square_outline().into_iter().map(|p| p * s).collect();
        for method in [ResidueMethod::Segment, ResidueMethod::Line] {
            let eval = PolygonEvaluator::new(pts.clone(), 4, method).unwrap();
            let fitness = eval.assess(&SQUARE_SIDES).unwrap();
            assert!(fitness.is_valid(), "scale {s:e}, {method}: {fitness:?}");
            assert!(fitness.score() <= 1e-9 * s, "scale {s:e}, {method}: {fitness:?}");

            let corners = eval.corners(&SQUARE_SIDES).unwrap();
            assert_eq!(corners.len(), 4);
            for (c, e) in corners.iter().zip(&unit) {
                assert!((c - e * s).norm() <= 1e-9 * s, "scale {s:e}: {c:?}");
            }
        }
    }
}

#[test]
fn ideal_partition_of_rotated_noisy_square_scores_low() {
    let per_side = 30;
    let rot = Rotation2::new(0.5);
    let shift = vector![3.0, -7.0];
    let truth: Vec<Vec2<f64>> = [
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 10.0],
        vector![0.0, 10.0],
    ]
    .into_iter()
    .map(|p| rot * p + shift)
    .collect();
    let noise = 0.02;
    let cfg = OutlineCfg {
        per_side,
        noise,
        shuffle: false,
    };
    let pts = sample_outline(&truth, cfg, ReplayToken { seed: 9, index: 0 });
    let eval = PolygonEvaluator::new(pts, 4, ResidueMethod::Segment).unwrap();

    let ideal = side_boundaries(&eval, |i| i / per_side);
    assert_eq!(ideal.len(), 4);
    let fitness = eval.assess(&ideal).unwrap();
    assert!(fitness.is_valid(), "{fitness:?}");
    // Each point sits within noise·√2 of its true edge; allow slack for the fit.
    assert!(fitness.score() < 2.0 * (4 * per_side) as f64 * noise);

    for c in eval.corners(&ideal).unwrap() {
        assert_near_some(c, &truth, 0.2);
    }

    // A shifted partition is strictly worse.
    let shifted: Vec<usize> = ideal.iter().map(|&t| (t + 7) % eval.points().len()).collect();
    assert!(eval.evaluate(&shifted).unwrap() > fitness.score());
}

#[test]
fn bin_with_a_single_point_is_invalid() {
    let eval = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Segment).unwrap();
    let candidate = [5, 6, 14, 23];
    assert_eq!(eval.evaluate(&candidate).unwrap(), INVALID_FITNESS);
    assert_eq!(
        eval.assess(&candidate).unwrap(),
        Fitness::Invalid(Rejection::TooFewPoints { bin: 0 })
    );
    // All bins are still processed.
    let fit = eval.fit(&candidate).unwrap();
    assert_eq!(Fitness::from(&fit), eval.assess(&candidate).unwrap());
    assert_eq!(fit.bins.len(), 4);
    assert_eq!(fit.fitted_lines(), 3);
}

#[test]
fn centroid_outside_polygon_is_invalid() {
    // Three 2-point bins whose lines meet in a triangle far from the centroid.
    let pts = vec![
        vector![10.0, 1.0],
        vector![12.0, 5.0],
        vector![-8.0, 9.0],
        vector![-10.0, 8.0],
        vector![-2.0, -10.0],
        vector![0.0, -8.0],
    ];
    let eval = PolygonEvaluator::new(pts, 3, ResidueMethod::Segment).unwrap();
    assert_eq!(eval.points().order(), &[0, 1, 2, 3, 4, 5]);

    let candidate = [0, 2, 4];
    assert_eq!(
        eval.assess(&candidate).unwrap(),
        Fitness::Invalid(Rejection::CentroidOutside)
    );
    assert_eq!(eval.evaluate(&candidate).unwrap(), INVALID_FITNESS);

    // Corners are still reported for plotting.
    let corners = eval.corners(&candidate).unwrap();
    assert_eq!(corners.len(), 3);
    assert!((corners[2] - vector![11.0, 3.0]).norm() < 1e-9);
    assert!((corners[1] - vector![42.0, 34.0]).norm() < 1e-9);
}

#[test]
fn parallel_adjacent_sides_are_invalid() {
    let eval = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Segment).unwrap();
    // Bins 0 and 1 both lie on x = 10.
    let fitness = eval.assess(&[32, 0, 5, 23]).unwrap();
    assert_eq!(fitness, Fitness::Invalid(Rejection::ParallelSides { corner: 0 }));
    assert_eq!(fitness.score(), INVALID_FITNESS);
    assert_eq!(fitness.rejection(), Some(Rejection::ParallelSides { corner: 0 }));
    assert_eq!(eval.corners(&[32, 0, 5, 23]).unwrap().len(), 3);
}

#[test]
fn line_mode_sums_regression_residues() {
    let corners = regular_polygon(5, vector![0.0, 0.0], 8.0, 0.3);
    let cfg = OutlineCfg {
        per_side: 20,
        noise: 0.1,
        shuffle: true,
    };
    let pts = sample_outline(&corners, cfg, ReplayToken { seed: 3, index: 1 });
    let eval = PolygonEvaluator::new(pts, 5, ResidueMethod::Line).unwrap();
    let candidate = eval.uniform_indices();

    let fit = eval.fit(&candidate).unwrap();
    let sorted = eval.points().sorted();
    let expected: f64 = fit
        .bins
        .iter()
        .map(|b| {
            fit_line(b.points(sorted), true, eval.cfg().eps_scatter)
                .and_then(|f| f.residue)
                .unwrap()
        })
        .sum();
    assert!((fit.error - expected).abs() < 1e-9);
}

#[test]
fn evaluate_is_deterministic() {
    let corners = regular_polygon(6, vector![4.0, 4.0], 5.0, 0.1);
    let cfg = OutlineCfg {
        per_side: 15,
        noise: 0.05,
        shuffle: true,
    };
    let pts = sample_outline(&corners, cfg, ReplayToken { seed: 11, index: 2 });
    let eval = PolygonEvaluator::new(pts, 6, ResidueMethod::Segment).unwrap();
    for c in random_candidates(eval.points().len(), 6, 50, 5) {
        let a = eval.evaluate(&c).unwrap();
        let b = eval.evaluate(&c).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn concurrent_evaluation_matches_sequential() {
    let corners = regular_polygon(4, vector![0.0, 0.0], 10.0, 0.25);
    let cfg = OutlineCfg {
        per_side: 40,
        noise: 0.1,
        shuffle: true,
    };
    let pts = sample_outline(&corners, cfg, ReplayToken { seed: 21, index: 0 });
    let eval = PolygonEvaluator::new(pts, 4, ResidueMethod::Segment).unwrap();
    let candidates = random_candidates(eval.points().len(), 4, 200, 17);

    let sequential: Vec<u64> = candidates
        .iter()
        .map(|c| eval.evaluate(c).unwrap().to_bits())
        .collect();

    let threaded: Vec<u64> = std::thread::scope(|s| {
        let handles: Vec<_> = candidates
            .chunks(50)
            .map(|chunk| {
                let eval = &eval;
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|c| eval.evaluate(c).unwrap().to_bits())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    assert_eq!(sequential, threaded);

    let batch: Vec<u64> = eval
        .evaluate_batch(&candidates)
        .into_iter()
        .map(|r| r.unwrap().to_bits())
        .collect();
    assert_eq!(sequential, batch);
}

#[test]
fn malformed_candidates_are_errors() {
    let eval = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Segment).unwrap();
    assert_eq!(
        eval.evaluate(&[0, 1, 2]),
        Err(EvalError::WrongLength {
            expected: 4,
            got: 3
        })
    );
    assert_eq!(
        eval.corners(&[0, 9, 36, 20]),
        Err(EvalError::IndexOutOfRange {
            position: 2,
            index: 36,
            len: 36
        })
    );
    let batch = eval.evaluate_batch(&[vec![0usize, 9, 18, 27], vec![0usize]]);
    assert!(batch[0].is_ok());
    assert!(batch[1].is_err());
}

#[test]
fn construction_validates_configuration() {
    assert_eq!(
        PolygonEvaluator::new(square_outline(), 2, ResidueMethod::Segment).unwrap_err(),
        ConfigError::TooFewSides { num_sides: 2 }
    );
    let three = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]];
    assert_eq!(
        PolygonEvaluator::new(three, 4, ResidueMethod::Segment).unwrap_err(),
        ConfigError::TooFewPoints {
            points: 3,
            num_sides: 4
        }
    );
    let mut bad = square_outline();
    bad[7].y = f64::INFINITY;
    assert_eq!(
        PolygonEvaluator::new(bad, 4, ResidueMethod::Line).unwrap_err(),
        ConfigError::NonFinitePoint { index: 7 }
    );
    assert!("polyline".parse::<ResidueMethod>().is_err());
}

#[test]
fn bounds_and_uniform_seed() {
    let eval = PolygonEvaluator::new(square_outline(), 4, ResidueMethod::Segment).unwrap();
    assert_eq!(eval.bounds(), (vec![0; 4], vec![36; 4]));
    assert_eq!(eval.uniform_indices(), vec![0, 9, 18, 27]);
    assert_eq!(eval.num_sides(), 4);
    assert_eq!(eval.residue_method(), ResidueMethod::Segment);
}
