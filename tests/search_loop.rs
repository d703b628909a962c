//! End-to-end search scenarios
//!
//! Drives whole runs with closure evaluators and checks the contract the
//! excluded collaborators rely on: row shapes, dedup accounting, clamping,
//! and failure propagation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use servo_evo::prelude::*;

/// A deterministic stand-in for the control-loop measurement.
fn distance_rating(gains: GainPair) -> f64 {
    (gains.kp - 0.4).abs() + (gains.ki - 0.9).abs()
}

#[test]
fn unconstrained_run_keeps_every_gain_inside_the_rectangle() {
    // Population 8, stability off, full-strength mutation: even candidates
    // pushed outside the rectangle by mutation must come back clamped.
    let config = SearchConfig {
        stability: StabilityModel::Off,
        population_size: 8,
        epochs: 3,
        mutation_coef: 1.0,
        max_kp: 5.0,
        max_ki: 5.0,
        ..Default::default()
    };
    let bounds = config.effective_bounds();

    let mut search = SearchLoop::new(config).unwrap();
    let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
    let mut rng = StdRng::seed_from_u64(2024);

    let report = search.run(&mut evaluator, &mut rng).unwrap();

    // Rows past epoch 0 all come from generation transitions
    assert!(report.candidate_rows.iter().any(|row| row.epoch > 0));
    for row in &report.candidate_rows {
        assert!(bounds.contains(GainPair::new(row.kp, row.ki)), "row {row:?}");
    }
}

#[test]
fn constrained_run_stays_inside_the_variant_rectangle() {
    // Transition products are stable before rounding (engine invariant); the
    // canonical rounding applied at evaluation time preserves the variant's
    // rectangle even when a marginal pair lands on the stability boundary.
    for model in [StabilityModel::RealRooted, StabilityModel::ComplexRooted] {
        let config = SearchConfig {
            stability: model,
            epochs: 3,
            ..Default::default()
        };
        let bounds = model.bounds().unwrap();
        let mut search = SearchLoop::new(config).unwrap();
        let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
        let mut rng = StdRng::seed_from_u64(7);

        let report = search.run(&mut evaluator, &mut rng).unwrap();
        for row in &report.candidate_rows {
            assert!(
                bounds.contains(GainPair::new(row.kp, row.ki)),
                "{model:?} evaluated out-of-rectangle row {row:?}"
            );
        }
    }
}

#[test]
fn evaluator_runs_once_per_unique_genotype() {
    let config = SearchConfig {
        epochs: 4,
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();

    let mut seen: Vec<CanonicalGains> = Vec::new();
    let mut evaluator = FnEvaluator::new(|gains: GainPair| {
        let key = gains.canonical();
        assert!(!seen.contains(&key), "re-evaluated genotype {key:?}");
        seen.push(key);
        Ok(distance_rating(gains))
    });
    let mut rng = StdRng::seed_from_u64(99);

    let report = search.run(&mut evaluator, &mut rng).unwrap();
    assert_eq!(report.evaluations, search.cache().misses());
    assert_eq!(search.cache().len(), report.evaluations);

    // Every invocation corresponds to a unique genotype: the rows' distinct
    // genotypes, plus the baseline unless a row happened to share its gains.
    let unique: HashSet<_> = report
        .candidate_rows
        .iter()
        .map(|row| GainPair::new(row.kp, row.ki).canonical())
        .collect();
    assert!(
        report.evaluations == unique.len() || report.evaluations == unique.len() + 1,
        "{} evaluations for {} unique row genotypes",
        report.evaluations,
        unique.len()
    );
}

#[test]
fn reevaluation_flag_scores_every_candidate_anew() {
    let config = SearchConfig {
        epochs: 2,
        reevaluate_duplicates: true,
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();

    let mut calls = 0usize;
    let mut evaluator = FnEvaluator::new(|gains: GainPair| {
        calls += 1;
        Ok(distance_rating(gains))
    });
    let mut rng = StdRng::seed_from_u64(99);

    let report = search.run(&mut evaluator, &mut rng).unwrap();
    // Baseline + one invocation per candidate row, duplicates included
    assert_eq!(report.evaluations, report.candidate_rows.len() + 1);
    assert_eq!(search.cache().hits(), 0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let config = SearchConfig {
            epochs: 3,
            ..Default::default()
        };
        let mut search = SearchLoop::new(config).unwrap();
        let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
        let mut rng = StdRng::seed_from_u64(seed);
        search.run(&mut evaluator, &mut rng).unwrap()
    };

    let first = run(1234);
    let second = run(1234);
    assert_eq!(first, second);

    let other = run(4321);
    assert_ne!(first.candidate_rows, other.candidate_rows);
}

#[test]
fn pre_seeded_gains_are_evaluated_first() {
    let seeds = vec![GainPair::new(0.123, 0.456), GainPair::new(0.5, 1.0)];
    let config = SearchConfig {
        stability: StabilityModel::Off,
        initial_gains: seeds.clone(),
        epochs: 1,
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();
    let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
    let mut rng = StdRng::seed_from_u64(5);

    let report = search.run(&mut evaluator, &mut rng).unwrap();
    assert_eq!(report.candidate_rows.len(), 8);
    assert_eq!(report.candidate_rows[0].kp, seeds[0].kp);
    assert_eq!(report.candidate_rows[0].ki, seeds[0].ki);
    assert_eq!(report.candidate_rows[1].kp, seeds[1].kp);
}

#[test]
fn elite_rows_track_the_running_minimum() {
    let config = SearchConfig {
        epochs: 5,
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();
    let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
    let mut rng = StdRng::seed_from_u64(31);

    let report = search.run(&mut evaluator, &mut rng).unwrap();
    assert_eq!(report.elite_rows.len(), 5);

    let mut running_min = f64::INFINITY;
    let mut elite_iter = report.elite_rows.iter();
    for epoch in 0..5 {
        let epoch_min = report
            .candidate_rows
            .iter()
            .filter(|row| row.epoch == epoch)
            .map(|row| row.rating)
            .fold(f64::INFINITY, f64::min);
        running_min = running_min.min(epoch_min);
        assert_eq!(elite_iter.next().unwrap().rating, running_min);
    }
}

#[test]
fn mid_run_evaluator_failure_is_fatal() {
    let config = SearchConfig {
        epochs: 8,
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();

    let mut calls = 0usize;
    let mut evaluator = FnEvaluator::new(|gains: GainPair| {
        calls += 1;
        if calls > 12 {
            Err(EvaluationError::MalformedResult(
                "offset series truncated".to_string(),
            ))
        } else {
            Ok(distance_rating(gains))
        }
    });
    let mut rng = StdRng::seed_from_u64(3);

    let result = search.run(&mut evaluator, &mut rng);
    assert!(matches!(result, Err(SearchError::Evaluation(_))));
}

#[test]
fn improvement_is_relative_to_the_baseline() {
    let config = SearchConfig {
        epochs: 2,
        baseline: GainPair::new(0.7, 0.3),
        ..Default::default()
    };
    let mut search = SearchLoop::new(config).unwrap();
    let mut evaluator = FnEvaluator::new(|gains| Ok(distance_rating(gains)));
    let mut rng = StdRng::seed_from_u64(77);

    let report = search.run(&mut evaluator, &mut rng).unwrap();
    let expected =
        report.best.rating().unwrap() * 100.0 / report.baseline.rating().unwrap();
    assert_eq!(report.improvement_pct, expected);
    assert_eq!(report.baseline.rating(), Some(distance_rating(GainPair::new(0.7, 0.3))));
}
