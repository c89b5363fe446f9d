//! End-to-end checks of the analysis pipeline through the public API.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use sieve_stats::domain::{Estimator, Statistic};
use sieve_stats::report::AggregateTable;
use sieve_stats::{AnalysisError, SampleInput, SampleMetadata, SievingSample, analyze, analyze_batch};

fn sample(pairs: &[(f64, f64)]) -> SievingSample {
    SievingSample::from_pairs(pairs.iter().copied()).unwrap()
}

/// Random sieve set: geometric-ish openings below 63 mm, log-normal masses.
fn random_sample(rng: &mut StdRng) -> SievingSample {
    let n = rng.gen_range(4..=16);
    let masses = LogNormal::new(5.0, 1.0).unwrap();

    let mut size = 63.0;
    let mut pairs = Vec::with_capacity(n);
    for _ in 0..n {
        pairs.push((size, masses.sample(rng)));
        size /= rng.gen_range(1.3..2.5);
    }
    sample(&pairs)
}

#[test]
fn four_row_example() {
    let analysis = analyze(
        &sample(&[(20.0, 100.0), (10.0, 200.0), (5.0, 300.0), (2.0, 400.0)]),
        &SampleMetadata::named("four"),
    )
    .unwrap();

    let fractions: Vec<f64> = analysis.cumulative.rows().iter().map(|r| r.percent_fraction).collect();
    assert_eq!(fractions, vec![10.0, 20.0, 30.0, 40.0]);
    assert_eq!(analysis.cumulative.rows()[0].percent_cumulative, 100.0);
}

#[test]
fn symmetric_distribution_has_no_skew() {
    // Linear openings 9..1 mm with masses symmetric around 5 mm.
    let pairs: Vec<(f64, f64)> = (1..=9)
        .rev()
        .map(|s| s as f64)
        .zip([1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0, 0.0])
        .collect();
    let analysis = analyze(&sample(&pairs), &SampleMetadata::named("symmetric")).unwrap();
    let stats = &analysis.statistics;

    assert!(stats.get(Statistic::Skewness).abs() < 1e-9);
    assert!((stats.get(Statistic::D50) - 5.0).abs() < 1e-12);

    let d16 = stats.get(Statistic::D16);
    let d84 = stats.get(Statistic::D84);
    let log_mean = ((d16.ln() + d84.ln()) / 2.0).exp();
    assert!((stats.get(Statistic::GeometricMean) - log_mean).abs() < 1e-12);

    // Grid points that coincide with sieve cumulative values reproduce the sieve size.
    assert!((analysis.interpolated.percentile(15.0).unwrap() - 3.0).abs() < 1e-12);
    assert!((analysis.interpolated.percentile(85.0).unwrap() - 7.0).abs() < 1e-12);
}

#[test]
fn random_tables_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let s = random_sample(&mut rng);
        let analysis = analyze(&s, &SampleMetadata::named("random")).unwrap();

        let sum: f64 = analysis.cumulative.rows().iter().map(|r| r.percent_fraction).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((analysis.cumulative.rows()[0].percent_cumulative - 100.0).abs() < 1e-9);

        for pair in analysis.interpolated.grain_sizes().windows(2) {
            assert!(pair[0] <= pair[1]);
        }

        let ds: Vec<f64> = Statistic::DIAMETERS.iter().map(|&d| analysis.statistics.get(d)).collect();
        for pair in ds.windows(2) {
            assert!(pair[0] <= pair[1], "{ds:?}");
        }
    }
}

#[test]
fn scaling_grain_sizes_keeps_coefficients() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let s = random_sample(&mut rng);
        let k = rng.gen_range(0.1..10.0);
        let scaled = SievingSample::from_pairs(s.rows().iter().map(|r| (r.grain_size_mm * k, r.fraction_mass_g))).unwrap();

        let base = analyze(&s, &SampleMetadata::default()).unwrap().statistics;
        let other = analyze(&scaled, &SampleMetadata::default()).unwrap().statistics;

        for d in Statistic::DIAMETERS {
            let expected = base.get(d) * k;
            assert!((other.get(d) - expected).abs() <= 1e-9 * expected, "{}", d.name());
        }
        for c in [Statistic::UniformityCoefficient, Statistic::CurvatureCoefficient] {
            assert!((other.get(c) - base.get(c)).abs() <= 1e-9 * base.get(c).abs().max(1.0), "{}", c.name());
        }
    }
}

#[test]
fn pipeline_is_bit_identical_across_runs() {
    let mut rng = StdRng::seed_from_u64(3);
    let s = random_sample(&mut rng);
    let meta = SampleMetadata {
        user_porosity: Some(0.31),
        ..SampleMetadata::named("repeat")
    };
    let a = analyze(&s, &meta).unwrap();
    let b = analyze(&s, &meta).unwrap();

    let bits = |v: f64| v.to_bits();
    let stats_a: Vec<u64> = a.statistics.iter().map(|(_, v)| bits(v)).collect();
    let stats_b: Vec<u64> = b.statistics.iter().map(|(_, v)| bits(v)).collect();
    assert_eq!(stats_a, stats_b);

    for (x, y) in a.porosity_conductivity.rows().iter().zip(b.porosity_conductivity.rows()) {
        assert_eq!(bits(x.porosity), bits(y.porosity));
        assert_eq!(bits(x.hydraulic_conductivity_m_per_s), bits(y.hydraulic_conductivity_m_per_s));
    }
}

#[test]
fn batch_reports_failures_and_aggregates_the_rest() {
    let mut rng = StdRng::seed_from_u64(11);
    let inputs = vec![
        SampleInput {
            sample: random_sample(&mut rng),
            metadata: SampleMetadata::named("A"),
        },
        SampleInput {
            sample: sample(&[(4.0, 0.0), (2.0, 0.0)]),
            metadata: SampleMetadata::named("empty"),
        },
        SampleInput {
            sample: random_sample(&mut rng),
            metadata: SampleMetadata {
                user_porosity: Some(0.28),
                ..SampleMetadata::named("B")
            },
        },
    ];

    let results = analyze_batch(&inputs);
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.sample, "empty");
    assert!(matches!(err.source, AnalysisError::DivisionByZero(_)));

    let table = AggregateTable::from_results(&results);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.failures.len(), 1);

    let user_kf = format!("{} [Estimated kf]", Estimator::User.name());
    assert!(table.cell(0, &user_kf).and_then(|c| c.as_number()).unwrap().is_nan());
    assert!(table.cell(1, &user_kf).and_then(|c| c.as_number()).unwrap() > 0.0);
    assert!(table.cell(1, "d50").and_then(|c| c.as_number()).unwrap() > 0.0);
}

#[test]
fn invalid_tables_are_rejected_before_analysis() {
    assert!(matches!(
        SievingSample::from_pairs([(1.0, 5.0), (2.0, 5.0)]),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(SievingSample::from_pairs(Vec::new()), Err(AnalysisError::InvalidInput(_))));
}
