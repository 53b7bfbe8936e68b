//! Criterion benchmarks for u-nsga2.
//!
//! Uses synthetic objective sets and the ZDT1 problem to measure pure
//! algorithm overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_nsga2::nsga2::multi_objective::{assign_crowding_distance, non_dominated_sort};
use u_nsga2::nsga2::{create_rng, Bounds, Nsga2Config, Nsga2Runner, Objective};

// ===========================================================================
// ZDT1: two objectives, Pareto front at g(x) = 1
// ===========================================================================

fn zdt1_f1(x: &[f64]) -> f64 {
    x[0]
}

fn zdt1_f2(x: &[f64]) -> f64 {
    let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (x.len() - 1) as f64;
    g * (1.0 - (x[0] / g).sqrt())
}

fn random_objectives(n: usize, m: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|_| (0..m).map(|_| rng.random_range(0.0..1.0)).collect())
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");
    group.sample_size(20);

    for (n, m) in [(100usize, 2usize), (200, 2), (400, 3)] {
        let objs = random_objectives(n, m, 42);
        group.bench_with_input(BenchmarkId::new(format!("m{}", m), n), &objs, |b, o| {
            b.iter(|| black_box(non_dominated_sort(black_box(o))))
        });
    }
    group.finish();
}

fn bench_crowding(c: &mut Criterion) {
    let mut group = c.benchmark_group("crowding_distance");
    group.sample_size(20);

    for &n in &[100usize, 200, 400] {
        let objs = random_objectives(n, 3, 7);
        let fronts = non_dominated_sort(&objs).expect("non-empty");
        group.bench_with_input(BenchmarkId::from_parameter(n), &(objs, fronts), |b, (o, f)| {
            b.iter(|| black_box(assign_crowding_distance(black_box(o), black_box(f))))
        });
    }
    group.finish();
}

fn bench_zdt1(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsga2_zdt1");
    group.sample_size(10);

    let objectives: [&dyn Objective; 2] = [&zdt1_f1, &zdt1_f2];
    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (30, 100, 30)] {
        let config = Nsga2Config {
            population_size: pop,
            max_generations: gen,
            dimensions: dim,
            bounds: Bounds::new(0.0, 1.0).expect("valid bounds"),
            mutation_rate: 1.0 / dim as f64,
            seed: Some(42),
            ..Nsga2Config::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &config,
            |b, c| {
                b.iter(|| {
                    let result = Nsga2Runner::run(black_box(&objectives), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_non_dominated_sort, bench_crowding, bench_zdt1);
criterion_main!(benches);
