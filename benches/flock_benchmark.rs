/*
 * Flock Benchmark
 *
 * Measures tick throughput for growing populations, sequential against
 * rayon, and the cost of the brute-force neighbor scan on its own.
 */

use boids2d::{neighbors_of, Flock, FlockConfig, Scenario};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn flock(agent_count: usize, parallel: bool) -> Flock {
    Flock::new(FlockConfig {
        agent_count,
        parallel,
        rng_seed: Some(1),
        ..Scenario::FullFlocking.config()
    })
    .expect("valid benchmark config")
}

// Benchmark a full tick at several population sizes
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for agent_count in [80, 500, 1000, 2000].iter() {
        for parallel in [false, true] {
            let id = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(id, agent_count), agent_count, |b, &n| {
                let mut flock = flock(n, parallel);
                b.iter(|| flock.tick());
            });
        }
    }

    group.finish();
}

// Benchmark the neighbor scan for a single agent
fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors_of");

    for agent_count in [80, 500, 1000, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(agent_count), agent_count, |b, &n| {
            let flock = flock(n, false);
            b.iter(|| black_box(neighbors_of(flock.agents(), 0, flock.config())));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_tick, bench_neighbors
}

criterion_main!(benches);
