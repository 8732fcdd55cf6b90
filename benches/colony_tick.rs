use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

use clay_colony::core::config::{SimulationConfig, WorldBounds};
use clay_colony::simulation::{run_ticks, Colony};

fn bench_colony_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("colony_tick");
    group.sample_size(30);

    let steps = 64;
    for &agents in &[10usize, 200, 1000] {
        group.bench_function(format!("steps{}_agents{}", steps, agents), |b| {
            b.iter_batched(
                || {
                    let mut config = SimulationConfig::default();
                    // Larger world so the placer can still honor spacing
                    config.bounds = WorldBounds { width: 4000.0, height: 4000.0 };
                    config.agent_count = agents;
                    config.resource_count = (agents / 4).max(8);
                    config.seed = 0xC1A7;
                    Colony::new(config).expect("valid bench config")
                },
                |mut colony| {
                    run_ticks(&mut colony, steps, Duration::from_millis(16));
                    colony
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_colony_ticks);
criterion_main!(benches);
