//! Composition throughput
//!
//! Measures the operations run once per benchmark case:
//! - Deriving a job from a frozen preset
//! - Layering several modes onto a fresh job
//! - Flattening and rebuilding a job
//! - Applying a mutator

use bench_jobs::prelude::*;
use bench_jobs::run::WARMUP_COUNT;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_derive_from_preset(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_from_preset");

    for (name, preset) in [
        ("default", Job::default_job()),
        ("short_run", Job::short_run()),
        ("in_process", Job::in_process()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), preset, |b, preset| {
            b.iter(|| black_box(preset.with_platform(Platform::X64).with_launch_count(2)));
        });
    }

    group.finish();
}

fn bench_apply_modes(c: &mut Criterion) {
    c.bench_function("apply_modes", |b| {
        b.iter(|| {
            let job = Job::new();
            job.apply_all(&[
                EnvironmentMode::ryu_jit_x64(),
                RunMode::medium(),
                InfrastructureMode::in_process(),
            ])
            .unwrap();
            black_box(job)
        });
    });
}

fn bench_copies(c: &mut Criterion) {
    let job = Job::medium_run()
        .with_platform(Platform::X64)
        .with_gc_server(true)
        .as_baseline()
        .freeze()
        .unwrap();

    let mut group = c.benchmark_group("copies");
    group.bench_function("unfreeze_copy", |b| {
        b.iter(|| black_box(job.unfreeze_copy().unwrap()));
    });
    group.bench_function("deep_clone", |b| {
        b.iter(|| black_box(job.deep_clone()));
    });
    group.bench_function("display_info", |b| {
        b.iter(|| black_box(job.display_info()));
    });
    group.finish();
}

fn bench_mutator(c: &mut Criterion) {
    let mutator = JobMutator::new("Warm").add(&WARMUP_COUNT, 1).unwrap();
    let jobs: Vec<Job> = (1..=16)
        .map(|n| Job::short_run().with_launch_count(n))
        .collect();

    c.bench_function("mutator_apply_all", |b| {
        b.iter(|| black_box(mutator.apply_all(black_box(&jobs))));
    });
}

criterion_group!(
    benches,
    bench_derive_from_preset,
    bench_apply_modes,
    bench_copies,
    bench_mutator
);
criterion_main!(benches);
