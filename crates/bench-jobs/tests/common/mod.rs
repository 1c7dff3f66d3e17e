//! Sample jobs shared by the integration tests

#![allow(dead_code, unused_imports)]

use bench_jobs::prelude::*;
use proptest::prelude::*;

pub use bench_test_utils::{assert_presentation, init_tracing};

/// Short run pinned to x64
pub fn x64_short_run() -> Job {
    Job::short_run().with_platform(Platform::X64)
}

/// Job with values in every mode and an explicit id
pub fn fully_customized() -> Job {
    Job::with_id_only("Custom")
        .with_jit(Jit::RyuJit)
        .with_platform(Platform::X86)
        .with_gc_server(true)
        .with_launch_count(2)
        .with_max_relative_error(0.01)
        .with_clock("hrtimer".to_string())
        .with_memory_diagnoser(true)
        .as_baseline()
}

/// Job without an id whose values come from two presets
pub fn anonymous_legacy_long() -> Job {
    Job::from_nodes(None, &[EnvironmentMode::legacy_jit_x64(), RunMode::long()])
}

/// Jobs with optional values in several modes
pub fn arb_job() -> impl Strategy<Value = Job> {
    (
        proptest::option::of("[A-Za-z][A-Za-z0-9]{0,8}"),
        proptest::option::of(prop::sample::select(Platform::ALL.to_vec())),
        proptest::option::of(prop::sample::select(Jit::ALL.to_vec())),
        proptest::option::of(any::<bool>()),
        proptest::option::of(1..20i32),
        proptest::option::of(1..1000i32),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(id, platform, jit, server, launches, iterations, baseline)| {
            let mut job = match id {
                Some(id) => Job::with_id_only(id),
                None => Job::new(),
            };
            if let Some(platform) = platform {
                job = job.with_platform(platform);
            }
            if let Some(jit) = jit {
                job = job.with_jit(jit);
            }
            if let Some(server) = server {
                job = job.with_gc_server(server);
            }
            if let Some(launches) = launches {
                job = job.with_launch_count(launches);
            }
            if let Some(iterations) = iterations {
                job = job.with_iteration_count(iterations);
            }
            if let Some(baseline) = baseline {
                job = job.with_baseline(baseline);
            }
            job
        })
}
