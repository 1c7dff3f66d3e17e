//! How many launches, warmups and iterations a benchmark gets

use std::time::Duration;

use bench_characteristics::{Characteristic, CharacteristicRef, NodeBuilder};
use once_cell::sync::Lazy;

use crate::symbols::RunStrategy;

config_node! {
    /// Run configuration
    RunMode, RUN_MODE_TYPE, "RunMode", declare
}

/// Engine strategy, `Throughput` when unset
pub static RUN_STRATEGY: Lazy<Characteristic<RunStrategy>> = Lazy::new(|| {
    Characteristic::with_fallback("RunStrategy", &RUN_MODE_TYPE, RunStrategy::Throughput)
});
/// Number of separate processes
pub static LAUNCH_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("LaunchCount", &RUN_MODE_TYPE));
/// Warmup iterations per launch
pub static WARMUP_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("WarmupCount", &RUN_MODE_TYPE));
/// Measured iterations per launch
pub static ITERATION_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("IterationCount", &RUN_MODE_TYPE));
/// Desired duration of one iteration
pub static ITERATION_TIME: Lazy<Characteristic<Duration>> =
    Lazy::new(|| Characteristic::declare("IterationTime", &RUN_MODE_TYPE));
/// Invocations per iteration
pub static INVOCATION_COUNT: Lazy<Characteristic<i64>> =
    Lazy::new(|| Characteristic::declare("InvocationCount", &RUN_MODE_TYPE));
/// Invocations per loop body
pub static UNROLL_FACTOR: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("UnrollFactor", &RUN_MODE_TYPE));
/// Lower bound for automatic iteration count
pub static MIN_ITERATION_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("MinIterationCount", &RUN_MODE_TYPE));
/// Upper bound for automatic iteration count
pub static MAX_ITERATION_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("MaxIterationCount", &RUN_MODE_TYPE));
/// Lower bound for automatic warmup count
pub static MIN_WARMUP_ITERATION_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("MinWarmupIterationCount", &RUN_MODE_TYPE));
/// Upper bound for automatic warmup count
pub static MAX_WARMUP_ITERATION_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("MaxWarmupIterationCount", &RUN_MODE_TYPE));
/// Randomize memory layout between iterations
pub static MEMORY_RANDOMIZATION: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("MemoryRandomization", &RUN_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        RUN_STRATEGY.erased(),
        LAUNCH_COUNT.erased(),
        WARMUP_COUNT.erased(),
        ITERATION_COUNT.erased(),
        ITERATION_TIME.erased(),
        INVOCATION_COUNT.erased(),
        UNROLL_FACTOR.erased(),
        MIN_ITERATION_COUNT.erased(),
        MAX_ITERATION_COUNT.erased(),
        MIN_WARMUP_ITERATION_COUNT.erased(),
        MAX_WARMUP_ITERATION_COUNT.erased(),
        MEMORY_RANDOMIZATION.erased(),
    ]
}

accessors! {
    RunMode {
        run_strategy, set_run_strategy => RUN_STRATEGY: RunStrategy;
        launch_count, set_launch_count => LAUNCH_COUNT: i32;
        warmup_count, set_warmup_count => WARMUP_COUNT: i32;
        iteration_count, set_iteration_count => ITERATION_COUNT: i32;
        iteration_time, set_iteration_time => ITERATION_TIME: Duration;
        invocation_count, set_invocation_count => INVOCATION_COUNT: i64;
        unroll_factor, set_unroll_factor => UNROLL_FACTOR: i32;
        min_iteration_count, set_min_iteration_count => MIN_ITERATION_COUNT: i32;
        max_iteration_count, set_max_iteration_count => MAX_ITERATION_COUNT: i32;
        min_warmup_iteration_count, set_min_warmup_iteration_count => MIN_WARMUP_ITERATION_COUNT: i32;
        max_warmup_iteration_count, set_max_warmup_iteration_count => MAX_WARMUP_ITERATION_COUNT: i32;
        memory_randomization, set_memory_randomization => MEMORY_RANDOMIZATION: bool;
    }
}

fn preset(id: &str, launch: i32, warmup: i32, iterations: i32) -> NodeBuilder {
    NodeBuilder::of::<RunMode>()
        .id(id)
        .value(&LAUNCH_COUNT, launch)
        .value(&WARMUP_COUNT, warmup)
        .value(&ITERATION_COUNT, iterations)
}

static DRY: Lazy<RunMode> = Lazy::new(|| {
    preset("Dry", 1, 1, 1)
        .value(&RUN_STRATEGY, RunStrategy::ColdStart)
        .value(&UNROLL_FACTOR, 1)
        .freeze_as()
});
static SHORT: Lazy<RunMode> = Lazy::new(|| preset("Short", 1, 3, 3).freeze_as());
static MEDIUM: Lazy<RunMode> = Lazy::new(|| preset("Medium", 2, 10, 15).freeze_as());
static LONG: Lazy<RunMode> = Lazy::new(|| preset("Long", 3, 15, 100).freeze_as());
static VERY_LONG: Lazy<RunMode> = Lazy::new(|| preset("VeryLong", 4, 30, 500).freeze_as());

impl RunMode {
    /// One cold-start iteration; checks that benchmarks run at all
    #[must_use]
    pub fn dry() -> &'static Self {
        &DRY
    }

    /// 1 launch, 3 warmups, 3 iterations
    #[must_use]
    pub fn short() -> &'static Self {
        &SHORT
    }

    /// 2 launches, 10 warmups, 15 iterations
    #[must_use]
    pub fn medium() -> &'static Self {
        &MEDIUM
    }

    /// 3 launches, 15 warmups, 100 iterations
    #[must_use]
    pub fn long() -> &'static Self {
        &LONG
    }

    /// 4 launches, 30 warmups, 500 iterations
    #[must_use]
    pub fn very_long() -> &'static Self {
        &VERY_LONG
    }
}
