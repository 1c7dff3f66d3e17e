//! Default resolvers for job characteristics
//!
//! Each subsystem owns one table; [`default_resolver`] chains them. Values
//! that only the execution engine can determine (warmup and iteration
//! counts, invocation count) have no default and stay unresolved.

use std::time::Duration;

use bench_characteristics::{
    CharacteristicValue, CompositeResolver, ConfigNode, TableResolver, Value,
};
use once_cell::sync::Lazy;

use crate::accuracy::{
    ANALYZE_LAUNCH_VARIANCE, EVALUATE_OVERHEAD, MAX_RELATIVE_ERROR, MIN_INVOKE_COUNT,
    MIN_ITERATION_TIME, OUTLIER_MODE,
};
use crate::diagnoser::{
    DISASSEMBLY_MAX_DEPTH, EXCEPTION_DIAGNOSER, MEMORY_DIAGNOSER, THREADING_DIAGNOSER,
};
use crate::environment::{AFFINITY, JIT, PLATFORM, RUNTIME};
use crate::gc::{
    ALLOW_VERY_LARGE_OBJECTS, CONCURRENT, CPU_GROUPS, FORCE, HEAP_AFFINITIZE_MASK, HEAP_COUNT,
    NO_AFFINITIZE, RETAIN_VM, SERVER,
};
use crate::infrastructure::{BUILD_CONFIGURATION, CLOCK, ENGINE_FACTORY, TOOLCHAIN};
use crate::run::{
    ITERATION_TIME, LAUNCH_COUNT, MAX_ITERATION_COUNT, MAX_WARMUP_ITERATION_COUNT,
    MEMORY_RANDOMIZATION, MIN_ITERATION_COUNT, MIN_WARMUP_ITERATION_COUNT, RUN_STRATEGY,
    UNROLL_FACTOR,
};
use crate::symbols::{Jit, OutlierMode, Platform, RunStrategy};

/// Runtime label of the host process
pub const HOST_RUNTIME: &str = "host";
/// Default toolchain id
pub const DEFAULT_TOOLCHAIN: &str = "default";
/// Default clock id
pub const DEFAULT_CLOCK: &str = "stopwatch";
/// Default engine factory id
pub const DEFAULT_ENGINE_FACTORY: &str = "default";
/// Default build profile
pub const DEFAULT_BUILD_CONFIGURATION: &str = "Release";

static DEFAULT_RESOLVER: Lazy<CompositeResolver> = Lazy::new(|| {
    CompositeResolver::default()
        .with(environment_resolver())
        .with(engine_resolver())
        .with(infrastructure_resolver())
});

/// Environment, engine and infrastructure defaults, in that order
#[must_use]
pub fn default_resolver() -> &'static CompositeResolver {
    &DEFAULT_RESOLVER
}

/// Defaults of the environment and collector settings
#[must_use]
pub fn environment_resolver() -> TableResolver {
    TableResolver::new("environment")
        .with(&PLATFORM, Platform::host())
        .with(&JIT, Jit::RyuJit)
        .with(&RUNTIME, HOST_RUNTIME.to_string())
        .with(&AFFINITY, all_cores_mask())
        .with(&SERVER, false)
        .with(&CONCURRENT, true)
        .with(&CPU_GROUPS, false)
        .with(&FORCE, true)
        .with(&ALLOW_VERY_LARGE_OBJECTS, false)
        .with(&RETAIN_VM, false)
        .with(&NO_AFFINITIZE, false)
        .with(&HEAP_COUNT, 0)
        .with(&HEAP_AFFINITIZE_MASK, 0)
}

/// Defaults of the run and accuracy settings
#[must_use]
pub fn engine_resolver() -> TableResolver {
    TableResolver::new("engine")
        .with(&RUN_STRATEGY, RunStrategy::Throughput)
        .with(&ITERATION_TIME, Duration::from_millis(500))
        .with(&MIN_ITERATION_COUNT, 15)
        .with(&MAX_ITERATION_COUNT, 100)
        .with(&MIN_WARMUP_ITERATION_COUNT, 6)
        .with(&MAX_WARMUP_ITERATION_COUNT, 50)
        .with(&LAUNCH_COUNT, 1)
        .with(&MEMORY_RANDOMIZATION, false)
        .with_derived(&UNROLL_FACTOR, unroll_factor)
        .with(&EVALUATE_OVERHEAD, true)
        .with_derived(&MAX_RELATIVE_ERROR, max_relative_error)
        .with(&MIN_ITERATION_TIME, Duration::from_millis(500))
        .with(&MIN_INVOKE_COUNT, 4)
        .with_derived(&OUTLIER_MODE, outlier_mode)
        .with(&ANALYZE_LAUNCH_VARIANCE, false)
}

/// Defaults of the infrastructure and diagnoser settings
#[must_use]
pub fn infrastructure_resolver() -> TableResolver {
    TableResolver::new("infrastructure")
        .with(&TOOLCHAIN, DEFAULT_TOOLCHAIN.to_string())
        .with(&CLOCK, DEFAULT_CLOCK.to_string())
        .with(&ENGINE_FACTORY, DEFAULT_ENGINE_FACTORY.to_string())
        .with(&BUILD_CONFIGURATION, DEFAULT_BUILD_CONFIGURATION.to_string())
        .with(&MEMORY_DIAGNOSER, false)
        .with(&THREADING_DIAGNOSER, false)
        .with(&EXCEPTION_DIAGNOSER, false)
        .with(&DISASSEMBLY_MAX_DEPTH, 1)
}

fn strategy(node: &ConfigNode) -> RunStrategy {
    node.get(&RUN_STRATEGY).unwrap_or(RunStrategy::Throughput)
}

fn unroll_factor(node: &ConfigNode) -> Value {
    let factor: i32 = match strategy(node) {
        RunStrategy::ColdStart => 1,
        _ => 16,
    };
    factor.into_value()
}

fn max_relative_error(node: &ConfigNode) -> Value {
    let error: f64 = match strategy(node) {
        RunStrategy::Throughput => 0.02,
        _ => 0.05,
    };
    error.into_value()
}

fn outlier_mode(node: &ConfigNode) -> Value {
    let mode = match strategy(node) {
        RunStrategy::ColdStart | RunStrategy::Monitoring => OutlierMode::DontRemove,
        RunStrategy::Throughput => OutlierMode::RemoveUpper,
    };
    mode.into_value()
}

fn all_cores_mask() -> i64 {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    let bits = u32::try_from(cores.min(63)).unwrap_or(63);
    i64::try_from((1u64 << bits) - 1).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;
    use crate::run::INVOCATION_COUNT;
    use bench_characteristics::{AsConfigNode, CharacteristicError, Resolver};

    #[test]
    fn explicit_values_win() {
        let job = Job::new().with_launch_count(3);
        assert_eq!(job.as_config_node().resolve(&LAUNCH_COUNT, default_resolver()).unwrap(), 3);
        let fresh = Job::new();
        assert_eq!(fresh.as_config_node().resolve(&LAUNCH_COUNT, default_resolver()).unwrap(), 1);
    }

    #[test]
    fn derived_defaults_follow_run_strategy() {
        let resolver = default_resolver();
        let throughput = Job::new();
        let cold = Job::new().with_strategy(RunStrategy::ColdStart);
        let node = throughput.as_config_node();
        assert_eq!(node.resolve(&UNROLL_FACTOR, resolver).unwrap(), 16);
        assert_eq!(node.resolve(&MAX_RELATIVE_ERROR, resolver).unwrap(), 0.02);
        assert_eq!(node.resolve(&OUTLIER_MODE, resolver).unwrap(), OutlierMode::RemoveUpper);

        let node = cold.as_config_node();
        assert_eq!(node.resolve(&UNROLL_FACTOR, resolver).unwrap(), 1);
        assert_eq!(node.resolve(&MAX_RELATIVE_ERROR, resolver).unwrap(), 0.05);
        assert_eq!(node.resolve(&OUTLIER_MODE, resolver).unwrap(), OutlierMode::DontRemove);
    }

    #[test]
    fn engine_owned_values_stay_unresolved() {
        let job = Job::new();
        let err = job
            .as_config_node()
            .resolve(&INVOCATION_COUNT, default_resolver())
            .unwrap_err();
        assert_eq!(err, CharacteristicError::Unresolved("RunMode.InvocationCount".to_string()));
        assert!(!default_resolver().can_resolve(&INVOCATION_COUNT));
    }

    #[test]
    fn affinity_mask_covers_every_core() {
        let mask = all_cores_mask();
        assert!(mask >= 1);
        assert_eq!(mask.count_ones(), mask.trailing_ones());
    }

    #[test]
    fn tables_are_disjoint() {
        let tables = [environment_resolver(), engine_resolver(), infrastructure_resolver()];
        assert!(tables.iter().all(|t| !t.is_empty()));
        assert!(tables[0].can_resolve(&PLATFORM) && !tables[1].can_resolve(&PLATFORM));
        assert!(tables[2].can_resolve(&TOOLCHAIN) && !tables[0].can_resolve(&TOOLCHAIN));
    }
}
