//! Copy-and-set helpers on [`Job`]
//!
//! Each helper returns a new, unfrozen job: the explicit id of the source is
//! kept, every other non-sticky value is applied from the source, then the
//! one value is set. The source job is never modified, so the helpers work
//! on frozen presets.

use std::time::Duration;

use bench_characteristics::{Characteristic, CharacteristicValue, NodeBuilder, TypedNode};

use crate::accuracy::{
    ANALYZE_LAUNCH_VARIANCE, EVALUATE_OVERHEAD, MAX_ABSOLUTE_ERROR, MAX_RELATIVE_ERROR,
    MIN_INVOKE_COUNT, MIN_ITERATION_TIME, OUTLIER_MODE,
};
use crate::diagnoser::{
    DISASSEMBLY_MAX_DEPTH, EXCEPTION_DIAGNOSER, HARDWARE_COUNTERS, MEMORY_DIAGNOSER,
    THREADING_DIAGNOSER,
};
use crate::environment::{
    AFFINITY, ENVIRONMENT_VARIABLES, JIT, PLATFORM, POWER_PLAN_MODE, RUNTIME,
};
use crate::error::{JobError, JobResult};
use crate::gc::{
    GcMode, ALLOW_VERY_LARGE_OBJECTS, CONCURRENT, CPU_GROUPS, FORCE, HEAP_AFFINITIZE_MASK,
    HEAP_COUNT, NO_AFFINITIZE, RETAIN_VM, SERVER,
};
use crate::infrastructure::{
    ARGUMENTS, BUILD_CONFIGURATION, CLOCK, ENGINE_FACTORY, PACKAGE_REFERENCES, TOOLCHAIN,
};
use crate::job::Job;
use crate::meta::{BASELINE, IS_DEFAULT, IS_MUTATOR};
use crate::run::{
    INVOCATION_COUNT, ITERATION_COUNT, ITERATION_TIME, LAUNCH_COUNT, MAX_ITERATION_COUNT,
    MAX_WARMUP_ITERATION_COUNT, MEMORY_RANDOMIZATION, MIN_ITERATION_COUNT,
    MIN_WARMUP_ITERATION_COUNT, RUN_STRATEGY, UNROLL_FACTOR, WARMUP_COUNT,
};
use crate::symbols::{EnvironmentVariable, HardwareCounter, Jit, OutlierMode, Platform, RunStrategy};

macro_rules! with_helpers {
    ( $( $name:ident => $characteristic:ident : $value:ty; )+ ) => {
        impl Job {
            $(
                #[doc = concat!("Copy with `", stringify!($characteristic), "` set")]
                #[must_use]
                pub fn $name(&self, value: $value) -> Job {
                    self.with_value(&$characteristic, value)
                }
            )+
        }
    };
}

with_helpers! {
    // environment
    with_platform => PLATFORM: Platform;
    with_jit => JIT: Jit;
    with_runtime => RUNTIME: String;
    with_affinity => AFFINITY: i64;
    with_power_plan_mode => POWER_PLAN_MODE: String;
    with_environment_variables => ENVIRONMENT_VARIABLES: Vec<EnvironmentVariable>;
    // gc
    with_gc_server => SERVER: bool;
    with_gc_concurrent => CONCURRENT: bool;
    with_gc_cpu_groups => CPU_GROUPS: bool;
    with_gc_force => FORCE: bool;
    with_gc_allow_very_large_objects => ALLOW_VERY_LARGE_OBJECTS: bool;
    with_gc_retain_vm => RETAIN_VM: bool;
    with_heap_count => HEAP_COUNT: i32;
    with_no_affinitize => NO_AFFINITIZE: bool;
    with_heap_affinitize_mask => HEAP_AFFINITIZE_MASK: i64;
    // run
    with_strategy => RUN_STRATEGY: RunStrategy;
    with_launch_count => LAUNCH_COUNT: i32;
    with_warmup_count => WARMUP_COUNT: i32;
    with_min_warmup_count => MIN_WARMUP_ITERATION_COUNT: i32;
    with_max_warmup_count => MAX_WARMUP_ITERATION_COUNT: i32;
    with_iteration_count => ITERATION_COUNT: i32;
    with_iteration_time => ITERATION_TIME: Duration;
    with_invocation_count => INVOCATION_COUNT: i64;
    with_unroll_factor => UNROLL_FACTOR: i32;
    with_min_iteration_count => MIN_ITERATION_COUNT: i32;
    with_max_iteration_count => MAX_ITERATION_COUNT: i32;
    with_memory_randomization => MEMORY_RANDOMIZATION: bool;
    // infrastructure
    with_toolchain => TOOLCHAIN: String;
    with_clock => CLOCK: String;
    with_engine_factory => ENGINE_FACTORY: String;
    with_build_configuration => BUILD_CONFIGURATION: String;
    with_arguments => ARGUMENTS: Vec<String>;
    // diagnosers
    with_memory_diagnoser => MEMORY_DIAGNOSER: bool;
    with_threading_diagnoser => THREADING_DIAGNOSER: bool;
    with_exception_diagnoser => EXCEPTION_DIAGNOSER: bool;
    with_disassembly_max_depth => DISASSEMBLY_MAX_DEPTH: i32;
    with_hardware_counters => HARDWARE_COUNTERS: Vec<HardwareCounter>;
    // accuracy
    with_max_relative_error => MAX_RELATIVE_ERROR: f64;
    with_max_absolute_error => MAX_ABSOLUTE_ERROR: Duration;
    with_min_iteration_time => MIN_ITERATION_TIME: Duration;
    with_min_invoke_count => MIN_INVOKE_COUNT: i32;
    with_evaluate_overhead => EVALUATE_OVERHEAD: bool;
    with_outlier_mode => OUTLIER_MODE: OutlierMode;
    with_analyze_launch_variance => ANALYZE_LAUNCH_VARIANCE: bool;
    // meta
    with_baseline => BASELINE: bool;
}

impl Job {
    /// Builder seeded with this job's explicit id and non-sticky values
    pub(crate) fn derive(&self) -> NodeBuilder {
        let builder = match self.explicit_id() {
            Some(id) => NodeBuilder::of::<Job>().id(id),
            None => NodeBuilder::of::<Job>(),
        };
        builder.merge(self)
    }

    fn with_value<T: CharacteristicValue>(&self, c: &Characteristic<T>, value: T) -> Job {
        self.derive().value(c, value).build_as()
    }

    /// Copy with a new id and every non-sticky value
    #[must_use]
    pub fn with_id(&self, id: impl Into<String>) -> Job {
        NodeBuilder::of::<Job>().id(id).merge(self).build_as()
    }

    /// Copy with `variable` added, replacing a variable of the same name
    #[must_use]
    pub fn with_environment_variable(&self, variable: EnvironmentVariable) -> Job {
        let mut variables = self
            .get(&ENVIRONMENT_VARIABLES)
            .unwrap_or_default();
        variables.retain(|existing| existing.key() != variable.key());
        variables.push(variable);
        self.with_environment_variables(variables)
    }

    /// Copy with the collector settings replaced by a copy of `gc`
    pub fn with_gc(&self, gc: &GcMode) -> JobResult<Job> {
        let job: Job = self.derive().build_as();
        job.environment().set_gc(gc.unfreeze_copy()?)?;
        Ok(job)
    }

    /// Copy with a package reference added
    ///
    /// References are stored as `name@version`, or `name` for the latest
    /// version. A second reference to the same package is rejected.
    pub fn with_package_reference(&self, name: &str, version: Option<&str>) -> JobResult<Job> {
        let mut references = self.get(&PACKAGE_REFERENCES).unwrap_or_default();
        let taken = references
            .iter()
            .any(|existing| package_name(existing) == name);
        if taken {
            return Err(JobError::DuplicatePackageReference(name.to_string()));
        }
        references.push(match version {
            Some(version) => format!("{name}@{version}"),
            None => name.to_string(),
        });
        Ok(self.with_value(&PACKAGE_REFERENCES, references))
    }

    /// Copy that runs the benchmark body once per iteration
    #[must_use]
    pub fn run_once_per_iteration(&self) -> Job {
        self.derive()
            .value(&INVOCATION_COUNT, 1)
            .value(&UNROLL_FACTOR, 1)
            .build_as()
    }

    /// Copy marked as the baseline
    #[must_use]
    pub fn as_baseline(&self) -> Job {
        self.with_baseline(true)
    }

    /// Copy marked as a mutator, applied onto other jobs instead of run
    #[must_use]
    pub fn as_mutator(&self) -> Job {
        self.with_value(&IS_MUTATOR, true)
    }

    /// Copy marked as the replacement for the default job
    #[must_use]
    pub fn as_default(&self) -> Job {
        self.with_value(&IS_DEFAULT, true)
    }
}

fn package_name(reference: &str) -> &str {
    reference
        .split_once('@')
        .map_or(reference, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_keep_explicit_id_and_leave_source_alone() {
        let job = Job::dry().with_launch_count(5);
        assert!(!job.is_frozen());
        assert_eq!(job.explicit_id().as_deref(), Some("Dry"));
        assert_eq!(job.run().launch_count(), Some(5));
        assert_eq!(job.run().warmup_count(), Some(1));
        assert_eq!(Job::dry().run().launch_count(), Some(1));
    }

    #[test]
    fn helpers_on_unnamed_jobs_stay_unnamed() {
        let job = Job::new().with_platform(Platform::Arm64);
        assert_eq!(job.explicit_id(), None);
    }

    #[test]
    fn mutator_flag_does_not_survive_further_helpers() {
        let mutator = Job::new().with_warmup_count(2).as_mutator();
        assert_eq!(mutator.meta().is_mutator(), Some(true));
        let derived = mutator.with_launch_count(1);
        assert_eq!(derived.meta().is_mutator(), None);
        assert_eq!(derived.run().warmup_count(), Some(2));
    }

    #[test]
    fn run_once_per_iteration_sets_both_counts() {
        let job = Job::short_run().run_once_per_iteration();
        assert_eq!(job.run().invocation_count(), Some(1));
        assert_eq!(job.run().unroll_factor(), Some(1));
    }

    #[test]
    fn environment_variables_replace_by_name() {
        let job = Job::new()
            .with_environment_variable(EnvironmentVariable::new("RUST_LOG", "info"))
            .with_environment_variable(EnvironmentVariable::new("RUST_BACKTRACE", "1"))
            .with_environment_variable(EnvironmentVariable::new("RUST_LOG", "debug"));
        assert_eq!(
            job.environment().environment_variables(),
            Some(vec![
                EnvironmentVariable::new("RUST_BACKTRACE", "1"),
                EnvironmentVariable::new("RUST_LOG", "debug"),
            ])
        );
    }

    #[test]
    fn package_references_reject_duplicates() {
        let job = Job::new()
            .with_package_reference("serde", Some("1.0"))
            .unwrap()
            .with_package_reference("rand", None)
            .unwrap();
        assert_eq!(
            job.infrastructure().package_references(),
            Some(vec!["serde@1.0".to_string(), "rand".to_string()])
        );
        let err = job.with_package_reference("serde", Some("2.0")).unwrap_err();
        assert_eq!(err, JobError::DuplicatePackageReference("serde".to_string()));
    }

    #[test]
    fn with_gc_copies_frozen_modes() {
        let gc = GcMode::new();
        gc.set_server(true).unwrap();
        let gc = gc.freeze().unwrap();
        let job = Job::default_job().with_gc(&gc).unwrap();
        assert_eq!(job.environment().gc().server(), Some(true));
        assert!(gc.is_frozen());
    }
}
