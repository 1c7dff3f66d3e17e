//! Mutators, comparison and resolution across jobs
//!
//! Tests verify:
//! - A mutator overwrites only the values it configures
//! - Mutator flags never leak into the jobs they are applied to
//! - Ordering is stable and numeric-aware when configured
//! - Resolution fills in defaults without touching the job

mod common;

use std::cmp::Ordering;

use bench_jobs::infrastructure::TOOLCHAIN;
use bench_jobs::prelude::*;
use bench_jobs::resolvers::DEFAULT_TOOLCHAIN;
use bench_jobs::run::{LAUNCH_COUNT, MAX_ITERATION_COUNT, WARMUP_COUNT};
use common::init_tracing;
use pretty_assertions::assert_eq;

#[test]
fn mutator_job_overwrites_only_configured_settings() {
    init_tracing();
    let before = Job::default_job().with_runtime("core30".to_string());
    let copy = before.unfreeze_copy().unwrap();
    assert!(!copy.has(&MAX_ITERATION_COUNT));

    let mutator = Job::default_job().with_max_iteration_count(20).as_mutator();
    copy.apply(&mutator).unwrap();

    assert!(copy.has(&MAX_ITERATION_COUNT));
    assert_eq!(copy.run().max_iteration_count(), Some(20));
    assert!(!before.has(&MAX_ITERATION_COUNT));
    assert_eq!(copy.environment().runtime(), Some("core30".to_string()));
    assert_eq!(copy.meta().is_mutator(), None);
}

#[test]
fn mutator_applies_to_many_jobs() {
    let mutator = JobMutator::new("Warm")
        .add(&WARMUP_COUNT, 1)
        .unwrap()
        .add(&LAUNCH_COUNT, 2)
        .unwrap();
    let jobs = vec![
        Job::short_run().clone(),
        common::fully_customized(),
        common::x64_short_run(),
    ];
    let mutated = mutator.apply_all(&jobs);

    let ids: Vec<String> = mutated.iter().map(Job::resolved_id).collect();
    assert_eq!(ids, vec!["ShortRun-Warm", "Custom-Warm", "ShortRun-Warm"]);
    for (job, source) in mutated.iter().zip(&jobs) {
        assert_eq!(job.run().warmup_count(), Some(1));
        assert_eq!(job.run().launch_count(), Some(2));
        assert_eq!(job.environment().platform(), source.environment().platform());
    }
    // the baseline flag of the source survives
    assert_eq!(mutated[1].meta().baseline(), Some(true));
    assert_eq!(Job::short_run().run().warmup_count(), Some(3));
}

#[test]
fn mutator_from_marked_job() {
    let marked = Job::with_id_only("Jitless")
        .with_jit(Jit::LegacyJit)
        .as_mutator();
    let mutator = JobMutator::from_job(&marked);
    assert_eq!(mutator.id(), "Jitless");

    let job = mutator.apply(&common::x64_short_run());
    assert_eq!(job.resolved_id(), "ShortRun-Jitless");
    assert_eq!(job.environment().jit(), Some(Jit::LegacyJit));
    assert_eq!(job.meta().is_mutator(), None);
}

#[test]
fn jobs_order_by_values() {
    let a = Job::new().with_launch_count(2);
    let b = Job::new().with_launch_count(10);
    let empty = Job::new();

    assert_eq!(JobComparer::ORDINAL.compare(&empty, &a), Ordering::Less);
    assert_eq!(JobComparer::ORDINAL.compare(&a, &b), Ordering::Greater);
    assert_eq!(JobComparer::NUMERIC.compare(&a, &b), Ordering::Less);
    assert!(JobComparer::ORDINAL.equals(&a, &a.deep_clone()));

    let mut jobs = vec![b.clone(), empty.clone(), a.clone()];
    jobs.sort_by(|x, y| JobComparer::NUMERIC.compare(x, y));
    let counts: Vec<Option<i32>> = jobs.iter().map(|j| j.run().launch_count()).collect();
    assert_eq!(counts, vec![None, Some(2), Some(10)]);

    let settings = JobsSettings::default().with_order_policy(JobOrderPolicy::Numeric);
    assert_eq!(JobComparer::from_settings(&settings), JobComparer::NUMERIC);
}

#[test]
fn ids_differ_by_id_alone() {
    let a = Job::with_id_only("A").with_launch_count(1);
    let b = Job::with_id_only("B").with_launch_count(1);
    assert_ne!(a, b);
    assert!(a < b);
}

#[test]
fn resolution_leaves_job_untouched() {
    let job = common::x64_short_run();
    let node = job.as_config_node();
    let resolver = default_resolver();

    assert_eq!(node.resolve(&LAUNCH_COUNT, resolver).unwrap(), 1);
    assert_eq!(
        node.resolve(&TOOLCHAIN, resolver).unwrap(),
        DEFAULT_TOOLCHAIN.to_string()
    );
    assert!(!job.has(&TOOLCHAIN));
    assert_eq!(
        node.resolve_or(&MAX_ITERATION_COUNT, 7),
        7,
        "absent values fall back to the given default"
    );
}

#[test]
fn settings_drive_generated_ids() {
    let job = common::anonymous_legacy_long();
    let settings = JobsSettings::default()
        .with_unnamed_prefix("Job")
        .with_id_suffix_len(4);
    let id = job.resolved_id_with(&settings);
    assert!(id.starts_with("Job-"));
    assert_eq!(id.len(), "Job-".len() + 4);
    assert_eq!(id, job.deep_clone().resolved_id_with(&settings));

    let named = JobsSettings::default().with_default_job_name("Baseline");
    assert_eq!(Job::new().resolved_id_with(&named), "Baseline");
    assert_eq!(Job::new().display_info_with(&named), "Baseline");
}
