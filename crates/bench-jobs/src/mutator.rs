//! Mutators: named override sets applied onto existing jobs

use bench_characteristics::{
    AsConfigNode, Characteristic, CharacteristicValue, NodeBuilder, PropertyBag, TypedNode,
};

use crate::error::{JobError, JobResult};
use crate::job::{Job, JOB_TYPE};

/// A bounded set of overrides producing derived jobs
///
/// Applying a mutator never changes the job it is applied to; the result is
/// a new job with id `"{job id}-{mutator id}"`.
#[derive(Debug, Clone)]
pub struct JobMutator {
    id: String,
    overrides: PropertyBag,
}

impl JobMutator {
    /// Mutator without overrides
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            overrides: PropertyBag::new(),
        }
    }

    /// Mutator overriding every explicitly set, non-sticky leaf of `job`
    #[must_use]
    pub fn from_job(job: &Job) -> Self {
        let node = job.as_config_node();
        let overrides = JOB_TYPE
            .all_characteristics()
            .iter()
            .filter(|c| !c.is_child() && !c.is_sticky())
            .fold(NodeBuilder::of::<PropertyBag>(), |builder, c| {
                match node.explicit_value(c) {
                    Some(value) => builder.raw_value(c, value),
                    None => builder,
                }
            })
            .build_as();
        Self {
            id: job.resolved_id(),
            overrides,
        }
    }

    /// Mutator id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Overrides in characteristic name order
    #[must_use]
    pub fn overrides(&self) -> &PropertyBag {
        &self.overrides
    }

    /// Add an override
    ///
    /// Sticky and child characteristics are rejected, as is a second
    /// override of the same characteristic.
    pub fn add<T: CharacteristicValue>(self, c: &Characteristic<T>, value: T) -> JobResult<Self> {
        if c.is_sticky() {
            return Err(JobError::StickyOverride(c.full_name()));
        }
        if c.is_child() {
            return Err(JobError::NotALeaf(c.full_name()));
        }
        if self.overrides.has(c) {
            return Err(JobError::DuplicateMutatorOverride {
                mutator: self.id,
                characteristic: c.full_name(),
            });
        }
        let overrides = self.overrides.with(c, value)?;
        Ok(Self {
            id: self.id,
            overrides,
        })
    }

    /// New job holding `job`'s values with the overrides on top
    #[must_use]
    pub fn apply(&self, job: &Job) -> Job {
        let id = format!("{}-{}", job.resolved_id(), self.id);
        tracing::debug!("Applying mutator {} with {} overrides", self.id, self.overrides.len());
        Job::parse_builder(&job.to_set())
            .merge(&self.overrides)
            .id(id)
            .build_as()
    }

    /// Apply to each job in order
    #[must_use]
    pub fn apply_all(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter().map(|job| self.apply(job)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentMode;
    use crate::job::ENVIRONMENT;
    use crate::run::{LAUNCH_COUNT, WARMUP_COUNT};
    use bench_characteristics::ID;

    #[test]
    fn add_rejects_invalid_overrides() {
        let mutator = JobMutator::new("Fast").add(&LAUNCH_COUNT, 1).unwrap();
        let err = mutator.clone().add(&LAUNCH_COUNT, 2).unwrap_err();
        assert_eq!(
            err,
            JobError::DuplicateMutatorOverride {
                mutator: "Fast".to_string(),
                characteristic: "RunMode.LaunchCount".to_string(),
            }
        );
        assert!(matches!(
            mutator.clone().add(&ID, "x".to_string()),
            Err(JobError::StickyOverride(_))
        ));
        assert!(matches!(
            mutator.add(&ENVIRONMENT, EnvironmentMode::new()),
            Err(JobError::NotALeaf(_))
        ));
    }

    #[test]
    fn apply_derives_id_and_keeps_source() {
        let mutator = JobMutator::new("Warm").add(&WARMUP_COUNT, 9).unwrap();
        let job = mutator.apply(Job::short_run());
        assert_eq!(job.resolved_id(), "ShortRun-Warm");
        assert_eq!(job.run().warmup_count(), Some(9));
        assert_eq!(job.run().launch_count(), Some(1));
        assert_eq!(Job::short_run().run().warmup_count(), Some(3));
        assert!(!job.is_frozen());
    }

    #[test]
    fn from_job_takes_non_sticky_values() {
        let source = Job::with_id_only("Source").with_launch_count(4).as_mutator();
        let mutator = JobMutator::from_job(&source);
        assert_eq!(mutator.id(), "Source");
        assert_eq!(mutator.overrides().len(), 1);
        assert_eq!(mutator.overrides().get(&LAUNCH_COUNT), Some(4));
    }
}
