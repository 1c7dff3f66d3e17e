//! The job: one complete run configuration
//!
//! A job is a root node with one child per mode plus the inherited `Id`.
//! All children share the job's store, so a value set through
//! `job.run()` is visible on the job itself. Presets are frozen; every
//! change produces a new job (see the `with_*` helpers).

use std::fmt;

use bench_characteristics::{
    AsConfigNode, Characteristic, CharacteristicRef, NodeBuilder, PropertyBag, Result,
    SetPresenter, TypedNode, Value, ValuePresenter, DEFAULT_ID, ID,
};
use once_cell::sync::Lazy;

use crate::accuracy::AccuracyMode;
use crate::environment::EnvironmentMode;
use crate::ids;
use crate::infrastructure::InfrastructureMode;
use crate::meta::MetaMode;
use crate::run::RunMode;
use crate::settings::JobsSettings;

config_node! {
    /// One complete benchmark run configuration
    Job, JOB_TYPE, "Job", declare
}

/// Accuracy settings
pub static ACCURACY: Lazy<Characteristic<AccuracyMode>> =
    Lazy::new(|| Characteristic::declare("Accuracy", &JOB_TYPE));
/// Environment settings
pub static ENVIRONMENT: Lazy<Characteristic<EnvironmentMode>> =
    Lazy::new(|| Characteristic::declare("Environment", &JOB_TYPE));
/// Infrastructure settings
pub static INFRASTRUCTURE: Lazy<Characteristic<InfrastructureMode>> =
    Lazy::new(|| Characteristic::declare("Infrastructure", &JOB_TYPE));
/// Meta flags
pub static META: Lazy<Characteristic<MetaMode>> =
    Lazy::new(|| Characteristic::declare("Meta", &JOB_TYPE));
/// Run settings
pub static RUN: Lazy<Characteristic<RunMode>> =
    Lazy::new(|| Characteristic::declare("Run", &JOB_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        ACCURACY.erased(),
        ENVIRONMENT.erased(),
        INFRASTRUCTURE.erased(),
        META.erased(),
        RUN.erased(),
    ]
}

fn preset(id: &str, source: &dyn AsConfigNode) -> Job {
    NodeBuilder::of::<Job>().id(id).merge(source).freeze_as()
}

static DEFAULT_JOB: Lazy<Job> =
    Lazy::new(|| NodeBuilder::of::<Job>().id(DEFAULT_ID).freeze_as());
static DRY: Lazy<Job> = Lazy::new(|| preset("Dry", RunMode::dry()));
static SHORT_RUN: Lazy<Job> = Lazy::new(|| preset("ShortRun", RunMode::short()));
static MEDIUM_RUN: Lazy<Job> = Lazy::new(|| preset("MediumRun", RunMode::medium()));
static LONG_RUN: Lazy<Job> = Lazy::new(|| preset("LongRun", RunMode::long()));
static VERY_LONG_RUN: Lazy<Job> = Lazy::new(|| preset("VeryLongRun", RunMode::very_long()));
static LEGACY_JIT_X86: Lazy<Job> =
    Lazy::new(|| preset("LegacyJitX86", EnvironmentMode::legacy_jit_x86()));
static LEGACY_JIT_X64: Lazy<Job> =
    Lazy::new(|| preset("LegacyJitX64", EnvironmentMode::legacy_jit_x64()));
static RYU_JIT_X86: Lazy<Job> = Lazy::new(|| preset("RyuJitX86", EnvironmentMode::ryu_jit_x86()));
static RYU_JIT_X64: Lazy<Job> = Lazy::new(|| preset("RyuJitX64", EnvironmentMode::ryu_jit_x64()));
static IN_PROCESS: Lazy<Job> =
    Lazy::new(|| preset("InProcess", InfrastructureMode::in_process()));

/// Presets
impl Job {
    /// The default job, id `Default`
    #[must_use]
    pub fn default_job() -> &'static Self {
        &DEFAULT_JOB
    }

    /// Single cold-start iteration
    #[must_use]
    pub fn dry() -> &'static Self {
        &DRY
    }

    /// Short run mode
    #[must_use]
    pub fn short_run() -> &'static Self {
        &SHORT_RUN
    }

    /// Medium run mode
    #[must_use]
    pub fn medium_run() -> &'static Self {
        &MEDIUM_RUN
    }

    /// Long run mode
    #[must_use]
    pub fn long_run() -> &'static Self {
        &LONG_RUN
    }

    /// Very long run mode
    #[must_use]
    pub fn very_long_run() -> &'static Self {
        &VERY_LONG_RUN
    }

    /// Legacy backend on x86
    #[must_use]
    pub fn legacy_jit_x86() -> &'static Self {
        &LEGACY_JIT_X86
    }

    /// Legacy backend on x64
    #[must_use]
    pub fn legacy_jit_x64() -> &'static Self {
        &LEGACY_JIT_X64
    }

    /// Optimizing backend on x86
    #[must_use]
    pub fn ryu_jit_x86() -> &'static Self {
        &RYU_JIT_X86
    }

    /// Optimizing backend on x64
    #[must_use]
    pub fn ryu_jit_x64() -> &'static Self {
        &RYU_JIT_X64
    }

    /// Run inside the host process
    #[must_use]
    pub fn in_process() -> &'static Self {
        &IN_PROCESS
    }
}

impl Job {
    /// Fresh job with an explicit id
    #[must_use]
    pub fn with_id_only(id: impl Into<String>) -> Self {
        NodeBuilder::of::<Self>().id(id).build_as()
    }

    /// Fresh job with the values of `sources` applied in order
    ///
    /// Sticky values of the sources (their ids included) are not copied.
    #[must_use]
    pub fn from_nodes(id: Option<&str>, sources: &[&dyn AsConfigNode]) -> Self {
        let builder = match id {
            Some(id) => NodeBuilder::of::<Self>().id(id),
            None => NodeBuilder::of::<Self>(),
        };
        sources
            .iter()
            .fold(builder, |builder, source| builder.merge(*source))
            .build_as()
    }

    /// Stored id, if one was set
    #[must_use]
    pub fn explicit_id(&self) -> Option<String> {
        self.0
            .explicit_value(&ID)
            .and_then(|value| value.as_text().map(str::to_string))
    }

    /// Accuracy settings
    #[must_use]
    pub fn accuracy(&self) -> AccuracyMode {
        self.child(&ACCURACY)
    }

    /// Environment settings
    #[must_use]
    pub fn environment(&self) -> EnvironmentMode {
        self.child(&ENVIRONMENT)
    }

    /// Infrastructure settings
    #[must_use]
    pub fn infrastructure(&self) -> InfrastructureMode {
        self.child(&INFRASTRUCTURE)
    }

    /// Meta flags
    #[must_use]
    pub fn meta(&self) -> MetaMode {
        self.child(&META)
    }

    /// Run settings
    #[must_use]
    pub fn run(&self) -> RunMode {
        self.child(&RUN)
    }

    /// Replace the accuracy settings
    pub fn set_accuracy(&self, accuracy: AccuracyMode) -> Result<()> {
        self.set(&ACCURACY, accuracy)
    }

    /// Replace the environment settings
    pub fn set_environment(&self, environment: EnvironmentMode) -> Result<()> {
        self.set(&ENVIRONMENT, environment)
    }

    /// Replace the infrastructure settings
    pub fn set_infrastructure(&self, infrastructure: InfrastructureMode) -> Result<()> {
        self.set(&INFRASTRUCTURE, infrastructure)
    }

    /// Replace the meta flags
    pub fn set_meta(&self, meta: MetaMode) -> Result<()> {
        self.set(&META, meta)
    }

    /// Replace the run settings
    pub fn set_run(&self, run: RunMode) -> Result<()> {
        self.set(&RUN, run)
    }

    /// Id with the shared settings
    #[must_use]
    pub fn resolved_id(&self) -> String {
        self.resolved_id_with(JobsSettings::shared())
    }

    /// Explicit id, or a stable id generated from the job's values
    #[must_use]
    pub fn resolved_id_with(&self, settings: &JobsSettings) -> String {
        ids::resolved_id(self, settings)
    }

    /// Folder-safe id with the shared settings
    #[must_use]
    pub fn folder_info(&self) -> String {
        self.folder_info_with(JobsSettings::shared())
    }

    /// Resolved id with characters unsafe in paths replaced
    #[must_use]
    pub fn folder_info_with(&self, settings: &JobsSettings) -> String {
        ValuePresenter::Folder.present_value(&Value::Text(self.resolved_id_with(settings)))
    }

    /// Display string with the shared settings
    #[must_use]
    pub fn display_info(&self) -> String {
        self.display_info_with(JobsSettings::shared())
    }

    /// `ResolvedId(Name=value, ...)`, or just the resolved id when no value is set
    #[must_use]
    pub fn display_info_with(&self, settings: &JobsSettings) -> String {
        let resolved = self.resolved_id_with(settings);
        let props = SetPresenter::Display.present(&self.0);
        if props.is_empty() {
            resolved
        } else {
            format!("{resolved}({props})")
        }
    }

    /// Flatten into a bag holding the id and every leaf value
    #[must_use]
    pub fn to_set(&self) -> PropertyBag {
        JOB_TYPE
            .all_characteristics()
            .iter()
            .filter(|c| !c.is_child())
            .fold(NodeBuilder::of::<PropertyBag>(), |builder, c| {
                match self.0.explicit_value(c) {
                    Some(value) => builder.raw_value(c, value),
                    None => builder,
                }
            })
            .build_as()
    }

    /// Rebuild a job from a flattened bag
    ///
    /// Sticky values in the bag (the id and the meta flags) are restored as
    /// well; characteristics unknown to jobs are ignored.
    #[must_use]
    pub fn parse(set: &PropertyBag) -> Self {
        Self::parse_builder(set).build_as()
    }

    pub(crate) fn parse_builder(set: &PropertyBag) -> NodeBuilder {
        set.values()
            .into_iter()
            .filter(|(c, _)| c.is_sticky() && JOB_TYPE.contains(c))
            .fold(NodeBuilder::of::<Self>().merge(set), |builder, (c, value)| {
                builder.raw_value(&c, value)
            })
    }

    /// Unfrozen copy keeping every value, sticky ones included
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self::parse(&self.to_set())
    }

    /// Explicitly set presentable characteristics
    ///
    /// Engines use this to reject customizations they do not support.
    #[must_use]
    pub fn customized_characteristics(&self) -> Vec<CharacteristicRef> {
        self.0
            .characteristics_with_values()
            .into_iter()
            .filter(|c| c.is_presentable(false))
            .collect()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::LAUNCH_COUNT;
    use crate::symbols::Platform;

    #[test]
    fn default_job_preset() {
        let job = Job::default_job();
        assert!(job.is_frozen());
        assert_eq!(job.explicit_id().as_deref(), Some("Default"));
        assert_eq!(job.resolved_id(), "Default");
        assert_eq!(job.display_info(), "Default");
    }

    #[test]
    fn presets_are_built_from_modes() {
        let dry = Job::dry();
        assert!(dry.is_frozen());
        assert_eq!(dry.resolved_id(), "Dry");
        assert_eq!(dry.run().launch_count(), Some(1));
        assert!(dry.has(&LAUNCH_COUNT));

        let x64 = Job::ryu_jit_x64();
        assert_eq!(x64.environment().platform(), Some(Platform::X64));
        assert_eq!(x64.resolved_id(), "RyuJitX64");
    }

    #[test]
    fn child_values_are_visible_on_the_job() {
        let job = Job::new();
        job.run().set_launch_count(2).unwrap();
        assert_eq!(job.get(&LAUNCH_COUNT), Some(2));
        assert_eq!(job.customized_characteristics(), vec![LAUNCH_COUNT.erased()]);
    }

    #[test]
    fn display_info_lists_values_after_the_id() {
        let job = Job::with_id_only("Fast");
        job.environment().set_platform(Platform::X64).unwrap();
        assert_eq!(job.display_info(), "Fast(Platform=X64)");
        assert_eq!(job.to_string(), "Fast(Platform=X64)");
    }

    #[test]
    fn folder_info_is_path_safe() {
        let job = Job::with_id_only("a/b c");
        assert_eq!(job.folder_info(), "a_b_c");
    }
}
