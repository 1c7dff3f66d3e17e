//! Bench Jobs
//!
//! Benchmark job configuration built on `bench-characteristics`.
//!
//! # Modes
//!
//! A [`Job`] bundles one node per concern:
//!
//! - [`AccuracyMode`]: accuracy targets and outlier handling
//! - [`EnvironmentMode`]: platform, code generator, runtime, [`GcMode`]
//! - [`InfrastructureMode`]: toolchain, clock, engine, [`DiagnoserMode`]
//! - [`MetaMode`]: baseline and mutator flags
//! - [`RunMode`]: launch, warmup and iteration counts
//!
//! # Lifecycle
//!
//! Presets such as [`Job::dry`] are frozen statics. Changes go through the
//! `with_*` helpers, which return new unfrozen jobs, or through
//! [`unfreeze_copy`](bench_characteristics::TypedNode::unfreeze_copy).
//! [`JobMutator`] applies a set of overrides onto many jobs, and the
//! [`default_resolver`] supplies values a job leaves empty.
//!
//! # Example
//!
//! ```ignore
//! use bench_jobs::prelude::*;
//!
//! let job = Job::short_run().with_platform(Platform::X64);
//! assert_eq!(
//!     job.display_info(),
//!     "ShortRun(Platform=X64, IterationCount=3, LaunchCount=1, WarmupCount=3)"
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use]
mod macros;

pub mod accuracy;
pub mod comparer;
pub mod diagnoser;
pub mod environment;
pub mod error;
pub mod extensions;
pub mod gc;
pub mod ids;
pub mod infrastructure;
pub mod job;
pub mod meta;
pub mod mutator;
pub mod resolvers;
pub mod run;
pub mod settings;
pub mod symbols;

pub use accuracy::AccuracyMode;
pub use comparer::{numeric_cmp, JobComparer};
pub use diagnoser::DiagnoserMode;
pub use environment::EnvironmentMode;
pub use error::{JobError, JobResult};
pub use gc::GcMode;
pub use infrastructure::InfrastructureMode;
pub use job::{Job, JOB_TYPE};
pub use meta::MetaMode;
pub use mutator::JobMutator;
pub use resolvers::default_resolver;
pub use run::RunMode;
pub use settings::{JobOrderPolicy, JobsSettings};
pub use symbols::{
    EnvironmentVariable, HardwareCounter, Jit, OutlierMode, Platform, RunStrategy,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::accuracy::AccuracyMode;
    pub use crate::comparer::JobComparer;
    pub use crate::diagnoser::DiagnoserMode;
    pub use crate::environment::EnvironmentMode;
    pub use crate::error::{JobError, JobResult};
    pub use crate::gc::GcMode;
    pub use crate::infrastructure::InfrastructureMode;
    pub use crate::job::Job;
    pub use crate::meta::MetaMode;
    pub use crate::mutator::JobMutator;
    pub use crate::resolvers::default_resolver;
    pub use crate::run::RunMode;
    pub use crate::settings::{JobOrderPolicy, JobsSettings};
    pub use crate::symbols::{
        EnvironmentVariable, HardwareCounter, Jit, OutlierMode, Platform, RunStrategy,
    };
    pub use bench_characteristics::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
