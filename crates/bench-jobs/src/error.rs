//! Error types for job composition

use bench_characteristics::CharacteristicError;

/// Errors raised while building, mutating or comparing jobs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobError {
    /// Failure of the underlying node operation
    #[error(transparent)]
    Characteristic(#[from] CharacteristicError),

    /// Settings document could not be read or written
    #[error("invalid jobs settings: {0}")]
    InvalidSettings(String),

    /// Mutator already overrides the characteristic
    #[error("mutator {mutator} already overrides {characteristic}")]
    DuplicateMutatorOverride {
        /// Mutator id
        mutator: String,
        /// Full name of the characteristic
        characteristic: String,
    },

    /// Sticky characteristics are never propagated, so they cannot be overridden
    #[error("sticky characteristic {0} cannot be overridden")]
    StickyOverride(String),

    /// Package is already referenced by the job
    #[error("package {0} is already referenced")]
    DuplicatePackageReference(String),

    /// Overrides take leaf characteristics only
    #[error("{0} is not a leaf characteristic")]
    NotALeaf(String),
}

impl JobError {
    /// Check if the error comes from a frozen node
    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Characteristic(inner) if inner.is_frozen())
    }
}

/// Result alias for job operations
pub type JobResult<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristic_errors_are_transparent() {
        let inner = CharacteristicError::frozen("Job(Dry)");
        let error = JobError::from(inner.clone());
        assert_eq!(error.to_string(), inner.to_string());
        assert!(error.is_frozen());
    }

    #[test]
    fn duplicate_override_message() {
        let error = JobError::DuplicateMutatorOverride {
            mutator: "Fast".to_string(),
            characteristic: "RunMode.LaunchCount".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "mutator Fast already overrides RunMode.LaunchCount"
        );
        assert!(!error.is_frozen());
    }
}
