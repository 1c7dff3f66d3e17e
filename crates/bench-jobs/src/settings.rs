//! Settings of the job layer
//!
//! Settings are plain values handed to the operations that need them. The
//! convenience methods on [`Job`](crate::Job) use [`JobsSettings::shared`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{JobError, JobResult};

/// String ordering used when comparing presented values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrderPolicy {
    /// Plain byte-wise ordering
    #[default]
    Ordinal,
    /// Digit runs compare by numeric value, so `Job2` sorts before `Job10`
    Numeric,
}

/// Settings of the job layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsSettings {
    /// Ordering of presented values in job comparison
    pub order_policy: JobOrderPolicy,
    /// Prefix of generated ids
    pub unnamed_prefix: String,
    /// Number of letters in a generated id suffix
    pub id_suffix_len: usize,
    /// Id of unnamed jobs without any presentable value
    pub default_job_name: String,
}

impl Default for JobsSettings {
    fn default() -> Self {
        Self {
            order_policy: JobOrderPolicy::Ordinal,
            unnamed_prefix: "Unnamed".to_string(),
            id_suffix_len: 6,
            default_job_name: "DefaultJob".to_string(),
        }
    }
}

static SHARED: Lazy<JobsSettings> = Lazy::new(JobsSettings::default);

impl JobsSettings {
    /// Process-wide default settings
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Set the ordering policy
    #[must_use]
    pub fn with_order_policy(mut self, policy: JobOrderPolicy) -> Self {
        self.order_policy = policy;
        self
    }

    /// Set the generated id prefix
    #[must_use]
    pub fn with_unnamed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unnamed_prefix = prefix.into();
        self
    }

    /// Set the generated suffix length
    #[must_use]
    pub fn with_id_suffix_len(mut self, len: usize) -> Self {
        self.id_suffix_len = len;
        self
    }

    /// Set the id of empty unnamed jobs
    #[must_use]
    pub fn with_default_job_name(mut self, name: impl Into<String>) -> Self {
        self.default_job_name = name.into();
        self
    }

    /// Read settings from JSON; missing fields keep their defaults
    pub fn from_json(content: &str) -> JobResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| JobError::InvalidSettings(format!("JSON parse error: {e}")))
    }

    /// Render settings as pretty JSON
    pub fn to_json(&self) -> JobResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| JobError::InvalidSettings(format!("JSON write error: {e}")))
    }
}
