//! Ordering and equality of jobs
//!
//! Jobs compare characteristic by characteristic in enumeration order. A
//! missing value sorts before a present one; two present values compare by
//! their default presentation under the configured string ordering. Child
//! slots compare by presence only.

use std::cmp::Ordering;

use bench_characteristics::{AsConfigNode, CharacteristicError, ConfigNode, Result, ValuePresenter};

use crate::job::Job;
use crate::settings::{JobOrderPolicy, JobsSettings};

/// Compares jobs by their values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobComparer {
    policy: JobOrderPolicy,
}

impl JobComparer {
    /// Comparer with plain string ordering
    pub const ORDINAL: Self = Self::new(JobOrderPolicy::Ordinal);
    /// Comparer with numeric-aware string ordering
    pub const NUMERIC: Self = Self::new(JobOrderPolicy::Numeric);

    /// Comparer with the given ordering policy
    #[must_use]
    pub const fn new(policy: JobOrderPolicy) -> Self {
        Self { policy }
    }

    /// Comparer configured by `settings`
    #[must_use]
    pub fn from_settings(settings: &JobsSettings) -> Self {
        Self::new(settings.order_policy)
    }

    /// Ordering policy
    #[must_use]
    pub fn policy(&self) -> JobOrderPolicy {
        self.policy
    }

    /// Compare two jobs; jobs share one node type, so no mismatch arises
    #[must_use]
    pub fn compare(&self, x: &Job, y: &Job) -> Ordering {
        self.compare_nodes(x.as_config_node(), y.as_config_node())
            .unwrap_or(Ordering::Equal)
    }

    /// Whether two jobs hold the same values
    #[must_use]
    pub fn equals(&self, x: &Job, y: &Job) -> bool {
        self.compare(x, y) == Ordering::Equal
    }

    /// Compare two nodes of the same type
    ///
    /// Fails with [`CharacteristicError::SchemaMismatch`] when the node
    /// types differ.
    pub fn compare_nodes(&self, x: &ConfigNode, y: &ConfigNode) -> Result<Ordering> {
        if x.same_node(y) {
            return Ok(Ordering::Equal);
        }
        if x.node_type() != y.node_type() {
            return Err(CharacteristicError::SchemaMismatch {
                left: x.node_type().name().to_string(),
                right: y.node_type().name().to_string(),
            });
        }
        for c in x.node_type().all_characteristics() {
            let ordering = match (x.has(c), y.has(c)) {
                (false, false) => Ordering::Equal,
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                (true, true) if c.is_child() => Ordering::Equal,
                (true, true) => self.compare_str(
                    &ValuePresenter::Default.present(x, c),
                    &ValuePresenter::Default.present(y, c),
                ),
            };
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    fn compare_str(&self, x: &str, y: &str) -> Ordering {
        match self.policy {
            JobOrderPolicy::Ordinal => x.cmp(y),
            JobOrderPolicy::Numeric => numeric_cmp(x, y),
        }
    }
}

/// String ordering where runs of digits compare by numeric value
///
/// Leading zeros are skipped; numbers that differ only in leading zeros
/// compare equal.
#[must_use]
pub fn numeric_cmp(x: &str, y: &str) -> Ordering {
    let x: Vec<char> = x.chars().collect();
    let y: Vec<char> = y.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < x.len() && j < y.len() {
        if !x[i].is_ascii_digit() || !y[j].is_ascii_digit() {
            match x[i].cmp(&y[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    continue;
                }
                other => return other,
            }
        }

        let x_start = skip_while(&x, i, |ch| ch == '0');
        let y_start = skip_while(&y, j, |ch| ch == '0');
        let x_end = skip_while(&x, x_start, |ch| ch.is_ascii_digit());
        let y_end = skip_while(&y, y_start, |ch| ch.is_ascii_digit());

        let by_len = (x_end - x_start).cmp(&(y_end - y_start));
        if by_len != Ordering::Equal {
            return by_len;
        }
        let by_digits = x[x_start..x_end].cmp(&y[y_start..y_end]);
        if by_digits != Ordering::Equal {
            return by_digits;
        }
        if x_start - i != y_start - j {
            return Ordering::Equal;
        }
        i = x_end;
        j = y_end;
    }

    (x.len() - i).cmp(&(y.len() - j))
}

fn skip_while(chars: &[char], from: usize, pred: impl Fn(char) -> bool) -> usize {
    chars[from..]
        .iter()
        .position(|&ch| !pred(ch))
        .map_or(chars.len(), |offset| from + offset)
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        JobComparer::ORDINAL.equals(self, other)
    }
}

impl Eq for Job {}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        JobComparer::ORDINAL.compare(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ENVIRONMENT;
    use crate::run::RunMode;

    #[test]
    fn numeric_ordering() {
        assert_eq!(numeric_cmp("Job2", "Job10"), Ordering::Less);
        assert_eq!("Job2".cmp("Job10"), Ordering::Greater);
        assert_eq!(numeric_cmp("a10b", "a10c"), Ordering::Less);
        assert_eq!(numeric_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(numeric_cmp("abc", "abcd"), Ordering::Less);
        assert_eq!(numeric_cmp("", ""), Ordering::Equal);
    }

    #[test]
    fn absent_sorts_before_present() {
        let plain = Job::new();
        let counted = Job::new().with_launch_count(1);
        assert_eq!(JobComparer::ORDINAL.compare(&plain, &counted), Ordering::Less);
        assert_eq!(JobComparer::ORDINAL.compare(&counted, &plain), Ordering::Greater);
    }

    #[test]
    fn policies_differ_on_digit_runs() {
        let two = Job::new().with_iteration_count(2);
        let ten = Job::new().with_iteration_count(10);
        assert_eq!(JobComparer::ORDINAL.compare(&two, &ten), Ordering::Greater);
        assert_eq!(JobComparer::NUMERIC.compare(&two, &ten), Ordering::Less);
    }

    #[test]
    fn equal_values_mean_equal_jobs() {
        let a = Job::with_id_only("A").with_launch_count(3);
        let b = Job::with_id_only("A").with_launch_count(3);
        assert_eq!(a, b);
        assert_ne!(a, Job::with_id_only("B").with_launch_count(3));
    }

    #[test]
    fn missing_child_slot_sorts_first() {
        let full = Job::new();
        let detached = Job::new();
        detached.as_config_node().detach(&ENVIRONMENT).unwrap();
        assert_eq!(JobComparer::ORDINAL.compare(&detached, &full), Ordering::Less);
        assert_eq!(JobComparer::ORDINAL.compare(&full, &detached), Ordering::Greater);
        assert!(JobComparer::ORDINAL.equals(&full, &Job::new()));
    }

    #[test]
    fn different_node_types_are_a_schema_mismatch() {
        let err = JobComparer::ORDINAL
            .compare_nodes(Job::new().as_config_node(), RunMode::new().as_config_node())
            .unwrap_err();
        assert!(matches!(err, CharacteristicError::SchemaMismatch { .. }));
    }
}
