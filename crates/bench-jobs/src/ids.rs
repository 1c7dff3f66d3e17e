//! Stable ids for jobs that were not given one
//!
//! The suffix is drawn from a generator seeded with the hash of the job's
//! display presentation, so identical jobs get identical ids in every run.

use bench_characteristics::{AsConfigNode, SetPresenter, ID};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::settings::JobsSettings;

/// Explicit id of `node`, or an id generated from its presentation
#[must_use]
pub fn resolved_id<N: AsConfigNode + ?Sized>(node: &N, settings: &JobsSettings) -> String {
    let node = node.as_config_node();
    if node.has(&ID) {
        return node.id();
    }
    generate_id(&SetPresenter::Display.present(node), settings)
}

/// Id generated from a display presentation
///
/// An empty presentation yields the configured default job name.
#[must_use]
pub fn generate_id(presentation: &str, settings: &JobsSettings) -> String {
    if presentation.is_empty() {
        return settings.default_job_name.clone();
    }
    let hash = blake3::hash(presentation.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash.as_bytes()[..8]);
    let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed));
    let suffix: String = (0..settings.id_suffix_len)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect();
    format!("{}-{suffix}", settings.unnamed_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_presentation_uses_default_name() {
        assert_eq!(generate_id("", JobsSettings::shared()), "DefaultJob");
    }

    #[test]
    fn generated_ids_are_stable() {
        let settings = JobsSettings::shared();
        let first = generate_id("LaunchCount=1", settings);
        let second = generate_id("LaunchCount=1", settings);
        assert_eq!(first, second);

        let suffix = first.strip_prefix("Unnamed-").unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|ch| ch.is_ascii_uppercase()));
    }

    #[test]
    fn settings_shape_generated_ids() {
        let settings = JobsSettings::default()
            .with_unnamed_prefix("Job")
            .with_id_suffix_len(3);
        let id = generate_id("Platform=X64", &settings);
        assert!(id.starts_with("Job-"));
        assert_eq!(id.len(), "Job-".len() + 3);
    }
}
