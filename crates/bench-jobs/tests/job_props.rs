//! Property tests for jobs
//!
//! Tests verify:
//! - Flattening to a bag and parsing back is lossless
//! - Copies never write through to their source
//! - Generated ids depend only on the presented values

mod common;

use bench_jobs::prelude::*;
use common::arb_job;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_parse_restores_flattened_job(job in arb_job()) {
        let set = job.to_set();
        let parsed = Job::parse(&set);
        prop_assert_eq!(parsed.to_set(), set);
        prop_assert_eq!(parsed.display_info(), job.display_info());
        prop_assert!(JobComparer::ORDINAL.equals(&parsed, &job));
    }

    #[test]
    fn prop_copies_are_independent(job in arb_job(), launches in 1..50i32) {
        let frozen = job.freeze().unwrap();
        let before = frozen.display_info();

        let copy = frozen.unfreeze_copy().unwrap();
        copy.run().set_launch_count(launches).unwrap();
        let derived = frozen.with_launch_count(launches);

        prop_assert_eq!(frozen.display_info(), before);
        prop_assert_eq!(copy.run().launch_count(), Some(launches));
        prop_assert_eq!(derived.run().launch_count(), Some(launches));
        prop_assert_eq!(derived.explicit_id(), frozen.explicit_id());
    }

    #[test]
    fn prop_generated_ids_are_stable(job in arb_job()) {
        let anonymous = job.unfreeze_copy().unwrap();
        let id = anonymous.resolved_id();
        prop_assert_eq!(&id, &anonymous.deep_clone().resolved_id());
        if anonymous.as_config_node().has_changes() {
            prop_assert!(id.starts_with("Unnamed-"));
        } else {
            prop_assert_eq!(id, "DefaultJob");
        }
    }
}
