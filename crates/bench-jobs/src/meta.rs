//! Flags describing how a job takes part in a run set

use bench_characteristics::{Characteristic, CharacteristicRef};
use once_cell::sync::Lazy;

config_node! {
    /// Meta configuration
    MetaMode, META_MODE_TYPE, "MetaMode", declare
}

/// Job is the baseline of its comparison group
pub static BASELINE: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("Baseline", &META_MODE_TYPE));

/// Job is applied onto other jobs instead of being run; never copied by apply
pub static IS_MUTATOR: Lazy<Characteristic<bool>> = Lazy::new(|| {
    Characteristic::builder("IsMutator", &META_MODE_TYPE)
        .sticky()
        .build()
});

/// Job replaces the built-in default job; never copied by apply
pub static IS_DEFAULT: Lazy<Characteristic<bool>> = Lazy::new(|| {
    Characteristic::builder("IsDefault", &META_MODE_TYPE)
        .sticky()
        .build()
});

fn declare() -> Vec<CharacteristicRef> {
    vec![BASELINE.erased(), IS_MUTATOR.erased(), IS_DEFAULT.erased()]
}

accessors! {
    MetaMode {
        baseline, set_baseline => BASELINE: bool;
        is_mutator, set_is_mutator => IS_MUTATOR: bool;
        is_default, set_is_default => IS_DEFAULT: bool;
    }
}
