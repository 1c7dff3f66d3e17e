//! Execution environment of the benchmark process
//!
//! Platform, code generator, runtime, processor affinity, environment
//! variables and the nested garbage collector settings.

use bench_characteristics::{Characteristic, CharacteristicRef, NodeBuilder, Result, TypedNode};
use once_cell::sync::Lazy;

use crate::gc::GcMode;
use crate::symbols::{EnvironmentVariable, Jit, Platform};

config_node! {
    /// Environment configuration
    EnvironmentMode, ENVIRONMENT_MODE_TYPE, "EnvironmentMode", declare
}

/// Processor affinity mask
pub static AFFINITY: Lazy<Characteristic<i64>> =
    Lazy::new(|| Characteristic::declare("Affinity", &ENVIRONMENT_MODE_TYPE));
/// Extra environment variables
pub static ENVIRONMENT_VARIABLES: Lazy<Characteristic<Vec<EnvironmentVariable>>> =
    Lazy::new(|| Characteristic::declare("EnvironmentVariables", &ENVIRONMENT_MODE_TYPE));
/// Code generator backend
pub static JIT: Lazy<Characteristic<Jit>> =
    Lazy::new(|| Characteristic::declare("Jit", &ENVIRONMENT_MODE_TYPE));
/// Target architecture, `AnyCpu` when unset
pub static PLATFORM: Lazy<Characteristic<Platform>> = Lazy::new(|| {
    Characteristic::with_fallback("Platform", &ENVIRONMENT_MODE_TYPE, Platform::AnyCpu)
});
/// Power plan to activate while running
pub static POWER_PLAN_MODE: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("PowerPlanMode", &ENVIRONMENT_MODE_TYPE));
/// Runtime label
pub static RUNTIME: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("Runtime", &ENVIRONMENT_MODE_TYPE));
/// Garbage collector settings
pub static GC: Lazy<Characteristic<GcMode>> =
    Lazy::new(|| Characteristic::declare("Gc", &ENVIRONMENT_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        AFFINITY.erased(),
        ENVIRONMENT_VARIABLES.erased(),
        JIT.erased(),
        PLATFORM.erased(),
        POWER_PLAN_MODE.erased(),
        RUNTIME.erased(),
        GC.erased(),
    ]
}

accessors! {
    EnvironmentMode {
        affinity, set_affinity => AFFINITY: i64;
        environment_variables, set_environment_variables => ENVIRONMENT_VARIABLES: Vec<EnvironmentVariable>;
        jit, set_jit => JIT: Jit;
        platform, set_platform => PLATFORM: Platform;
        power_plan_mode, set_power_plan_mode => POWER_PLAN_MODE: String;
        runtime, set_runtime => RUNTIME: String;
    }
}

fn preset(id: &str, jit: Jit, platform: Platform) -> EnvironmentMode {
    NodeBuilder::of::<EnvironmentMode>()
        .id(id)
        .value(&JIT, jit)
        .value(&PLATFORM, platform)
        .freeze_as()
}

static LEGACY_JIT_X86: Lazy<EnvironmentMode> =
    Lazy::new(|| preset("LegacyJitX86", Jit::LegacyJit, Platform::X86));
static LEGACY_JIT_X64: Lazy<EnvironmentMode> =
    Lazy::new(|| preset("LegacyJitX64", Jit::LegacyJit, Platform::X64));
static RYU_JIT_X86: Lazy<EnvironmentMode> =
    Lazy::new(|| preset("RyuJitX86", Jit::RyuJit, Platform::X86));
static RYU_JIT_X64: Lazy<EnvironmentMode> =
    Lazy::new(|| preset("RyuJitX64", Jit::RyuJit, Platform::X64));

impl EnvironmentMode {
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

    /// Garbage collector settings
    #[must_use]
    pub fn gc(&self) -> GcMode {
        self.child(&GC)
    }

    /// Attach `gc` in place of the current collector settings
    pub fn set_gc(&self, gc: GcMode) -> Result<()> {
        self.set(&GC, gc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::SERVER;

    #[test]
    fn platform_falls_back_to_any_cpu() {
        let env = EnvironmentMode::new();
        assert_eq!(env.platform(), Some(Platform::AnyCpu));
        assert!(!env.has(&PLATFORM));
    }

    #[test]
    fn presets_carry_id_and_values() {
        let preset = EnvironmentMode::ryu_jit_x64();
        assert!(preset.is_frozen());
        assert_eq!(preset.id(), "RyuJitX64");
        assert_eq!(preset.jit(), Some(Jit::RyuJit));
        assert_eq!(preset.platform(), Some(Platform::X64));
    }

    #[test]
    fn gc_is_part_of_the_environment_store() {
        let env = EnvironmentMode::new();
        env.gc().set_server(true).unwrap();
        assert!(env.has(&SERVER));
        assert_eq!(env.id(), "Server=True");
    }

    #[test]
    fn replacing_gc_detaches_previous() {
        let env = EnvironmentMode::new();
        let previous = env.gc();
        previous.set_force(false).unwrap();
        let replacement = GcMode::new();
        replacement.set_concurrent(false).unwrap();
        env.set_gc(replacement).unwrap();
        assert_eq!(env.gc().concurrent(), Some(false));
        assert_eq!(env.gc().force(), None);
        assert_eq!(previous.force(), Some(false));
    }
}
