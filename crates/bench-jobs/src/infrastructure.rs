//! Build and execution infrastructure
//!
//! Toolchain, clock and engine factory are stored as the text ids of the
//! external collaborators that implement them.

use bench_characteristics::{Characteristic, CharacteristicRef, NodeBuilder, Result, TypedNode};
use once_cell::sync::Lazy;

use crate::diagnoser::DiagnoserMode;

config_node! {
    /// Infrastructure configuration
    InfrastructureMode, INFRASTRUCTURE_MODE_TYPE, "InfrastructureMode", declare
}

/// Toolchain id used by in-process presets
pub const IN_PROCESS_TOOLCHAIN: &str = "in-process";

/// Toolchain that builds and runs the benchmark
pub static TOOLCHAIN: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("Toolchain", &INFRASTRUCTURE_MODE_TYPE));
/// Clock used for measurements
pub static CLOCK: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("Clock", &INFRASTRUCTURE_MODE_TYPE));
/// Factory of the measurement engine
pub static ENGINE_FACTORY: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("EngineFactory", &INFRASTRUCTURE_MODE_TYPE));
/// Build profile
pub static BUILD_CONFIGURATION: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("BuildConfiguration", &INFRASTRUCTURE_MODE_TYPE));
/// Extra build or run arguments
pub static ARGUMENTS: Lazy<Characteristic<Vec<String>>> =
    Lazy::new(|| Characteristic::declare("Arguments", &INFRASTRUCTURE_MODE_TYPE));
/// Extra package references, `name@version`
pub static PACKAGE_REFERENCES: Lazy<Characteristic<Vec<String>>> =
    Lazy::new(|| Characteristic::declare("PackageReferences", &INFRASTRUCTURE_MODE_TYPE));
/// Diagnoser settings
pub static DIAGNOSER: Lazy<Characteristic<DiagnoserMode>> =
    Lazy::new(|| Characteristic::declare("Diagnoser", &INFRASTRUCTURE_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        TOOLCHAIN.erased(),
        CLOCK.erased(),
        ENGINE_FACTORY.erased(),
        BUILD_CONFIGURATION.erased(),
        ARGUMENTS.erased(),
        PACKAGE_REFERENCES.erased(),
        DIAGNOSER.erased(),
    ]
}

accessors! {
    InfrastructureMode {
        toolchain, set_toolchain => TOOLCHAIN: String;
        clock, set_clock => CLOCK: String;
        engine_factory, set_engine_factory => ENGINE_FACTORY: String;
        build_configuration, set_build_configuration => BUILD_CONFIGURATION: String;
        arguments, set_arguments => ARGUMENTS: Vec<String>;
        package_references, set_package_references => PACKAGE_REFERENCES: Vec<String>;
    }
}

static IN_PROCESS: Lazy<InfrastructureMode> = Lazy::new(|| {
    NodeBuilder::of::<InfrastructureMode>()
        .id("InProcess")
        .value(&TOOLCHAIN, IN_PROCESS_TOOLCHAIN.to_string())
        .freeze_as()
});

impl InfrastructureMode {
    /// Run benchmarks inside the host process
    #[must_use]
    pub fn in_process() -> &'static Self {
        &IN_PROCESS
    }

    /// Diagnoser settings
    #[must_use]
    pub fn diagnoser(&self) -> DiagnoserMode {
        self.child(&DIAGNOSER)
    }

    /// Attach `diagnoser` in place of the current diagnoser settings
    pub fn set_diagnoser(&self, diagnoser: DiagnoserMode) -> Result<()> {
        self.set(&DIAGNOSER, diagnoser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_process_preset() {
        let preset = InfrastructureMode::in_process();
        assert_eq!(preset.id(), "InProcess");
        assert_eq!(preset.toolchain(), Some(IN_PROCESS_TOOLCHAIN.to_string()));
        assert!(preset.is_frozen());
    }

    #[test]
    fn diagnoser_values_live_in_infrastructure_store() {
        let infra = InfrastructureMode::new();
        infra.diagnoser().set_memory_diagnoser(true).unwrap();
        assert_eq!(infra.id(), "MemoryDiagnoser=True");
    }

    #[test]
    fn list_values_present_compactly() {
        let infra = InfrastructureMode::new();
        infra
            .set_arguments(vec!["--release".to_string(), "--locked".to_string()])
            .unwrap();
        assert_eq!(infra.id(), "Arguments=--release,--locked");
    }
}
