//! Diagnosers attached to a run

use bench_characteristics::{Characteristic, CharacteristicRef};
use once_cell::sync::Lazy;

use crate::symbols::HardwareCounter;

config_node! {
    /// Diagnoser configuration
    DiagnoserMode, DIAGNOSER_MODE_TYPE, "DiagnoserMode", declare
}

/// Track allocations
pub static MEMORY_DIAGNOSER: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("MemoryDiagnoser", &DIAGNOSER_MODE_TYPE));
/// Track lock contention and thread pool work items
pub static THREADING_DIAGNOSER: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("ThreadingDiagnoser", &DIAGNOSER_MODE_TYPE));
/// Count thrown exceptions
pub static EXCEPTION_DIAGNOSER: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("ExceptionDiagnoser", &DIAGNOSER_MODE_TYPE));
/// Call depth followed by the disassembler
pub static DISASSEMBLY_MAX_DEPTH: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("DisassemblyMaxDepth", &DIAGNOSER_MODE_TYPE));
/// Hardware counters to collect
pub static HARDWARE_COUNTERS: Lazy<Characteristic<Vec<HardwareCounter>>> =
    Lazy::new(|| Characteristic::declare("HardwareCounters", &DIAGNOSER_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        MEMORY_DIAGNOSER.erased(),
        THREADING_DIAGNOSER.erased(),
        EXCEPTION_DIAGNOSER.erased(),
        DISASSEMBLY_MAX_DEPTH.erased(),
        HARDWARE_COUNTERS.erased(),
    ]
}

accessors! {
    DiagnoserMode {
        memory_diagnoser, set_memory_diagnoser => MEMORY_DIAGNOSER: bool;
        threading_diagnoser, set_threading_diagnoser => THREADING_DIAGNOSER: bool;
        exception_diagnoser, set_exception_diagnoser => EXCEPTION_DIAGNOSER: bool;
        disassembly_max_depth, set_disassembly_max_depth => DISASSEMBLY_MAX_DEPTH: i32;
        hardware_counters, set_hardware_counters => HARDWARE_COUNTERS: Vec<HardwareCounter>;
    }
}
