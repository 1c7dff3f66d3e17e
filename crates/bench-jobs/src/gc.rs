//! Garbage collector settings of the benchmark process

use bench_characteristics::{Characteristic, CharacteristicRef};
use once_cell::sync::Lazy;

config_node! {
    /// Garbage collector configuration
    GcMode, GC_MODE_TYPE, "GcMode", declare
}

/// Allow arrays larger than 2 GB
pub static ALLOW_VERY_LARGE_OBJECTS: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("AllowVeryLargeObjects", &GC_MODE_TYPE));
/// Background collections
pub static CONCURRENT: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("Concurrent", &GC_MODE_TYPE));
/// Spread collector threads across CPU groups
pub static CPU_GROUPS: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("CpuGroups", &GC_MODE_TYPE));
/// Force a full collection between iterations
pub static FORCE: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("Force", &GC_MODE_TYPE));
/// Affinitize collector heaps to processors
pub static HEAP_AFFINITIZE_MASK: Lazy<Characteristic<i64>> =
    Lazy::new(|| Characteristic::declare("HeapAffinitizeMask", &GC_MODE_TYPE));
/// Number of collector heaps
pub static HEAP_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("HeapCount", &GC_MODE_TYPE));
/// Do not affinitize collector threads
pub static NO_AFFINITIZE: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("NoAffinitize", &GC_MODE_TYPE));
/// Keep released segments on a standby list
pub static RETAIN_VM: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("RetainVm", &GC_MODE_TYPE));
/// Server flavour of the collector
pub static SERVER: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("Server", &GC_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        ALLOW_VERY_LARGE_OBJECTS.erased(),
        CONCURRENT.erased(),
        CPU_GROUPS.erased(),
        FORCE.erased(),
        HEAP_AFFINITIZE_MASK.erased(),
        HEAP_COUNT.erased(),
        NO_AFFINITIZE.erased(),
        RETAIN_VM.erased(),
        SERVER.erased(),
    ]
}

accessors! {
    GcMode {
        allow_very_large_objects, set_allow_very_large_objects => ALLOW_VERY_LARGE_OBJECTS: bool;
        concurrent, set_concurrent => CONCURRENT: bool;
        cpu_groups, set_cpu_groups => CPU_GROUPS: bool;
        force, set_force => FORCE: bool;
        heap_affinitize_mask, set_heap_affinitize_mask => HEAP_AFFINITIZE_MASK: i64;
        heap_count, set_heap_count => HEAP_COUNT: i32;
        no_affinitize, set_no_affinitize => NO_AFFINITIZE: bool;
        retain_vm, set_retain_vm => RETAIN_VM: bool;
        server, set_server => SERVER: bool;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_characteristics::TypedNode;

    #[test]
    fn declares_nine_leaves_and_id() {
        assert_eq!(GC_MODE_TYPE.declared_characteristics().len(), 10);
        assert!(GC_MODE_TYPE
            .declared_characteristics()
            .iter()
            .all(|c| !c.is_child()));
    }

    #[test]
    fn accessors_read_and_write() {
        let gc = GcMode::new();
        assert_eq!(gc.server(), None);
        gc.set_server(true).unwrap();
        gc.set_heap_count(4).unwrap();
        assert_eq!(gc.server(), Some(true));
        assert_eq!(gc.heap_count(), Some(4));
        assert_eq!(gc.id(), "HeapCount=4, Server=True");
    }

    #[test]
    fn default_preset_is_frozen() {
        assert!(GcMode::default_preset().is_frozen());
        assert!(GcMode::default_preset().set_server(true).is_err());
    }
}
