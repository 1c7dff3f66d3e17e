//! Enumerations and small value types used by job characteristics

use std::fmt;

use bench_characteristics::{CharacteristicValue, Value, ValueKind};

symbol_enum! {
    /// Target processor architecture
    Platform {
        /// Any architecture, chosen by the host
        AnyCpu,
        /// 32-bit x86
        X86,
        /// 64-bit x86
        X64,
        /// 32-bit ARM
        Arm,
        /// 64-bit ARM
        Arm64,
        /// WebAssembly
        Wasm,
        /// IBM Z
        S390x,
        /// LoongArch 64-bit
        LoongArch64,
    }
}

impl Platform {
    /// Architecture of the running process
    #[must_use]
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "x86_64" => Self::X64,
            "arm" => Self::Arm,
            "aarch64" => Self::Arm64,
            "wasm32" => Self::Wasm,
            "s390x" => Self::S390x,
            "loongarch64" => Self::LoongArch64,
            _ => Self::AnyCpu,
        }
    }
}

symbol_enum! {
    /// Code generator backend
    Jit {
        /// Legacy backend
        LegacyJit,
        /// Current optimizing backend
        RyuJit,
        /// LLVM based backend
        Llvm,
    }
}

symbol_enum! {
    /// How the engine drives a benchmark
    RunStrategy {
        /// Many invocations per iteration, steady state
        Throughput,
        /// Single invocation per iteration, no warmup pilot
        ColdStart,
        /// Macro benchmarks with few long iterations
        Monitoring,
    }
}

symbol_enum! {
    /// Which measurements count as outliers
    OutlierMode {
        /// Keep everything
        DontRemove,
        /// Drop upper outliers
        RemoveUpper,
        /// Drop lower outliers
        RemoveLower,
        /// Drop both
        RemoveAll,
    }
}

symbol_enum! {
    /// Hardware performance counter
    HardwareCounter {
        /// Timer ticks
        Timer,
        /// Retired instructions
        InstructionRetired,
        /// Total cycles
        TotalCycles,
        /// Cache misses
        CacheMisses,
        /// Branch instructions
        BranchInstructions,
        /// Branch mispredictions
        BranchMispredictions,
        /// Last level cache references
        LlcReference,
        /// Last level cache misses
        LlcMisses,
    }
}

/// A `NAME=VALUE` environment variable for the benchmark process
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvironmentVariable {
    key: String,
    value: String,
}

impl EnvironmentVariable {
    /// Create a variable
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Variable name
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Variable value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for EnvironmentVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl CharacteristicValue for EnvironmentVariable {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let (key, value) = value.as_text()?.split_once('=')?;
        Some(Self::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_through_values() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_value(&platform.into_value()), Some(*platform));
        }
        assert_eq!(Jit::from_value(&Platform::X64.into_value()), None);
    }

    #[test]
    fn symbol_display_uses_member_name() {
        assert_eq!(RunStrategy::ColdStart.to_string(), "ColdStart");
        assert_eq!(RunStrategy::ColdStart.symbol().kind(), "RunStrategy");
    }

    #[test]
    fn environment_variable_parsing() {
        let var = EnvironmentVariable::new("RUST_MIN_STACK", "0");
        let value = var.clone().into_value();
        assert_eq!(value, Value::from("RUST_MIN_STACK=0"));
        assert_eq!(EnvironmentVariable::from_value(&value), Some(var));
        assert_eq!(EnvironmentVariable::from_value(&Value::from("no-separator")), None);
    }

    #[test]
    fn host_platform_is_known_on_common_targets() {
        if cfg!(target_arch = "x86_64") {
            assert_eq!(Platform::host(), Platform::X64);
        }
    }
}
