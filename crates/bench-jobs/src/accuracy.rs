//! Accuracy targets and statistical post-processing

use std::time::Duration;

use bench_characteristics::{Characteristic, CharacteristicRef};
use once_cell::sync::Lazy;

use crate::symbols::OutlierMode;

config_node! {
    /// Accuracy configuration
    AccuracyMode, ACCURACY_MODE_TYPE, "AccuracyMode", declare
}

/// Stop once the confidence interval is within this share of the mean
pub static MAX_RELATIVE_ERROR: Lazy<Characteristic<f64>> =
    Lazy::new(|| Characteristic::declare("MaxRelativeError", &ACCURACY_MODE_TYPE));
/// Stop once the confidence interval is within this absolute width
pub static MAX_ABSOLUTE_ERROR: Lazy<Characteristic<Duration>> =
    Lazy::new(|| Characteristic::declare("MaxAbsoluteError", &ACCURACY_MODE_TYPE));
/// Minimum duration of one iteration
pub static MIN_ITERATION_TIME: Lazy<Characteristic<Duration>> =
    Lazy::new(|| Characteristic::declare("MinIterationTime", &ACCURACY_MODE_TYPE));
/// Minimum invocations per iteration
pub static MIN_INVOKE_COUNT: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("MinInvokeCount", &ACCURACY_MODE_TYPE));
/// Measure and subtract the harness overhead
pub static EVALUATE_OVERHEAD: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("EvaluateOverhead", &ACCURACY_MODE_TYPE));
/// Outlier removal policy
pub static OUTLIER_MODE: Lazy<Characteristic<OutlierMode>> =
    Lazy::new(|| Characteristic::declare("OutlierMode", &ACCURACY_MODE_TYPE));
/// Report variance between launches
pub static ANALYZE_LAUNCH_VARIANCE: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("AnalyzeLaunchVariance", &ACCURACY_MODE_TYPE));

fn declare() -> Vec<CharacteristicRef> {
    vec![
        MAX_RELATIVE_ERROR.erased(),
        MAX_ABSOLUTE_ERROR.erased(),
        MIN_ITERATION_TIME.erased(),
        MIN_INVOKE_COUNT.erased(),
        EVALUATE_OVERHEAD.erased(),
        OUTLIER_MODE.erased(),
        ANALYZE_LAUNCH_VARIANCE.erased(),
    ]
}

accessors! {
    AccuracyMode {
        max_relative_error, set_max_relative_error => MAX_RELATIVE_ERROR: f64;
        max_absolute_error, set_max_absolute_error => MAX_ABSOLUTE_ERROR: Duration;
        min_iteration_time, set_min_iteration_time => MIN_ITERATION_TIME: Duration;
        min_invoke_count, set_min_invoke_count => MIN_INVOKE_COUNT: i32;
        evaluate_overhead, set_evaluate_overhead => EVALUATE_OVERHEAD: bool;
        outlier_mode, set_outlier_mode => OUTLIER_MODE: OutlierMode;
        analyze_launch_variance, set_analyze_launch_variance => ANALYZE_LAUNCH_VARIANCE: bool;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_characteristics::TypedNode;

    #[test]
    fn values_present_in_display_form() {
        let accuracy = AccuracyMode::new();
        accuracy.set_max_relative_error(0.01).unwrap();
        accuracy.set_min_iteration_time(Duration::from_millis(250)).unwrap();
        accuracy.set_outlier_mode(OutlierMode::RemoveAll).unwrap();
        assert_eq!(
            accuracy.id(),
            "MaxRelativeError=0.01, MinIterationTime=250ms, OutlierMode=RemoveAll"
        );
    }
}
