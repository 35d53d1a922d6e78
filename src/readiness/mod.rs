pub mod aggregator;
pub mod probe;
pub mod report;

pub use aggregator::ReadinessAggregator;
pub use probe::{
    run_probe, CacheProbe, DatabaseProbe, DependencyProbe, ProbeError, ProbeSuccess,
    CACHE_DEPENDENCY, DATABASE_DEPENDENCY,
};
pub use report::{
    round_latency_ms, CheckStatus, DependencyCheckResult, ReadinessReport, OVERALL_ERROR_LABEL,
    OVERALL_OK_LABEL,
};
