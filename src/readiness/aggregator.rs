use crate::connectors::database::Database;
use crate::readiness::probe::{run_probe, CacheProbe, DatabaseProbe, DependencyProbe};
use crate::readiness::report::{CheckStatus, ReadinessReport};
use std::sync::Arc;
use std::time::Duration;

/// Probes every registered dependency and folds the results into one report.
///
/// Probes run one after another in registration order. Nothing is cached: each
/// call to [`ReadinessAggregator::check`] re-probes everything.
#[derive(Clone)]
pub struct ReadinessAggregator {
    probes: Vec<Arc<dyn DependencyProbe>>,
    probe_timeout: Duration,
}

impl ReadinessAggregator {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            probes: Vec::new(),
            probe_timeout,
        }
    }

    /// Database first, then the cache.
    pub fn for_platform(
        db: Database,
        redis_url: impl Into<String>,
        probe_timeout: Duration,
    ) -> Self {
        Self::new(probe_timeout)
            .with_probe(Arc::new(DatabaseProbe::new(db)))
            .with_probe(Arc::new(CacheProbe::new(redis_url)))
    }

    pub fn with_probe(mut self, probe: Arc<dyn DependencyProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn dependencies(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    pub async fn check(&self) -> ReadinessReport {
        let mut checks = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let result = run_probe(probe, self.probe_timeout).await;
            checks.push((probe.name().to_string(), result));
        }

        let report = ReadinessReport::from_checks(checks);
        if report.overall_status() == CheckStatus::Error {
            let failing = report
                .checks()
                .iter()
                .filter(|(_, result)| !result.is_ok())
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(",");
            tracing::warn!(failing = %failing, "readiness check reported degraded dependencies");
        }
        report
    }
}
