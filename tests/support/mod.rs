#![allow(dead_code)]

pub mod mocks;

use muniai::readiness::{
    DependencyProbe, ReadinessAggregator, CACHE_DEPENDENCY, DATABASE_DEPENDENCY,
};
use std::sync::Arc;
use std::time::Duration;

pub const CACHE_OK_LABEL: &str = "is redis ok: True";

/// Aggregator wired like production (database, then cache) but backed by fakes.
pub fn platform_aggregator(
    database: Arc<mocks::FakeProbe>,
    cache: Arc<mocks::FakeProbe>,
    timeout: Duration,
) -> ReadinessAggregator {
    assert_eq!(database.name(), DATABASE_DEPENDENCY);
    assert_eq!(cache.name(), CACHE_DEPENDENCY);
    ReadinessAggregator::new(timeout)
        .with_probe(database)
        .with_probe(cache)
}
