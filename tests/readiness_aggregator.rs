#[path = "support/mod.rs"]
mod support;

use muniai::readiness::{
    CheckStatus, ReadinessAggregator, CACHE_DEPENDENCY, DATABASE_DEPENDENCY,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use support::mocks::{FakeOutcome, FakeProbe};
use support::{platform_aggregator, CACHE_OK_LABEL};

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn all_dependencies_up_reports_platform_ok() {
    let aggregator = platform_aggregator(
        FakeProbe::up(DATABASE_DEPENDENCY, 3),
        FakeProbe::up_labelled(CACHE_DEPENDENCY, 1, CACHE_OK_LABEL),
        TIMEOUT,
    );

    let report = aggregator.check().await;
    assert_eq!(report.overall_status(), CheckStatus::Ok);

    let body = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(
        body,
        json!({
            "status": "platform status: ok",
            "checks": {
                "database": {"status": "ok", "latency_ms": 3.0},
                "redis": {"status": "is redis ok: True", "latency_ms": 1.0},
            }
        })
    );
}

#[tokio::test]
async fn database_down_degrades_platform_but_keeps_cache_result() {
    let aggregator = platform_aggregator(
        FakeProbe::down(DATABASE_DEPENDENCY, "Connection refused (os error 111)"),
        FakeProbe::up_labelled(CACHE_DEPENDENCY, 1, CACHE_OK_LABEL),
        TIMEOUT,
    );

    let report = aggregator.check().await;
    assert_eq!(report.overall_status(), CheckStatus::Error);

    let body = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(body["status"], "platform status: error");
    assert_eq!(
        body["checks"]["database"],
        json!({"status": "error", "message": "Connection refused (os error 111)"})
    );
    assert!(body["checks"]["database"].get("latency_ms").is_none());
    assert_eq!(body["checks"]["redis"]["status"], "is redis ok: True");
}

#[tokio::test]
async fn cache_down_degrades_platform() {
    let aggregator = platform_aggregator(
        FakeProbe::up(DATABASE_DEPENDENCY, 2),
        FakeProbe::down(CACHE_DEPENDENCY, "failed to connect to redis: Connection refused"),
        TIMEOUT,
    );

    let report = aggregator.check().await;
    assert_eq!(report.overall_status(), CheckStatus::Error);

    let cache = report.check(CACHE_DEPENDENCY).expect("cache check present");
    assert_eq!(cache.status(), CheckStatus::Error);
    assert!(cache.latency_ms().is_none());
    assert!(!cache.message().unwrap_or_default().is_empty());

    let database = report.check(DATABASE_DEPENDENCY).expect("database check present");
    assert_eq!(database.latency_ms(), Some(2.0));
}

#[tokio::test]
async fn both_down_still_produces_structured_report() {
    let aggregator = platform_aggregator(
        FakeProbe::down(DATABASE_DEPENDENCY, "connection refused"),
        FakeProbe::down(CACHE_DEPENDENCY, "connection refused"),
        TIMEOUT,
    );

    let report = aggregator.check().await;
    assert_eq!(report.overall_label(), "platform status: error");

    let body = serde_json::to_value(&report).expect("serialize report");
    let checks = body["checks"].as_object().expect("checks object");
    assert_eq!(checks.len(), 2);
    for (name, check) in checks {
        assert_eq!(check["status"], "error", "{name} should be in error");
        assert!(check.get("latency_ms").is_none(), "{name} must not carry latency");
        assert!(
            check["message"].as_str().is_some_and(|m| !m.is_empty()),
            "{name} must carry a message"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn hung_dependency_times_out_without_blocking_others() {
    let cache = FakeProbe::up_labelled(CACHE_DEPENDENCY, 1, CACHE_OK_LABEL);
    let aggregator = platform_aggregator(
        FakeProbe::new(DATABASE_DEPENDENCY, FakeOutcome::Hang),
        Arc::clone(&cache),
        Duration::from_millis(250),
    );

    let report = aggregator.check().await;
    let database = report.check(DATABASE_DEPENDENCY).expect("database check");
    assert_eq!(database.message(), Some("timeout"));
    assert!(database.latency_ms().is_none());
    assert!(report.check(CACHE_DEPENDENCY).expect("cache check").is_ok());
    assert_eq!(cache.calls(), 1);
}

#[tokio::test]
async fn panicking_probe_is_contained() {
    let aggregator = platform_aggregator(
        FakeProbe::new(DATABASE_DEPENDENCY, FakeOutcome::Panic),
        FakeProbe::up_labelled(CACHE_DEPENDENCY, 1, CACHE_OK_LABEL),
        TIMEOUT,
    );

    let report = aggregator.check().await;
    let database = report.check(DATABASE_DEPENDENCY).expect("database check");
    assert_eq!(database.status(), CheckStatus::Error);
    assert!(database
        .message()
        .is_some_and(|message| message.starts_with("probe task failed")));
    assert_eq!(report.overall_status(), CheckStatus::Error);
}

#[tokio::test]
async fn checks_follow_registration_order() {
    let aggregator = platform_aggregator(
        FakeProbe::up(DATABASE_DEPENDENCY, 1),
        FakeProbe::up_labelled(CACHE_DEPENDENCY, 1, CACHE_OK_LABEL),
        TIMEOUT,
    );

    assert_eq!(
        aggregator.dependencies(),
        vec![DATABASE_DEPENDENCY, CACHE_DEPENDENCY]
    );
    let report = aggregator.check().await;
    let names: Vec<&str> = report
        .checks()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec![DATABASE_DEPENDENCY, CACHE_DEPENDENCY]);
}

#[tokio::test]
async fn repeated_checks_reprobe_and_keep_statuses_stable() {
    let database = FakeProbe::down(DATABASE_DEPENDENCY, "connection refused");
    let cache = FakeProbe::up_labelled(CACHE_DEPENDENCY, 4, CACHE_OK_LABEL);
    let aggregator = platform_aggregator(Arc::clone(&database), Arc::clone(&cache), TIMEOUT);

    let statuses = |body: &Value| {
        (
            body["status"].clone(),
            body["checks"]["database"]["status"].clone(),
            body["checks"]["redis"]["status"].clone(),
        )
    };

    let first = serde_json::to_value(aggregator.check().await).expect("first report");
    let second = serde_json::to_value(aggregator.check().await).expect("second report");
    assert_eq!(statuses(&first), statuses(&second));
    assert_eq!(database.calls(), 2);
    assert_eq!(cache.calls(), 2);
}

#[tokio::test]
async fn aggregator_without_probes_is_ready() {
    let report = ReadinessAggregator::new(TIMEOUT).check().await;
    assert_eq!(report.overall_status(), CheckStatus::Ok);
    assert!(report.checks().is_empty());
}
