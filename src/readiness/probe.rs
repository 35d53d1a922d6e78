use crate::connectors::cache;
use crate::connectors::database::Database;
use crate::error::Error;
use crate::readiness::report::DependencyCheckResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

pub const DATABASE_DEPENDENCY: &str = "database";
pub const CACHE_DEPENDENCY: &str = "redis";

const CACHE_OK_LABEL: &str = "is redis ok: True";

/// What a probe measured when its dependency answered.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeSuccess {
    pub elapsed: Duration,
    pub label: Option<String>,
}

impl ProbeSuccess {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            label: None,
        }
    }

    pub fn labelled(elapsed: Duration, label: impl Into<String>) -> Self {
        Self {
            elapsed,
            label: Some(label.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Unreachable(String),
    #[error("timeout")]
    Timeout,
}

impl From<Error> for ProbeError {
    /// Deadline failures inside a connector (a pool checkout that timed out, say)
    /// read the same as the outer probe timeout.
    fn from(err: Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unreachable(err.chain_message())
        }
    }
}

impl ProbeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Unreachable(_) => "unreachable",
            ProbeError::Timeout => "timeout",
        }
    }
}

/// One lightweight operation against one external dependency.
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn probe(&self) -> Result<ProbeSuccess, ProbeError>;
}

/// Times a `SELECT 1` on a connection borrowed from the shared pool.
pub struct DatabaseProbe {
    db: Database,
}

impl DatabaseProbe {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependencyProbe for DatabaseProbe {
    fn name(&self) -> &str {
        DATABASE_DEPENDENCY
    }

    async fn probe(&self) -> Result<ProbeSuccess, ProbeError> {
        self.db
            .round_trip()
            .await
            .map(ProbeSuccess::new)
            .map_err(ProbeError::from)
    }
}

/// Builds a fresh cache client per call and sends `PING`; the reported latency
/// covers client construction as well as the command.
pub struct CacheProbe {
    url: String,
}

impl CacheProbe {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl DependencyProbe for CacheProbe {
    fn name(&self) -> &str {
        CACHE_DEPENDENCY
    }

    async fn probe(&self) -> Result<ProbeSuccess, ProbeError> {
        let started = Instant::now();
        let reply = cache::ping(&self.url).await?;
        let elapsed = started.elapsed();

        if cache::is_pong(&reply) {
            Ok(ProbeSuccess::labelled(elapsed, CACHE_OK_LABEL))
        } else {
            Err(ProbeError::Unreachable(format!(
                "unexpected PING reply `{reply}`"
            )))
        }
    }
}

/// Runs `probe` on its own task under `limit`, folding every failure (including a
/// panicking probe) into an error result.
pub async fn run_probe(
    probe: &Arc<dyn DependencyProbe>,
    limit: Duration,
) -> DependencyCheckResult {
    let name = probe.name().to_string();
    let task_probe = Arc::clone(probe);
    let mut task = tokio::spawn(async move { task_probe.probe().await });

    let outcome = match timeout(limit, &mut task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(Error::from(join_err).wrap("probe task failed").into()),
        Err(_) => {
            task.abort();
            Err(ProbeError::Timeout)
        }
    };

    match outcome {
        Ok(success) => {
            let result = match success.label {
                Some(label) => DependencyCheckResult::ok_labelled(success.elapsed, label),
                None => DependencyCheckResult::ok(success.elapsed),
            };
            crate::probe_event!(
                debug,
                "probe_ok",
                dependency = name.as_str(),
                latency_ms = result.latency_ms().unwrap_or_default(),
            );
            result
        }
        Err(err) => {
            crate::probe_event!(
                warn,
                "probe_failed",
                dependency = name.as_str(),
                kind = err.kind(),
                error = err,
            );
            DependencyCheckResult::error(err.to_string())
        }
    }
}
