use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::time::Duration;

pub const OVERALL_OK_LABEL: &str = "platform status: ok";
pub const OVERALL_ERROR_LABEL: &str = "platform status: error";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Error,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Error => "error",
        }
    }

    fn overall_label(self) -> &'static str {
        match self {
            CheckStatus::Ok => OVERALL_OK_LABEL,
            CheckStatus::Error => OVERALL_ERROR_LABEL,
        }
    }
}

/// Outcome of probing one dependency during a single readiness request.
#[derive(Clone, Debug, PartialEq)]
pub enum DependencyCheckResult {
    Ok {
        latency_ms: f64,
        /// Replaces the plain `"ok"` status label on the wire when present.
        label: Option<String>,
    },
    Error {
        message: String,
    },
}

impl DependencyCheckResult {
    pub fn ok(elapsed: Duration) -> Self {
        Self::Ok {
            latency_ms: round_latency_ms(elapsed),
            label: None,
        }
    }

    pub fn ok_labelled(elapsed: Duration, label: impl Into<String>) -> Self {
        Self::Ok {
            latency_ms: round_latency_ms(elapsed),
            label: Some(label.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "unknown error".to_string()
        } else {
            message
        };
        Self::Error { message }
    }

    pub fn status(&self) -> CheckStatus {
        match self {
            Self::Ok { .. } => CheckStatus::Ok,
            Self::Error { .. } => CheckStatus::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status() == CheckStatus::Ok
    }

    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Self::Ok { latency_ms, .. } => Some(*latency_ms),
            Self::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    pub fn status_label(&self) -> &str {
        match self {
            Self::Ok {
                label: Some(label), ..
            } => label,
            other => other.status().as_str(),
        }
    }
}

impl Serialize for DependencyCheckResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("status", self.status_label())?;
        match self {
            Self::Ok { latency_ms, .. } => map.serialize_entry("latency_ms", latency_ms)?,
            Self::Error { message } => map.serialize_entry("message", message)?,
        }
        map.end()
    }
}

/// Aggregate readiness view; `checks` keeps probe order.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadinessReport {
    overall_status: CheckStatus,
    checks: Vec<(String, DependencyCheckResult)>,
}

impl ReadinessReport {
    pub fn from_checks(checks: Vec<(String, DependencyCheckResult)>) -> Self {
        let overall_status = if checks.iter().all(|(_, result)| result.is_ok()) {
            CheckStatus::Ok
        } else {
            CheckStatus::Error
        };

        Self {
            overall_status,
            checks,
        }
    }

    pub fn overall_status(&self) -> CheckStatus {
        self.overall_status
    }

    pub fn overall_label(&self) -> &'static str {
        self.overall_status.overall_label()
    }

    pub fn checks(&self) -> &[(String, DependencyCheckResult)] {
        &self.checks
    }

    pub fn check(&self, dependency: &str) -> Option<&DependencyCheckResult> {
        self.checks
            .iter()
            .find(|(name, _)| name == dependency)
            .map(|(_, result)| result)
    }
}

impl Serialize for ReadinessReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("status", self.overall_label())?;
        map.serialize_entry("checks", &ChecksView(&self.checks))?;
        map.end()
    }
}

struct ChecksView<'a>(&'a [(String, DependencyCheckResult)]);

impl Serialize for ChecksView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// Milliseconds, rounded to two decimal places.
pub fn round_latency_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}
