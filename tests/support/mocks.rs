#![allow(dead_code)]

use async_trait::async_trait;
use muniai::readiness::{DependencyProbe, ProbeError, ProbeSuccess};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted behaviour for a [`FakeProbe`].
#[derive(Clone, Debug)]
pub enum FakeOutcome {
    /// Answers after `elapsed`, reporting exactly that duration.
    Up { elapsed: Duration, label: Option<String> },
    /// Fails immediately with the given message.
    Down(String),
    /// Never answers within any sane timeout.
    Hang,
    /// Panics inside the probe.
    Panic,
}

/// In-memory dependency probe used to drive the aggregator deterministically.
pub struct FakeProbe {
    name: String,
    outcome: FakeOutcome,
    calls: AtomicUsize,
}

impl FakeProbe {
    pub fn new(name: impl Into<String>, outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn up(name: impl Into<String>, millis: u64) -> Arc<Self> {
        Self::new(
            name,
            FakeOutcome::Up {
                elapsed: Duration::from_millis(millis),
                label: None,
            },
        )
    }

    pub fn up_labelled(name: impl Into<String>, millis: u64, label: &str) -> Arc<Self> {
        Self::new(
            name,
            FakeOutcome::Up {
                elapsed: Duration::from_millis(millis),
                label: Some(label.to_string()),
            },
        )
    }

    pub fn down(name: impl Into<String>, message: &str) -> Arc<Self> {
        Self::new(name, FakeOutcome::Down(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DependencyProbe for FakeProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> Result<ProbeSuccess, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            FakeOutcome::Up { elapsed, label } => Ok(ProbeSuccess {
                elapsed: *elapsed,
                label: label.clone(),
            }),
            FakeOutcome::Down(message) => Err(ProbeError::Unreachable(message.clone())),
            FakeOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProbeError::Unreachable("woke up".to_string()))
            }
            FakeOutcome::Panic => panic!("probe exploded"),
        }
    }
}
