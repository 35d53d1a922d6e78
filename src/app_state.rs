use crate::config::Settings;
use crate::readiness::ReadinessAggregator;
use std::sync::Arc;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub readiness: ReadinessAggregator,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, readiness: ReadinessAggregator) -> Self {
        Self {
            settings,
            readiness,
        }
    }
}
