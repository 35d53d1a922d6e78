#![allow(clippy::result_large_err)]

pub mod app;
pub mod app_state;
pub mod config;
pub mod connectors;
pub mod domain;
pub mod error;
pub mod logging;
pub mod readiness;
pub mod telemetry;
