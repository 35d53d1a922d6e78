use crate::app_state::AppState;
use crate::config::Settings;
use crate::connectors::{api::ApiServer, database::Database};
use crate::error::{Context, Result};
use crate::readiness::ReadinessAggregator;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MuniApp {
    state: AppState,
    db: Database,
    api: ApiServer,
    shutdown: CancellationToken,
}

impl MuniApp {
    pub async fn initialise(settings: Settings) -> Result<Self> {
        settings.validate().context("invalid settings")?;
        let settings = Arc::new(settings);

        tracing::info!(
            app = %settings.app_name,
            version = %settings.app_version,
            environment = %settings.environment,
            "starting service"
        );

        let db = Database::connect_lazy(&settings.database, settings.debug)
            .context("failed to construct database pool")?;

        if settings.is_development() {
            db.init_schema()
                .await
                .context("failed to initialise database schema")?;
            tracing::info!("database tables created");
        }

        let readiness = ReadinessAggregator::for_platform(
            db.clone(),
            settings.redis.url.clone(),
            settings.readiness.probe_timeout,
        );

        let api = ApiServer::build(&settings.server, settings.debug)
            .context("failed to construct api server")?;

        Ok(Self {
            state: AppState::new(settings, readiness),
            db,
            api,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            state,
            db,
            api,
            shutdown,
        } = self;

        let server_shutdown = shutdown.clone();
        let mut server_task = tokio::spawn(async move { api.serve(state, server_shutdown).await });

        let outcome = tokio::select! {
            res = &mut server_task => {
                tracing::warn!("api server task terminated unexpectedly");
                res.context("api server task failed").and_then(|result| result)
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                shutdown.cancel();
                match timeout(DRAIN_TIMEOUT, &mut server_task).await {
                    Ok(joined) => joined
                        .context("api server task failed")
                        .and_then(|result| result),
                    Err(_) => {
                        tracing::error!(
                            timeout_secs = DRAIN_TIMEOUT.as_secs_f64(),
                            "api server did not drain in time; aborting"
                        );
                        server_task.abort();
                        Ok(())
                    }
                }
            }
        };

        tracing::info!("shutting down");
        db.close().await;
        outcome
    }
}
