use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::error::{Context, Result};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// HTTP surface: liveness, readiness and the service banner.
pub struct ApiServer {
    addr: SocketAddr,
    permissive_cors: bool,
}

impl ApiServer {
    pub fn build(config: &ServerConfig, permissive_cors: bool) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .with_context(|| {
                format!("invalid listen address {}:{}", config.host, config.port)
            })?;

        Ok(Self {
            addr,
            permissive_cors,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn serve(self, state: AppState, shutdown: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind api listener on {}", self.addr))?;
        self.serve_on(listener, state, shutdown).await
    }

    /// Serves on an already bound listener.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        state: AppState,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let local_addr = listener.local_addr().unwrap_or(self.addr);
        let router = router(state, self.permissive_cors);

        tracing::info!("api server listening on {}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
            })
            .await
            .context("api server exited abnormally")?;

        Ok(())
    }
}

pub fn router(state: AppState, permissive_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(live))
        .route("/ready", get(ready))
        .route("/health", get(health))
        .route("/info", get(info))
        .layer(Extension(state));

    if permissive_cors {
        router = router.layer(CorsLayer::very_permissive());
    }

    router
}

async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Always 200; dependency failures show up only in the body.
async fn ready(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let report = state.readiness.check().await;
    (StatusCode::OK, Json(report))
}

async fn info(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "name": state.settings.app_name,
            "version": state.settings.app_version,
            "status": "running",
        })),
    )
}
