use crate::auth::{AllowAll, Authenticator, StaticCredentials};
use crate::config::ServerConfig;
use crate::hub::HubHandle;
use crate::transport::{load_tls, ws_handler, ws_room_handler};
use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

/// How long the secure listener waits for open connections on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
}

impl AppState {
    /// Spawns the hub described by `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        let authenticator: Arc<dyn Authenticator> = match &config.auth {
            Some(auth) => Arc::new(StaticCredentials::new(&auth.username, &auth.password)),
            None => Arc::new(AllowAll),
        };

        Self {
            hub: HubHandle::spawn(config, authenticator),
        }
    }
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/ws", get(ws_handler))
        .route("/ws/{room}", get(ws_room_handler))
        .route("/health", get(health))
        .with_state(state);

    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors)
}

async fn health(State(state): State<AppState>) -> Response {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    match state.hub.stats().await {
        Ok(stats) => Json(json!({
            "status": "ok",
            "timestamp": timestamp,
            "connections": stats.connections,
            "rooms": stats.rooms,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "timestamp": timestamp,
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Binds and serves until `shutdown` resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve_on(listener, config, shutdown).await
}

/// Serves plain HTTP on `listener`, plus HTTPS when `config.tls` is set and
/// its certificates load.
pub async fn serve_on<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(&config);
    let app = build_router(state, &config);

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Signaling server listening on ws://{}/ws", addr);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }
    if config.auth.is_some() {
        info!("Client authentication is enabled");
    }

    let secure = match (&config.tls, config.tls_addr()) {
        (Some(tls), Some(secure_addr)) => load_tls(tls).await.map(|rustls| (secure_addr, rustls)),
        _ => None,
    };

    // One shutdown signal drives both listeners.
    let handle = axum_server::Handle::new();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown.await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            let _ = stop_tx.send(());
        }
    });

    let secure_app = app.clone();
    let plain = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
            .context("Server error")
    };
    let secure = async move {
        let Some((secure_addr, rustls)) = secure else {
            return Ok(());
        };
        info!("Secure signaling server listening on wss://{}/ws", secure_addr);
        axum_server::bind_rustls(secure_addr, rustls)
            .handle(handle)
            .serve(secure_app.into_make_service())
            .await
            .with_context(|| format!("HTTPS server error on {}", secure_addr))
    };

    tokio::try_join!(plain, secure)?;

    info!("Signaling server stopped");
    Ok(())
}
