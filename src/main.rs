use axum::{
  extract::{State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod config;
mod game;
mod protocol;
mod shared;
mod transport;

use config::ServerConfig;
use game::registry::SessionRegistry;

#[derive(Clone)]
struct AppState {
  registry: Arc<SessionRegistry>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  rooms: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env()?;
  let registry = Arc::new(SessionRegistry::new(config.rules.clone()));
  tracing::info!(
    goal = registry.rules().goal,
    snake_rate_ms = registry.rules().snake_rate.as_millis() as u64,
    public_dir = %config.public_dir.display(),
    "starting snake duel server"
  );

  let state = Arc::new(AppState { registry });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/ws", get(ws_handler))
    .fallback_service(ServeDir::new(&config.public_dir))
    .layer(cors)
    .with_state(state);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthResponse {
    ok: true,
    rooms: state.registry.room_count(),
  })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let registry = Arc::clone(&state.registry);
  ws.on_upgrade(move |socket| transport::ws_session::handle_socket(socket, registry))
}
