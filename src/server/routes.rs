//! HTTP routes over the reactor's status snapshot

use axum::{extract::State, response::{Html, IntoResponse}, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::paths::{routes, SERVICE_NAME, VERSION};
use crate::reactor::StatusSnapshot;

#[derive(Clone)]
pub struct AppState { pub snapshot: watch::Receiver<StatusSnapshot>, pub service: String }

impl AppState {
    pub fn new(snapshot: watch::Receiver<StatusSnapshot>, service: impl Into<String>) -> Self {
        Self { snapshot, service: service.into() }
    }

    fn current(&self) -> StatusSnapshot { self.snapshot.borrow().clone() }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub current_game: u32,
    pub pending_predictions: usize,
    pub prediction_offset: u32,
    pub transfer_enabled: bool,
    pub source_channel_ok: bool,
    pub prediction_channel_ok: bool,
    pub timestamp: String,
}

pub fn create_router(snapshot: watch::Receiver<StatusSnapshot>) -> Router {
    create_router_with_name(snapshot, SERVICE_NAME)
}

pub fn create_router_with_name(snapshot: watch::Receiver<StatusSnapshot>, service: &str) -> Router {
    Router::new()
        .route(routes::INDEX, get(index))
        .route(routes::HEALTH, get(health))
        .route(routes::STATUS, get(status))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(snapshot, service))
}

async fn health() -> &'static str { "OK" }

async fn status(State(s): State<AppState>) -> Json<StatusResponse> {
    let snap = s.current();
    Json(StatusResponse {
        status: "running",
        service: s.service.clone(),
        version: VERSION,
        current_game: snap.current_game,
        pending_predictions: snap.predictions.len(),
        prediction_offset: snap.prediction_offset,
        transfer_enabled: snap.transfer_enabled,
        source_channel_ok: snap.channels.source_ok,
        prediction_channel_ok: snap.channels.prediction_ok,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn channel_badge(ok: bool) -> &'static str {
    if ok { r#"<span class="ok">✅ OK</span>"# } else { r#"<span class="warning">❌ Erreur</span>"# }
}

async fn index(State(s): State<AppState>) -> impl IntoResponse {
    let snap = s.current();
    let rows: String = snap
        .predictions
        .iter()
        .map(|p| format!("<li>#{} {} {} ({})</li>", p.target, p.suit.emoji(), p.suit.name(), p.status.code()))
        .collect();
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Bot Prédiction Baccarat</title>
<style>
body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }}
h1 {{ color: #2c3e50; }}
.status {{ background: #ecf0f1; padding: 15px; border-radius: 5px; margin: 20px 0; }}
.ok {{ color: #27ae60; }}
.warning {{ color: #e74c3c; }}
</style>
</head>
<body>
<h1>🎯 Bot Prédiction Baccarat</h1>
<div class="status">
<h3>📊 Statut</h3>
<p><strong>Jeu actuel:</strong> #{game}</p>
<p><strong>Prédictions actives:</strong> {active}</p>
<ul>{rows}</ul>
<p><strong>Offset:</strong> N+{offset}</p>
<p><strong>Canal Source:</strong> {source}</p>
<p><strong>Canal Prédiction:</strong> {prediction}</p>
</div>
<p><em>{service} v{version}</em></p>
</body>
</html>"#,
        game = snap.current_game,
        active = snap.predictions.len(),
        offset = snap.prediction_offset,
        source = channel_badge(snap.channels.source_ok),
        prediction = channel_badge(snap.channels.prediction_ok),
        service = s.service,
        version = VERSION,
    ))
}
