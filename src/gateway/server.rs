use axum::{
    Json, Router,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::protocol::{self, ChatRequest, StatusReport};
use crate::config::WellbotConfig;
use crate::dialogue::DialogueController;
use crate::knowledge::KnowledgeBase;
use crate::store::SessionStore;

pub struct AppState {
    pub controller: DialogueController,
}

impl AppState {
    /// Load the knowledge base and build a controller with fresh sessions.
    pub fn from_config(config: &WellbotConfig) -> anyhow::Result<Self> {
        let kb = KnowledgeBase::load_or_builtin(config.knowledge.path.as_deref())?;
        let controller = DialogueController::new(Arc::new(kb), SessionStore::shared())
            .with_config(&config.dialogue);
        Ok(Self { controller })
    }

    pub fn status(&self) -> StatusReport {
        let kb = self.controller.kb();
        StatusReport {
            version: env!("CARGO_PKG_VERSION"),
            sessions: self.controller.session_count(),
            conditions: kb.conditions().count(),
            topics: kb.topics().count(),
        }
    }
}

/// All gateway routes over `state`.
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/chat", post(chat))
        .route("/sessions/{user_id}", delete(reset_session))
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn run(config: WellbotConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let addr = format!("{}:{}", config.gateway.bind, config.gateway.port);
    let app = router(state, config.gateway.cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("wellbot gateway listening on {addr}");
    let is_loopback = config.gateway.bind == "127.0.0.1" || config.gateway.bind == "::1";
    if is_loopback {
        info!("bound to loopback, local access only");
    } else {
        warn!("bound to {addr}, chat is reachable from the network");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusReport> {
    Json(state.status())
}

async fn chat(State(state): State<Arc<AppState>>, Json(request): Json<ChatRequest>) -> Response {
    match protocol::chat(&state, &request) {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn reset_session(Path(user_id): Path<String>, State(state): State<Arc<AppState>>) -> StatusCode {
    let existed = state.controller.reset(&user_id);
    info!(user_id = %user_id, existed, "session reset");
    StatusCode::NO_CONTENT
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(mut socket: WebSocket, state: Arc<AppState>) {
    let hello = serde_json::json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") });
    let _ = socket.send(Message::Text(hello.to_string().into())).await;

    info!("client connected");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let reply = protocol::handle_rpc(&text, &state);
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("client disconnected");
}
