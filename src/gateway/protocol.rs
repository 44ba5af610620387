use serde::{Deserialize, Serialize};
use tracing::warn;

use super::server::AppState;
use crate::nlu::{Intent, Language};
use crate::types::{TurnOutcome, TurnReply};

#[derive(Deserialize)]
struct RpcRequest {
    id: String,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Serialize)]
struct RpcResponse {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl RpcResponse {
    fn ok(id: String, result: serde_json::Value) -> String {
        Self::encode(Self {
            id,
            result: Some(result),
            error: None,
        })
    }

    fn err(id: String, error: String) -> String {
        Self::encode(Self {
            id,
            result: None,
            error: Some(error),
        })
    }

    fn encode(self) -> String {
        serde_json::to_string(&self).unwrap_or_default()
    }
}

/// Body of `POST /chat` and params of the `chat.send` RPC method.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("user_id must not be empty")]
    EmptyUserId,
}

impl ChatRequest {
    /// Reject input the dialogue core must never see.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub language: Language,
    pub intent: Option<Intent>,
    pub outcome: TurnOutcome,
}

impl From<TurnReply> for ChatResponse {
    fn from(turn: TurnReply) -> Self {
        Self {
            response: turn.reply,
            language: turn.language,
            intent: turn.intent,
            outcome: turn.outcome,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub sessions: usize,
    pub conditions: usize,
    pub topics: usize,
}

/// Validate and run one chat turn.
pub fn chat(state: &AppState, request: &ChatRequest) -> Result<ChatResponse, ValidationError> {
    if let Err(e) = request.validate() {
        warn!(user_id = %request.user_id, "rejected chat message: {e}");
        return Err(e);
    }
    let turn = state
        .controller
        .handle(request.user_id.trim(), request.message.trim());
    Ok(turn.into())
}

/// Handle an incoming JSON-RPC-style message and return the encoded reply.
pub fn handle_rpc(msg: &str, state: &AppState) -> String {
    let req: RpcRequest = match serde_json::from_str(msg) {
        Ok(r) => r,
        Err(e) => {
            warn!("malformed rpc: {e}");
            return RpcResponse::err("0".into(), format!("parse error: {e}"));
        }
    };

    match req.method.as_str() {
        "ping" => RpcResponse::ok(req.id, serde_json::json!("pong")),

        "status" => RpcResponse::ok(req.id, serde_json::json!(state.status())),

        "chat.send" => {
            let params: ChatRequest = match serde_json::from_value(req.params) {
                Ok(p) => p,
                Err(e) => {
                    return RpcResponse::err(req.id, format!("invalid chat.send params: {e}"));
                }
            };

            match chat(state, &params) {
                Ok(response) => RpcResponse::ok(req.id, serde_json::json!(response)),
                Err(e) => RpcResponse::err(req.id, e.to_string()),
            }
        }

        _ => RpcResponse::err(req.id, format!("unknown method: {}", req.method)),
    }
}
