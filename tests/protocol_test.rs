use std::sync::Arc;

use wellbot::config::WellbotConfig;
use wellbot::dialogue::DialogueController;
use wellbot::dialogue::phrases::PhrasePicker;
use wellbot::gateway::protocol::{ChatRequest, ValidationError, chat, handle_rpc};
use wellbot::gateway::server::AppState;
use wellbot::knowledge::KnowledgeBase;
use wellbot::store::SessionStore;

fn build_state() -> AppState {
    let kb = KnowledgeBase::builtin().unwrap();
    AppState {
        controller: DialogueController::new(Arc::new(kb), SessionStore::shared())
            .with_phrases(PhrasePicker::seeded(3)),
    }
}

fn rpc(state: &AppState, msg: &str) -> serde_json::Value {
    serde_json::from_str(&handle_rpc(msg, state)).unwrap()
}

#[test]
fn ping_returns_pong() {
    let state = build_state();
    let parsed = rpc(&state, r#"{"id":"1","method":"ping"}"#);
    assert_eq!(parsed["id"], "1");
    assert_eq!(parsed["result"], "pong");
    assert!(parsed.get("error").is_none());
}

#[test]
fn status_reports_counts() {
    let state = build_state();
    state.controller.handle_turn("u1", "I have a cough");

    let parsed = rpc(&state, r#"{"id":"s","method":"status"}"#);
    assert_eq!(parsed["result"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(parsed["result"]["sessions"], 1);
    assert_eq!(parsed["result"]["topics"], 9);
    assert!(parsed["result"]["conditions"].as_u64().unwrap() >= 10);
}

#[test]
fn chat_send_runs_a_turn() {
    let state = build_state();
    let parsed = rpc(
        &state,
        r#"{"id":"c1","method":"chat.send","params":{"user_id":"u1","message":"I have a headache"}}"#,
    );
    assert_eq!(parsed["id"], "c1");
    assert_eq!(parsed["result"]["language"], "en");
    assert_eq!(parsed["result"]["outcome"], "collecting_symptoms");
    assert!(parsed["result"]["intent"].is_null());
    assert!(!parsed["result"]["response"].as_str().unwrap().is_empty());

    let parsed = rpc(
        &state,
        r#"{"id":"c2","method":"chat.send","params":{"user_id":"u1","message":"and fever"}}"#,
    );
    assert_eq!(parsed["result"]["outcome"], "diagnosed");
}

#[test]
fn chat_send_rejects_empty_message() {
    let state = build_state();
    let parsed = rpc(
        &state,
        r#"{"id":"c1","method":"chat.send","params":{"user_id":"u1","message":"   "}}"#,
    );
    assert_eq!(parsed["error"], "message must not be empty");
    assert!(parsed.get("result").is_none());
    assert_eq!(state.controller.session_count(), 0);
}

#[test]
fn chat_send_rejects_missing_params() {
    let state = build_state();
    let parsed = rpc(&state, r#"{"id":"c1","method":"chat.send","params":{"user_id":"u1"}}"#);
    assert!(
        parsed["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid chat.send params")
    );
}

#[test]
fn unknown_method_is_reported() {
    let state = build_state();
    let parsed = rpc(&state, r#"{"id":"x","method":"plugin.list"}"#);
    assert_eq!(parsed["id"], "x");
    assert_eq!(parsed["error"], "unknown method: plugin.list");
}

#[test]
fn malformed_rpc_is_a_parse_error() {
    let state = build_state();
    let parsed = rpc(&state, "not json");
    assert_eq!(parsed["id"], "0");
    assert!(parsed["error"].as_str().unwrap().starts_with("parse error"));
}

#[test]
fn chat_request_validation() {
    let ok = ChatRequest {
        user_id: "u1".into(),
        message: "hello".into(),
    };
    assert_eq!(ok.validate(), Ok(()));

    let empty_user = ChatRequest {
        user_id: " ".into(),
        message: "hello".into(),
    };
    assert_eq!(empty_user.validate(), Err(ValidationError::EmptyUserId));

    let empty_message = ChatRequest {
        user_id: "u1".into(),
        message: "\n\t".into(),
    };
    assert_eq!(empty_message.validate(), Err(ValidationError::EmptyMessage));
}

#[test]
fn chat_trims_before_dispatch() {
    let state = build_state();
    let response = chat(
        &state,
        &ChatRequest {
            user_id: " u1 ".into(),
            message: "  hi  ".into(),
        },
    )
    .unwrap();
    assert_eq!(response.intent, Some(wellbot::nlu::Intent::Greet));
    assert!(state.controller.sessions().lock().unwrap().get("u1").is_some());
}

#[test]
fn state_from_default_config_uses_builtin_kb() {
    let state = AppState::from_config(&WellbotConfig::default()).unwrap();
    assert_eq!(state.status().sessions, 0);
    assert!(state.status().conditions >= 10);
}

#[test]
fn state_from_config_fails_on_missing_kb() {
    let mut config = WellbotConfig::default();
    config.knowledge.path = Some("/nonexistent/wellbot-kb.json".into());
    let err = AppState::from_config(&config).err().expect("missing kb must fail");
    assert!(err.to_string().contains("knowledge base not found"));
}
