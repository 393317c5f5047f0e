// src/server/mod.rs
// Thin HTTP boundary over the orchestration core. Retrieval and persistence
// stay external; callers send already-materialized context and history.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::llm::{ChatMessage, LlmService, Reference};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_translate")]
    pub translate_to_korean: bool,
}

fn default_translate() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

pub fn app(service: Arc<LlmService>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/info", get(info))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// Provider failures never surface as 5xx; the apology answer is a 200.
async fn chat(
    State(service): State<Arc<LlmService>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let answer = service
        .generate_with_translation(
            &req.query,
            req.context.as_deref(),
            &req.references,
            req.translate_to_korean,
            &req.history,
            req.system_prompt.as_deref(),
            req.model.as_deref(),
        )
        .await;
    Json(ChatResponse { answer })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Ready-To-Go Travel Assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}
