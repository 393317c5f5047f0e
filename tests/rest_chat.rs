// HTTP surface checks: the chat route never turns provider trouble into a
// 5xx, and the health/info endpoints answer the shapes callers poll for.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use readygo::llm::error::ProviderError;
use readygo::llm::provider::Provider;
use readygo::llm::translate::{TranslateBackend, Translator};
use readygo::llm::{ChatMessage, GenerationRequest, LlmService, ProviderRouter, APOLOGY_MESSAGE};
use readygo::server;

struct FixedProvider(Option<&'static str>);

#[async_trait]
impl Provider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn respond(
        &self,
        _request: &GenerationRequest,
        _messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        match self.0 {
            Some(text) => Ok(text.to_string()),
            None => Err(ProviderError::Api { status: 503, body: "down".into() }),
        }
    }
}

struct IdentityTranslate;

#[async_trait]
impl TranslateBackend for IdentityTranslate {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

fn app_with(answer: Option<&'static str>) -> axum::Router {
    let provider = Arc::new(FixedProvider(answer));
    let router = ProviderRouter::new(provider.clone(), provider.clone(), provider);
    let translator =
        Translator::new(Arc::new(IdentityTranslate), None, "gpt-3.5-turbo".into(), false);
    let service = Arc::new(LlmService::new(router, translator, "gpt-3.5-turbo".into()));
    server::app(service)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn chat_returns_the_generated_answer() {
    let app = app_with(Some("Pack your passport."));
    let payload = json!({
        "query": "What documents do I need?",
        "context": "A passport is required.",
        "translate_to_korean": false,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    assert_eq!(reply["answer"], "Pack your passport.");
}

#[tokio::test]
async fn provider_failure_is_a_200_with_the_apology() {
    let app = app_with(None);
    let payload = json!({ "query": "anything", "translate_to_korean": false });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    assert_eq!(reply["answer"], APOLOGY_MESSAGE);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let app = app_with(Some("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not:json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app_with(Some("unused"));

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn info_names_the_application() {
    let app = app_with(Some("unused"));

    let response = app
        .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    assert_eq!(reply["name"], "Ready-To-Go Travel Assistant");
    assert_eq!(reply["status"], "running");
}
