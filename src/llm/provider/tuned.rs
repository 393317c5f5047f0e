// src/llm/provider/tuned.rs

//! Adapter for the fine-tuned GPU inference server.
//!
//! The backend sits behind a best-effort tunnel and may be cold, so this is
//! the one adapter with a two-phase protocol: a short health probe first,
//! then the actual `/api/ask` call with a longer budget.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Provider;
use crate::llm::error::ProviderError;
use crate::llm::message::ChatMessage;
use crate::llm::GenerationRequest;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const ASK_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TunedServerProvider {
    probe_client: Client,
    ask_client: Client,
    base_url: String,
    max_tokens: u32,
}

impl TunedServerProvider {
    pub fn new(base_url: impl Into<String>, max_tokens: u32) -> Result<Self> {
        let probe_client = Client::builder().timeout(HEALTH_TIMEOUT).build()?;
        let ask_client = Client::builder()
            .timeout(ASK_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            probe_client,
            ask_client,
            base_url: base_url.into(),
            max_tokens,
        })
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let health: HealthResponse = self
            .probe_client
            .get(format!("{}/api/health", self.base_url.trim_end_matches('/')))
            .send()
            .await?
            .json()
            .await?;
        if health.status != "healthy" {
            return Err(ProviderError::Unhealthy(health.status));
        }
        Ok(())
    }
}

#[async_trait]
impl Provider for TunedServerProvider {
    fn name(&self) -> &'static str {
        "tuned-server"
    }

    async fn respond(
        &self,
        request: &GenerationRequest,
        _messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        // An unhealthy probe fails fast without touching the main endpoint.
        self.probe().await?;

        let payload = AskRequest {
            question: &request.query,
            context: request.context.as_deref().unwrap_or(""),
            max_tokens: self.max_tokens,
        };

        let response = self
            .ask_client
            .post(format!("{}/api/ask", self.base_url.trim_end_matches('/')))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let result: AskResponse = response.json().await?;
        if let Some(elapsed) = result.inference_time {
            info!(inference_time = elapsed, "GPU server answered");
        }
        extract_answer(result)
    }
}

fn extract_answer(result: AskResponse) -> Result<String, ProviderError> {
    if !result.success {
        return Err(ProviderError::InvalidPayload(
            "GPU server reported success=false".into(),
        ));
    }
    match result.answer {
        Some(answer) if !answer.trim().is_empty() => Ok(answer),
        _ => Err(ProviderError::EmptyAnswer),
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    context: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    success: bool,
    answer: Option<String>,
    inference_time: Option<f64>,
}
