// src/llm/provider/openai.rs

//! Commercial-chat adapter: OpenAI chat completions with deterministic
//! sampling. No wrappers; just reqwest and Rust.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Provider, ProviderKind};
use crate::llm::error::ProviderError;
use crate::llm::message::ChatMessage;
use crate::llm::GenerationRequest;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);
const MAX_ANSWER_TOKENS: u32 = 1000;

pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    /// Model used when the requested identifier is not an OpenAI one,
    /// i.e. when this adapter runs as somebody else's fallback.
    fallback_model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, api_base: String, fallback_model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base,
            fallback_model,
        }
    }

    fn model_for<'a>(&'a self, requested: &'a str) -> &'a str {
        if ProviderKind::for_model(requested) == ProviderKind::OpenAi {
            requested
        } else {
            &self.fallback_model
        }
    }

    /// Chat completion with the single local rate-limit retry. Shared with
    /// the translation pipeline, which reuses the same mechanism.
    pub async fn completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("OPENAI_API_KEY"))?;

        match self.complete_once(api_key, model, messages).await {
            Err(ProviderError::RateLimited) => {
                warn!(delay = ?RATE_LIMIT_DELAY, "OpenAI rate limited, retrying once");
                tokio::time::sleep(RATE_LIMIT_DELAY).await;
                self.complete_once(api_key, model, messages).await
            }
            other => other,
        }
    }

    async fn complete_once(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let payload = CompletionRequest {
            model,
            messages,
            temperature: 0.0,
            max_tokens: MAX_ANSWER_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(ProviderError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        extract_answer(parsed)
    }
}

fn extract_answer(response: CompletionResponse) -> Result<String, ProviderError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyAnswer);
    }
    Ok(text)
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn respond(
        &self,
        request: &GenerationRequest,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let model = self.model_for(&request.model);
        self.completion(model, messages).await
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
