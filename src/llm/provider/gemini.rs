// src/llm/provider/gemini.rs

//! Hosted-generative-chat adapter for Gemini's generateContent API.
//!
//! Rebuilds a provider-native session from the request history (our
//! `assistant` role maps to Gemini's `model`), carries the system prompt as
//! a systemInstruction, and folds retrieved context into the current turn.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Provider, ProviderKind};
use crate::llm::error::ProviderError;
use crate::llm::message::{ChatMessage, Role};
use crate::llm::GenerationRequest;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    /// Model used when the requested identifier is not a Gemini one.
    default_model: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, api_base: String, default_model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base,
            default_model,
        }
    }

    fn model_for<'a>(&'a self, requested: &'a str) -> &'a str {
        if ProviderKind::for_model(requested) == ProviderKind::Gemini {
            requested
        } else {
            &self.default_model
        }
    }

    /// History turns plus the current user turn, in Gemini's content shape.
    fn build_contents(request: &GenerationRequest) -> Vec<GeminiContent> {
        let mut contents = Vec::with_capacity(request.history.len() + 1);

        for msg in &request.history {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
                // System turns travel as systemInstruction, not history
                Role::System => continue,
            };
            contents.push(GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart { text: msg.content.clone() }],
            });
        }

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: Self::turn_text(request) }],
        });

        contents
    }

    /// Current turn text; context is folded in only when non-blank.
    fn turn_text(request: &GenerationRequest) -> String {
        match request.context.as_deref() {
            Some(ctx) if !ctx.trim().is_empty() => {
                format!("Context:\n{ctx}\n\nQuestion: {}", request.query)
            }
            _ => request.query.clone(),
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn respond(
        &self,
        request: &GenerationRequest,
        _messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("GOOGLE_API_KEY"))?;
        let model = self.model_for(&request.model);

        let api_request = GeminiRequest {
            contents: Self::build_contents(request),
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiPart { text: request.system_prompt.clone() }],
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base.trim_end_matches('/'),
            model,
            api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&api_request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let api_response: GeminiResponse = response.json().await?;
        if let Some(error) = api_response.error {
            return Err(ProviderError::InvalidPayload(error.message));
        }

        extract_answer(api_response)
    }
}

fn extract_answer(response: GeminiResponse) -> Result<String, ProviderError> {
    let mut text = String::new();
    if let Some(candidate) = response.candidates.unwrap_or_default().into_iter().next() {
        for part in candidate.content.parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
        }
    }
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyAnswer);
    }
    Ok(text)
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Clone)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Clone)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}
