// src/llm/router.rs
// Provider selection and the single-hop fallback walk.

use std::sync::Arc;

use tracing::{error, warn};

use crate::llm::error::GenerateError;
use crate::llm::message::ChatMessage;
use crate::llm::provider::{Provider, ProviderKind};
use crate::llm::GenerationRequest;

/// Owns one long-lived adapter per backend and executes the per-request
/// fallback plan. Exactly one fallback hop; no retry loop at this layer.
pub struct ProviderRouter {
    openai: Arc<dyn Provider>,
    gemini: Arc<dyn Provider>,
    tuned: Arc<dyn Provider>,
}

impl ProviderRouter {
    pub fn new(
        openai: Arc<dyn Provider>,
        gemini: Arc<dyn Provider>,
        tuned: Arc<dyn Provider>,
    ) -> Self {
        Self { openai, gemini, tuned }
    }

    fn provider(&self, kind: ProviderKind) -> &dyn Provider {
        match kind {
            ProviderKind::OpenAi => &*self.openai,
            ProviderKind::Gemini => &*self.gemini,
            ProviderKind::TunedServer => &*self.tuned,
        }
    }

    /// Runs the primary provider for the request's model identifier, then
    /// its single fallback. Both hops receive the same assembled messages.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        messages: &[ChatMessage],
    ) -> Result<String, GenerateError> {
        let [primary, fallback] = ProviderKind::plan(&request.model);

        let primary_error = match self.provider(primary).respond(request, messages).await {
            Ok(answer) => return Ok(answer),
            Err(e) => {
                warn!(
                    provider = self.provider(primary).name(),
                    fallback = self.provider(fallback).name(),
                    error = %e,
                    "primary provider failed, trying fallback"
                );
                e
            }
        };

        match self.provider(fallback).respond(request, messages).await {
            Ok(answer) => Ok(answer),
            Err(fallback_error) => {
                error!(
                    primary = self.provider(primary).name(),
                    fallback = self.provider(fallback).name(),
                    primary_error = %primary_error,
                    fallback_error = %fallback_error,
                    "all providers failed"
                );
                Err(GenerateError::AllProvidersFailed {
                    primary_kind: primary,
                    primary_error,
                    fallback_kind: fallback,
                    fallback_error,
                })
            }
        }
    }
}
