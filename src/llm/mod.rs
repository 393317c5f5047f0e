// src/llm/mod.rs

//! Answer-generation orchestration: prompt assembly, provider selection with
//! one-hop fallback, and the Korean/English translation pipeline around it.

pub mod error;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod router;
pub mod translate;

pub use message::{ChatMessage, Role};
pub use router::ProviderRouter;
pub use translate::Translator;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::AppConfig;
use provider::{GeminiProvider, OpenAiProvider, TunedServerProvider};
use translate::GoogleTranslateClient;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are Ready To Go, a friendly travel information assistant.
You specialize in providing accurate information about visa requirements, insurance, and immigration procedures.

IMPORTANT GUIDELINES:
1. NEVER mention \"based on the context\" or \"according to the provided context\"
2. Answer directly and naturally as if you know the information
3. Be conversational and helpful
4. If you have specific information, share it confidently
5. If you don't have specific information, provide general helpful advice

Remember: You are having a natural conversation with a traveler who needs help.";

/// The single outermost safety net: whatever fails, the caller sees this.
pub const APOLOGY_MESSAGE: &str = "죄송합니다. 현재 AI 서비스에 문제가 발생했습니다.";

/// Substituted before outbound translation when generation comes back blank.
pub const CANNOT_ANSWER_MESSAGE: &str =
    "I couldn't find an answer to that one. Could you rephrase your question?";

/// Everything one orchestration call needs; request-scoped, discarded after.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The (already inbound-normalized) query. Never part of `history`.
    pub query: String,
    pub context: Option<String>,
    pub history: Vec<ChatMessage>,
    pub system_prompt: String,
    pub model: String,
    pub translate_output: bool,
}

/// Opaque reference record from the retrieval collaborator. Shape is not
/// validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

pub struct LlmService {
    router: ProviderRouter,
    translator: Translator,
    default_model: String,
}

impl LlmService {
    pub fn new(router: ProviderRouter, translator: Translator, default_model: String) -> Self {
        Self { router, translator, default_model }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let openai = Arc::new(OpenAiProvider::new(
            cfg.openai_api_key.clone(),
            cfg.openai_base_url.clone(),
            cfg.openai_fallback_model.clone(),
        ));
        let gemini = Arc::new(GeminiProvider::new(
            cfg.gemini_api_key.clone(),
            cfg.gemini_base_url.clone(),
            cfg.gemini_default_model.clone(),
        ));
        let tuned = Arc::new(TunedServerProvider::new(
            cfg.gpu_server_url.clone(),
            cfg.gpu_max_tokens,
        )?);

        let router = ProviderRouter::new(openai.clone(), gemini, tuned);

        let rest = Arc::new(GoogleTranslateClient::new(cfg.translate_base_url.clone()));
        let chat = cfg.openai_api_key.is_some().then(|| openai.clone());
        let translator = Translator::new(rest, chat, cfg.translate_model.clone(), cfg.translate_strict);

        Ok(Self::new(router, translator, cfg.default_model.clone()))
    }

    /// Translate-In → Assemble → Generate → Empty-check → Translate-Out.
    ///
    /// Infallible by contract: every error ends up as the fixed apology.
    #[allow(clippy::too_many_arguments)]
    pub async fn generate_with_translation(
        &self,
        query: &str,
        context: Option<&str>,
        references: &[Reference],
        translate_to_korean: bool,
        history: &[ChatMessage],
        system_prompt: Option<&str>,
        model: Option<&str>,
    ) -> String {
        match self
            .try_generate(query, context, references, translate_to_korean, history, system_prompt, model)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "answer generation failed end to end");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn try_generate(
        &self,
        query: &str,
        context: Option<&str>,
        references: &[Reference],
        translate_to_korean: bool,
        history: &[ChatMessage],
        system_prompt: Option<&str>,
        model: Option<&str>,
    ) -> Result<String> {
        debug!(references = references.len(), "generating answer");

        let query = self.translator.query_to_english(query).await?;

        let request = GenerationRequest {
            query,
            context: context.map(str::to_string),
            history: history.to_vec(),
            system_prompt: system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT).to_string(),
            model: model.unwrap_or(&self.default_model).to_string(),
            translate_output: translate_to_korean,
        };

        let messages = prompt::build_messages(
            &request.query,
            request.context.as_deref(),
            &request.history,
            &request.system_prompt,
        );

        let answer = self.router.generate(&request, &messages).await?;

        let answer = if answer.trim().is_empty() {
            CANNOT_ANSWER_MESSAGE.to_string()
        } else {
            answer
        };

        if request.translate_output {
            Ok(self.translator.localize_answer(&answer).await)
        } else {
            Ok(answer)
        }
    }
}
