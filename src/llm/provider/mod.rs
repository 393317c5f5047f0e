//! Provider abstraction for the answer-generation backends.
//!
//! Three adapters, one capability each:
//! - OpenAI chat completions (commercial chat)
//! - Gemini generateContent (hosted generative chat)
//! - the fine-tuned GPU inference server behind an unstable tunnel
//!
//! Selection from a model identifier and the fixed one-hop fallback map both
//! live here so the router stays a plain data-driven loop.

mod gemini;
mod openai;
mod tuned;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use tuned::TunedServerProvider;

use async_trait::async_trait;

use crate::llm::error::ProviderError;
use crate::llm::message::ChatMessage;
use crate::llm::GenerationRequest;

/// Unified trait over the generation backends. Adapters are I/O-only and
/// read-only after construction; one instance serves all concurrent requests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Produce an answer for the request. `messages` is the assembled
    /// sequence from the prompt assembler; adapters that are not
    /// chat-history APIs pick what they need from `request` instead.
    async fn respond(
        &self,
        request: &GenerationRequest,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}

/// Capability tag for each backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    TunedServer,
}

impl ProviderKind {
    /// Classifies a model identifier, case-insensitive, first match wins:
    /// the Gemini family marker, then the fine-tuned marker, then OpenAI.
    pub fn for_model(model: &str) -> Self {
        let id = model.to_ascii_lowercase();
        if id.starts_with("gemini") {
            Self::Gemini
        } else if id.contains("phi") {
            Self::TunedServer
        } else {
            Self::OpenAi
        }
    }

    /// Fixed one-hop fallback map.
    pub fn fallback(self) -> Self {
        match self {
            Self::Gemini => Self::OpenAi,
            Self::TunedServer => Self::Gemini,
            Self::OpenAi => Self::Gemini,
        }
    }

    /// Per-request fallback plan: primary, then its single fallback.
    pub fn plan(model: &str) -> [Self; 2] {
        let primary = Self::for_model(model);
        [primary, primary.fallback()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_first_match_wins() {
        assert_eq!(ProviderKind::for_model("gemini-1.5-flash"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::for_model("GEMINI-PRO"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::for_model("phi-3-mini"), ProviderKind::TunedServer);
        assert_eq!(ProviderKind::for_model("travel-Phi-ft"), ProviderKind::TunedServer);
        assert_eq!(ProviderKind::for_model("gpt-3.5-turbo"), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::for_model("something-else"), ProviderKind::OpenAi);
        // Gemini marker takes precedence over the fine-tuned marker
        assert_eq!(ProviderKind::for_model("gemini-phi"), ProviderKind::Gemini);
    }

    #[test]
    fn fallback_map_is_fixed() {
        assert_eq!(ProviderKind::Gemini.fallback(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::TunedServer.fallback(), ProviderKind::Gemini);
        assert_eq!(ProviderKind::OpenAi.fallback(), ProviderKind::Gemini);
    }

    #[test]
    fn plan_is_primary_plus_one_hop() {
        assert_eq!(
            ProviderKind::plan("phi-2"),
            [ProviderKind::TunedServer, ProviderKind::Gemini]
        );
    }
}
