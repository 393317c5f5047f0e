// src/llm/error.rs

use crate::llm::provider::ProviderKind;

/// Failure modes of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing credentials or client; logged at warn, never retried.
    #[error("provider not configured: missing {0}")]
    NotConfigured(&'static str),

    /// Upstream signalled a rate limit. The OpenAI adapter retries this once
    /// after a fixed delay; everywhere else it triggers fallback.
    #[error("rate limited by upstream")]
    RateLimited,

    #[error("upstream API error {status}: {body}")]
    Api { status: u16, body: String },

    /// An empty or whitespace-only answer counts as a failure, never as a
    /// successful empty result.
    #[error("upstream returned an empty answer")]
    EmptyAnswer,

    #[error("upstream returned an invalid payload: {0}")]
    InvalidPayload(String),

    /// Health probe reported something other than "healthy".
    #[error("health probe reported status {0:?}")]
    Unhealthy(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Raised only when the whole fallback plan is exhausted.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "{primary_kind:?} failed ({primary_error}); fallback {fallback_kind:?} failed ({fallback_error})"
    )]
    AllProvidersFailed {
        primary_kind: ProviderKind,
        primary_error: ProviderError,
        fallback_kind: ProviderKind,
        fallback_error: ProviderError,
    },
}
