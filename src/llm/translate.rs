// src/llm/translate.rs

//! Translation pipeline, independent of the generation fallback chain.
//!
//! Inbound: the user query is normalized to English before generation, via
//! the Google-translate REST endpoint; a failure here is fatal because
//! generating on the wrong language is assumed unreliable. Outbound: the
//! answer is localized to Korean unless it already starts in Hangul; a
//! failure here is never fatal and at worst returns the untranslated text.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::llm::message::ChatMessage;
use crate::llm::provider::OpenAiProvider;

const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Codepoint-range heuristic over the head of the text, not real language
/// detection. Matches precomposed Hangul syllables only.
const HANGUL_SCAN_CHARS: usize = 50;

pub fn contains_hangul(text: &str) -> bool {
    text.chars()
        .take(HANGUL_SCAN_CHARS)
        .any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
}

/// A deterministic bilingual translation backend.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// The free Google-translate REST endpoint (`client=gtx`).
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: String) -> Self {
        Self { client: Client::new(), endpoint }
    }
}

#[async_trait]
impl TranslateBackend for GoogleTranslateClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .timeout(ENDPOINT_TIMEOUT)
            .send()
            .await
            .context("translate endpoint unreachable")?;

        if !response.status().is_success() {
            bail!("translate endpoint returned {}", response.status());
        }

        let payload: Value = response
            .json()
            .await
            .context("translate endpoint returned non-JSON")?;
        concat_segments(&payload).context("unexpected translate payload shape")
    }
}

/// The endpoint answers with nested arrays; the translated sentence is the
/// first element of each segment under the first element of the payload.
fn concat_segments(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(Value::as_str) {
            out.push_str(text);
        }
    }
    if out.trim().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Inbound + outbound normalization with its own fallback chain.
pub struct Translator {
    rest: Arc<dyn TranslateBackend>,
    chat: Option<Arc<OpenAiProvider>>,
    chat_model: String,
    /// Selects the stricter outbound chain (REST first, then chat, marked
    /// failure string when both fail) instead of the lenient
    /// return-original-on-failure path.
    strict: bool,
}

impl Translator {
    pub fn new(
        rest: Arc<dyn TranslateBackend>,
        chat: Option<Arc<OpenAiProvider>>,
        chat_model: String,
        strict: bool,
    ) -> Self {
        Self { rest, chat, chat_model, strict }
    }

    /// Unconditional inbound normalization. Errors propagate: the pipeline
    /// refuses to generate on an untranslated query.
    pub async fn query_to_english(&self, query: &str) -> Result<String> {
        self.rest
            .translate(query, "ko", "en")
            .await
            .context("inbound query translation failed")
    }

    /// Outbound localization. Skipped when the answer already starts in
    /// Hangul; never returns an error.
    pub async fn localize_answer(&self, text: &str) -> String {
        if contains_hangul(text) {
            return text.to_string();
        }
        if self.strict {
            self.localize_strict(text).await
        } else {
            self.localize_lenient(text).await
        }
    }

    async fn chat_translate(&self, text: &str) -> Option<String> {
        let chat = self.chat.as_ref()?;
        let messages = [ChatMessage::user(format!("Translate to Korean naturally: {text}"))];
        match chat.completion(&self.chat_model, &messages).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                warn!(error = %e, "chat-based answer translation failed");
                None
            }
        }
    }

    async fn localize_lenient(&self, text: &str) -> String {
        if self.chat.is_none() {
            warn!("no chat client configured for translation, returning original answer");
            return text.to_string();
        }
        self.chat_translate(text).await.unwrap_or_else(|| text.to_string())
    }

    async fn localize_strict(&self, text: &str) -> String {
        match self.rest.translate(text, "en", "ko").await {
            Ok(translated) => return translated,
            Err(e) => warn!(error = %e, "translate endpoint failed, trying chat translation"),
        }
        if let Some(translated) = self.chat_translate(text).await {
            return translated;
        }
        format!("(번역에 실패했습니다) {text}")
    }
}
