// src/config/mod.rs
// All tunables come from the environment; a .env file is loaded when present.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // ── OpenAI (commercial chat)
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_fallback_model: String,

    // ── Gemini (hosted generative chat)
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_default_model: String,

    // ── Fine-tuned GPU inference server
    pub gpu_server_url: String,
    pub gpu_max_tokens: u32,

    // ── Generation
    pub default_model: String,

    // ── Translation
    pub translate_base_url: String,
    pub translate_model: String,
    pub translate_strict: bool,

    // ── Server
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

// Tolerates inline comments and stray whitespace in .env values.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_base_url: env_var_or(
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            openai_fallback_model: env_var_or(
                "READYGO_FALLBACK_MODEL",
                "gpt-3.5-turbo".to_string(),
            ),
            gemini_api_key: env_opt("GOOGLE_API_KEY"),
            gemini_base_url: env_var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com".to_string(),
            ),
            gemini_default_model: env_var_or(
                "READYGO_GEMINI_MODEL",
                "gemini-1.5-flash".to_string(),
            ),
            gpu_server_url: env_var_or(
                "GPU_AI_SERVER_URL",
                "http://localhost:8001".to_string(),
            ),
            gpu_max_tokens: env_var_or("GPU_AI_MAX_TOKENS", 150),
            default_model: env_var_or("READYGO_DEFAULT_MODEL", "gpt-3.5-turbo".to_string()),
            translate_base_url: env_var_or(
                "READYGO_TRANSLATE_URL",
                "https://translate.googleapis.com/translate_a/single".to_string(),
            ),
            translate_model: env_var_or("READYGO_TRANSLATE_MODEL", "gpt-3.5-turbo".to_string()),
            translate_strict: env_var_or("READYGO_TRANSLATE_STRICT", false),
            host: env_var_or("READYGO_HOST", "0.0.0.0".to_string()),
            port: env_var_or("READYGO_PORT", 8000),
            log_level: env_var_or("READYGO_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);
