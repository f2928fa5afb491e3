use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default except the Gemini key, which is optional by
/// design: without it the pipeline runs heuristics only.
#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    pub port: u16,
    pub rust_log: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model_flash: String,
    pub gemini_model_pro: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            env: env_or("APP_ENV", "dev"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            gemini_model_flash: env_or("GEMINI_MODEL_FLASH", "gemini-2.5-flash"),
            gemini_model_pro: env_or("GEMINI_MODEL_PRO", "gemini-2.5-pro"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
