use std::path::PathBuf;

use anyhow::{Context, Result};

/// Loopback address used when `OLLAMA_HOST` is unset or set to the wildcard.
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_LLM_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_RESUME_PATH: &str = "./sample_resume.pdf";
pub const DEFAULT_UPLOAD_PATH: &str = "./resume.pdf";

/// Application configuration loaded from environment variables.
/// Every key has a default, so a bare environment still starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_host: String,
    pub llm_model: String,
    pub embed_model: String,
    /// Resume read by the command-line mode.
    pub resume_path: PathBuf,
    /// Where page-mode uploads are written. Overwritten on every upload.
    pub upload_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_host: normalize_ollama_host(std::env::var("OLLAMA_HOST").ok().as_deref()),
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            embed_model: env_or("EMBED_MODEL", DEFAULT_EMBED_MODEL),
            resume_path: PathBuf::from(env_or("RESUME_PATH", DEFAULT_RESUME_PATH)),
            upload_path: PathBuf::from(env_or("UPLOAD_PATH", DEFAULT_UPLOAD_PATH)),
            port: parse_port(std::env::var("PORT").ok().as_deref())?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            resume_path: PathBuf::from(DEFAULT_RESUME_PATH),
            upload_path: PathBuf::from(DEFAULT_UPLOAD_PATH),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    raw.unwrap_or("8080")
        .parse::<u16>()
        .context("PORT must be a valid port number")
}

/// Resolves the backend base URL. Unset, blank and `0.0.0.0` (a bind address,
/// not something a client can reach) all fall back to the loopback default.
pub fn normalize_ollama_host(raw: Option<&str>) -> String {
    let host = match raw.map(str::trim) {
        None | Some("") | Some("0.0.0.0") => return DEFAULT_OLLAMA_HOST.to_string(),
        Some(h) => h.trim_end_matches('/'),
    };
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
