use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key lookup used to build the config. `Config::from_env` reads the process
/// environment; tests pass a map instead.
trait Source {
    fn get(&self, key: &str) -> Option<String>;

    fn opt(&self, key: &str) -> Option<String> {
        self.get(key).filter(|s| !s.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn u16_or(&self, key: &str, default: u16) -> u16 {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }
}

impl<F> Source for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_source(&|key: &str| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_source(&lookup)
    }

    fn from_source(src: &impl Source) -> Self {
        Self {
            server: ServerConfig::from_source(src),
            database: DatabaseConfig::from_source(src),
            generation: GenerationConfig::from_source(src),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!("  database:    {}", self.database.describe());
        tracing::info!(
            "  generation:  model={}, configured={}, timeout={}s",
            self.generation.model,
            self.generation.is_configured(),
            self.generation.timeout_secs
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "cors_origin": self.server.cors_origin,
                "max_upload_bytes": self.server.max_upload_bytes,
            },
            "database": {
                "backend": self.database.describe(),
                "max_connections": self.database.max_connections,
            },
            "generation": {
                "model": self.generation.model,
                "base_url": self.generation.base_url,
                "timeout_secs": self.generation.timeout_secs,
                "configured": self.generation.is_configured(),
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    fn from_source(src: &impl Source) -> Self {
        Self {
            host: src.or("HOST", "0.0.0.0"),
            port: src.u16_or("PORT", 5000),
            cors_origin: src.or("CORS_ORIGIN", "*"),
            max_upload_bytes: src.u64_or("MAX_UPLOAD_BYTES", 16 * 1024 * 1024) as usize,
        }
    }
}

// ── Database ──────────────────────────────────────────────────

/// URL scheme that selects the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Absent means no persistence (degraded mode).
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn from_source(src: &impl Source) -> Self {
        Self {
            url: src.opt("DATABASE_URL"),
            max_connections: src.u32_or("PG_MAX_CONNECTIONS", 10),
        }
    }

    pub fn is_memory(&self) -> bool {
        self.url.as_deref() == Some(MEMORY_DATABASE_URL)
    }

    /// Backend description with credentials stripped.
    pub fn describe(&self) -> String {
        match self.url.as_deref() {
            None => "none (persistence disabled)".to_string(),
            Some(MEMORY_DATABASE_URL) => "memory".to_string(),
            Some(url) => redact_url(url),
        }
    }
}

/// Drop the userinfo part of a URL: `postgres://u:p@host/db` -> `postgres://***@host/db`.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

// ── Generation (Gemini) ───────────────────────────────────────

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GenerationConfig {
    fn from_source(src: &impl Source) -> Self {
        Self {
            api_key: src.opt("GEMINI_API_KEY"),
            model: src.or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: src
                .or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: src.u64_or("GEMINI_TIMEOUT_SECS", 60),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
