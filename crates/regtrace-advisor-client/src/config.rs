//! Advisor client configuration.
//!
//! Defaults point at a local Ollama-compatible generation endpoint.
//! Override via environment variables or explicit construction for tests.

use url::Url;

/// Default generation endpoint.
pub const DEFAULT_URL: &str = "http://localhost:11434/api/generate";

/// Default model name.
pub const DEFAULT_MODEL: &str = "mistral";

/// Default request timeout. Generative responses are slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Full URL of the generate endpoint.
    pub url: Url,
    /// Model name sent with every request.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AdvisorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REGTRACE_ADVISOR_URL` (default: `http://localhost:11434/api/generate`)
    /// - `REGTRACE_ADVISOR_MODEL` (default: `mistral`)
    /// - `REGTRACE_ADVISOR_TIMEOUT_SECS` (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = std::env::var("REGTRACE_ADVISOR_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = match std::env::var("REGTRACE_ADVISOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            url: env_url("REGTRACE_ADVISOR_URL", DEFAULT_URL)?,
            model,
            timeout_secs,
        })
    }

    /// Whether `REGTRACE_ADVISOR_DISABLED` asks for keyword-only resolution.
    pub fn disabled_by_env() -> bool {
        std::env::var("REGTRACE_ADVISOR_DISABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }

    /// Create a configuration pointing at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let url = Url::parse(&format!("http://127.0.0.1:{port}/api/generate"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            url,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable does not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The timeout is not a whole number of seconds.
    #[error("invalid REGTRACE_ADVISOR_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}
