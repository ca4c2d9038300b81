//! # regtrace-advisor-client -- Generation service client
//!
//! Typed access to a local Ollama-compatible `/api/generate` endpoint, and
//! the [`ImpactAdvisor`] implementation built on it.
//!
//! ## Wire format
//!
//! ```text
//! POST {url}   {"model": "...", "prompt": "...", "stream": false}
//! 200          {"response": "<free-form text containing one JSON object>", ...}
//! ```
//!
//! No retries are performed here. A failed or slow call degrades to
//! keyword-only resolution once the timeout elapses.

pub mod config;
pub mod error;

pub use config::AdvisorConfig;
pub use error::AdvisorError;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use regtrace_core::Requirement;
use regtrace_impact::{build_prompt, AdvisorImpact, ImpactAdvisor};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the generation service.
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    http: reqwest::Client,
    config: AdvisorConfig,
}

impl AdvisorClient {
    /// Create a client from configuration.
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Send a prompt and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let endpoint = self.config.url.to_string();
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let resp = self
            .http
            .post(self.config.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        // Anything but 200 carries no answer, other 2xx codes included.
        if resp.status() != reqwest::StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| AdvisorError::Deserialization {
                endpoint,
                source: e,
            })?;
        Ok(parsed.response)
    }

    /// Ask the service for a requirement's impact.
    pub async fn infer(&self, requirement: &Requirement) -> Result<AdvisorImpact, AdvisorError> {
        let prompt = build_prompt(requirement);
        let text = self.generate(&prompt).await?;
        Ok(AdvisorImpact::from_response_text(&text)?)
    }
}

#[async_trait]
impl ImpactAdvisor for AdvisorClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn advise(&self, requirement: &Requirement) -> Option<AdvisorImpact> {
        match self.infer(requirement).await {
            Ok(impact) => {
                tracing::debug!(
                    requirement_id = %requirement.id,
                    model = %self.config.model,
                    empty = impact.is_empty(),
                    "advisor answered"
                );
                Some(impact)
            }
            Err(e) => {
                tracing::warn!(
                    requirement_id = %requirement.id,
                    model = %self.config.model,
                    error = %e,
                    "advisor unavailable, falling back to keyword rules"
                );
                None
            }
        }
    }
}
