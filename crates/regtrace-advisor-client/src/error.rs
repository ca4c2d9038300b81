//! Advisor client error types.

use regtrace_impact::AdvisorOutputError;

/// Errors from calls to the generation service.
///
/// None of these reach the impact resolver: the [`ImpactAdvisor`]
/// implementation logs them and reports "no signal".
///
/// [`ImpactAdvisor`]: regtrace_impact::ImpactAdvisor
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// HTTP transport error, including timeouts.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("advisor {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response envelope did not deserialize.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The generated text held no usable impact object.
    #[error("unusable advisor output: {0}")]
    Output(#[from] AdvisorOutputError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
