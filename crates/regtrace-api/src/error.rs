//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps store and domain errors to HTTP status codes with a JSON body
//! carrying an error code, message, and optional details. Domain errors
//! carry a `details` object naming the violated rule and the ids involved.
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use regtrace_core::{InvariantError, ValidationError};
use regtrace_state::StoreError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// A domain value was rejected at construction (422).
    #[error("validation error: {0}")]
    Invalid(ValidationError),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A store invariant would be violated, or the store is not in a
    /// state that allows the operation (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The operation would break a store invariant (409).
    #[error("conflict: {0}")]
    Invariant(InvariantError),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::Invalid(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) | Self::Invariant(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Machine-readable details for domain errors: the rule `kind` plus
    /// the offending ids or fields.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Invalid(err) => Some(validation_details(err)),
            Self::Invariant(err) => Some(invariant_details(err)),
            _ => None,
        }
    }
}

fn validation_details(err: &ValidationError) -> serde_json::Value {
    match err {
        ValidationError::EmptyIdentifier { kind } => {
            json!({ "kind": "empty_identifier", "identifier": kind })
        }
        ValidationError::InvalidMarket => json!({ "kind": "invalid_market" }),
        ValidationError::EmptyText { field } => json!({ "kind": "empty_text", "field": field }),
        ValidationError::UnknownCriticality(value) => {
            json!({ "kind": "unknown_criticality", "value": value })
        }
        ValidationError::UnknownMarketStatus(value) => {
            json!({ "kind": "unknown_market_status", "value": value })
        }
        ValidationError::InvalidTimestamp { value, .. } => {
            json!({ "kind": "invalid_timestamp", "value": value })
        }
    }
}

fn invariant_details(err: &InvariantError) -> serde_json::Value {
    match err {
        InvariantError::DuplicateRequirement { id } => {
            json!({ "kind": "duplicate_requirement", "requirement_id": id })
        }
        InvariantError::OrphanImpact { requirement_id } => {
            json!({ "kind": "orphan_impact", "requirement_id": requirement_id })
        }
        InvariantError::DanglingRegulation {
            requirement_id,
            regulation_id,
        } => json!({
            "kind": "dangling_regulation",
            "requirement_id": requirement_id,
            "regulation_id": regulation_id,
        }),
        InvariantError::RegulationMutated { id } => {
            json!({ "kind": "regulation_mutated", "regulation_id": id })
        }
        InvariantError::InvalidTransition { id, from, to } => json!({
            "kind": "invalid_transition",
            "requirement_id": id,
            "from": from,
            "to": to,
        }),
        InvariantError::HistoryRegression { latest, attempted } => json!({
            "kind": "history_regression",
            "latest": latest,
            "attempted": attempted,
        }),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Conflict(_) | Self::Invariant(_) => {
                tracing::warn!(error = %self, "invariant violation rejected")
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

impl From<InvariantError> for AppError {
    fn from(err: InvariantError) -> Self {
        Self::Invariant(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Invariant(e) => e.into(),
            StoreError::Validation(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
            (
                AppError::Invariant(InvariantError::DuplicateRequirement { id: "x".into() }),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                AppError::Invalid(ValidationError::InvalidMarket),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn store_errors_map_to_http_classes() {
        let not_found: AppError = StoreError::NotFound {
            kind: "requirement",
            id: "REQ_EU_0001".into(),
        }
        .into();
        assert!(matches!(not_found, AppError::NotFound(_)));

        let orphan: AppError = StoreError::Invariant(InvariantError::OrphanImpact {
            requirement_id: "REQ_EU_0001".into(),
        })
        .into();
        assert!(matches!(orphan, AppError::Invariant(_)));

        let invalid: AppError = StoreError::Validation(ValidationError::InvalidMarket).into();
        assert!(matches!(invalid, AppError::Invalid(_)));
    }

    #[test]
    fn invariant_details_name_the_ids() {
        let err: AppError = InvariantError::DanglingRegulation {
            requirement_id: "REQ_EU_0001".into(),
            regulation_id: "EU-BATT-2025-V1".into(),
        }
        .into();
        let details = err.details().unwrap();
        assert_eq!(details["kind"], "dangling_regulation");
        assert_eq!(details["requirement_id"], "REQ_EU_0001");
        assert_eq!(details["regulation_id"], "EU-BATT-2025-V1");
    }

    #[test]
    fn validation_details_name_the_field() {
        let err: AppError = ValidationError::EmptyText { field: "summary" }.into();
        let details = err.details().unwrap();
        assert_eq!(details["kind"], "empty_text");
        assert_eq!(details["field"], "summary");
    }

    #[test]
    fn string_errors_carry_no_details() {
        assert!(AppError::NotFound("x".into()).details().is_none());
        assert!(AppError::Conflict("no product".into()).details().is_none());
        assert!(AppError::Internal("boom".into()).details().is_none());
    }

    #[tokio::test]
    async fn details_are_rendered_in_body() {
        let response = AppError::from(InvariantError::RegulationMutated {
            id: "EU-BATT-2025-V1".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(body["error"]["details"]["kind"], "regulation_mutated");
        assert_eq!(body["error"]["details"]["regulation_id"], "EU-BATT-2025-V1");
    }

    #[test]
    fn internal_message_is_hidden() {
        let response = AppError::Internal("advisor socket closed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
