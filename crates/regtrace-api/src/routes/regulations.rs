//! # Regulation Catalogue API
//!
//! Register, search and inspect regulations, follow version lineage, and
//! extract requirements from a regulation's text.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use regtrace_core::{Regulation, RegulationId, RequirementId};
use regtrace_ingest::{compare_versions, VersionDiff};
use regtrace_state::RegulationFilter;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Batch of regulations to register.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRegulationsRequest {
    #[schema(value_type = Vec<Object>)]
    pub regulations: Vec<Regulation>,
}

impl Validate for RegisterRegulationsRequest {
    fn validate(&self) -> Result<(), String> {
        if self.regulations.is_empty() {
            return Err("regulations must not be empty".to_string());
        }
        Ok(())
    }
}

/// Result of a registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterRegulationsResponse {
    /// Regulations newly registered.
    pub added: usize,
    /// Regulations held after the call.
    pub total: usize,
}

/// Regulation list.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegulationListResponse {
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub regulations: Vec<Regulation>,
}

/// Version chain of a regulation.
#[derive(Debug, Serialize, ToSchema)]
pub struct LineageResponse {
    /// Newest first.
    #[schema(value_type = Vec<Object>)]
    pub chain: Vec<Regulation>,
    /// Sentence diff against the immediately previous version, if held.
    #[schema(value_type = Option<Object>)]
    pub comparison: Option<VersionDiff>,
}

/// Requirements created by an extraction.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    #[schema(value_type = String)]
    pub regulation_id: RegulationId,
    pub count: usize,
    #[schema(value_type = Vec<String>)]
    pub created: Vec<RequirementId>,
}

/// Build the regulations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/regulations",
            get(search_regulations).post(register_regulations),
        )
        .route("/v1/regulations/:id", get(get_regulation))
        .route("/v1/regulations/:id/lineage", get(get_lineage))
        .route("/v1/regulations/:id/extract", post(extract_regulation))
}

/// POST /v1/regulations — Register regulations.
#[utoipa::path(
    post,
    path = "/v1/regulations",
    request_body = RegisterRegulationsRequest,
    responses(
        (status = 201, description = "Regulations registered", body = RegisterRegulationsResponse),
        (status = 409, description = "Id already registered with different content", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "regulations"
)]
pub(crate) async fn register_regulations(
    State(state): State<AppState>,
    body: Result<Json<RegisterRegulationsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterRegulationsResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let mut store = state.store.write();
    let added = store.add_regulations(req.regulations)?;
    let total = store.list_regulations().len();
    Ok((
        StatusCode::CREATED,
        Json(RegisterRegulationsResponse { added, total }),
    ))
}

/// GET /v1/regulations — Search regulations.
#[utoipa::path(
    get,
    path = "/v1/regulations",
    params(
        ("country" = Option<String>, Query, description = "Jurisdiction, case-insensitive"),
        ("source" = Option<String>, Query, description = "Ingestion source, case-insensitive"),
        ("q" = Option<String>, Query, description = "Substring of title or text"),
    ),
    responses(
        (status = 200, description = "Matching regulations, oldest first", body = RegulationListResponse),
    ),
    tag = "regulations"
)]
pub(crate) async fn search_regulations(
    State(state): State<AppState>,
    Query(filter): Query<RegulationFilter>,
) -> Json<RegulationListResponse> {
    let regulations: Vec<Regulation> = state
        .store
        .read()
        .search_regulations(&filter)
        .into_iter()
        .cloned()
        .collect();
    Json(RegulationListResponse {
        count: regulations.len(),
        regulations,
    })
}

/// GET /v1/regulations/{id} — Get a regulation.
#[utoipa::path(
    get,
    path = "/v1/regulations/{id}",
    params(("id" = String, Path, description = "Regulation ID")),
    responses(
        (status = 200, description = "Regulation found"),
        (status = 404, description = "Regulation not found", body = crate::error::ErrorBody),
    ),
    tag = "regulations"
)]
pub(crate) async fn get_regulation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Regulation>, AppError> {
    let id = RegulationId::new(id)?;
    state
        .store
        .read()
        .get_regulation(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("regulation {id}")))
}

/// GET /v1/regulations/{id}/lineage — Version lineage and comparison.
#[utoipa::path(
    get,
    path = "/v1/regulations/{id}/lineage",
    params(("id" = String, Path, description = "Regulation ID")),
    responses(
        (status = 200, description = "Lineage, newest first", body = LineageResponse),
        (status = 404, description = "Regulation not found", body = crate::error::ErrorBody),
    ),
    tag = "regulations"
)]
pub(crate) async fn get_lineage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LineageResponse>, AppError> {
    let id = RegulationId::new(id)?;
    let store = state.store.read();
    let chain = store.version_lineage(&id)?;
    let comparison = match chain.as_slice() {
        [current, previous, ..] => Some(compare_versions(current, previous)),
        _ => None,
    };
    Ok(Json(LineageResponse {
        chain: chain.into_iter().cloned().collect(),
        comparison,
    }))
}

/// POST /v1/regulations/{id}/extract — Extract requirements.
#[utoipa::path(
    post,
    path = "/v1/regulations/{id}/extract",
    params(("id" = String, Path, description = "Regulation ID")),
    responses(
        (status = 200, description = "Requirements created; existing sentences are kept", body = ExtractResponse),
        (status = 404, description = "Regulation not found", body = crate::error::ErrorBody),
    ),
    tag = "regulations"
)]
pub(crate) async fn extract_regulation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExtractResponse>, AppError> {
    let id = RegulationId::new(id)?;
    let created = state.store.write().extract_regulation(&id)?;
    Ok(Json(ExtractResponse {
        regulation_id: id,
        count: created.len(),
        created,
    }))
}
