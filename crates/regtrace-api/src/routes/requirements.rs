//! # Requirements API
//!
//! List and edit requirements. Edits go through the store so that every
//! change lands in the traceability log.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use regtrace_core::{Market, MarketStatus, RegulationId, Requirement, RequirementId};
use regtrace_state::RequirementEdit;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Requirement list filter.
#[derive(Debug, Default, Deserialize)]
pub struct RequirementQuery {
    /// Restrict to one regulation.
    #[serde(default)]
    pub regulation_id: Option<String>,
}

/// Requirement list.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementListResponse {
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub requirements: Vec<Requirement>,
}

/// In-place requirement edit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequirementRequest {
    #[serde(default)]
    pub text_raw: Option<String>,
    #[serde(default)]
    pub text_engineering: Option<String>,
    /// Recorded in the history entry.
    #[serde(default)]
    pub diff_summary: Option<String>,
}

impl Validate for UpdateRequirementRequest {
    fn validate(&self) -> Result<(), String> {
        if self.text_raw.is_none() && self.text_engineering.is_none() {
            return Err("at least one of text_raw or text_engineering is required".to_string());
        }
        if self.text_raw.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("text_raw must not be blank".to_string());
        }
        Ok(())
    }
}

/// Market verdict to record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarketStatusRequest {
    /// One of `OK`, `NOK`, `NA`, `UNSET` (case-insensitive).
    pub status: String,
}

impl Validate for MarketStatusRequest {
    fn validate(&self) -> Result<(), String> {
        self.status
            .parse::<MarketStatus>()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Outcome of a market verdict change.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarketStatusResponse {
    #[schema(value_type = String)]
    pub requirement_id: RequirementId,
    #[schema(value_type = String)]
    pub market: Market,
    #[schema(value_type = String)]
    pub previous: MarketStatus,
    #[schema(value_type = String)]
    pub status: MarketStatus,
}

/// Build the requirements router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/requirements", get(list_requirements))
        .route(
            "/v1/requirements/:id",
            get(get_requirement).put(update_requirement),
        )
        .route("/v1/requirements/:id/markets/:market", put(set_market_status))
}

/// GET /v1/requirements — List requirements.
#[utoipa::path(
    get,
    path = "/v1/requirements",
    params(("regulation_id" = Option<String>, Query, description = "Restrict to one regulation")),
    responses(
        (status = 200, description = "Requirements in id order", body = RequirementListResponse),
        (status = 422, description = "Invalid regulation id", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
pub(crate) async fn list_requirements(
    State(state): State<AppState>,
    Query(query): Query<RequirementQuery>,
) -> Result<Json<RequirementListResponse>, AppError> {
    let regulation_id = query.regulation_id.map(RegulationId::new).transpose()?;
    let requirements: Vec<Requirement> = state
        .store
        .read()
        .list_requirements(regulation_id.as_ref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(RequirementListResponse {
        count: requirements.len(),
        requirements,
    }))
}

/// GET /v1/requirements/{id} — Get a requirement.
#[utoipa::path(
    get,
    path = "/v1/requirements/{id}",
    params(("id" = String, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Requirement found"),
        (status = 404, description = "Requirement not found", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
pub(crate) async fn get_requirement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Requirement>, AppError> {
    let id = RequirementId::new(id)?;
    state
        .store
        .read()
        .get_requirement(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("requirement {id}")))
}

/// PUT /v1/requirements/{id} — Edit a requirement.
#[utoipa::path(
    put,
    path = "/v1/requirements/{id}",
    params(("id" = String, Path, description = "Requirement ID")),
    request_body = UpdateRequirementRequest,
    responses(
        (status = 200, description = "Requirement updated, version bumped"),
        (status = 404, description = "Requirement not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
pub(crate) async fn update_requirement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateRequirementRequest>, JsonRejection>,
) -> Result<Json<Requirement>, AppError> {
    let id = RequirementId::new(id)?;
    let req = extract_validated_json(body)?;
    let edit = RequirementEdit {
        text_raw: req.text_raw,
        text_engineering: req.text_engineering,
        diff_summary: req.diff_summary,
    };
    let updated = state.store.write().update_requirement(&id, edit)?.clone();
    Ok(Json(updated))
}

/// PUT /v1/requirements/{id}/markets/{market} — Record a market verdict.
#[utoipa::path(
    put,
    path = "/v1/requirements/{id}/markets/{market}",
    params(
        ("id" = String, Path, description = "Requirement ID"),
        ("market" = String, Path, description = "Market code"),
    ),
    request_body = MarketStatusRequest,
    responses(
        (status = 200, description = "Verdict recorded", body = MarketStatusResponse),
        (status = 404, description = "Requirement not found", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown status or market", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
pub(crate) async fn set_market_status(
    State(state): State<AppState>,
    Path((id, market)): Path<(String, String)>,
    body: Result<Json<MarketStatusRequest>, JsonRejection>,
) -> Result<Json<MarketStatusResponse>, AppError> {
    let id = RequirementId::new(id)?;
    let market = Market::new(market)?;
    let status: MarketStatus = extract_validated_json(body)?.status.parse()?;
    let previous = state
        .store
        .write()
        .set_market_status(&id, market.clone(), status)?;
    Ok(Json(MarketStatusResponse {
        requirement_id: id,
        market,
        previous,
        status,
    }))
}
