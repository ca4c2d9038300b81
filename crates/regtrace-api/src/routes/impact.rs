//! # Impact API
//!
//! Trigger impact resolution for a requirement and read the current
//! impact. Resolution is the one request that may wait on the advisor;
//! advisor failures degrade to keyword rules and never surface here.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use regtrace_compliance::{impact_matrix, ImpactMatrix};
use regtrace_core::{Impact, RequirementId};
use regtrace_state::resolve_requirement;

use crate::error::AppError;
use crate::state::AppState;

/// A resolved impact with its category flags.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImpactResponse {
    #[schema(value_type = Object)]
    pub impact: Impact,
    #[schema(value_type = Object)]
    pub matrix: ImpactMatrix,
}

impl From<Impact> for ImpactResponse {
    fn from(impact: Impact) -> Self {
        Self {
            matrix: impact_matrix(&impact),
            impact,
        }
    }
}

/// Build the impact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/impact/:id", get(get_impact))
        .route("/v1/impact/:id/resolve", post(resolve_impact))
}

/// POST /v1/impact/{id}/resolve — Resolve and save an impact.
#[utoipa::path(
    post,
    path = "/v1/impact/{id}/resolve",
    params(("id" = String, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Impact resolved and saved", body = ImpactResponse),
        (status = 404, description = "Requirement not found", body = crate::error::ErrorBody),
    ),
    tag = "impact"
)]
pub(crate) async fn resolve_impact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImpactResponse>, AppError> {
    let id = RequirementId::new(id)?;
    let impact = resolve_requirement(&state.store, &state.resolver, &id).await?;
    Ok(Json(impact.into()))
}

/// GET /v1/impact/{id} — Current impact of a requirement.
#[utoipa::path(
    get,
    path = "/v1/impact/{id}",
    params(("id" = String, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Current impact", body = ImpactResponse),
        (status = 404, description = "Requirement unknown or not yet resolved", body = crate::error::ErrorBody),
    ),
    tag = "impact"
)]
pub(crate) async fn get_impact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImpactResponse>, AppError> {
    let id = RequirementId::new(id)?;
    let store = state.store.read();
    if store.get_requirement(&id).is_none() {
        return Err(AppError::NotFound(format!("requirement {id}")));
    }
    store
        .get_impact(&id)
        .cloned()
        .map(|impact| Json(impact.into()))
        .ok_or_else(|| AppError::NotFound(format!("impact for requirement {id} (not resolved)")))
}
