//! # History API
//!
//! Read access to the traceability log.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use regtrace_compliance::{history_statistics, HistoryStatistics};
use regtrace_core::{HistoryItem, RequirementId};

use crate::error::AppError;
use crate::state::AppState;

/// History filter.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Restrict to one requirement.
    #[serde(default)]
    pub requirement_id: Option<String>,
}

/// History entries with statistics over the returned entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    #[schema(value_type = Object)]
    pub statistics: HistoryStatistics,
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<HistoryItem>,
}

/// Build the history router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/history", get(get_history))
}

/// GET /v1/history — Traceability log, oldest first.
#[utoipa::path(
    get,
    path = "/v1/history",
    params(("requirement_id" = Option<String>, Query, description = "Restrict to one requirement")),
    responses(
        (status = 200, description = "History and statistics", body = HistoryResponse),
    ),
    tag = "history"
)]
pub(crate) async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let requirement_id = query.requirement_id.map(RequirementId::new).transpose()?;
    let store = state.store.read();
    let entries: Vec<HistoryItem> = match &requirement_id {
        Some(id) => store.history().entries_for_requirement(id).cloned().collect(),
        None => store.history().entries().to_vec(),
    };
    Ok(Json(HistoryResponse {
        statistics: history_statistics(&entries),
        entries,
    }))
}
