//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "regtrace API",
        version = "0.3.0",
        description = "Regulatory compliance engineering: regulation catalogue, requirement traceability, impact resolution and per-market compliance.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Regulations
        crate::routes::regulations::register_regulations,
        crate::routes::regulations::search_regulations,
        crate::routes::regulations::get_regulation,
        crate::routes::regulations::get_lineage,
        crate::routes::regulations::extract_regulation,
        // Requirements
        crate::routes::requirements::list_requirements,
        crate::routes::requirements::get_requirement,
        crate::routes::requirements::update_requirement,
        crate::routes::requirements::set_market_status,
        // Impact
        crate::routes::impact::resolve_impact,
        crate::routes::impact::get_impact,
        // Compliance
        crate::routes::compliance::dashboard,
        crate::routes::compliance::country_compliance,
        // History
        crate::routes::history::get_history,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::regulations::RegisterRegulationsRequest,
        crate::routes::regulations::RegisterRegulationsResponse,
        crate::routes::regulations::RegulationListResponse,
        crate::routes::regulations::LineageResponse,
        crate::routes::regulations::ExtractResponse,
        crate::routes::requirements::RequirementListResponse,
        crate::routes::requirements::UpdateRequirementRequest,
        crate::routes::requirements::MarketStatusRequest,
        crate::routes::requirements::MarketStatusResponse,
        crate::routes::impact::ImpactResponse,
        crate::routes::compliance::DashboardResponse,
        crate::routes::compliance::CountryComplianceResponse,
        crate::routes::history::HistoryResponse,
    )),
    tags(
        (name = "regulations", description = "Regulation catalogue and extraction"),
        (name = "requirements", description = "Requirements and market verdicts"),
        (name = "impact", description = "Impact resolution"),
        (name = "compliance", description = "Per-market compliance"),
        (name = "history", description = "Traceability log"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
