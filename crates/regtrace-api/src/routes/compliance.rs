//! # Compliance API
//!
//! Per-market coverage, risk and remediation for the configured product.
//! Each request works on one consistent snapshot of the store.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use regtrace_compliance::{
    actions_for_country, compute_country_compliance, country_dashboard, impact_summary,
    market_status_summary, resolve_market, CountryCompliance, DashboardRow, ImpactSummaryRow,
    MarketStatusSummary, RemediationAction,
};
use regtrace_core::{Product, Requirement};

use crate::error::AppError;
use crate::state::AppState;

/// All markets at a glance.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = String)]
    pub product_id: String,
    #[schema(value_type = Vec<Object>)]
    pub countries: Vec<DashboardRow>,
    #[schema(value_type = Vec<Object>)]
    pub impacts: Vec<ImpactSummaryRow>,
}

/// One market in detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountryComplianceResponse {
    #[schema(value_type = Object)]
    pub compliance: CountryCompliance,
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<RemediationAction>,
    #[schema(value_type = Object)]
    pub market_status: MarketStatusSummary,
}

/// Build the compliance router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/compliance/countries", get(dashboard))
        .route("/v1/compliance/countries/:country", get(country_compliance))
}

fn no_product() -> AppError {
    AppError::Conflict("no product configured; compliance cannot be measured".to_string())
}

/// GET /v1/compliance/countries — Country dashboard.
#[utoipa::path(
    get,
    path = "/v1/compliance/countries",
    responses(
        (status = 200, description = "One row per market, sorted", body = DashboardResponse),
        (status = 409, description = "No product configured", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let store = state.store.read();
    let product: &Product = store.product().ok_or_else(no_product)?;
    let requirements: Vec<Requirement> = store.requirements().cloned().collect();
    Ok(Json(DashboardResponse {
        product_id: product.id.to_string(),
        countries: country_dashboard(&requirements, store.impacts(), product),
        impacts: impact_summary(&requirements, store.impacts()),
    }))
}

/// GET /v1/compliance/countries/{country} — Compliance and actions for a market.
#[utoipa::path(
    get,
    path = "/v1/compliance/countries/{country}",
    params(("country" = String, Path, description = "Market code, case-insensitive")),
    responses(
        (status = 200, description = "Coverage, risk and remediation", body = CountryComplianceResponse),
        (status = 409, description = "No product configured", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid market code", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
pub(crate) async fn country_compliance(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<CountryComplianceResponse>, AppError> {
    let store = state.store.read();
    let product = store.product().ok_or_else(no_product)?;
    let requirements: Vec<Requirement> = store.requirements().cloned().collect();
    let country = resolve_market(&country, &requirements, product)?;
    Ok(Json(CountryComplianceResponse {
        compliance: compute_country_compliance(&country, &requirements, store.impacts(), product),
        actions: actions_for_country(&country, &requirements, store.impacts(), product),
        market_status: market_status_summary(&requirements, &country),
    }))
}
