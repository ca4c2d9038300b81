//! Shared pipeline steps: build the resolver, load a store, resolve it, and
//! assemble the compliance report.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use regtrace_advisor_client::{AdvisorClient, AdvisorConfig};
use regtrace_compliance::{
    actions_for_country, compute_country_compliance, country_dashboard, resolve_market,
    CountryCompliance, DashboardRow, RemediationAction,
};
use regtrace_core::{Market, ProductId, Regulation, Requirement};
use regtrace_impact::ImpactResolver;
use regtrace_state::{resolve_all, shared, ComplianceStore, SharedStore};

/// Compliance of one market with the actions that would close its gaps.
#[derive(Debug, Serialize)]
pub struct CountryReport {
    #[serde(flatten)]
    pub compliance: CountryCompliance,
    pub actions: Vec<RemediationAction>,
}

/// Output of `regtrace compliance` and `regtrace sample`.
#[derive(Debug, Serialize)]
pub struct ComplianceReport {
    pub product_id: ProductId,
    pub dashboard: Vec<DashboardRow>,
    pub countries: Vec<CountryReport>,
}

/// Keyword-only when `no_advisor` is set or `REGTRACE_ADVISOR_DISABLED`
/// says so, otherwise backed by the configured advisor.
pub fn build_resolver(no_advisor: bool) -> Result<ImpactResolver> {
    if no_advisor || AdvisorConfig::disabled_by_env() {
        tracing::info!("advisor disabled, resolving from keyword rules only");
        return Ok(ImpactResolver::keyword_only());
    }
    let config = AdvisorConfig::from_env().context("invalid advisor configuration")?;
    tracing::info!(url = %config.url, model = %config.model, "advisor configured");
    let client = AdvisorClient::new(config).context("failed to build advisor client")?;
    Ok(ImpactResolver::new(Arc::new(client)))
}

/// Register regulations and extract each of them, oldest first.
pub fn load_store(regulations: Vec<Regulation>) -> Result<ComplianceStore> {
    let mut store = ComplianceStore::new();
    store
        .add_regulations(regulations)
        .context("failed to register regulations")?;
    let ids: Vec<_> = store
        .list_regulations()
        .into_iter()
        .map(|r| r.id.clone())
        .collect();
    for id in &ids {
        store
            .extract_regulation(id)
            .with_context(|| format!("failed to extract {id}"))?;
    }
    Ok(store)
}

/// Resolve every requirement of the store to completion.
pub fn resolve_store(store: ComplianceStore, resolver: &ImpactResolver) -> Result<SharedStore> {
    let store = shared(store);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime
        .block_on(resolve_all(&store, resolver))
        .context("impact resolution failed")?;
    Ok(store)
}

/// Build the report for every market with requirements, or for one market
/// code (matched case-insensitively).
pub fn compliance_report(store: &ComplianceStore, country: Option<&str>) -> Result<ComplianceReport> {
    let product = store.product().context("no product configured")?;
    let requirements: Vec<Requirement> = store.requirements().cloned().collect();
    let impacts = store.impacts();

    let dashboard = country_dashboard(&requirements, impacts, product);
    let markets: Vec<Market> = match country {
        Some(code) => vec![resolve_market(code, &requirements, product)?],
        None => dashboard.iter().map(|row| row.country.clone()).collect(),
    };
    let countries = markets
        .iter()
        .map(|market| CountryReport {
            compliance: compute_country_compliance(market, &requirements, impacts, product),
            actions: actions_for_country(market, &requirements, impacts, product),
        })
        .collect();

    Ok(ComplianceReport {
        product_id: product.id.clone(),
        dashboard,
        countries,
    })
}

/// Pretty-print JSON to `out`, or to stdout.
pub fn write_output<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
