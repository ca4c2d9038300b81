//! # Shared Store and Resolution Flow
//!
//! The store behind a `parking_lot::RwLock`, and the one operation that
//! suspends: resolving a requirement's impact through the advisor.
//!
//! The lock is never held across `.await`. Resolution snapshots the
//! requirement under a write lock, releases it for the advisor call, and
//! re-acquires it to save the result. Two concurrent resolutions of the
//! same requirement both complete and the last save wins.

use std::sync::Arc;

use parking_lot::RwLock;

use regtrace_core::{Impact, RequirementId};
use regtrace_impact::ImpactResolver;

use crate::error::StoreError;
use crate::store::ComplianceStore;

/// Process-wide handle to the store.
pub type SharedStore = Arc<RwLock<ComplianceStore>>;

/// Wrap a store for sharing.
pub fn shared(store: ComplianceStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// Resolve and save the impact of one requirement.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the requirement is unknown, or an
/// invariant error if the requirement disappeared during resolution.
pub async fn resolve_requirement(
    store: &SharedStore,
    resolver: &ImpactResolver,
    id: &RequirementId,
) -> Result<Impact, StoreError> {
    let requirement = store.write().begin_resolution(id)?;
    let impact = resolver.resolve(&requirement).await;
    store.write().save_impact(impact.clone())?;
    Ok(impact)
}

/// Resolve every requirement in id order, one at a time.
///
/// # Errors
///
/// Stops at the first store error.
pub async fn resolve_all(
    store: &SharedStore,
    resolver: &ImpactResolver,
) -> Result<Vec<Impact>, StoreError> {
    let ids: Vec<RequirementId> = store.read().requirements().map(|r| r.id.clone()).collect();
    let mut impacts = Vec::with_capacity(ids.len());
    for id in &ids {
        impacts.push(resolve_requirement(store, resolver, id).await?);
    }
    tracing::info!(count = impacts.len(), advisor = resolver.advisor_name(), "requirements resolved");
    Ok(impacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{Criticality, RequirementStage};
    use regtrace_impact::MockAdvisor;
    use regtrace_ingest::sample_dataset;

    fn sample_store() -> SharedStore {
        shared(ComplianceStore::from_dataset(sample_dataset().unwrap()).unwrap())
    }

    #[tokio::test]
    async fn resolves_and_saves_lpg_tank_requirement() {
        let store = sample_store();
        let resolver = ImpactResolver::keyword_only();
        let id = store
            .read()
            .requirements()
            .find(|r| r.text_raw.contains("leak test at high pressure"))
            .map(|r| r.id.clone())
            .unwrap();
        let impact = resolve_requirement(&store, &resolver, &id).await.unwrap();
        assert_eq!(impact.criticality, Criticality::High);
        let guard = store.read();
        assert_eq!(guard.get_impact(&id), Some(&impact));
        assert_eq!(guard.stage(&id), Some(RequirementStage::ImpactResolved));
    }

    #[tokio::test]
    async fn unknown_requirement_is_not_found() {
        let store = sample_store();
        let resolver = ImpactResolver::keyword_only();
        let id = RequirementId::new("REQ_XX_9999").unwrap();
        let err = resolve_requirement(&store, &resolver, &id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_advice_degrades_to_rules() {
        let store = sample_store();
        let advisor = Arc::new(MockAdvisor::with_response("not json at all"));
        let resolver = ImpactResolver::new(advisor.clone());
        let impacts = resolve_all(&store, &resolver).await.unwrap();
        assert_eq!(impacts.len(), store.read().requirements().count());
        assert_eq!(advisor.calls(), impacts.len());
        assert_eq!(store.read().impacts().len(), impacts.len());
    }

    #[tokio::test]
    async fn recompute_overwrites_without_history() {
        let store = sample_store();
        let resolver = ImpactResolver::keyword_only();
        let before = store.read().history().len();
        resolve_all(&store, &resolver).await.unwrap();
        resolve_all(&store, &resolver).await.unwrap();
        assert_eq!(store.read().history().len(), before);
    }
}
