//! # Compliance Store
//!
//! The single in-memory home of regulations, requirements, impacts, the
//! product under assessment, and the traceability log. Every mutation goes
//! through a named method that enforces the store invariants:
//!
//! - requirement ids are unique across the store and never reissued;
//! - every requirement references a registered regulation;
//! - every impact references an existing requirement (no orphans);
//! - regulations are immutable once registered;
//! - history is append-only and strictly ordered in time.
//!
//! The store is a plain value. Sharing across tasks is the caller's
//! concern; see [`SharedStore`](crate::SharedStore).

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use regtrace_core::{
    ChangeType, HistoryItem, Impact, InvariantError, Market, MarketStatus, Product, Regulation,
    RegulationId, Requirement, RequirementId, RequirementStage, Timestamp, ValidationError,
};
use regtrace_ingest::{extract_new_requirements, RequirementIdIssuer, SampleDataset};

use crate::error::StoreError;
use crate::history::TraceabilityLog;

/// Summary recorded when an edit does not supply one.
pub const DEFAULT_UPDATE_SUMMARY: &str = "Requirement updated";

// ---------------------------------------------------------------------------
// Query and edit payloads
// ---------------------------------------------------------------------------

/// Regulation search criteria. Blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegulationFilter {
    /// Jurisdiction, compared case-insensitively.
    #[serde(default)]
    pub country: Option<String>,
    /// Ingestion source, compared case-insensitively.
    #[serde(default)]
    pub source: Option<String>,
    /// Case-insensitive substring of the title or text.
    #[serde(default, alias = "q")]
    pub query: Option<String>,
}

impl RegulationFilter {
    /// Whether a regulation satisfies every given criterion.
    pub fn matches(&self, regulation: &Regulation) -> bool {
        if let Some(country) = given(&self.country) {
            if !regulation.country.matches_ignore_case(country) {
                return false;
            }
        }
        if let Some(source) = given(&self.source) {
            if regulation.source.to_lowercase() != source.to_lowercase() {
                return false;
            }
        }
        if let Some(query) = given(&self.query) {
            let query = query.to_lowercase();
            return regulation.title.to_lowercase().contains(&query)
                || regulation.text.to_lowercase().contains(&query);
        }
        true
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// An in-place requirement edit. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequirementEdit {
    /// New source sentence.
    #[serde(default)]
    pub text_raw: Option<String>,
    /// New engineering reformulation.
    #[serde(default)]
    pub text_engineering: Option<String>,
    /// Summary for the history entry.
    #[serde(default)]
    pub diff_summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory compliance store.
#[derive(Debug, Clone, Default)]
pub struct ComplianceStore {
    regulations: BTreeMap<RegulationId, Regulation>,
    requirements: BTreeMap<RequirementId, Requirement>,
    stages: BTreeMap<RequirementId, RequirementStage>,
    impacts: BTreeMap<RequirementId, Impact>,
    history: TraceabilityLog,
    product: Option<Product>,
    issuer: RequirementIdIssuer,
}

impl ComplianceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store loaded with a dataset: regulations registered, every
    /// regulation extracted, product set.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ComplianceStore::seed`].
    pub fn from_dataset(dataset: SampleDataset) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.seed(dataset)?;
        Ok(store)
    }

    /// Register a dataset's regulations, extract each in date order, and
    /// set its product. Returns the number of requirements created.
    ///
    /// # Errors
    ///
    /// Returns an error if a regulation conflicts with one already held.
    pub fn seed(&mut self, dataset: SampleDataset) -> Result<usize, StoreError> {
        self.add_regulations(dataset.regulations)?;
        let ids: Vec<RegulationId> = self
            .list_regulations()
            .into_iter()
            .map(|r| r.id.clone())
            .collect();
        let mut created = 0;
        for id in &ids {
            created += self.extract_regulation(id)?.len();
        }
        self.set_product(dataset.product);
        Ok(created)
    }

    // -- Regulations --------------------------------------------------------

    /// Register regulations. Re-registering an identical regulation is a
    /// no-op. The batch is applied only if every entry is acceptable.
    /// Returns the number of newly registered regulations.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] if a regulation has blank text.
    /// - [`InvariantError::RegulationMutated`] if an id is already held (or
    ///   repeated in the batch) with different content.
    pub fn add_regulations(
        &mut self,
        regulations: impl IntoIterator<Item = Regulation>,
    ) -> Result<usize, StoreError> {
        let regulations: Vec<Regulation> = regulations.into_iter().collect();
        let mut fresh: BTreeMap<&RegulationId, &Regulation> = BTreeMap::new();
        for regulation in &regulations {
            regulation.validate()?;
            let held = self
                .regulations
                .get(&regulation.id)
                .or_else(|| fresh.get(&regulation.id).copied());
            match held {
                Some(existing) if existing != regulation => {
                    return Err(InvariantError::RegulationMutated {
                        id: regulation.id.to_string(),
                    }
                    .into());
                }
                Some(_) => {}
                None => {
                    fresh.insert(&regulation.id, regulation);
                }
            }
        }
        let added = fresh.len();
        for regulation in regulations {
            self.regulations
                .entry(regulation.id.clone())
                .or_insert(regulation);
        }
        tracing::info!(added, total = self.regulations.len(), "regulations registered");
        Ok(added)
    }

    /// Look up a regulation.
    pub fn get_regulation(&self, id: &RegulationId) -> Option<&Regulation> {
        self.regulations.get(id)
    }

    /// All regulations, oldest publication first (ties by id).
    pub fn list_regulations(&self) -> Vec<&Regulation> {
        let mut all: Vec<&Regulation> = self.regulations.values().collect();
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// Regulations matching a filter, oldest first.
    pub fn search_regulations(&self, filter: &RegulationFilter) -> Vec<&Regulation> {
        self.list_regulations()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// The chain of versions from `id` back through `previous_version_id`,
    /// newest first. Stops at a link the store does not hold or at a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` itself is unknown.
    pub fn version_lineage(&self, id: &RegulationId) -> Result<Vec<&Regulation>, StoreError> {
        let mut current = self
            .regulations
            .get(id)
            .ok_or_else(|| StoreError::regulation(id))?;
        let mut seen: BTreeSet<&RegulationId> = BTreeSet::new();
        let mut chain = Vec::new();
        loop {
            if !seen.insert(&current.id) {
                tracing::warn!(regulation_id = %id, at = %current.id, "version lineage cycle");
                break;
            }
            chain.push(current);
            let Some(previous) = &current.previous_version_id else {
                break;
            };
            match self.regulations.get(previous) {
                Some(regulation) => current = regulation,
                None => {
                    tracing::debug!(regulation_id = %id, missing = %previous, "lineage link not held");
                    break;
                }
            }
        }
        Ok(chain)
    }

    // -- Requirements -------------------------------------------------------

    /// Add a requirement and record its creation in the history.
    ///
    /// # Errors
    ///
    /// - [`InvariantError::DuplicateRequirement`] if the id is taken.
    /// - [`InvariantError::DanglingRegulation`] if the regulation is unknown.
    pub fn add_requirement(&mut self, requirement: Requirement) -> Result<&Requirement, StoreError> {
        if self.requirements.contains_key(&requirement.id) {
            return Err(InvariantError::DuplicateRequirement {
                id: requirement.id.to_string(),
            }
            .into());
        }
        if !self.regulations.contains_key(&requirement.regulation_id) {
            return Err(InvariantError::DanglingRegulation {
                requirement_id: requirement.id.to_string(),
                regulation_id: requirement.regulation_id.to_string(),
            }
            .into());
        }
        self.issuer.observe(&requirement.country, &requirement.id);
        self.history.record(
            requirement.id.clone(),
            requirement.version.clone(),
            ChangeType::Created,
            format!("Requirement extracted from {}", requirement.regulation_id),
        );
        self.stages
            .insert(requirement.id.clone(), RequirementStage::Created);
        tracing::info!(
            requirement_id = %requirement.id,
            regulation_id = %requirement.regulation_id,
            "requirement created"
        );
        Ok(&*self
            .requirements
            .entry(requirement.id.clone())
            .or_insert(requirement))
    }

    /// Extract a registered regulation into requirements. Sentences already
    /// held for this regulation are left untouched. Returns the ids created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the regulation is unknown.
    pub fn extract_regulation(
        &mut self,
        id: &RegulationId,
    ) -> Result<Vec<RequirementId>, StoreError> {
        let regulation = self
            .regulations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::regulation(id))?;
        let known: BTreeSet<String> = self
            .requirements
            .values()
            .filter(|r| &r.regulation_id == id)
            .map(|r| r.text_raw.clone())
            .collect();
        let extracted =
            extract_new_requirements(&regulation, &known, &mut self.issuer, Timestamp::now())?;
        let mut created = Vec::with_capacity(extracted.len());
        for requirement in extracted {
            created.push(self.add_requirement(requirement)?.id.clone());
        }
        tracing::info!(
            regulation_id = %id,
            created = created.len(),
            kept = known.len(),
            "regulation extracted"
        );
        Ok(created)
    }

    /// Register (if needed) and extract a regulation.
    ///
    /// # Errors
    ///
    /// See [`ComplianceStore::add_regulations`].
    pub fn reextract_regulation(
        &mut self,
        regulation: Regulation,
    ) -> Result<Vec<RequirementId>, StoreError> {
        let id = regulation.id.clone();
        self.add_regulations([regulation])?;
        self.extract_regulation(&id)
    }

    /// Look up a requirement.
    pub fn get_requirement(&self, id: &RequirementId) -> Option<&Requirement> {
        self.requirements.get(id)
    }

    /// All requirements in id order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.values()
    }

    /// Requirements, optionally restricted to one regulation, in id order.
    pub fn list_requirements(&self, regulation_id: Option<&RegulationId>) -> Vec<&Requirement> {
        self.requirements
            .values()
            .filter(|r| regulation_id.map_or(true, |id| &r.regulation_id == id))
            .collect()
    }

    /// Edit a requirement in place: bump its version and record an
    /// `updated` history entry.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the requirement is unknown.
    /// - [`ValidationError::EmptyText`] if the new raw text is blank.
    pub fn update_requirement(
        &mut self,
        id: &RequirementId,
        edit: RequirementEdit,
    ) -> Result<&Requirement, StoreError> {
        let requirement = self
            .requirements
            .get_mut(id)
            .ok_or_else(|| StoreError::requirement(id))?;
        if edit.text_raw.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyText { field: "text_raw" }.into());
        }
        if let Some(raw) = edit.text_raw {
            requirement.text_raw = raw;
        }
        if let Some(engineering) = edit.text_engineering {
            requirement.text_engineering = engineering;
        }
        requirement.bump_version();
        let summary = edit
            .diff_summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPDATE_SUMMARY.to_string());
        let stamp = self
            .history
            .record(id.clone(), requirement.version.clone(), ChangeType::Updated, summary)
            .timestamp;
        requirement.updated_at = Some(stamp);
        tracing::info!(requirement_id = %id, version = %requirement.version, "requirement updated");
        Ok(&*requirement)
    }

    /// Record a market verdict for a requirement and return the previous
    /// one. A change is logged as an `updated` history entry; the
    /// requirement version is not bumped. Setting the current value again
    /// records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the requirement is unknown.
    pub fn set_market_status(
        &mut self,
        id: &RequirementId,
        market: Market,
        status: MarketStatus,
    ) -> Result<MarketStatus, StoreError> {
        let requirement = self
            .requirements
            .get_mut(id)
            .ok_or_else(|| StoreError::requirement(id))?;
        let previous = requirement.set_status(market.clone(), status);
        if previous == status {
            return Ok(previous);
        }
        let stamp = self
            .history
            .record(
                id.clone(),
                requirement.version.clone(),
                ChangeType::Updated,
                format!("Market {market}: {previous} -> {status}"),
            )
            .timestamp;
        requirement.updated_at = Some(stamp);
        tracing::info!(
            requirement_id = %id,
            market = %market,
            from = %previous,
            to = %status,
            "market status changed"
        );
        Ok(previous)
    }

    // -- Impacts and lifecycle ----------------------------------------------

    /// Mark a requirement as awaiting resolution and return a snapshot of
    /// it for the resolver. Calling this while already pending is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the requirement is unknown.
    pub fn begin_resolution(&mut self, id: &RequirementId) -> Result<Requirement, StoreError> {
        let requirement = self
            .requirements
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::requirement(id))?;
        self.transition(id, RequirementStage::ImpactPending)?;
        Ok(requirement)
    }

    /// Store the current impact of a requirement, replacing any previous
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::OrphanImpact`] if the requirement is unknown.
    pub fn save_impact(&mut self, impact: Impact) -> Result<(), StoreError> {
        if !self.requirements.contains_key(&impact.requirement_id) {
            return Err(InvariantError::OrphanImpact {
                requirement_id: impact.requirement_id.to_string(),
            }
            .into());
        }
        self.transition(&impact.requirement_id, RequirementStage::ImpactResolved)?;
        tracing::info!(
            requirement_id = %impact.requirement_id,
            criticality = %impact.criticality,
            "impact saved"
        );
        self.impacts.insert(impact.requirement_id.clone(), impact);
        Ok(())
    }

    /// The current impact of a requirement.
    pub fn get_impact(&self, id: &RequirementId) -> Option<&Impact> {
        self.impacts.get(id)
    }

    /// All current impacts keyed by requirement.
    pub fn impacts(&self) -> &BTreeMap<RequirementId, Impact> {
        &self.impacts
    }

    /// Lifecycle stage of a requirement.
    pub fn stage(&self, id: &RequirementId) -> Option<RequirementStage> {
        self.stages.get(id).copied()
    }

    fn transition(&mut self, id: &RequirementId, to: RequirementStage) -> Result<(), InvariantError> {
        let from = self.stages.get(id).copied().unwrap_or(RequirementStage::Created);
        let repeat_pending = from == RequirementStage::ImpactPending && to == from;
        if !repeat_pending && !from.can_transition_to(to) {
            return Err(InvariantError::InvalidTransition {
                id: id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.stages.insert(id.clone(), to);
        Ok(())
    }

    // -- History and product ------------------------------------------------

    /// The traceability log.
    pub fn history(&self) -> &TraceabilityLog {
        &self.history
    }

    /// Append a pre-stamped history entry for a held requirement.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the requirement is unknown.
    /// - [`InvariantError::HistoryRegression`] if the entry is out of order.
    pub fn append_history(&mut self, item: HistoryItem) -> Result<(), StoreError> {
        if !self.requirements.contains_key(&item.requirement_id) {
            return Err(StoreError::requirement(&item.requirement_id));
        }
        self.history.append(item)?;
        Ok(())
    }

    /// Set the product compliance is measured against.
    pub fn set_product(&mut self, product: Product) {
        tracing::info!(product_id = %product.id, tests = product.tests.len(), "product set");
        self.product = Some(product);
    }

    /// The product under assessment, if one is set.
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{ComponentId, Criticality, TestId};
    use regtrace_ingest::sample_dataset;

    fn regulation(id: &str, country: &str, text: &str) -> Regulation {
        Regulation::new(
            RegulationId::new(id).unwrap(),
            Market::new(country).unwrap(),
            format!("Regulation {id}"),
            "1.0",
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
            text,
        )
        .unwrap()
    }

    fn store_with(text: &str) -> (ComplianceStore, RegulationId) {
        let mut store = ComplianceStore::new();
        let reg = regulation("REG-1", "EU", text);
        let id = reg.id.clone();
        store.add_regulations([reg]).unwrap();
        (store, id)
    }

    fn impact_for(id: &RequirementId) -> Impact {
        Impact {
            requirement_id: id.clone(),
            components: vec![ComponentId::new("LPG_TANK").unwrap()],
            tests: vec![TestId::new("TEST_LEAK").unwrap()],
            documents: vec![],
            criticality: Criticality::High,
            validation_actions: vec!["Review".to_string()],
        }
    }

    #[test]
    fn identical_regulation_readd_is_noop() {
        let (mut store, _) = store_with("Tanks shall be marked.");
        let added = store
            .add_regulations([regulation("REG-1", "EU", "Tanks shall be marked.")])
            .unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.list_regulations().len(), 1);
    }

    #[test]
    fn mutated_regulation_is_rejected() {
        let (mut store, _) = store_with("Tanks shall be marked.");
        let err = store
            .add_regulations([regulation("REG-1", "EU", "Tanks must be sealed.")])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invariant(InvariantError::RegulationMutated { .. })
        ));
    }

    #[test]
    fn conflicting_batch_is_not_partially_applied() {
        let mut store = ComplianceStore::new();
        let err = store.add_regulations([
            regulation("REG-A", "EU", "One shall apply."),
            regulation("REG-B", "EU", "Two shall apply."),
            regulation("REG-A", "EU", "Other text shall apply."),
        ]);
        assert!(err.is_err());
        assert!(store.list_regulations().is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut store = ComplianceStore::new();
        store
            .add_regulations([
                regulation("EU-1", "EU", "Batteries must resist heat.").with_source("EUR-Lex"),
                regulation("US-1", "USA", "Airbags must deploy.").with_source("Federal Register"),
            ])
            .unwrap();
        let by_country = RegulationFilter {
            country: Some("usa".into()),
            ..Default::default()
        };
        assert_eq!(store.search_regulations(&by_country).len(), 1);
        let by_source = RegulationFilter {
            source: Some("eur-lex".into()),
            ..Default::default()
        };
        assert_eq!(store.search_regulations(&by_source)[0].id.as_str(), "EU-1");
        let by_query = RegulationFilter {
            query: Some("AIRBAG".into()),
            ..Default::default()
        };
        assert_eq!(store.search_regulations(&by_query)[0].id.as_str(), "US-1");
        let blank = RegulationFilter {
            country: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(store.search_regulations(&blank).len(), 2);
    }

    #[test]
    fn regulations_listed_by_date() {
        let store = ComplianceStore::from_dataset(sample_dataset().unwrap()).unwrap();
        let ids: Vec<&str> = store
            .list_regulations()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "UNECE-R67",
                "EU-BATT-2025-V1",
                "US-NHTSA-AIRBAG-2025-V1",
                "EU-BATT-2025-V2"
            ]
        );
    }

    #[test]
    fn lineage_follows_previous_versions() {
        let store = ComplianceStore::from_dataset(sample_dataset().unwrap()).unwrap();
        let chain = store
            .version_lineage(&RegulationId::new("EU-BATT-2025-V2").unwrap())
            .unwrap();
        let ids: Vec<&str> = chain.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["EU-BATT-2025-V2", "EU-BATT-2025-V1"]);
    }

    #[test]
    fn lineage_stops_at_cycle_and_missing_link() {
        let mut store = ComplianceStore::new();
        let a = regulation("A", "EU", "A shall hold.")
            .with_previous_version(RegulationId::new("B").unwrap());
        let b = regulation("B", "EU", "B shall hold.")
            .with_previous_version(RegulationId::new("A").unwrap());
        let c = regulation("C", "EU", "C shall hold.")
            .with_previous_version(RegulationId::new("GONE").unwrap());
        store.add_regulations([a, b, c]).unwrap();
        let cycle = store
            .version_lineage(&RegulationId::new("A").unwrap())
            .unwrap();
        assert_eq!(cycle.len(), 2);
        let missing = store
            .version_lineage(&RegulationId::new("C").unwrap())
            .unwrap();
        assert_eq!(missing.len(), 1);
        let unknown = store.version_lineage(&RegulationId::new("Z").unwrap());
        assert!(matches!(unknown, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn extraction_records_created_history() {
        let (mut store, reg_id) = store_with("Tanks shall be marked. Valves must close.");
        let ids = store.extract_regulation(&reg_id).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.history().len(), 2);
        assert!(store
            .history()
            .entries()
            .iter()
            .all(|e| e.change_type == ChangeType::Created));
        assert_eq!(store.stage(&ids[0]), Some(RequirementStage::Created));
    }

    #[test]
    fn reextraction_keeps_existing_sentences() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let first = store.extract_regulation(&reg_id).unwrap();
        let again = store.extract_regulation(&reg_id).unwrap();
        assert_eq!(first.len(), 1);
        assert!(again.is_empty());
        assert_eq!(store.list_requirements(Some(&reg_id)).len(), 1);
    }

    #[test]
    fn reextract_adds_only_new_sentences_of_a_new_regulation() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        store.extract_regulation(&reg_id).unwrap();
        let v2 = regulation("REG-2", "EU", "Tanks shall be marked. Valves must close.");
        let created = store.reextract_regulation(v2).unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].as_str(), "REQ_EU_0002");
    }

    #[test]
    fn duplicate_requirement_is_invariant_violation() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let dup = store.get_requirement(&id).unwrap().clone();
        let err = store.add_requirement(dup).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invariant(InvariantError::DuplicateRequirement { .. })
        ));
    }

    #[test]
    fn requirement_for_unknown_regulation_is_rejected() {
        let mut store = ComplianceStore::new();
        let req = Requirement::new(
            RequirementId::new("REQ_EU_0001").unwrap(),
            RegulationId::new("MISSING").unwrap(),
            Market::new("EU").unwrap(),
            "Tanks shall be marked",
            "Tanks shall be marked",
            Timestamp::now(),
        )
        .unwrap();
        let err = store.add_requirement(req).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invariant(InvariantError::DanglingRegulation { .. })
        ));
    }

    #[test]
    fn externally_added_ids_are_never_reissued() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let req = Requirement::new(
            RequirementId::new("REQ_EU_0010").unwrap(),
            reg_id.clone(),
            Market::new("EU").unwrap(),
            "Manual entry shall exist",
            "Manual entry shall exist",
            Timestamp::now(),
        )
        .unwrap();
        store.add_requirement(req).unwrap();
        let ids = store.extract_regulation(&reg_id).unwrap();
        assert_eq!(ids[0].as_str(), "REQ_EU_0011");
    }

    #[test]
    fn update_bumps_version_and_logs() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let edit = RequirementEdit {
            text_engineering: Some("Tank marking shall be laser-etched".into()),
            diff_summary: Some("Clarified marking method".into()),
            ..Default::default()
        };
        let updated = store.update_requirement(&id, edit).unwrap();
        assert_eq!(updated.version, "1.1");
        assert_eq!(updated.text_raw, "Tanks shall be marked");
        assert!(updated.updated_at.is_some());
        let last = store.history().latest().unwrap();
        assert_eq!(last.change_type, ChangeType::Updated);
        assert_eq!(last.version, "1.1");
        assert_eq!(last.diff_summary, "Clarified marking method");
    }

    #[test]
    fn update_rejects_blank_raw_text() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let edit = RequirementEdit {
            text_raw: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_requirement(&id, edit),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.get_requirement(&id).unwrap().version, "1.0");
    }

    #[test]
    fn update_unknown_requirement_is_not_found() {
        let mut store = ComplianceStore::new();
        let id = RequirementId::new("REQ_EU_0001").unwrap();
        let err = store
            .update_requirement(&id, RequirementEdit::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "requirement", .. }));
    }

    #[test]
    fn market_status_changes_are_logged_without_version_bump() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let eu = Market::new("EU").unwrap();
        let prev = store
            .set_market_status(&id, eu.clone(), MarketStatus::Ok)
            .unwrap();
        assert_eq!(prev, MarketStatus::Unset);
        assert_eq!(store.history().latest().unwrap().diff_summary, "Market EU: UNSET -> OK");
        let before = store.history().len();
        store.set_market_status(&id, eu.clone(), MarketStatus::Ok).unwrap();
        assert_eq!(store.history().len(), before);
        store.set_market_status(&id, eu.clone(), MarketStatus::Unset).unwrap();
        let req = store.get_requirement(&id).unwrap();
        assert_eq!(req.version, "1.0");
        assert_eq!(req.status_for(&eu), MarketStatus::Unset);
    }

    #[test]
    fn impact_lifecycle() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let snapshot = store.begin_resolution(&id).unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(store.stage(&id), Some(RequirementStage::ImpactPending));
        store.begin_resolution(&id).unwrap();
        store.save_impact(impact_for(&id)).unwrap();
        assert_eq!(store.stage(&id), Some(RequirementStage::ImpactResolved));
        let mut recomputed = impact_for(&id);
        recomputed.criticality = Criticality::Low;
        store.save_impact(recomputed).unwrap();
        assert_eq!(store.get_impact(&id).unwrap().criticality, Criticality::Low);
        assert_eq!(store.impacts().len(), 1);
        // impacts are not versioned through history
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn orphan_impact_is_rejected() {
        let mut store = ComplianceStore::new();
        let id = RequirementId::new("REQ_EU_0001").unwrap();
        let err = store.save_impact(impact_for(&id)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invariant(InvariantError::OrphanImpact { .. })
        ));
        assert!(store.impacts().is_empty());
    }

    #[test]
    fn append_history_checks_requirement_and_order() {
        let (mut store, reg_id) = store_with("Tanks shall be marked.");
        let id = store.extract_regulation(&reg_id).unwrap().remove(0);
        let stale = HistoryItem {
            timestamp: Timestamp::from_ymd(2000, 1, 1).unwrap(),
            requirement_id: id.clone(),
            version: "1.0".into(),
            change_type: ChangeType::Updated,
            diff_summary: "late".into(),
        };
        assert!(matches!(
            store.append_history(stale),
            Err(StoreError::Invariant(InvariantError::HistoryRegression { .. }))
        ));
        let unknown = HistoryItem {
            timestamp: Timestamp::now().successor(),
            requirement_id: RequirementId::new("REQ_XX_0001").unwrap(),
            version: "1.0".into(),
            change_type: ChangeType::Updated,
            diff_summary: "x".into(),
        };
        assert!(matches!(
            store.append_history(unknown),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn sample_seed_creates_requirements_and_product() {
        let mut store = ComplianceStore::new();
        let created = store.seed(sample_dataset().unwrap()).unwrap();
        assert_eq!(created, store.requirements().count());
        assert!(created >= 10);
        assert_eq!(store.product().unwrap().id.as_str(), "VEH-EV-01");
        assert!(store
            .requirements()
            .any(|r| r.id.as_str() == "REQ_UNECE_0001"));
    }

    #[test]
    fn filter_deserializes_q_alias() {
        let filter: RegulationFilter =
            serde_json::from_str(r#"{"country":"EU","q":"battery"}"#).unwrap();
        assert_eq!(filter.query.as_deref(), Some("battery"));
    }
}
