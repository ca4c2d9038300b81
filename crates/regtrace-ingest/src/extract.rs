//! # Requirement Extraction
//!
//! Simple text segmentation: split a regulation into sentences, keep the
//! ones carrying an obligation marker, and reformulate each as an
//! engineering statement. No NLP beyond that.

use std::collections::{BTreeMap, BTreeSet};

use regtrace_core::{Market, Regulation, Requirement, RequirementId, Timestamp, ValidationError};

/// Lowercase markers that make a sentence a requirement.
pub const OBLIGATION_MARKERS: &[&str] = &[
    "shall",
    "must",
    "doit",
    "doivent",
    "obligatoire",
    "shall provide",
    "doivent fournir",
];

/// Legal phrasing rewritten as engineering phrasing, applied in order.
const ENGINEERING_REWRITES: &[(&str, &str)] = &[
    ("Manufacturers shall", "Engineering team shall"),
    ("Les constructeurs doivent", "L'ingénieur produit doit"),
];

/// Split text on `.`, `?` and `!`, trimming each piece and dropping empties.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '?', '!'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the sentence contains an obligation marker.
pub fn is_requirement_sentence(sentence: &str) -> bool {
    let lowered = sentence.to_lowercase();
    OBLIGATION_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Reformulate a legal sentence as an engineering obligation.
pub fn to_engineering_text(sentence: &str) -> String {
    ENGINEERING_REWRITES
        .iter()
        .fold(sentence.to_string(), |text, (from, to)| text.replace(from, to))
}

/// The requirement sentences of a text, in order.
pub fn requirement_sentences(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| is_requirement_sentence(s))
        .collect()
}

/// Issues `REQ_{MARKET}_{NNNN}` identifiers, one monotonic counter per
/// market. Identifiers are never reissued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementIdIssuer {
    counters: BTreeMap<Market, u32>,
}

impl RequirementIdIssuer {
    /// A fresh issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identifier for a market.
    pub fn issue(&mut self, market: &Market) -> RequirementId {
        let counter = self.counters.entry(market.clone()).or_insert(0);
        *counter = counter.saturating_add(1);
        RequirementId::sequential(market, *counter)
    }

    /// Account for an identifier issued elsewhere so it is not reissued.
    /// Identifiers not following the `REQ_{MARKET}_{NNNN}` pattern are
    /// ignored.
    pub fn observe(&mut self, market: &Market, id: &RequirementId) {
        let prefix = format!("REQ_{}_", market.as_str());
        let Some(number) = id
            .as_str()
            .strip_prefix(&prefix)
            .and_then(|n| n.parse::<u32>().ok())
        else {
            return;
        };
        let counter = self.counters.entry(market.clone()).or_insert(0);
        if number > *counter {
            *counter = number;
        }
    }

    /// Last number issued for a market, 0 if none.
    pub fn last_issued(&self, market: &Market) -> u32 {
        self.counters.get(market).copied().unwrap_or(0)
    }
}

/// Extract one requirement per requirement sentence of the regulation.
///
/// # Errors
///
/// Returns a [`ValidationError`] only if a sentence cannot form a valid
/// requirement, which segmentation already rules out.
pub fn extract_requirements(
    regulation: &Regulation,
    issuer: &mut RequirementIdIssuer,
    created_at: Timestamp,
) -> Result<Vec<Requirement>, ValidationError> {
    extract_new_requirements(regulation, &BTreeSet::new(), issuer, created_at)
}

/// Like [`extract_requirements`], but skips sentences whose raw text is in
/// `known`. Identifiers are only issued for sentences actually extracted.
pub fn extract_new_requirements(
    regulation: &Regulation,
    known: &BTreeSet<String>,
    issuer: &mut RequirementIdIssuer,
    created_at: Timestamp,
) -> Result<Vec<Requirement>, ValidationError> {
    let sentences = requirement_sentences(&regulation.text);
    let mut out = Vec::with_capacity(sentences.len());
    for sentence in sentences.into_iter().filter(|s| !known.contains(s)) {
        let engineering = to_engineering_text(&sentence);
        out.push(Requirement::new(
            issuer.issue(&regulation.country),
            regulation.id.clone(),
            regulation.country.clone(),
            sentence,
            engineering,
            created_at,
        )?);
    }
    tracing::debug!(
        regulation_id = %regulation.id,
        skipped = known.len(),
        count = out.len(),
        "requirements extracted"
    );
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sentences_are_trimmed_and_terminator_free(text in "[a-zA-Z .?!]{0,120}") {
            for s in split_sentences(&text) {
                prop_assert!(!s.is_empty());
                prop_assert_eq!(s.trim(), s.as_str());
                prop_assert!(!s.contains(['.', '?', '!']));
            }
        }

        #[test]
        fn issued_ids_are_unique(count in 1usize..50) {
            let mut issuer = RequirementIdIssuer::new();
            let market = Market::new("EU").unwrap();
            let ids: std::collections::BTreeSet<_> =
                (0..count).map(|_| issuer.issue(&market)).collect();
            prop_assert_eq!(ids.len(), count);
        }
    }
}
