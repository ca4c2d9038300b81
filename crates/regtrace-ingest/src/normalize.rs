//! # Source Record Normalization
//!
//! Regulatory text acquisition happens outside regtrace. Acquisition
//! collaborators hand over loosely-typed JSON records; this module turns
//! them into [`Regulation`]s for the EU (EUR-Lex) and US (Federal
//! Register) feeds.

use serde::Deserialize;

use regtrace_core::{Market, Regulation, RegulationId, Timestamp, ValidationError};

/// A raw record as delivered by an acquisition collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRecord {
    /// Source-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Title, if the source provides one.
    #[serde(default)]
    pub title: Option<String>,
    /// ISO 8601 publication date or date-time.
    #[serde(default)]
    pub date: Option<String>,
    /// Full text.
    #[serde(default)]
    pub text: String,
    /// Retrieval URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Version label.
    #[serde(default)]
    pub version: Option<String>,
    /// Identifier of the superseded version.
    #[serde(default)]
    pub previous_version_id: Option<String>,
}

/// Per-feed normalization settings.
#[derive(Debug, Clone, Copy)]
struct Feed {
    country: &'static str,
    source: &'static str,
    default_title: &'static str,
    keeps_lineage: bool,
}

const EU_FEED: Feed = Feed {
    country: "EU",
    source: "EUR-Lex",
    default_title: "EU Regulation",
    keeps_lineage: true,
};

const US_FEED: Feed = Feed {
    country: "USA",
    source: "Federal Register",
    default_title: "Federal Rule",
    keeps_lineage: false,
};

/// Normalize an EUR-Lex record.
pub fn normalize_eu_record(raw: &SourceRecord) -> Result<Regulation, ValidationError> {
    normalize(raw, EU_FEED)
}

/// Normalize a Federal Register record. The feed carries no lineage, so
/// any `previous_version_id` is dropped.
pub fn normalize_us_record(raw: &SourceRecord) -> Result<Regulation, ValidationError> {
    normalize(raw, US_FEED)
}

fn normalize(raw: &SourceRecord, feed: Feed) -> Result<Regulation, ValidationError> {
    let id = RegulationId::new(raw.id.as_str())?;
    let date = match raw.date.as_deref() {
        Some(d) => Timestamp::parse(d)?,
        None => {
            return Err(ValidationError::InvalidTimestamp {
                value: String::new(),
                reason: "publication date missing".to_string(),
            })
        }
    };
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(feed.default_title);
    let version = raw
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("1.0");

    let mut regulation = Regulation::new(
        id,
        Market::new(feed.country)?,
        title,
        version,
        date,
        raw.text.as_str(),
    )?
    .with_source(feed.source);
    if let Some(url) = raw.url.as_deref().filter(|u| !u.trim().is_empty()) {
        regulation = regulation.with_url(url);
    }
    if feed.keeps_lineage {
        if let Some(prev) = raw.previous_version_id.as_deref() {
            if let Ok(prev) = RegulationId::new(prev) {
                regulation = regulation.with_previous_version(prev);
            }
        }
    }
    Ok(regulation)
}

/// Normalize a batch, skipping invalid records with a warning.
pub fn normalize_batch(
    records: &[SourceRecord],
    normalizer: fn(&SourceRecord) -> Result<Regulation, ValidationError>,
) -> Vec<Regulation> {
    records
        .iter()
        .filter_map(|raw| match normalizer(raw) {
            Ok(reg) => Some(reg),
            Err(e) => {
                tracing::warn!(record_id = %raw.id, error = %e, "skipping invalid source record");
                None
            }
        })
        .collect()
}
