//! # Regulation Records
//!
//! A [`Regulation`] is one published version of a jurisdiction-specific
//! legal text. Regulations are immutable once created: a new version is a
//! new record linked to its predecessor through `previous_version_id`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::RegulationId;
use crate::market::Market;
use crate::temporal::Timestamp;

/// Default source label for records that do not name one.
pub const DEFAULT_SOURCE: &str = "core";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// One version of a regulatory text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// Stable identifier of this version.
    pub id: RegulationId,
    /// Jurisdiction the text applies to.
    pub country: Market,
    /// Human-readable title.
    pub title: String,
    /// Version label as published (e.g. `"1.1"`).
    pub version: String,
    /// Publication date.
    pub date: Timestamp,
    /// Where the text was retrieved from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Full regulatory text.
    pub text: String,
    /// Ingestion source label (`"core"`, `"EUR-Lex"`, `"Federal Register"`, ...).
    #[serde(default = "default_source")]
    pub source: String,
    /// The version this one supersedes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version_id: Option<RegulationId>,
}

impl Regulation {
    /// Create a regulation with the default source and no lineage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] if `text` is blank.
    pub fn new(
        id: RegulationId,
        country: Market,
        title: impl Into<String>,
        version: impl Into<String>,
        date: Timestamp,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let regulation = Self {
            id,
            country,
            title: title.into(),
            version: version.into(),
            date,
            url: None,
            text: text.into(),
            source: default_source(),
            previous_version_id: None,
        };
        regulation.validate()?;
        Ok(regulation)
    }

    /// Set the retrieval URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the ingestion source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Link this version to the one it supersedes.
    pub fn with_previous_version(mut self, previous: RegulationId) -> Self {
        self.previous_version_id = Some(previous);
        self
    }

    /// Check the record invariants that deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] if `text` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText {
                field: "regulation text",
            });
        }
        Ok(())
    }
}
