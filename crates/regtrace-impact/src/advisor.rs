//! # Generative Impact Advisor
//!
//! The advisor is an external text-generation service consulted for impact
//! inference. It is slow, unreliable and non-authoritative, so it is
//! modelled as a capability with a single method whose failure mode is
//! "no signal": [`ImpactAdvisor::advise`] returns `None` instead of an
//! error, and the resolver falls back to the keyword tables.
//!
//! This module owns the pieces that do not depend on transport:
//!
//! - [`build_prompt`] — the fixed prompt template.
//! - [`extract_json_object`] — salvages the `{...}` span from free-form
//!   model output.
//! - [`AdvisorImpact::from_response_text`] — lenient parsing of that span
//!   into typed identifiers.
//! - [`NoAdvisor`] and [`MockAdvisor`] — in-process implementations for
//!   keyword-only runs and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use regtrace_core::{ComponentId, Criticality, DocumentId, Requirement, TestId};

/// Errors turning advisor output into an [`AdvisorImpact`].
#[derive(Error, Debug)]
pub enum AdvisorOutputError {
    /// The output contains no `{...}` span.
    #[error("no JSON object found in advisor output")]
    NoJsonObject,

    /// A `{...}` span was found but does not parse.
    #[error("malformed JSON in advisor output: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The span parsed to something other than a JSON object.
    #[error("advisor JSON is not an object")]
    NotAnObject,
}

/// What the advisor proposed for one requirement. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvisorImpact {
    /// Proposed components, trimmed and deduplicated.
    pub components: Vec<ComponentId>,
    /// Proposed tests, trimmed and deduplicated.
    pub tests: Vec<TestId>,
    /// Proposed documents, trimmed and deduplicated.
    pub documents: Vec<DocumentId>,
    /// Proposed criticality, absent when missing or unrecognised.
    pub criticality: Option<Criticality>,
    /// Proposed validation actions, blank entries dropped.
    pub validation_actions: Vec<String>,
}

impl AdvisorImpact {
    /// Whether the advisor proposed nothing at all.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.tests.is_empty()
            && self.documents.is_empty()
            && self.criticality.is_none()
            && self.validation_actions.is_empty()
    }

    /// Parse free-form model output: locate the JSON object, parse it, and
    /// read the impact fields from it.
    pub fn from_response_text(text: &str) -> Result<Self, AdvisorOutputError> {
        let span = extract_json_object(text).ok_or(AdvisorOutputError::NoJsonObject)?;
        let value: Value = serde_json::from_str(span)?;
        if !value.is_object() {
            return Err(AdvisorOutputError::NotAnObject);
        }
        Ok(Self::from_value(&value))
    }

    /// Read impact fields from a JSON object, ignoring anything with an
    /// unexpected shape. A bare string where a list is expected counts as a
    /// one-element list.
    pub fn from_value(value: &Value) -> Self {
        let criticality = match value.get("criticality") {
            Some(Value::String(s)) => match s.parse::<Criticality>() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring advisor criticality");
                    None
                }
            },
            _ => None,
        };
        Self {
            components: identifiers(value.get("components"), |s| ComponentId::new(s).ok()),
            tests: identifiers(value.get("tests"), |s| TestId::new(s).ok()),
            documents: identifiers(value.get("documents"), |s| DocumentId::new(s).ok()),
            criticality,
            validation_actions: strings(value.get("validation_actions"))
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn identifiers<T: PartialEq>(value: Option<&Value>, make: impl Fn(String) -> Option<T>) -> Vec<T> {
    let mut out = Vec::new();
    for id in strings(value).into_iter().filter_map(make) {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// The span from the first `{` to the last `}` inclusive, if both exist in
/// that order.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Build the fixed prompt for a requirement.
pub fn build_prompt(requirement: &Requirement) -> String {
    format!(
        "You are a systems engineer for an automotive OEM.\n\
         Analyse the following regulatory requirement and determine its impact on the vehicle.\n\
         \n\
         RAW REQUIREMENT:\n\
         {raw}\n\
         \n\
         ENGINEERING REQUIREMENT:\n\
         {engineering}\n\
         \n\
         Respond with exactly one JSON object and nothing else, with this structure:\n\
         {{\n  \
           \"components\": [\"COMPONENT_ID\", ...],\n  \
           \"tests\": [\"TEST_ID\", ...],\n  \
           \"documents\": [\"DOC_ID\", ...],\n  \
           \"criticality\": \"HIGH\" | \"MEDIUM\" | \"LOW\",\n  \
           \"validation_actions\": [\"action\", ...]\n\
         }}\n\
         \n\
         Rules:\n\
         - HIGH if the requirement is safety relevant (leak, fire, explosion, crash, hazard).\n\
         - MEDIUM if it concerns performance or robustness (pressure, temperature, durability).\n\
         - LOW if it only concerns documentation or marking.\n\
         - Use upper-case identifiers such as LPG_TANK, TEST_LEAK, DOC_LABELING.\n",
        raw = requirement.text_raw,
        engineering = requirement.text_engineering,
    )
}

/// A source of generative impact suggestions.
///
/// Implementations must never fail loudly: transport errors, timeouts and
/// unparsable output all map to `None` after being logged.
#[async_trait]
pub trait ImpactAdvisor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Propose an impact for the requirement, or `None` for no signal.
    async fn advise(&self, requirement: &Requirement) -> Option<AdvisorImpact>;
}

/// Advisor that never has a signal. Used for keyword-only runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvisor;

#[async_trait]
impl ImpactAdvisor for NoAdvisor {
    fn name(&self) -> &str {
        "none"
    }

    async fn advise(&self, _requirement: &Requirement) -> Option<AdvisorImpact> {
        None
    }
}

/// In-process advisor replaying a fixed model output.
///
/// The output goes through the same salvage and parsing path as a real
/// service response, so malformed text degrades to `None`.
#[derive(Debug, Default)]
pub struct MockAdvisor {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockAdvisor {
    /// An advisor that is unreachable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// An advisor that answers every prompt with `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`advise`](ImpactAdvisor::advise) was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImpactAdvisor for MockAdvisor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn advise(&self, requirement: &Requirement) -> Option<AdvisorImpact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = self.reply.as_deref()?;
        match AdvisorImpact::from_response_text(text) {
            Ok(impact) => Some(impact),
            Err(e) => {
                tracing::warn!(
                    requirement_id = %requirement.id,
                    error = %e,
                    "advisor output unusable, falling back to keyword rules"
                );
                None
            }
        }
    }
}
