//! # Keyword Rule Tables
//!
//! Ordered association lists from lowercase text fragments to component,
//! test and document codes. Matching is plain substring containment on the
//! lowercased requirement text, so overlapping keys ("valve" and
//! "safety valve") both fire.
//!
//! Output order is deterministic: identifiers are emitted in table
//! declaration order, each at most once.

use regtrace_core::{ComponentId, DocumentId, TestId};

/// Built-in component keywords, in declaration order.
const COMPONENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("tank", &["LPG_TANK"]),
    ("cylinder", &["LPG_TANK"]),
    ("container", &["LPG_TANK"]),
    ("valve", &["LPG_VALVE"]),
    ("multivalve", &["LPG_MULTIVALVE"]),
    ("safety valve", &["LPG_SAFETY_VALVE"]),
    ("shut-off valve", &["LPG_SHUTOFF_VALVE"]),
    ("pipe", &["LPG_PIPE"]),
    ("piping", &["LPG_PIPE"]),
    ("hose", &["LPG_HOSE"]),
    ("tube", &["LPG_PIPE"]),
    ("filter", &["LPG_FILTER"]),
    ("regulator", &["LPG_PRESSURE_REGULATOR"]),
    ("pressure regulator", &["LPG_PRESSURE_REGULATOR"]),
    ("sensor", &["LPG_SENSOR"]),
    ("temperature sensor", &["LPG_TEMP_SENSOR"]),
    ("pressure sensor", &["LPG_PRESSURE_SENSOR"]),
    ("level sensor", &["LPG_LEVEL_SENSOR"]),
    ("fuel pump", &["LPG_PUMP"]),
    ("pump", &["LPG_PUMP"]),
    ("ecu", &["LPG_ECU"]),
    ("control unit", &["LPG_ECU"]),
    ("controller", &["LPG_ECU"]),
    ("electrical", &["LPG_ELECTRICAL_SYSTEM"]),
    ("wiring", &["LPG_ELECTRICAL_SYSTEM"]),
    ("cable", &["LPG_ELECTRICAL_SYSTEM"]),
    ("connector", &["LPG_CONNECTOR"]),
    ("system", &["LPG_SYSTEM"]),
];

/// Built-in test keywords, in declaration order.
const TEST_KEYWORDS: &[(&str, &[&str])] = &[
    ("pressure", &["TEST_PRESSURE"]),
    ("leak", &["TEST_LEAK"]),
    ("leakage", &["TEST_LEAK"]),
    ("fire", &["TEST_FIRE"]),
    ("crash", &["TEST_CRASH"]),
    ("impact", &["TEST_IMPACT"]),
    ("drop", &["TEST_DROP"]),
    ("temperature", &["TEST_THERMAL"]),
    ("durability", &["TEST_DURABILITY"]),
];

/// Built-in document keywords, in declaration order.
const DOCUMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("documentation", &["DOC_SYSTEM_SPEC"]),
    ("manual", &["DOC_USER_MANUAL"]),
    ("installation", &["DOC_INSTALLATION_GUIDE"]),
    ("certificate", &["DOC_CONFORMITY_REPORT"]),
    ("conformity", &["DOC_CONFORMITY_REPORT"]),
    ("marking", &["DOC_LABELING"]),
    ("label", &["DOC_LABELING"]),
];

/// One keyword and the identifiers it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule<T> {
    keyword: String,
    ids: Vec<T>,
}

impl<T> KeywordRule<T> {
    /// The lowercase keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Identifiers contributed when the keyword matches.
    pub fn ids(&self) -> &[T] {
        &self.ids
    }
}

/// An ordered keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable<T> {
    name: &'static str,
    rules: Vec<KeywordRule<T>>,
}

impl<T: Clone + PartialEq> KeywordTable<T> {
    /// Create an empty table.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Append a rule. The keyword is lowercased and trimmed; blank keywords
    /// are ignored since they would match every text.
    pub fn push(&mut self, keyword: &str, ids: impl IntoIterator<Item = T>) {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            tracing::warn!(table = self.name, "ignoring blank keyword rule");
            return;
        }
        self.rules.push(KeywordRule {
            keyword,
            ids: ids.into_iter().collect(),
        });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_rule(mut self, keyword: &str, ids: impl IntoIterator<Item = T>) -> Self {
        self.push(keyword, ids);
        self
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All identifiers whose keyword occurs in `text`, deduplicated, in
    /// table declaration order.
    pub fn lookup(&self, text: &str) -> Vec<T> {
        let lowered = text.to_lowercase();
        let mut out: Vec<T> = Vec::new();
        for rule in &self.rules {
            if !lowered.contains(rule.keyword.as_str()) {
                continue;
            }
            tracing::debug!(table = self.name, keyword = %rule.keyword, "keyword matched");
            for id in &rule.ids {
                if !out.contains(id) {
                    out.push(id.clone());
                }
            }
        }
        out
    }
}

fn builtin_table<T, E>(
    name: &'static str,
    source: &[(&str, &[&str])],
    make: impl Fn(&str) -> Result<T, E>,
) -> KeywordTable<T>
where
    T: Clone + PartialEq,
{
    let mut table = KeywordTable::new(name);
    for (keyword, ids) in source {
        table.push(keyword, ids.iter().filter_map(|id| make(*id).ok()));
    }
    table
}

/// The three keyword tables consulted by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTables {
    /// Component table.
    pub components: KeywordTable<ComponentId>,
    /// Test table.
    pub tests: KeywordTable<TestId>,
    /// Document table.
    pub documents: KeywordTable<DocumentId>,
}

impl RuleTables {
    /// The built-in LPG / automotive tables.
    pub fn builtin() -> Self {
        Self {
            components: builtin_table("components", COMPONENT_KEYWORDS, |id| {
                ComponentId::new(id)
            }),
            tests: builtin_table("tests", TEST_KEYWORDS, |id| TestId::new(id)),
            documents: builtin_table("documents", DOCUMENT_KEYWORDS, |id| {
                DocumentId::new(id)
            }),
        }
    }

    /// Tables with no rules at all.
    pub fn empty() -> Self {
        Self {
            components: KeywordTable::new("components"),
            tests: KeywordTable::new("tests"),
            documents: KeywordTable::new("documents"),
        }
    }

    /// Components mentioned by `text`.
    pub fn lookup_components(&self, text: &str) -> Vec<ComponentId> {
        self.components.lookup(text)
    }

    /// Tests mentioned by `text`.
    pub fn lookup_tests(&self, text: &str) -> Vec<TestId> {
        self.tests.lookup(text)
    }

    /// Documents mentioned by `text`.
    pub fn lookup_documents(&self, text: &str) -> Vec<DocumentId> {
        self.documents.lookup(text)
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::builtin()
    }
}
