//! Loading regulation and product files.
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
//! JSON.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use regtrace_core::{Product, Regulation};
use regtrace_ingest::{normalize_batch, normalize_eu_record, normalize_us_record, SourceRecord};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegulationsDocument {
    List(Vec<Regulation>),
    Bundle(SourceBundle),
}

/// Normalized regulations and raw records from the acquisition sources.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceBundle {
    #[serde(default)]
    regulations: Vec<Regulation>,
    #[serde(default)]
    eur_lex: Vec<SourceRecord>,
    #[serde(default)]
    federal_register: Vec<SourceRecord>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Read and parse a JSON or YAML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON from {}", path.display()))
    }
}

/// Load regulations, normalizing raw source records. Invalid raw records
/// are skipped with a warning; a file that yields nothing is an error.
pub fn load_regulations(path: &Path) -> Result<Vec<Regulation>> {
    let regulations = match read_document::<RegulationsDocument>(path)? {
        RegulationsDocument::List(list) => list,
        RegulationsDocument::Bundle(bundle) => {
            let mut all = bundle.regulations;
            all.extend(normalize_batch(&bundle.eur_lex, normalize_eu_record));
            all.extend(normalize_batch(&bundle.federal_register, normalize_us_record));
            all
        }
    };
    if regulations.is_empty() {
        bail!("no regulations found in {}", path.display());
    }
    tracing::info!(count = regulations.len(), path = %path.display(), "regulations loaded");
    Ok(regulations)
}

/// Load the product compliance is measured against.
pub fn load_product(path: &Path) -> Result<Product> {
    let product: Product = read_document(path)?;
    tracing::info!(product_id = %product.id, tests = product.tests.len(), "product loaded");
    Ok(product)
}
