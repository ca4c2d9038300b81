//! # Markets
//!
//! A [`Market`] is the country or regulatory zone a regulation applies to
//! and a product is sold in (`EU`, `USA`, `UNECE`, ...). Codes are compared
//! exactly: `EU` and `eu` are different markets. Case-insensitive matching
//! is a query concern and lives with the catalogue search.
//!
//! [`MarketStatus`] is the per-market review verdict an engineer records
//! on a requirement.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A country or regulatory zone code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Market(String);

impl Market {
    /// Create a market code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMarket`] if the code is empty.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let s = code.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidMarket);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the market code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw code.
    pub fn matches_ignore_case(&self, code: &str) -> bool {
        self.0.eq_ignore_ascii_case(code.trim())
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Market {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Market> for String {
    fn from(m: Market) -> String {
        m.0
    }
}

/// Review verdict for a requirement in one market.
///
/// `Unset` is never stored: recording it clears the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketStatus {
    /// Requirement is satisfied for this market.
    Ok,
    /// Requirement is not satisfied for this market.
    Nok,
    /// Requirement does not apply to this market.
    Na,
    /// No verdict.
    Unset,
}

impl MarketStatus {
    /// Return all market status variants.
    pub fn all() -> &'static [MarketStatus] {
        &[Self::Ok, Self::Nok, Self::Na, Self::Unset]
    }

    /// Return the canonical string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Nok => "NOK",
            Self::Na => "NA",
            Self::Unset => "UNSET",
        }
    }
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MarketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "NOK" => Ok(Self::Nok),
            "NA" => Ok(Self::Na),
            "UNSET" | "" => Ok(Self::Unset),
            _ => Err(ValidationError::UnknownMarketStatus(s.to_string())),
        }
    }
}
