//! Search options for bank suggestion requests.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// Default number of suggestions.
pub const DEFAULT_COUNT: u8 = 10;

/// Largest count the suggestion service accepts.
pub const MAX_COUNT: u8 = 20;

/// Legal status of a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankStatus {
    Active,
    Liquidating,
    Liquidated,
}

/// Kind of credit institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankType {
    Bank,
    BankBranch,
    Nko,
    NkoBranch,
    Rkc,
    Cbr,
    Treasury,
    Other,
}

/// Restrict suggestions to a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kladr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fias_id: Option<String>,
}

/// Rank suggestions from a location higher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationBoost {
    pub kladr_id: String,
}

/// Options sent alongside the query.
///
/// Sets are ordered so that serialization is independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchOptions {
    /// Number of suggestions (1-20, default 10).
    #[serde(default = "default_count")]
    pub count: u8,

    /// Statuses to include (default ACTIVE).
    #[serde(default = "default_status")]
    pub status: BTreeSet<BankStatus>,

    /// Institution kinds to include (default BANK).
    #[serde(rename = "type", default = "default_types")]
    pub types: BTreeSet<BankType>,

    /// Location filters, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<LocationFilter>,

    /// Location boosts, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations_boost: Vec<LocationBoost>,
}

fn default_count() -> u8 {
    DEFAULT_COUNT
}

fn default_status() -> BTreeSet<BankStatus> {
    BTreeSet::from([BankStatus::Active])
}

fn default_types() -> BTreeSet<BankType> {
    BTreeSet::from([BankType::Bank])
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            count: default_count(),
            status: default_status(),
            types: default_types(),
            locations: Vec::new(),
            locations_boost: Vec::new(),
        }
    }
}

impl SearchOptions {
    /// Options with the given count and every other field defaulted.
    pub fn with_count(count: u8) -> Self {
        Self { count, ..Default::default() }
    }

    /// Validate option values.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_COUNT).contains(&self.count) {
            return Err(Error::InvalidInput(format!("count must be 1-{MAX_COUNT}, got {}", self.count)));
        }

        if self.status.is_empty() {
            return Err(Error::InvalidInput("status must not be empty".into()));
        }

        if self.types.is_empty() {
            return Err(Error::InvalidInput("type must not be empty".into()));
        }

        Ok(())
    }

    /// Canonical JSON for cache keys: object keys sorted at every level.
    pub fn canonical_json(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        canonicalize(value).to_string()
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, canonicalize(v))).collect::<Map<_, _>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
