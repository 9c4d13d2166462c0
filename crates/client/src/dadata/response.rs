//! Suggestion response types and validation.
//!
//! The service's schema is treated as given: every bank field is optional and
//! unknown fields are ignored. Only the envelope is validated strictly.

use banksuggest_core::{BankStatus, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validated response from the suggestion service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<BankSuggestion>,
}

/// One suggested bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankSuggestion {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub unrestricted_value: String,
    #[serde(default)]
    pub data: BankData,
}

/// Bank fields as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankData {
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub swift: Option<String>,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub kpp: Option<String>,
    #[serde(default)]
    pub correspondent_account: Option<String>,
    #[serde(default)]
    pub treasury_accounts: Option<Vec<String>>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub payment_city: Option<String>,
    #[serde(default)]
    pub name: Option<BankName>,
    #[serde(default)]
    pub address: Option<BankAddress>,
    #[serde(default)]
    pub state: Option<BankState>,
    #[serde(default)]
    pub opf: Option<BankOpf>,
    #[serde(default)]
    pub phones: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankName {
    #[serde(default)]
    pub payment: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub short: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAddress {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub unrestricted_value: Option<String>,
}

/// Registration state. Dates are milliseconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankState {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub actuality_date: Option<i64>,
    #[serde(default)]
    pub registration_date: Option<i64>,
    #[serde(default)]
    pub liquidation_date: Option<i64>,
}

impl BankState {
    /// The status as a known enum value, if it is one.
    pub fn status(&self) -> Option<BankStatus> {
        let status = self.status.as_deref()?;
        serde_json::from_value(Value::String(status.to_string())).ok()
    }
}

/// Organisational and legal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankOpf {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub short: Option<String>,
}

impl SuggestionResponse {
    /// Response with no suggestions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate a response body.
    ///
    /// The body must be a JSON object whose `suggestions` field is an array
    /// of objects; anything else is rejected rather than partially accepted.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidResponse(format!("body is not JSON: {e}")))?;

        let Value::Object(map) = &value else {
            return Err(Error::InvalidResponse("expected a JSON object".into()));
        };

        match map.get("suggestions") {
            Some(Value::Array(items)) if items.iter().all(Value::is_object) => {}
            Some(Value::Array(_)) => {
                return Err(Error::InvalidResponse("every suggestion must be an object".into()));
            }
            _ => return Err(Error::InvalidResponse("missing `suggestions` array".into())),
        }

        serde_json::from_value(value).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// Number of suggestions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

impl BankSuggestion {
    /// The BIC, if reported.
    pub fn bic(&self) -> Option<&str> {
        self.data.bic.as_deref()
    }

    /// Best available display name.
    pub fn display_name(&self) -> &str {
        self.data
            .name
            .as_ref()
            .and_then(|n| n.payment.as_deref().or(n.short.as_deref()).or(n.full.as_deref()))
            .unwrap_or(&self.value)
    }
}
