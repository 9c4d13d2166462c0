//! Display formatting for bank details.
//!
//! Pure string transforms. Inputs that do not have the expected shape are
//! returned unchanged rather than rejected.

use std::sync::LazyLock;

use banksuggest_core::BankStatus;
use chrono::DateTime;
use regex::Regex;
use serde::Serialize;

use crate::BankSuggestion;

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(\d{3})(\d)(\d{4})(\d{7})$").expect("account pattern is valid"));

static BIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})(\d{2})(\d{3})$").expect("BIC pattern is valid"));

static INN_LEGAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})(\d{5})(\d)$").expect("INN pattern is valid"));

static INN_PERSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})(\d{6})(\d{2})$").expect("INN pattern is valid"));

/// Group a 20-digit account number: balance account, currency, check digit,
/// branch, account.
///
/// `30101810400000000225` → `30101 810 4 0000 0000225`
pub fn format_account(account: &str) -> String {
    let account = account.trim();
    ACCOUNT_RE.replace(account, "$1 $2 $3 $4 $5").into_owned()
}

/// Group a 9-digit BIC: country, region, division, institution.
///
/// `044525225` → `04 45 25 225`
pub fn format_bic(bic: &str) -> String {
    let bic = bic.trim();
    BIC_RE.replace(bic, "$1 $2 $3 $4").into_owned()
}

/// Group a tax ID: 10 digits for organisations, 12 for individuals.
pub fn format_inn(inn: &str) -> String {
    let inn = inn.trim();
    match inn.len() {
        10 => INN_LEGAL_RE.replace(inn, "$1 $2 $3 $4").into_owned(),
        12 => INN_PERSON_RE.replace(inn, "$1 $2 $3 $4").into_owned(),
        _ => inn.to_string(),
    }
}

/// Format a millisecond Unix timestamp as `dd.mm.yyyy` (UTC).
pub fn format_date(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.format("%d.%m.%Y").to_string())
}

/// Human-readable label for a bank status string.
pub fn status_label(status: &str) -> &'static str {
    match serde_json::from_value::<BankStatus>(serde_json::Value::String(status.to_string())) {
        Ok(BankStatus::Active) => "Active",
        Ok(BankStatus::Liquidating) => "Liquidating",
        Ok(BankStatus::Liquidated) => "Liquidated",
        Err(_) => "Unknown",
    }
}

/// One labelled row of a detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

/// Formatted details of one bank, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankDetails {
    pub title: String,
    pub lines: Vec<DetailLine>,
}

impl BankDetails {
    /// Value of the row with the given label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.lines.iter().find(|l| l.label == label).map(|l| l.value.as_str())
    }

    /// Render as `label: value` lines under the title.
    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        for line in &self.lines {
            out.push('\n');
            out.push_str(line.label);
            out.push_str(": ");
            out.push_str(&line.value);
        }
        out
    }
}

impl From<&BankSuggestion> for BankDetails {
    fn from(suggestion: &BankSuggestion) -> Self {
        let data = &suggestion.data;
        let mut lines = Vec::new();

        let mut push = |label: &'static str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                lines.push(DetailLine { label, value });
            }
        };

        push("BIC", data.bic.as_deref().map(format_bic));
        push("SWIFT", data.swift.clone());
        push("INN", data.inn.as_deref().map(format_inn));
        push("KPP", data.kpp.clone());
        push("Correspondent account", data.correspondent_account.as_deref().map(format_account));
        push(
            "Treasury accounts",
            data.treasury_accounts
                .as_ref()
                .map(|accounts| accounts.iter().map(|a| format_account(a)).collect::<Vec<_>>().join(", ")),
        );
        push("Payment city", data.payment_city.clone());
        push("Address", data.address.as_ref().and_then(|a| a.value.clone()));

        if let Some(state) = &data.state {
            push("Status", state.status.as_deref().map(|s| status_label(s).to_string()));
            push("Registered", state.registration_date.and_then(format_date));
            push("Liquidated", state.liquidation_date.and_then(format_date));
        }

        Self { title: suggestion.display_name().to_string(), lines }
    }
}
