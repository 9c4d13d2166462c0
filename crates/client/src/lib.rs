//! Client code for bank-suggest.
//!
//! This crate provides the suggestion service client (transport, caching and
//! request coalescing) and formatting of bank details for display.

pub mod dadata;
pub mod format;

pub use dadata::{
    BankAddress, BankData, BankName, BankOpf, BankState, BankSuggestion, HttpTransport, RawResponse, SuggestClient,
    SuggestConfig, SuggestRequest, SuggestionResponse, Transport,
};
pub use format::{BankDetails, DetailLine, format_account, format_bic, format_date, format_inn, status_label};

pub use banksuggest_core::{
    AppConfig, BankStatus, BankType, CacheStats, Error, ErrorInfo, ErrorKind, LocationBoost, LocationFilter,
    SearchOptions, classify,
};
