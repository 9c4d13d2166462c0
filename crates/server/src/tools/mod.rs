//! MCP tool implementations.
//!
//! This module contains all tools exposed by the bank-suggest server.

pub mod bank_search;
pub mod cache;

#[cfg(test)]
pub(crate) mod testing;
