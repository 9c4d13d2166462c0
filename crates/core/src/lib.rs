//! Core types and shared functionality for bank-suggest.
//!
//! This crate provides:
//! - In-memory TTL cache with FIFO capacity eviction
//! - Search options and cache key canonicalization
//! - Unified error types and the error classifier
//! - Configuration structures

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod options;

pub use cache::{CacheStats, MemoryCache};
pub use classify::{ErrorInfo, ErrorKind, classify};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use options::{BankStatus, BankType, LocationBoost, LocationFilter, SearchOptions};
