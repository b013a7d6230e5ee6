#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fincache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the fincache read-through cache.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`DocumentStore`](store::DocumentStore) - Persistent store with upsert semantics
//! - [`FundamentalsProvider`](provider::FundamentalsProvider) - Upstream profile/statement source
//! - [`Clock`](clock::Clock) - Server clock used for `modified_at` stamps and "today"
//! - [`is_fresh`](freshness::is_fresh) - Profile freshness policy

/// Server clock abstraction.
pub mod clock;
/// Error types for cache operations.
pub mod error;
/// Freshness policy for cached company profiles.
pub mod freshness;
/// Upstream provider trait.
pub mod provider;
/// Document store trait.
pub mod store;
/// Record types (Symbol, CompanyProfile, FinancialStatement, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DataError, Result};
pub use freshness::is_fresh;
pub use provider::FundamentalsProvider;
pub use store::DocumentStore;
pub use types::{
    CompanyProfile, Fields, FinancialStatement, RecordId, ReferenceItem, StatementKey,
    StatementType, Symbol, UserInput,
};
