#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fincache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Read-through cache for company fundamentals.
//!
//! This crate wires a [`DocumentStore`] and a [`FundamentalsProvider`] into a
//! [`ReadThroughCache`]. It re-exports the core types and the store and
//! provider implementations so applications only need one dependency.
//!
//! # Features
//!
//! - `fmp` - Financial Modeling Prep provider (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fincache::{FmpProvider, ReadThroughCache, SqliteStore, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> fincache::Result<()> {
//!     let store = Arc::new(SqliteStore::new("fincache.db")?);
//!     let provider = Arc::new(FmpProvider::new("your-api-key"));
//!     let cache = ReadThroughCache::new(store, provider);
//!
//!     let profile = cache.get_profile(&Symbol::new("AAPL")).await?;
//!     println!("{:?}", profile.field("companyName"));
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use fincache_core::*;

// Store implementations
pub use fincache_store::{InMemoryStore, SqliteStore};

// Providers
#[cfg(feature = "fmp")]
pub use fincache_fmp::FmpProvider;

mod cache;
pub use cache::{ReadThroughCache, SeedReport};

pub mod sync;

#[cfg(test)]
mod testing;
