#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamental valuation of listed companies.
//!
//! This crate re-exports the core types and store backends, and provides a
//! [`Valuator`] that collects filings for a ticker once, derives its
//! valuation, persists it and answers discounted cash flow queries.
//!
//! # Features
//!
//! - `store-sqlite` - SQLite-backed store (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use valuator::{JsonFilingSource, StaticPriceSource, Ticker, Valuator, ValuatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> valuator::Result<()> {
//!     let config = ValuatorConfig::load("valuator.json")?;
//!     let valuator = Valuator::from_config(
//!         &config,
//!         Arc::new(JsonFilingSource::new("filings")),
//!         Some(Arc::new(StaticPriceSource::new().with_price("KO", 45.5))),
//!     )?;
//!
//!     let ticker = Ticker::new("KO");
//!     valuator.collect(&ticker, &[]).await?;
//!     let value = valuator.discounted_cash_flow(&ticker, 9.0, 1.2, 0.1, 10, &[]).await?;
//!     println!("{ticker}: {value}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use valuator_core::*;

// Store implementations
#[cfg(feature = "store-sqlite")]
pub use valuator_store::SqliteStore;
pub use valuator_store::{FileStore, InMemoryStore, NoopStore, RemoteStore, StoreConfig};

/// Configuration file handling.
pub mod config;
pub use config::ValuatorConfig;

mod registry;
pub use registry::{CollectState, Valuator, ValuatorBuilder};

/// Local filing and price sources.
pub mod sources;
pub use sources::{JsonFilingSource, StaticPriceSource};
