#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and valuation math.
//!
//! This crate provides the building blocks of the valuation engine:
//!
//! - [`Filing`](types::Filing) - One period's statement values
//! - [`Measures`](measures::Measures) - Ratios derived from a filing
//! - [`YoY`](yoy::YoY) and [`Averages`](averages::Averages) - Growth history
//! - [`PriceBasedMetrics`](pbm::PriceBasedMetrics) - Price-relative ratios
//! - [`dcf`] - Discounted cash flow projection
//! - [`FilingSource`](provider::FilingSource), [`PriceSource`](provider::PriceSource)
//!   and [`Store`](store::Store) - Collaborator traits

/// Mean growth across a series.
pub mod averages;
/// Discounted cash flow projection.
pub mod dcf;
/// Error types for valuation operations.
pub mod error;
/// Tabular export with polars.
pub mod frame;
/// Truncating numeric helpers.
pub mod math;
/// Ratio derivation.
pub mod measures;
/// Market-price-relative metrics.
pub mod pbm;
/// Filing period definitions.
pub mod period;
/// Collaborator traits for filings and prices.
pub mod provider;
/// Byte store abstraction and key layout.
pub mod store;
/// Core data types (Ticker, Filing, etc.).
pub mod types;
/// The per-ticker valuation record.
pub mod valuation;
/// Published JSON names.
pub mod wire;
/// Year-over-year growth.
pub mod yoy;

// Re-export commonly used items at crate root
pub use averages::Averages;
pub use error::{Result, ValuatorError};
pub use frame::measures_frame;
pub use measures::Measures;
pub use pbm::PriceBasedMetrics;
pub use period::PeriodType;
pub use provider::{DataProvider, FilingSource, PriceSource};
pub use store::{Store, filings_key, valuation_key};
pub use types::{Filing, FilingField, Ticker};
pub use valuation::{Valuation, analyze};
pub use yoy::{YoY, link_series};
