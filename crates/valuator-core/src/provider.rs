//! Collaborator traits for acquiring filings and prices.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all collaborators
//! - [`FilingSource`] - Per-period financial statements
//! - [`PriceSource`] - Current market price

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    period::PeriodType,
    types::{Filing, Ticker},
};

/// Base trait for all data providers.
///
/// All data providers must implement this trait to provide basic metadata
/// about the provider.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Source of financial statement filings.
///
/// A source may be seeded with a raw payload it produced earlier through
/// [`FilingSource::serialize_raw`], which lets callers skip a refetch when that
/// payload was cached.
#[async_trait]
pub trait FilingSource: DataProvider {
    /// Returns the period types this source can deliver.
    fn supported_periods(&self) -> &[PeriodType];

    /// Fetches the filings of a ticker.
    ///
    /// # Arguments
    ///
    /// * `ticker` - The company ticker
    /// * `period_type` - Annual or Quarterly
    /// * `cached` - Raw payload from a previous [`FilingSource::serialize_raw`], if any
    async fn fetch_filings(
        &self,
        ticker: &Ticker,
        period_type: PeriodType,
        cached: Option<&[u8]>,
    ) -> Result<Vec<Filing>>;

    /// Serializes the raw payload behind the last fetch for a ticker.
    async fn serialize_raw(&self, ticker: &Ticker) -> Result<Vec<u8>>;
}

/// Source of current market prices.
#[async_trait]
pub trait PriceSource: DataProvider {
    /// Fetches the current price of one share.
    async fn current_price(&self, ticker: &Ticker) -> Result<f64>;
}
