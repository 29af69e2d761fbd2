//! Error types for valuation operations.
//!
//! This module defines [`ValuatorError`] which covers all error cases that can occur
//! when collecting filings, deriving measures, projecting valuations, or persisting
//! results.

use thiserror::Error;

use crate::types::FilingField;

/// Errors that can occur during valuation operations.
#[derive(Error, Debug)]
pub enum ValuatorError {
    /// A statement line required for a calculation is not present in the filing.
    #[error("Missing filing field: {0}")]
    MissingField(FilingField),

    /// No filings could be retrieved for the ticker.
    #[error("No data available: {0}")]
    NoData(String),

    /// None of the measures in a series carries year-over-year data.
    #[error("No year-over-year data for {0}")]
    NoYearOverYear(String),

    /// A valuation was requested for a ticker that has not been collected.
    #[error("Valuator has not collected data on {0}")]
    NotCollected(String),

    /// Collection was requested for a ticker that is already collected.
    #[error("Collection for ticker {0} is already done")]
    AlreadyCollected(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested key does not exist in the store.
    #[error("Key not found in store: {0}")]
    NotFound(String),

    /// Error reading from or writing to the store.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing a payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The requested collaborator is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// The requested feature is not supported.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl ValuatorError {
    /// Returns true if this error reports an absent store key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using [`ValuatorError`].
pub type Result<T> = std::result::Result<T, ValuatorError>;
