//! Reporting period definitions.
//!
//! This module defines [`PeriodType`] for the cadence of the filings a source returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValuatorError;

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl PeriodType {
    /// Returns the SEC form that carries this period's statements.
    #[must_use]
    pub const fn form(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annual => f.write_str("annual"),
            Self::Quarterly => f.write_str("quarterly"),
        }
    }
}

impl FromStr for PeriodType {
    type Err = ValuatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" | "10-k" => Ok(Self::Annual),
            "quarterly" | "10-q" => Ok(Self::Quarterly),
            other => Err(ValuatorError::InvalidParameter(format!(
                "Invalid period type: {}",
                other
            ))),
        }
    }
}
