//! Core data types for filings.
//!
//! This module defines the data carriers the valuation engine reads:
//!
//! - [`Ticker`] - Company identifier
//! - [`Filing`] - One period's financial statement values
//! - [`FilingField`] - Names of the individual statement lines

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValuatorError};
use crate::period::PeriodType;

/// A company ticker.
///
/// Tickers are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single statement line of a [`Filing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilingField {
    /// Total revenue.
    Revenue,
    /// Cost of revenue (COGS).
    CostOfRevenue,
    /// Gross margin (gross profit).
    GrossMargin,
    /// Operating income.
    OperatingIncome,
    /// Operating expense.
    OperatingExpense,
    /// Net income.
    NetIncome,
    /// Total stockholders' equity.
    TotalEquity,
    /// Short-term debt.
    ShortTermDebt,
    /// Long-term debt.
    LongTermDebt,
    /// Current assets.
    CurrentAssets,
    /// Current liabilities.
    CurrentLiabilities,
    /// Cash and cash equivalents.
    Cash,
    /// Dividends paid.
    Dividend,
    /// Dividend declared per share.
    DividendPerShare,
    /// Shares outstanding.
    ShareCount,
    /// Operating cash flow.
    OperatingCashFlow,
    /// Capital expenditure.
    CapitalExpenditure,
}

impl FilingField {
    /// Returns a human readable name for the statement line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::CostOfRevenue => "cost of revenue",
            Self::GrossMargin => "gross margin",
            Self::OperatingIncome => "operating income",
            Self::OperatingExpense => "operating expense",
            Self::NetIncome => "net income",
            Self::TotalEquity => "total equity",
            Self::ShortTermDebt => "short-term debt",
            Self::LongTermDebt => "long-term debt",
            Self::CurrentAssets => "current assets",
            Self::CurrentLiabilities => "current liabilities",
            Self::Cash => "cash",
            Self::Dividend => "dividend",
            Self::DividendPerShare => "dividend per share",
            Self::ShareCount => "share count",
            Self::OperatingCashFlow => "operating cash flow",
            Self::CapitalExpenditure => "capital expenditure",
        }
    }
}

impl fmt::Display for FilingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fiscal period's financial statement values for a ticker.
///
/// Every statement line is optional since sources do not report all of them for
/// every company. Use [`Filing::value`] to read a line as a [`Result`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    /// Company ticker.
    pub ticker: Ticker,
    /// Date the filing was submitted.
    pub filed_on: NaiveDate,
    /// Type of period (annual or quarterly).
    #[serde(default)]
    pub period_type: PeriodType,

    // Income Statement
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Cost of revenue (COGS).
    pub cost_of_revenue: Option<f64>,
    /// Gross margin (gross profit).
    pub gross_margin: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Operating expense.
    pub operating_expense: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,

    // Balance Sheet
    /// Total stockholders' equity.
    pub total_equity: Option<f64>,
    /// Short-term debt.
    pub short_term_debt: Option<f64>,
    /// Long-term debt.
    pub long_term_debt: Option<f64>,
    /// Current assets.
    pub current_assets: Option<f64>,
    /// Current liabilities.
    pub current_liabilities: Option<f64>,
    /// Cash and cash equivalents.
    pub cash: Option<f64>,

    // Cash Flow Statement
    /// Dividends paid.
    pub dividend: Option<f64>,
    /// Dividend declared per share.
    pub dividend_per_share: Option<f64>,
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure.
    pub capital_expenditure: Option<f64>,

    // Shares
    /// Shares outstanding.
    pub share_count: Option<f64>,
}

impl Filing {
    /// Creates a new filing with required fields.
    #[must_use]
    pub fn new(ticker: Ticker, filed_on: NaiveDate, period_type: PeriodType) -> Self {
        Self {
            ticker,
            filed_on,
            period_type,
            ..Default::default()
        }
    }

    /// Returns the calendar year the filing was submitted in.
    #[must_use]
    pub fn filed_year(&self) -> i32 {
        self.filed_on.year()
    }

    /// Reads a statement line.
    ///
    /// The gross margin falls back to revenue minus cost of revenue when the
    /// filing does not report it directly.
    ///
    /// # Errors
    /// Returns [`ValuatorError::MissingField`] if the line is not present.
    pub fn value(&self, field: FilingField) -> Result<f64> {
        let value = match field {
            FilingField::Revenue => self.revenue,
            FilingField::CostOfRevenue => self.cost_of_revenue,
            FilingField::GrossMargin => self.gross_margin.or_else(|| {
                self.revenue
                    .zip(self.cost_of_revenue)
                    .map(|(rev, cost)| rev - cost)
            }),
            FilingField::OperatingIncome => self.operating_income,
            FilingField::OperatingExpense => self.operating_expense,
            FilingField::NetIncome => self.net_income,
            FilingField::TotalEquity => self.total_equity,
            FilingField::ShortTermDebt => self.short_term_debt,
            FilingField::LongTermDebt => self.long_term_debt,
            FilingField::CurrentAssets => self.current_assets,
            FilingField::CurrentLiabilities => self.current_liabilities,
            FilingField::Cash => self.cash,
            FilingField::Dividend => self.dividend,
            FilingField::DividendPerShare => self.dividend_per_share,
            FilingField::ShareCount => self.share_count,
            FilingField::OperatingCashFlow => self.operating_cash_flow,
            FilingField::CapitalExpenditure => self.capital_expenditure,
        };
        value.ok_or(ValuatorError::MissingField(field))
    }

    /// Reads a statement line, treating an absent line as zero.
    #[must_use]
    pub fn value_or_zero(&self, field: FilingField) -> f64 {
        self.value(field).unwrap_or(0.0)
    }
}
