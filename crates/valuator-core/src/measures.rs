//! Ratio derivation for a single filing.
//!
//! [`Measures::derive`] turns one [`Filing`] into a fixed set of ratios. A ratio
//! whose statement lines are missing is reported as `0`; the missing line never
//! reaches the caller. Apart from operating leverage, divisions are not guarded
//! and follow IEEE semantics.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::{
    error::Result,
    math::{percent, round},
    types::{Filing, FilingField},
    wire::{self, MEASURES_FIELDS, YOY_KEY},
    yoy::YoY,
};

/// Ratios derived from one filing.
#[derive(Clone, Debug, PartialEq)]
pub struct Measures {
    filing: Filing,
    book_value: f64,
    contribution_margin: f64,
    operating_margin: f64,
    operating_leverage: f64,
    financial_leverage: f64,
    return_on_equity: f64,
    return_on_assets: f64,
    dividend_per_share: f64,
    free_cash_flow: f64,
    payout_to_fcf: f64,
    working_capital: f64,
    current_ratio: f64,
    yoy: Option<YoY>,
}

/// Evaluates a ratio, reporting `0` when one of its lines is missing.
fn or_zero(filing: &Filing, ratio: &'static str, f: impl FnOnce(&Filing) -> Result<f64>) -> f64 {
    match f(filing) {
        Ok(value) => value,
        Err(e) => {
            trace!(ticker = %filing.ticker, filed_on = %filing.filed_on, ratio, error = %e, "Ratio unavailable");
            0.0
        }
    }
}

impl Measures {
    /// Derives the measures of a filing.
    #[must_use]
    pub fn derive(filing: Filing) -> Self {
        let contribution_margin = or_zero(&filing, "contribution margin", |f| {
            let rev = f.value(FilingField::Revenue)?;
            let cost = f.value(FilingField::CostOfRevenue)?;
            Ok(percent((rev - cost) / rev))
        });
        let operating_margin = or_zero(&filing, "operating margin", |f| {
            let oi = f.value(FilingField::OperatingIncome)?;
            let rev = f.value(FilingField::Revenue)?;
            Ok(percent(oi / rev))
        });
        let operating_leverage = if operating_margin == 0.0 {
            0.0
        } else {
            round(contribution_margin / operating_margin)
        };

        let book_value = or_zero(&filing, "book value", |f| {
            let eq = f.value(FilingField::TotalEquity)?;
            let shares = f.value(FilingField::ShareCount)?;
            Ok(round(eq / shares))
        });
        let financial_leverage = or_zero(&filing, "financial leverage", |f| {
            let eq = f.value(FilingField::TotalEquity)?;
            let long = f.value(FilingField::LongTermDebt)?;
            let short = f.value(FilingField::ShortTermDebt)?;
            Ok(percent((long + short) / eq))
        });
        let return_on_equity = or_zero(&filing, "return on equity", |f| {
            let ni = f.value(FilingField::NetIncome)?;
            let eq = f.value(FilingField::TotalEquity)?;
            Ok(percent(ni / eq))
        });
        let free_cash_flow = or_zero(&filing, "free cash flow", |f| {
            f.value(FilingField::OperatingCashFlow)
        });
        let payout_to_fcf = or_zero(&filing, "dividend to fcf", |f| {
            let div = f.value(FilingField::Dividend)?;
            let fcf = f.value(FilingField::OperatingCashFlow)?;
            Ok(percent(div / fcf))
        });
        let working_capital = or_zero(&filing, "working capital", |f| {
            Ok(f.value(FilingField::CurrentAssets)? - f.value(FilingField::CurrentLiabilities)?)
        });
        let current_ratio = or_zero(&filing, "current ratio", |f| {
            let assets = f.value(FilingField::CurrentAssets)?;
            let liabilities = f.value(FilingField::CurrentLiabilities)?;
            Ok(round(assets / liabilities))
        });
        let dividend_per_share = filing.value_or_zero(FilingField::DividendPerShare);

        Self {
            filing,
            book_value,
            contribution_margin,
            operating_margin,
            operating_leverage,
            financial_leverage,
            return_on_equity,
            // Not implemented; reported as 0.
            return_on_assets: 0.0,
            dividend_per_share,
            free_cash_flow,
            payout_to_fcf,
            working_capital,
            current_ratio,
            yoy: None,
        }
    }

    /// Derives the measures of every filing and sorts them by filing date.
    #[must_use]
    pub fn derive_series(filings: Vec<Filing>) -> Vec<Self> {
        let mut series: Vec<Self> = filings.into_iter().map(Self::derive).collect();
        series.sort_by(|a, b| a.filing.filed_on.cmp(&b.filing.filed_on));
        series
    }

    /// The filing these measures were derived from.
    #[must_use]
    pub const fn filing(&self) -> &Filing {
        &self.filing
    }

    /// Book value per share.
    #[must_use]
    pub const fn book_value(&self) -> f64 {
        self.book_value
    }

    /// Contribution margin in percent.
    #[must_use]
    pub const fn contribution_margin(&self) -> f64 {
        self.contribution_margin
    }

    /// Operating margin in percent.
    #[must_use]
    pub const fn operating_margin(&self) -> f64 {
        self.operating_margin
    }

    /// Ratio of contribution margin to operating margin.
    #[must_use]
    pub const fn operating_leverage(&self) -> f64 {
        self.operating_leverage
    }

    /// Total debt to equity in percent.
    #[must_use]
    pub const fn financial_leverage(&self) -> f64 {
        self.financial_leverage
    }

    /// Return on equity in percent.
    #[must_use]
    pub const fn return_on_equity(&self) -> f64 {
        self.return_on_equity
    }

    /// Return on assets. Always `0`.
    #[must_use]
    pub const fn return_on_assets(&self) -> f64 {
        self.return_on_assets
    }

    /// Dividend per share as reported by the filing.
    #[must_use]
    pub const fn dividend_per_share(&self) -> f64 {
        self.dividend_per_share
    }

    /// Free cash flow (operating cash flow).
    #[must_use]
    pub const fn free_cash_flow(&self) -> f64 {
        self.free_cash_flow
    }

    /// Dividends paid as a percentage of free cash flow.
    #[must_use]
    pub const fn payout_to_fcf(&self) -> f64 {
        self.payout_to_fcf
    }

    /// Current assets minus current liabilities.
    #[must_use]
    pub const fn working_capital(&self) -> f64 {
        self.working_capital
    }

    /// Current assets over current liabilities.
    #[must_use]
    pub const fn current_ratio(&self) -> f64 {
        self.current_ratio
    }

    /// Growth against the previous period, absent for the first period of a series.
    #[must_use]
    pub const fn yoy(&self) -> Option<&YoY> {
        self.yoy.as_ref()
    }

    pub(crate) fn attach_yoy(&mut self, yoy: YoY) {
        debug_assert!(self.yoy.is_none(), "YoY attached twice");
        self.yoy = Some(yoy);
    }
}

impl Serialize for Measures {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MEASURES_FIELDS.len() + 1))?;
        wire::serialize_fields(&mut map, MEASURES_FIELDS, self)?;
        map.serialize_entry(YOY_KEY, &self.yoy)?;
        map.end()
    }
}
