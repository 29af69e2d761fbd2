//! Year-over-year growth between adjacent periods.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::{
    error::Result,
    math::{delta, growth},
    measures::Measures,
    types::{Filing, FilingField},
    wire::{self, YOY_FIELDS},
};

/// Growth of one period over the period before it.
///
/// Growth values are whole percentages; dividend and book value growth are
/// absolute per-share changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YoY {
    /// Revenue growth in percent.
    pub revenue_growth: f64,
    /// Net income growth in percent.
    pub earning_growth: f64,
    /// Operating leverage growth in percent.
    pub operating_leverage_growth: f64,
    /// Gross margin growth in percent.
    pub gross_margin_growth: f64,
    /// Total debt growth in percent.
    pub debt_growth: f64,
    /// Total equity growth in percent.
    pub equity_growth: f64,
    /// Free cash flow growth in percent.
    pub cash_flow_growth: f64,
    /// Change in dividend per share.
    pub dividend_growth: f64,
    /// Change in book value per share.
    pub book_value_growth: f64,
}

fn total_debt(filing: &Filing) -> f64 {
    filing.value_or_zero(FilingField::LongTermDebt) + filing.value_or_zero(FilingField::ShortTermDebt)
}

fn line_growth(past: &Filing, curr: &Filing, field: FilingField) -> Result<f64> {
    Ok(growth(past.value(field)?, curr.value(field)?))
}

impl YoY {
    /// Computes the growth from `past` to `curr`.
    ///
    /// # Errors
    /// Returns [`ValuatorError::MissingField`](crate::ValuatorError::MissingField)
    /// if revenue, net income, gross margin or total equity is absent from either
    /// filing.
    pub fn between(past: &Measures, curr: &Measures) -> Result<Self> {
        let (pf, cf) = (past.filing(), curr.filing());

        Ok(Self {
            revenue_growth: line_growth(pf, cf, FilingField::Revenue)?,
            earning_growth: line_growth(pf, cf, FilingField::NetIncome)?,
            operating_leverage_growth: growth(past.operating_leverage(), curr.operating_leverage()),
            gross_margin_growth: line_growth(pf, cf, FilingField::GrossMargin)?,
            debt_growth: growth(total_debt(pf), total_debt(cf)),
            equity_growth: line_growth(pf, cf, FilingField::TotalEquity)?,
            cash_flow_growth: growth(past.free_cash_flow(), curr.free_cash_flow()),
            dividend_growth: delta(past.dividend_per_share(), curr.dividend_per_share()),
            book_value_growth: delta(past.book_value(), curr.book_value()),
        })
    }
}

/// Attaches a [`YoY`] to every entry of a chronologically sorted series but the first.
///
/// # Errors
/// Propagates the first [`YoY::between`] failure. Entries before the failing
/// pair keep their link.
pub fn link_series(series: &mut [Measures]) -> Result<()> {
    for i in 1..series.len() {
        let yoy = YoY::between(&series[i - 1], &series[i])?;
        series[i].attach_yoy(yoy);
    }
    debug!(periods = series.len(), "Linked year-over-year series");
    Ok(())
}

impl Serialize for YoY {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(YOY_FIELDS.len()))?;
        wire::serialize_fields(&mut map, YOY_FIELDS, self)?;
        map.end()
    }
}
