//! JSON field names of the serialized records.
//!
//! Rust field names and published JSON names are kept apart: every record
//! serializes through one of the tables below, so a rename on either side is a
//! one-line change here. JSON has no representation for infinities or NaN;
//! `serde_json` writes non-finite values as `null`.

use std::fmt;

use serde::ser::SerializeMap;

use crate::{averages::Averages, measures::Measures, pbm::PriceBasedMetrics, yoy::YoY};

/// A published JSON name and the accessor of the value behind it.
pub struct WireField<T> {
    /// Published JSON key.
    pub key: &'static str,
    /// Reads the value from a record.
    pub get: fn(&T) -> f64,
}

impl<T> fmt::Debug for WireField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireField").field("key", &self.key).finish()
    }
}

const fn field<T>(key: &'static str, get: fn(&T) -> f64) -> WireField<T> {
    WireField { key, get }
}

/// Key of the nested year-over-year record inside a serialized [`Measures`].
pub const YOY_KEY: &str = "YoY";
/// Key of the ticker inside a serialized valuation.
pub const COMPANY_KEY: &str = "Company";
/// Key of the collection timestamp inside a serialized valuation.
pub const RECORDED_ON_KEY: &str = "Recorded on";
/// Key of the measures series inside a serialized valuation.
pub const MEASURES_KEY: &str = "Measures";
/// Key of the averages inside a serialized valuation.
pub const AVERAGES_KEY: &str = "Averages";

/// Published names of the [`Measures`] ratios.
pub const MEASURES_FIELDS: &[WireField<Measures>] = &[
    field("Book Value", Measures::book_value),
    field("Contribution Margin", Measures::contribution_margin),
    field("Operating Margin", Measures::operating_margin),
    field("Operating Leverage", Measures::operating_leverage),
    field("Financial Leverage (%)", Measures::financial_leverage),
    field("Return on Equity (%)", Measures::return_on_equity),
    field("Return on Assets", Measures::return_on_assets),
    field("Dividend", Measures::dividend_per_share),
    field("Free Cash Flow", Measures::free_cash_flow),
    field("Dividend to FCF", Measures::payout_to_fcf),
    field("Working Capital", Measures::working_capital),
    field("Current Ratio", Measures::current_ratio),
];

/// Published names of the [`YoY`] dimensions.
pub const YOY_FIELDS: &[WireField<YoY>] = &[
    field("Revenue Growth", |y: &YoY| y.revenue_growth),
    field("Earning Growth", |y: &YoY| y.earning_growth),
    field("Operating Leverage Growth", |y: &YoY| y.operating_leverage_growth),
    field("Gross Margin Growth", |y: &YoY| y.gross_margin_growth),
    field("Debt Growth", |y: &YoY| y.debt_growth),
    field("Equity Growth", |y: &YoY| y.equity_growth),
    field("Cash Flow Growth", |y: &YoY| y.cash_flow_growth),
    field("Dividend Growth", |y: &YoY| y.dividend_growth),
    field("Book Value Growth", |y: &YoY| y.book_value_growth),
];

/// Published names of the [`Averages`] dimensions.
pub const AVERAGES_FIELDS: &[WireField<Averages>] = &[
    field("Average Revenue Growth", |a: &Averages| a.revenue_growth),
    field("Average Earning Growth", |a: &Averages| a.earning_growth),
    field("Average Operating Leverage Growth", |a: &Averages| a.operating_leverage_growth),
    field("Average Gross Margin Growth", |a: &Averages| a.gross_margin_growth),
    field("Average Debt Growth", |a: &Averages| a.debt_growth),
    field("Average Equity Growth", |a: &Averages| a.equity_growth),
    field("Average Cash Flow Growth", |a: &Averages| a.cash_flow_growth),
    field("Average Dividend Growth", |a: &Averages| a.dividend_growth),
    field("Average Book Value Growth", |a: &Averages| a.book_value_growth),
];

/// Published names of the [`PriceBasedMetrics`].
pub const PRICE_FIELDS: &[WireField<PriceBasedMetrics>] = &[
    field("Market Price", |p: &PriceBasedMetrics| p.price),
    field("Market Capitalization", |p: &PriceBasedMetrics| p.market_cap),
    field("Enterprise Value", |p: &PriceBasedMetrics| p.enterprise_value),
    field("Price To Earnings", |p: &PriceBasedMetrics| p.price_to_earnings),
    field("Price To CashFlow", |p: &PriceBasedMetrics| p.price_to_cash_flow),
    field("Price To Revenue", |p: &PriceBasedMetrics| p.price_to_revenue),
];

/// Writes every field of `table` into an open map.
pub(crate) fn serialize_fields<M, T>(
    map: &mut M,
    table: &[WireField<T>],
    value: &T,
) -> Result<(), M::Error>
where
    M: SerializeMap,
{
    for field in table {
        map.serialize_entry(field.key, &(field.get)(value))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn unique<T>(table: &[WireField<T>]) -> bool {
        let keys: HashSet<&str> = table.iter().map(|f| f.key).collect();
        keys.len() == table.len()
    }

    #[test]
    fn test_keys_are_unique() {
        assert!(unique(MEASURES_FIELDS));
        assert!(unique(YOY_FIELDS));
        assert!(unique(AVERAGES_FIELDS));
        assert!(unique(PRICE_FIELDS));
    }

    #[test]
    fn test_averages_mirror_yoy() {
        for (avg, yoy) in AVERAGES_FIELDS.iter().zip(YOY_FIELDS) {
            assert_eq!(avg.key, format!("Average {}", yoy.key));
        }
    }

    #[test]
    fn test_non_finite_is_null() {
        let pbm = PriceBasedMetrics {
            price_to_earnings: f64::INFINITY,
            price_to_revenue: f64::NAN,
            ..Default::default()
        };
        let json = serde_json::to_value(pbm).unwrap();
        assert!(json["Price To Earnings"].is_null());
        assert!(json["Price To Revenue"].is_null());
        assert_eq!(json["Market Price"], 0.0);
    }
}
