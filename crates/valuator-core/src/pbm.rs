//! Market-price-relative metrics.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    math::round,
    measures::Measures,
    types::FilingField,
    wire::{self, PRICE_FIELDS},
};

/// Metrics relating the latest filing to a market price.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PriceBasedMetrics {
    /// Price of one share.
    pub price: f64,
    /// Share count times price.
    pub market_cap: f64,
    /// Market capitalization plus total debt minus cash.
    pub enterprise_value: f64,
    /// Market capitalization over net income.
    pub price_to_earnings: f64,
    /// Market capitalization over operating cash flow.
    pub price_to_cash_flow: f64,
    /// Market capitalization over revenue.
    pub price_to_revenue: f64,
}

impl PriceBasedMetrics {
    /// Computes the metrics of `latest` at `price`.
    ///
    /// A ratio whose denominator line is missing is `0`.
    #[must_use]
    pub fn compute(latest: &Measures, price: f64) -> Self {
        let filing = latest.filing();
        let market_cap = round(filing.value_or_zero(FilingField::ShareCount) * price);
        let enterprise_value = round(
            market_cap + filing.value_or_zero(FilingField::LongTermDebt)
                + filing.value_or_zero(FilingField::ShortTermDebt)
                - filing.value_or_zero(FilingField::Cash),
        );
        let over = |field: FilingField| {
            filing
                .value(field)
                .map_or(0.0, |denominator| round(market_cap / denominator))
        };

        Self {
            price,
            market_cap,
            enterprise_value,
            price_to_earnings: over(FilingField::NetIncome),
            price_to_cash_flow: over(FilingField::OperatingCashFlow),
            price_to_revenue: over(FilingField::Revenue),
        }
    }
}

impl Serialize for PriceBasedMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRICE_FIELDS.len()))?;
        wire::serialize_fields(&mut map, PRICE_FIELDS, self)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        period::PeriodType,
        types::{Filing, Ticker},
    };
    use chrono::NaiveDate;

    fn filing() -> Filing {
        Filing::new(
            Ticker::new("MSFT"),
            NaiveDate::from_ymd_opt(2018, 8, 3).unwrap(),
            PeriodType::Annual,
        )
    }

    #[test]
    fn test_price_metrics() {
        let latest = Measures::derive(Filing {
            share_count: Some(1000.0),
            long_term_debt: Some(5000.0),
            short_term_debt: Some(1000.0),
            cash: Some(2500.0),
            net_income: Some(4000.0),
            operating_cash_flow: Some(6000.0),
            revenue: Some(30_000.0),
            ..filing()
        });
        let pbm = PriceBasedMetrics::compute(&latest, 100.0);

        assert_eq!(pbm.price, 100.0);
        assert_eq!(pbm.market_cap, 100_000.0);
        assert_eq!(pbm.enterprise_value, 103_500.0);
        assert_eq!(pbm.price_to_earnings, 25.0);
        assert_eq!(pbm.price_to_cash_flow, 16.66);
        assert_eq!(pbm.price_to_revenue, 3.33);
    }

    #[test]
    fn test_missing_lines() {
        let latest = Measures::derive(Filing {
            share_count: Some(10.0),
            revenue: Some(40.0),
            ..filing()
        });
        let pbm = PriceBasedMetrics::compute(&latest, 12.5);

        assert_eq!(pbm.market_cap, 125.0);
        assert_eq!(pbm.enterprise_value, 125.0);
        assert_eq!(pbm.price_to_earnings, 0.0);
        assert_eq!(pbm.price_to_cash_flow, 0.0);
        assert_eq!(pbm.price_to_revenue, 3.12);
    }

    #[test]
    fn test_missing_share_count() {
        let latest = Measures::derive(Filing {
            cash: Some(50.0),
            net_income: Some(10.0),
            ..filing()
        });
        let pbm = PriceBasedMetrics::compute(&latest, 99.0);

        assert_eq!(pbm.market_cap, 0.0);
        assert_eq!(pbm.enterprise_value, -50.0);
        assert_eq!(pbm.price_to_earnings, 0.0);
    }

    #[test]
    fn test_wire_keys() {
        let json = serde_json::to_value(PriceBasedMetrics::default()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        for key in [
            "Market Price",
            "Market Capitalization",
            "Enterprise Value",
            "Price To Earnings",
            "Price To CashFlow",
            "Price To Revenue",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
    }
}
