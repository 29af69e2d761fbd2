//! Mean growth across a ticker's year-over-year history.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::{Result, ValuatorError},
    math::mean,
    measures::Measures,
    wire::{self, AVERAGES_FIELDS},
    yoy::YoY,
};

/// Averages of every [`YoY`] dimension over a series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Averages {
    /// Average revenue growth in percent.
    pub revenue_growth: f64,
    /// Average net income growth in percent.
    pub earning_growth: f64,
    /// Average operating leverage growth in percent.
    pub operating_leverage_growth: f64,
    /// Average gross margin growth in percent.
    pub gross_margin_growth: f64,
    /// Average total debt growth in percent.
    pub debt_growth: f64,
    /// Average total equity growth in percent.
    pub equity_growth: f64,
    /// Average free cash flow growth in percent.
    pub cash_flow_growth: f64,
    /// Average change in dividend per share.
    pub dividend_growth: f64,
    /// Average change in book value per share.
    pub book_value_growth: f64,
}

impl Averages {
    /// Averages the year-over-year growth of a series.
    ///
    /// Entries without a [`YoY`] are skipped.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NoYearOverYear`] if no entry carries a [`YoY`].
    pub fn compute(series: &[Measures]) -> Result<Self> {
        let links: Vec<&YoY> = series.iter().filter_map(Measures::yoy).collect();
        if links.is_empty() {
            let ticker = series
                .first()
                .map(|m| m.filing().ticker.to_string())
                .unwrap_or_default();
            return Err(ValuatorError::NoYearOverYear(ticker));
        }

        let n = links.len();
        let avg = |get: fn(&YoY) -> f64| mean(links.iter().map(|y| get(y)).sum(), n);

        Ok(Self {
            revenue_growth: avg(|y| y.revenue_growth),
            earning_growth: avg(|y| y.earning_growth),
            operating_leverage_growth: avg(|y| y.operating_leverage_growth),
            gross_margin_growth: avg(|y| y.gross_margin_growth),
            debt_growth: avg(|y| y.debt_growth),
            equity_growth: avg(|y| y.equity_growth),
            cash_flow_growth: avg(|y| y.cash_flow_growth),
            dividend_growth: avg(|y| y.dividend_growth),
            book_value_growth: avg(|y| y.book_value_growth),
        })
    }
}

impl Serialize for Averages {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AVERAGES_FIELDS.len()))?;
        wire::serialize_fields(&mut map, AVERAGES_FIELDS, self)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        period::PeriodType,
        types::{Filing, Ticker},
        yoy::link_series,
    };
    use chrono::NaiveDate;

    fn filing(year: i32, revenue: f64, dps: f64) -> Filing {
        Filing {
            revenue: Some(revenue),
            cost_of_revenue: Some(revenue / 2.0),
            net_income: Some(100.0),
            total_equity: Some(1000.0),
            share_count: Some(100.0),
            dividend_per_share: Some(dps),
            ..Filing::new(
                Ticker::new("KO"),
                NaiveDate::from_ymd_opt(year, 2, 20).unwrap(),
                PeriodType::Annual,
            )
        }
    }

    fn linked(filings: Vec<Filing>) -> Vec<Measures> {
        let mut series = Measures::derive_series(filings);
        link_series(&mut series).unwrap();
        series
    }

    #[test]
    fn test_identical_growth_averages_to_itself() {
        let series = linked(vec![
            filing(2015, 1000.0, 1.0),
            filing(2016, 1100.0, 1.25),
            filing(2017, 1210.0, 1.5),
            filing(2018, 1331.0, 1.75),
        ]);
        let avg = Averages::compute(&series).unwrap();

        assert_eq!(avg.revenue_growth, 10.0);
        assert_eq!(avg.dividend_growth, 0.25);
        assert_eq!(avg.earning_growth, 0.0);
        assert_eq!(avg.book_value_growth, 0.0);
    }

    #[test]
    fn test_mean_truncates() {
        let series = linked(vec![
            filing(2015, 1000.0, 1.0),
            filing(2016, 1100.0, 1.0),
            filing(2017, 1100.0, 1.0),
            filing(2018, 1100.0, 1.0),
        ]);
        let avg = Averages::compute(&series).unwrap();

        // (10 + 0 + 0) / 3
        assert_eq!(avg.revenue_growth, 3.33);
    }

    #[test]
    fn test_no_year_over_year() {
        let series = linked(vec![filing(2015, 1000.0, 1.0)]);
        match Averages::compute(&series) {
            Err(ValuatorError::NoYearOverYear(ticker)) => assert_eq!(ticker, "KO"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            Averages::compute(&[]),
            Err(ValuatorError::NoYearOverYear(_))
        ));
    }

    #[test]
    fn test_wire_keys() {
        let json = serde_json::to_value(Averages::default()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 9);
        assert!(obj.contains_key("Average Revenue Growth"));
        assert!(obj.contains_key("Average Book Value Growth"));
        assert!(obj.contains_key("Average Cash Flow Growth"));
    }
}
