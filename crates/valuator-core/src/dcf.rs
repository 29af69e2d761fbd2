//! Discounted cash flow projection.
//!
//! The projection grows book value and dividend per share linearly for
//! `duration` periods, discounting each period's figure at `rate` percent.
//! The discounted terminal book value and the last dividend are added on top.
//!
//! Every entry point accepts an optional cutoff year. With a cutoff, the
//! projection starts from the last period filed on or before that year, and
//! trend variants average growth over the truncated series only.

use tracing::debug;

use crate::{
    averages::Averages,
    error::{Result, ValuatorError},
    math::round,
    measures::Measures,
};

/// Validates a cutoff argument. At most one year may be given.
///
/// # Errors
/// Returns [`ValuatorError::InvalidParameter`] for more than one year.
pub fn single_cutoff(years: &[i32]) -> Result<Option<i32>> {
    match years {
        [] => Ok(None),
        [year] => Ok(Some(*year)),
        _ => Err(ValuatorError::InvalidParameter(format!(
            "at most one cutoff year is accepted, got {}",
            years.len()
        ))),
    }
}

/// Returns the prefix of a sorted series filed on or before `cutoff`.
///
/// # Errors
/// Returns [`ValuatorError::NoData`] if the prefix is empty.
pub fn baseline(series: &[Measures], cutoff: Option<i32>) -> Result<&[Measures]> {
    let end = match cutoff {
        Some(year) => series.partition_point(|m| m.filing().filed_year() <= year),
        None => series.len(),
    };
    if end == 0 {
        let ticker = series
            .first()
            .map(|m| m.filing().ticker.to_string())
            .unwrap_or_default();
        return Err(ValuatorError::NoData(match cutoff {
            Some(year) => format!("{} has no filing up to {}", ticker, year),
            None => ticker,
        }));
    }
    Ok(&series[..end])
}

/// Projects a valuation from explicit growth rates.
///
/// # Arguments
///
/// * `series` - Measures sorted by filing date
/// * `rate` - Discount rate in percent
/// * `bv_growth` - Book value growth per period
/// * `div_growth` - Dividend growth per period
/// * `duration` - Number of projected periods
/// * `cutoff` - Last filing year to project from
///
/// # Errors
/// Returns [`ValuatorError::NoData`] if no period survives the cutoff.
pub fn discounted_cash_flow(
    series: &[Measures],
    rate: f64,
    bv_growth: f64,
    div_growth: f64,
    duration: u32,
    cutoff: Option<i32>,
) -> Result<f64> {
    let base = baseline(series, cutoff)?;
    let last = &base[base.len() - 1];
    let discount = 1.0 + rate / 100.0;

    let mut sum_div = last.dividend_per_share();
    let mut sum_bv = last.book_value() / discount.powf(f64::from(duration));

    // The running figures are discounted in place, so each period's growth
    // is added to an already discounted figure.
    let (mut bv, mut div) = (bv_growth, div_growth);
    for t in 1..=duration {
        let factor = discount.powf(f64::from(t));
        bv = (bv + bv_growth) / factor;
        div = (div + div_growth) / factor;
        sum_bv += bv;
        sum_div += div;
    }

    let value = round(sum_div + sum_bv);
    debug!(
        ticker = %last.filing().ticker,
        rate,
        bv_growth,
        div_growth,
        duration,
        ?cutoff,
        value,
        "Projected discounted cash flow"
    );
    Ok(value)
}

/// Averages to use for a trend projection: the stored ones, or a fresh
/// computation over the truncated series when a cutoff applies.
fn trend_averages(series: &[Measures], averages: &Averages, cutoff: Option<i32>) -> Result<Averages> {
    match cutoff {
        Some(_) => Averages::compute(baseline(series, cutoff)?),
        None => Ok(*averages),
    }
}

/// Projects a valuation from average book value and dividend growth scaled by
/// `trend` percent (`100` keeps the averages unchanged).
///
/// # Errors
/// Returns [`ValuatorError::NoData`] if no period survives the cutoff, or
/// [`ValuatorError::NoYearOverYear`] if the truncated series has no growth.
pub fn discounted_cash_flow_trend(
    series: &[Measures],
    averages: &Averages,
    rate: f64,
    trend: f64,
    duration: u32,
    cutoff: Option<i32>,
) -> Result<f64> {
    let avg = trend_averages(series, averages, cutoff)?;
    let scale = trend / 100.0;
    discounted_cash_flow(
        series,
        rate,
        avg.book_value_growth * scale,
        avg.dividend_growth * scale,
        duration,
        cutoff,
    )
}

/// Like [`discounted_cash_flow_trend`], but grows book value by the average
/// free cash flow growth applied to the last book value.
///
/// # Errors
/// Same as [`discounted_cash_flow_trend`].
pub fn discounted_fcf_trend(
    series: &[Measures],
    averages: &Averages,
    rate: f64,
    trend: f64,
    duration: u32,
    cutoff: Option<i32>,
) -> Result<f64> {
    let avg = trend_averages(series, averages, cutoff)?;
    let base = baseline(series, cutoff)?;
    let last_bv = base[base.len() - 1].book_value();
    let scale = trend / 100.0;
    discounted_cash_flow(
        series,
        rate,
        last_bv * (avg.cash_flow_growth * scale) / 100.0,
        avg.dividend_growth * scale,
        duration,
        cutoff,
    )
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

    /// Book value `equity / 10`, dividend `dps`, cash flow `ocf`.
    fn filing(year: i32, equity: f64, dps: f64, ocf: f64) -> Filing {
        Filing {
            revenue: Some(1000.0),
            cost_of_revenue: Some(500.0),
            net_income: Some(100.0),
            total_equity: Some(equity),
            share_count: Some(10.0),
            dividend_per_share: Some(dps),
            operating_cash_flow: Some(ocf),
            ..Filing::new(
                Ticker::new("JNJ"),
                NaiveDate::from_ymd_opt(year, 2, 21).unwrap(),
                PeriodType::Annual,
            )
        }
    }

    fn series() -> (Vec<Measures>, Averages) {
        let mut series = Measures::derive_series(vec![
            filing(2015, 100.0, 1.0, 100.0),
            filing(2016, 110.0, 1.25, 110.0),
            filing(2017, 120.0, 1.5, 121.0),
        ]);
        link_series(&mut series).unwrap();
        let averages = Averages::compute(&series).unwrap();
        (series, averages)
    }

    #[test]
    fn test_single_cutoff() {
        assert_eq!(single_cutoff(&[]).unwrap(), None);
        assert_eq!(single_cutoff(&[2016]).unwrap(), Some(2016));
        assert!(matches!(
            single_cutoff(&[2016, 2017]),
            Err(ValuatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_baseline() {
        let (series, _) = series();
        assert_eq!(baseline(&series, None).unwrap().len(), 3);
        assert_eq!(baseline(&series, Some(2016)).unwrap().len(), 2);
        assert_eq!(baseline(&series, Some(2030)).unwrap().len(), 3);
        assert!(matches!(
            baseline(&series, Some(2014)),
            Err(ValuatorError::NoData(_))
        ));
        assert!(matches!(baseline(&[], None), Err(ValuatorError::NoData(_))));
    }

    #[test]
    fn test_projection() {
        let (series, _) = series();

        // Last period: book value 12, dividend 1.5.
        assert_eq!(discounted_cash_flow(&series, 0.0, 1.0, 0.5, 2, None).unwrap(), 21.0);
        assert_eq!(discounted_cash_flow(&series, 10.0, 1.0, 0.0, 1, None).unwrap(), 14.22);
    }

    #[test]
    fn test_projection_compounds_discount() {
        let (series, _) = series();

        // Book value: 12 / 1.1^2 + 2 / 1.1 + (2 / 1.1 + 1) / 1.1^2 = 14.06
        assert_eq!(discounted_cash_flow(&series, 10.0, 1.0, 0.0, 2, None).unwrap(), 15.56);
        // Dividend: 1.5 + 1 / 1.1 + (1 / 1.1 + 0.5) / 1.1^2 = 3.57
        assert_eq!(discounted_cash_flow(&series, 10.0, 1.0, 0.5, 2, None).unwrap(), 17.63);
    }

    #[test]
    fn test_zero_duration_is_undiscounted_baseline() {
        let (series, _) = series();
        assert_eq!(discounted_cash_flow(&series, 10.0, 5.0, 5.0, 0, None).unwrap(), 13.5);
        // 2016: book value 11, dividend 1.25.
        assert_eq!(
            discounted_cash_flow(&series, 10.0, 5.0, 5.0, 0, Some(2016)).unwrap(),
            12.25
        );
    }

    #[test]
    fn test_full_trend_matches_primitive() {
        let (series, averages) = series();
        let direct = discounted_cash_flow(
            &series,
            8.0,
            averages.book_value_growth,
            averages.dividend_growth,
            5,
            None,
        )
        .unwrap();
        let trend = discounted_cash_flow_trend(&series, &averages, 8.0, 100.0, 5, None).unwrap();
        assert_eq!(trend, direct);
    }

    #[test]
    fn test_trend_with_cutoff_recomputes_averages() {
        let (series, averages) = series();
        let truncated = Averages::compute(baseline(&series, Some(2016)).unwrap()).unwrap();
        let direct = discounted_cash_flow(
            &series,
            0.0,
            truncated.book_value_growth / 2.0,
            truncated.dividend_growth / 2.0,
            3,
            Some(2016),
        )
        .unwrap();

        let trend =
            discounted_cash_flow_trend(&series, &averages, 0.0, 50.0, 3, Some(2016)).unwrap();
        assert_eq!(trend, direct);
    }

    #[test]
    fn test_trend_cutoff_without_growth() {
        let (series, averages) = series();
        assert!(matches!(
            discounted_cash_flow_trend(&series, &averages, 0.0, 100.0, 3, Some(2015)),
            Err(ValuatorError::NoYearOverYear(_))
        ));
    }

    #[test]
    fn test_fcf_trend() {
        let (series, averages) = series();
        // Cash flow grows 10% a year; last book value 12 grows 1.2 per period.
        assert_eq!(averages.cash_flow_growth, 10.0);
        let direct = discounted_cash_flow(&series, 0.0, 1.2, averages.dividend_growth, 2, None).unwrap();
        let fcf = discounted_fcf_trend(&series, &averages, 0.0, 100.0, 2, None).unwrap();
        assert_eq!(fcf, direct);
    }
}
