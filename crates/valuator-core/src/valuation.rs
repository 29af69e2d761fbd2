//! The per-ticker valuation record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    averages::Averages,
    error::{Result, ValuatorError},
    measures::Measures,
    pbm::PriceBasedMetrics,
    types::{Filing, Ticker},
    wire::{self, AVERAGES_KEY, COMPANY_KEY, MEASURES_KEY, PRICE_FIELDS, RECORDED_ON_KEY},
    yoy::link_series,
};

/// Everything derived for one ticker.
#[derive(Clone, Debug, PartialEq)]
pub struct Valuation {
    ticker: Ticker,
    measures: Vec<Measures>,
    averages: Averages,
    price_metrics: PriceBasedMetrics,
    recorded_on: DateTime<Utc>,
}

/// Derives, sorts and links a series, then averages its growth.
///
/// # Errors
/// Returns [`ValuatorError::NoData`] for an empty input, or the first
/// [`YoY`](crate::YoY) or [`Averages`] failure.
pub fn analyze(ticker: &Ticker, filings: Vec<Filing>) -> Result<(Vec<Measures>, Averages)> {
    if filings.is_empty() {
        return Err(ValuatorError::NoData(ticker.to_string()));
    }
    let mut series = Measures::derive_series(filings);
    link_series(&mut series)?;
    let averages = Averages::compute(&series)?;
    Ok((series, averages))
}

impl Valuation {
    /// Assembles a valuation and prices its latest period.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NoData`] if `measures` is empty.
    pub fn new(
        ticker: Ticker,
        measures: Vec<Measures>,
        averages: Averages,
        price: f64,
        recorded_on: DateTime<Utc>,
    ) -> Result<Self> {
        let Some(latest) = measures.last() else {
            return Err(ValuatorError::NoData(ticker.to_string()));
        };
        let price_metrics = PriceBasedMetrics::compute(latest, price);
        Ok(Self {
            ticker,
            measures,
            averages,
            price_metrics,
            recorded_on,
        })
    }

    /// The company this valuation belongs to.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Measures ordered by filing date.
    #[must_use]
    pub fn measures(&self) -> &[Measures] {
        &self.measures
    }

    /// The most recent measures.
    #[must_use]
    pub fn latest(&self) -> &Measures {
        // `new` refuses an empty series.
        &self.measures[self.measures.len() - 1]
    }

    /// The most recent filing.
    #[must_use]
    pub fn last_filing(&self) -> &Filing {
        self.latest().filing()
    }

    /// Averages over the whole series.
    #[must_use]
    pub const fn averages(&self) -> &Averages {
        &self.averages
    }

    /// Metrics at the last known price.
    #[must_use]
    pub const fn price_metrics(&self) -> &PriceBasedMetrics {
        &self.price_metrics
    }

    /// When the valuation was collected.
    #[must_use]
    pub const fn recorded_on(&self) -> DateTime<Utc> {
        self.recorded_on
    }

    /// Recomputes the price metrics at a new price.
    pub fn reprice(&mut self, price: f64) {
        self.price_metrics = PriceBasedMetrics::compute(self.latest(), price);
    }

    /// Serializes the valuation to its published JSON form.
    ///
    /// # Errors
    /// Returns [`ValuatorError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ValuatorError::Parse(e.to_string()))
    }
}

impl Serialize for Valuation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + PRICE_FIELDS.len()))?;
        map.serialize_entry(COMPANY_KEY, &self.ticker)?;
        map.serialize_entry(
            RECORDED_ON_KEY,
            &self.recorded_on.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        map.serialize_entry(MEASURES_KEY, &self.measures)?;
        map.serialize_entry(AVERAGES_KEY, &self.averages)?;
        wire::serialize_fields(&mut map, PRICE_FIELDS, &self.price_metrics)?;
        map.end()
    }
}
