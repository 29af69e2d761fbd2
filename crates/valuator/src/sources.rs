//! Reference collaborators backed by local data.

use async_trait::async_trait;
use std::{collections::HashMap, io::ErrorKind, path::PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use valuator_core::{
    DataProvider, Filing, FilingSource, PeriodType, PriceSource, Result, Ticker, ValuatorError,
};

/// Filing source reading `<dir>/<TICKER>.json`, a JSON array of [`Filing`]s.
///
/// The bytes behind the last fetch of a ticker are kept so that
/// [`FilingSource::serialize_raw`] can hand them to a store; a later fetch
/// seeded with those bytes does not touch the file system.
#[derive(Debug)]
pub struct JsonFilingSource {
    dir: PathBuf,
    raw: RwLock<HashMap<Ticker, Vec<u8>>>,
}

impl JsonFilingSource {
    /// Create a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            raw: RwLock::new(HashMap::new()),
        }
    }

    async fn read_file(&self, ticker: &Ticker) -> Result<Vec<u8>> {
        let path = self.dir.join(format!("{}.json", ticker));
        debug!("Reading filings: {}", path.display());
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ValuatorError::NoData(ticker.to_string()),
            _ => ValuatorError::Other(format!("{}: {}", path.display(), e)),
        })
    }
}

fn parse(bytes: &[u8]) -> Result<Vec<Filing>> {
    serde_json::from_slice(bytes).map_err(|e| ValuatorError::Parse(e.to_string()))
}

impl DataProvider for JsonFilingSource {
    fn name(&self) -> &str {
        "JSON files"
    }

    fn description(&self) -> &str {
        "Filings stored as JSON arrays, one file per ticker"
    }
}

#[async_trait]
impl FilingSource for JsonFilingSource {
    fn supported_periods(&self) -> &[PeriodType] {
        &[PeriodType::Annual, PeriodType::Quarterly]
    }

    #[instrument(skip(self, cached), fields(ticker = %ticker, cached = cached.is_some()))]
    async fn fetch_filings(
        &self,
        ticker: &Ticker,
        period_type: PeriodType,
        cached: Option<&[u8]>,
    ) -> Result<Vec<Filing>> {
        let seeded = match cached.map(|bytes| (bytes, parse(bytes))) {
            Some((bytes, Ok(filings))) => Some((bytes.to_vec(), filings)),
            Some((_, Err(e))) => {
                warn!(error = %e, "Ignoring unreadable cached payload");
                None
            }
            None => None,
        };
        let (bytes, filings) = match seeded {
            Some(seeded) => seeded,
            None => {
                let bytes = self.read_file(ticker).await?;
                let filings = parse(&bytes)?;
                (bytes, filings)
            }
        };

        self.raw.write().await.insert(ticker.clone(), bytes);

        let filings: Vec<Filing> = filings
            .into_iter()
            .filter(|f| f.period_type == period_type)
            .collect();
        debug!(count = filings.len(), "Loaded filings");
        Ok(filings)
    }

    async fn serialize_raw(&self, ticker: &Ticker) -> Result<Vec<u8>> {
        self.raw
            .read()
            .await
            .get(ticker)
            .cloned()
            .ok_or_else(|| ValuatorError::NoData(format!("no payload fetched for {}", ticker)))
    }
}

/// Price source answering from a fixed table.
#[derive(Debug, Default)]
pub struct StaticPriceSource {
    prices: RwLock<HashMap<Ticker, f64>>,
}

impl StaticPriceSource {
    /// Create an empty price table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a price to the table.
    #[must_use]
    pub fn with_price(mut self, ticker: impl Into<Ticker>, price: f64) -> Self {
        self.prices.get_mut().insert(ticker.into(), price);
        self
    }

    /// Replaces the price of a ticker.
    pub async fn set_price(&self, ticker: impl Into<Ticker>, price: f64) {
        self.prices.write().await.insert(ticker.into(), price);
    }
}

impl DataProvider for StaticPriceSource {
    fn name(&self) -> &str {
        "Static prices"
    }

    fn description(&self) -> &str {
        "Prices supplied up front by the caller"
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn current_price(&self, ticker: &Ticker) -> Result<f64> {
        self.prices
            .read()
            .await
            .get(ticker)
            .copied()
            .ok_or_else(|| ValuatorError::NoData(format!("no price for {}", ticker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filing(year: i32, period_type: PeriodType) -> Filing {
        Filing {
            revenue: Some(1000.0),
            ..Filing::new(
                Ticker::new("AAPL"),
                NaiveDate::from_ymd_opt(year, 11, 3).unwrap(),
                period_type,
            )
        }
    }

    fn write_filings(dir: &std::path::Path, ticker: &str, filings: &[Filing]) {
        std::fs::write(
            dir.join(format!("{}.json", ticker)),
            serde_json::to_vec(filings).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_json_source_reads_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        write_filings(
            dir.path(),
            "AAPL",
            &[
                filing(2016, PeriodType::Annual),
                filing(2017, PeriodType::Quarterly),
                filing(2017, PeriodType::Annual),
            ],
        );
        let source = JsonFilingSource::new(dir.path());
        let ticker = Ticker::new("aapl");

        let annual = source
            .fetch_filings(&ticker, PeriodType::Annual, None)
            .await
            .unwrap();
        assert_eq!(annual.len(), 2);

        let raw = source.serialize_raw(&ticker).await.unwrap();
        let all: Vec<Filing> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_json_source_prefers_cached_payload() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFilingSource::new(dir.path());
        let ticker = Ticker::new("AAPL");
        let cached = serde_json::to_vec(&[filing(2015, PeriodType::Annual)]).unwrap();

        // No file on disk; the payload alone must be enough.
        let filings = source
            .fetch_filings(&ticker, PeriodType::Annual, Some(cached.as_slice()))
            .await
            .unwrap();
        assert_eq!(filings.len(), 1);
        assert_eq!(source.serialize_raw(&ticker).await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_json_source_falls_back_on_bad_payload() {
        let dir = tempfile::tempdir().unwrap();
        write_filings(dir.path(), "AAPL", &[filing(2016, PeriodType::Annual)]);
        let source = JsonFilingSource::new(dir.path());

        let filings = source
            .fetch_filings(&Ticker::new("AAPL"), PeriodType::Annual, Some(&b"not json"[..]))
            .await
            .unwrap();
        assert_eq!(filings.len(), 1);
    }

    #[tokio::test]
    async fn test_json_source_missing_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFilingSource::new(dir.path());
        let ticker = Ticker::new("NOPE");

        assert!(matches!(
            source.fetch_filings(&ticker, PeriodType::Annual, None).await,
            Err(ValuatorError::NoData(_))
        ));
        assert!(source.serialize_raw(&ticker).await.is_err());
    }

    #[tokio::test]
    async fn test_static_prices() {
        let source = StaticPriceSource::new().with_price("ko", 45.5);
        assert_eq!(source.current_price(&Ticker::new("KO")).await.unwrap(), 45.5);
        assert!(source.current_price(&Ticker::new("PEP")).await.is_err());

        source.set_price("KO", 47.0).await;
        assert_eq!(source.current_price(&Ticker::new("KO")).await.unwrap(), 47.0);
    }
}
