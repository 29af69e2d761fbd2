//! Collection registry: fetch, derive and persist once per ticker.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use polars::prelude::DataFrame;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, instrument, warn};

use valuator_core::{
    Filing, FilingSource, PeriodType, PriceBasedMetrics, PriceSource, Result, Store, Ticker,
    Valuation, ValuatorError, analyze, dcf, filings_key, measures_frame, valuation_key,
};
use valuator_store::NoopStore;

use crate::config::ValuatorConfig;

/// Collection state of a ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectState {
    /// Nothing is held for the ticker.
    Uncollected,
    /// An operation on the ticker is in flight.
    Collecting,
    /// A valuation is held for the ticker.
    Collected,
}

/// Per-ticker entry. Its mutex serialises every operation on one ticker.
#[derive(Debug, Default)]
struct Slot {
    valuation: Option<Valuation>,
}

type SlotRef = Arc<Mutex<Slot>>;

/// Registry that collects filings, derives valuations and persists them.
///
/// Each ticker is collected at most once until it is cleaned. Operations on
/// the same ticker run one after the other; different tickers proceed
/// independently.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use valuator::{JsonFilingSource, StaticPriceSource, Ticker, Valuator};
///
/// # async fn run() -> valuator::Result<()> {
/// let valuator = Valuator::builder()
///     .filing_source(Arc::new(JsonFilingSource::new("filings")))
///     .price_source(Arc::new(StaticPriceSource::new().with_price("AAPL", 172.5)))
///     .build()?;
///
/// let ticker = Ticker::new("AAPL");
/// valuator.collect(&ticker, &[]).await?;
/// let value = valuator
///     .discounted_cash_flow_trend(&ticker, 9.0, 100.0, 10, &[])
///     .await?;
/// println!("{ticker}: {value}");
/// # Ok(())
/// # }
/// ```
pub struct Valuator {
    filings: Arc<dyn FilingSource>,
    prices: Option<Arc<dyn PriceSource>>,
    store: Arc<dyn Store>,
    period_type: PeriodType,
    slots: RwLock<HashMap<Ticker, SlotRef>>,
}

impl std::fmt::Debug for Valuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Valuator")
            .field("filings", &self.filings.name())
            .field("prices", &self.prices.as_ref().map(|p| p.name()))
            .field("store", &self.store.name())
            .field("period_type", &self.period_type)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Valuator`].
#[derive(Default)]
pub struct ValuatorBuilder {
    filings: Option<Arc<dyn FilingSource>>,
    prices: Option<Arc<dyn PriceSource>>,
    store: Option<Arc<dyn Store>>,
    period_type: PeriodType,
}

impl std::fmt::Debug for ValuatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuatorBuilder")
            .field("filings", &self.filings.as_ref().map(|p| p.name()))
            .field("prices", &self.prices.as_ref().map(|p| p.name()))
            .field("store", &self.store.as_ref().map(|s| s.name()))
            .field("period_type", &self.period_type)
            .finish()
    }
}

impl ValuatorBuilder {
    /// Set the source of filings. Required.
    #[must_use]
    pub fn filing_source(mut self, source: Arc<dyn FilingSource>) -> Self {
        debug!(provider = source.name(), "Registering filing source");
        self.filings = Some(source);
        self
    }

    /// Set the source of market prices. Without one every price is `0`.
    #[must_use]
    pub fn price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        debug!(provider = source.name(), "Registering price source");
        self.prices = Some(source);
        self
    }

    /// Set the store. Defaults to a [`NoopStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the period type requested from the filing source.
    #[must_use]
    pub const fn period_type(mut self, period_type: PeriodType) -> Self {
        self.period_type = period_type;
        self
    }

    /// Apply a configuration, opening its store.
    ///
    /// # Errors
    /// Returns an error if the configured store cannot be opened.
    pub fn config(self, config: &ValuatorConfig) -> Result<Self> {
        let store = config.store.open()?;
        Ok(self.period_type(config.period_type).store(store))
    }

    /// Build the valuator.
    ///
    /// # Errors
    /// Returns [`ValuatorError::ProviderNotConfigured`] without a filing source,
    /// or [`ValuatorError::NotSupported`] if the source cannot deliver the
    /// requested period type.
    pub fn build(self) -> Result<Valuator> {
        let filings = self.filings.ok_or_else(|| {
            ValuatorError::ProviderNotConfigured("No filing source registered".to_string())
        })?;
        if !filings.supported_periods().contains(&self.period_type) {
            return Err(ValuatorError::NotSupported(format!(
                "{} does not provide {} filings",
                filings.name(),
                self.period_type
            )));
        }
        if self.prices.is_none() {
            warn!("No price source registered, prices will be 0");
        }

        Ok(Valuator {
            filings,
            prices: self.prices,
            store: self.store.unwrap_or_else(|| Arc::new(NoopStore::new())),
            period_type: self.period_type,
            slots: RwLock::new(HashMap::new()),
        })
    }
}

/// Wraps a store failure as a persistence error.
fn persistence(e: ValuatorError) -> ValuatorError {
    match e {
        ValuatorError::Persistence(_) => e,
        other => ValuatorError::Persistence(other.to_string()),
    }
}

impl Valuator {
    /// Start building a valuator.
    #[must_use]
    pub fn builder() -> ValuatorBuilder {
        ValuatorBuilder::default()
    }

    /// Build a valuator from configuration and collaborators.
    ///
    /// # Errors
    /// Same as [`ValuatorBuilder::config`] and [`ValuatorBuilder::build`].
    pub fn from_config(
        config: &ValuatorConfig,
        filings: Arc<dyn FilingSource>,
        prices: Option<Arc<dyn PriceSource>>,
    ) -> Result<Self> {
        let mut builder = Self::builder().filing_source(filings).config(config)?;
        if let Some(prices) = prices {
            builder = builder.price_source(prices);
        }
        builder.build()
    }

    /// Returns the configured store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Locks the slot of a ticker, creating it if needed.
    ///
    /// A slot that was removed while we waited for it is stale; retry against
    /// the current one.
    async fn lock_slot(&self, ticker: &Ticker) -> (SlotRef, OwnedMutexGuard<Slot>) {
        loop {
            let slot = {
                let mut slots = self.slots.write().await;
                Arc::clone(slots.entry(ticker.clone()).or_default())
            };
            let guard = Arc::clone(&slot).lock_owned().await;
            let current = self
                .slots
                .read()
                .await
                .get(ticker)
                .is_some_and(|s| Arc::ptr_eq(s, &slot));
            if current {
                return (slot, guard);
            }
            debug!(ticker = %ticker, "Slot removed while waiting, retrying");
        }
    }

    /// Removes a slot from the map if it is still the current one.
    async fn remove_slot(&self, ticker: &Ticker, slot: &SlotRef) {
        let mut slots = self.slots.write().await;
        if slots.get(ticker).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            slots.remove(ticker);
        }
    }

    async fn existing_slot(&self, ticker: &Ticker) -> Option<SlotRef> {
        self.slots.read().await.get(ticker).cloned()
    }

    /// Runs `f` on the valuation of a collected ticker.
    async fn with_valuation<R>(
        &self,
        ticker: &Ticker,
        f: impl FnOnce(&Valuation) -> Result<R>,
    ) -> Result<R> {
        let not_collected = || ValuatorError::NotCollected(ticker.to_string());
        let slot = self.existing_slot(ticker).await.ok_or_else(not_collected)?;
        let guard = slot.lock().await;
        let valuation = guard.valuation.as_ref().ok_or_else(not_collected)?;
        f(valuation)
    }

    /// Returns the collection state of a ticker.
    ///
    /// A ticker reads as [`CollectState::Collecting`] while any operation on
    /// it holds its slot.
    pub async fn state(&self, ticker: &Ticker) -> CollectState {
        let Some(slot) = self.existing_slot(ticker).await else {
            return CollectState::Uncollected;
        };
        match slot.try_lock() {
            Err(_) => CollectState::Collecting,
            Ok(guard) if guard.valuation.is_some() => CollectState::Collected,
            Ok(_) => CollectState::Uncollected,
        }
    }

    /// Returns the collected tickers in ascending order.
    pub async fn tickers(&self) -> Vec<Ticker> {
        let slots: Vec<(Ticker, SlotRef)> = self
            .slots
            .read()
            .await
            .iter()
            .map(|(t, s)| (t.clone(), Arc::clone(s)))
            .collect();

        let mut tickers = Vec::new();
        for (ticker, slot) in slots {
            if slot.lock().await.valuation.is_some() {
                tickers.push(ticker);
            }
        }
        tickers.sort();
        tickers
    }

    /// Collects a ticker: fetches its filings, derives the valuation and
    /// persists it.
    ///
    /// When `years` is not empty only filings from those years are kept. A
    /// raw payload cached in the store is handed to the filing source as a
    /// hint. A failing price source is tolerated and prices at `0`.
    ///
    /// # Errors
    /// - [`ValuatorError::AlreadyCollected`] if the ticker is collected
    /// - [`ValuatorError::NoData`] if no filing survives the year filter
    /// - [`ValuatorError::NoYearOverYear`] if fewer than two filings remain
    /// - [`ValuatorError::Persistence`] if a store write fails; the ticker
    ///   stays collected
    /// - any filing source error
    ///
    /// On any error other than a store write the ticker is left uncollected.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn collect(&self, ticker: &Ticker, years: &[i32]) -> Result<()> {
        let (slot, mut guard) = self.lock_slot(ticker).await;
        if guard.valuation.is_some() {
            return Err(ValuatorError::AlreadyCollected(ticker.to_string()));
        }

        let valuation = match self.build_valuation(ticker, years).await {
            Ok(valuation) => valuation,
            Err(e) => {
                warn!(error = %e, "Collection failed, cleaning up");
                self.remove_slot(ticker, &slot).await;
                return Err(e);
            }
        };

        let persisted = self.persist(&valuation).await;
        debug!(periods = valuation.measures().len(), "Collected");
        guard.valuation = Some(valuation);
        persisted
    }

    async fn build_valuation(&self, ticker: &Ticker, years: &[i32]) -> Result<Valuation> {
        let hint = self.cached_payload(ticker).await;
        let mut filings = self
            .filings
            .fetch_filings(ticker, self.period_type, hint.as_deref())
            .await?;
        if !years.is_empty() {
            filings.retain(|f| years.contains(&f.filed_year()));
        }
        if filings.is_empty() {
            return Err(ValuatorError::NoData(ticker.to_string()));
        }

        let (measures, averages) = analyze(ticker, filings)?;
        let price = match self.current_price(ticker).await {
            Ok(price) => price,
            Err(e) => {
                warn!(error = %e, "Price unavailable, using 0");
                0.0
            }
        };
        Valuation::new(ticker.clone(), measures, averages, price, Utc::now())
    }

    async fn cached_payload(&self, ticker: &Ticker) -> Option<Vec<u8>> {
        match self.store.read(&filings_key(ticker)).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "Found cached filings");
                Some(bytes)
            }
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to read cached filings");
                None
            }
        }
    }

    async fn current_price(&self, ticker: &Ticker) -> Result<f64> {
        match &self.prices {
            Some(prices) => prices.current_price(ticker).await,
            None => Err(ValuatorError::ProviderNotConfigured(
                "No price source registered".to_string(),
            )),
        }
    }

    /// Writes the raw filing payload and the valuation JSON.
    async fn persist(&self, valuation: &Valuation) -> Result<()> {
        let ticker = valuation.ticker();
        match self.filings.serialize_raw(ticker).await {
            Ok(raw) => self
                .store
                .write(&filings_key(ticker), &raw)
                .await
                .map_err(persistence)?,
            Err(e) => warn!(error = %e, "Skipping raw filing payload"),
        }
        self.persist_valuation(valuation).await
    }

    async fn persist_valuation(&self, valuation: &Valuation) -> Result<()> {
        let json = valuation.to_json()?;
        self.store
            .write(&valuation_key(valuation.ticker()), &json)
            .await
            .map_err(persistence)
    }

    /// Forgets everything held for a ticker. Cleaning an uncollected ticker
    /// does nothing.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn clean(&self, ticker: &Ticker) {
        let Some(slot) = self.existing_slot(ticker).await else {
            return;
        };
        let mut guard = Arc::clone(&slot).lock_owned().await;
        guard.valuation = None;
        self.remove_slot(ticker, &slot).await;
        debug!("Cleaned");
    }

    /// Re-fetches the price of a collected ticker, reprices its latest
    /// period and persists the updated valuation.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NotCollected`] for an uncollected ticker, the
    /// price source error (the previous metrics are kept), or
    /// [`ValuatorError::Persistence`] if the store write fails.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn refresh_price(&self, ticker: &Ticker) -> Result<PriceBasedMetrics> {
        let not_collected = || ValuatorError::NotCollected(ticker.to_string());
        let slot = self.existing_slot(ticker).await.ok_or_else(not_collected)?;
        let mut guard = slot.lock().await;
        let valuation = guard.valuation.as_mut().ok_or_else(not_collected)?;

        let price = self.current_price(ticker).await?;
        valuation.reprice(price);
        debug!(price, "Repriced");
        self.persist_valuation(valuation).await?;
        Ok(*valuation.price_metrics())
    }

    /// Returns a copy of a collected valuation.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NotCollected`] for an uncollected ticker.
    pub async fn valuation(&self, ticker: &Ticker) -> Result<Valuation> {
        self.with_valuation(ticker, |v| Ok(v.clone())).await
    }

    /// Returns the most recent filing of a collected ticker.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NotCollected`] for an uncollected ticker.
    pub async fn last_filing(&self, ticker: &Ticker) -> Result<Filing> {
        self.with_valuation(ticker, |v| Ok(v.last_filing().clone())).await
    }

    /// Returns the published JSON of a collected valuation.
    ///
    /// # Errors
    /// Returns [`ValuatorError::NotCollected`] for an uncollected ticker.
    pub async fn export(&self, ticker: &Ticker) -> Result<Vec<u8>> {
        self.with_valuation(ticker, Valuation::to_json).await
    }

    /// Returns the measures of a collected ticker as a [`DataFrame`].
    ///
    /// # Errors
    /// Returns [`ValuatorError::NotCollected`] for an uncollected ticker.
    pub async fn measures_frame(&self, ticker: &Ticker) -> Result<DataFrame> {
        self.with_valuation(ticker, |v| measures_frame(v.measures())).await
    }

    /// Projects a valuation from explicit growth rates.
    ///
    /// # Arguments
    ///
    /// * `ticker` - A collected ticker
    /// * `rate` - Discount rate in percent
    /// * `bv_growth` - Book value growth per period
    /// * `div_growth` - Dividend growth per period
    /// * `duration` - Number of projected periods
    /// * `cutoff` - At most one filing year to project from
    ///
    /// # Errors
    /// [`ValuatorError::InvalidParameter`] for more than one cutoff year,
    /// [`ValuatorError::NotCollected`] for an uncollected ticker, or
    /// [`ValuatorError::NoData`] if no period survives the cutoff.
    pub async fn discounted_cash_flow(
        &self,
        ticker: &Ticker,
        rate: f64,
        bv_growth: f64,
        div_growth: f64,
        duration: u32,
        cutoff: &[i32],
    ) -> Result<f64> {
        let cutoff = dcf::single_cutoff(cutoff)?;
        self.with_valuation(ticker, |v| {
            dcf::discounted_cash_flow(v.measures(), rate, bv_growth, div_growth, duration, cutoff)
        })
        .await
    }

    /// Projects a valuation from average growth scaled by `trend` percent.
    ///
    /// # Errors
    /// Same as [`Valuator::discounted_cash_flow`], plus
    /// [`ValuatorError::NoYearOverYear`] if the cutoff leaves a single period.
    pub async fn discounted_cash_flow_trend(
        &self,
        ticker: &Ticker,
        rate: f64,
        trend: f64,
        duration: u32,
        cutoff: &[i32],
    ) -> Result<f64> {
        let cutoff = dcf::single_cutoff(cutoff)?;
        self.with_valuation(ticker, |v| {
            dcf::discounted_cash_flow_trend(
                v.measures(),
                v.averages(),
                rate,
                trend,
                duration,
                cutoff,
            )
        })
        .await
    }

    /// Projects a valuation with book value growing by the average free cash
    /// flow growth, scaled by `trend` percent.
    ///
    /// # Errors
    /// Same as [`Valuator::discounted_cash_flow_trend`].
    pub async fn discounted_fcf_trend(
        &self,
        ticker: &Ticker,
        rate: f64,
        trend: f64,
        duration: u32,
        cutoff: &[i32],
    ) -> Result<f64> {
        let cutoff = dcf::single_cutoff(cutoff)?;
        self.with_valuation(ticker, |v| {
            dcf::discounted_fcf_trend(v.measures(), v.averages(), rate, trend, duration, cutoff)
        })
        .await
    }
}
