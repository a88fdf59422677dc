//! Runtime driving the converter state machine
//!
//! Owns the event loop around the pure transition function: applies events,
//! executes the effects they produce, and feeds fetch completions and timer
//! expiries back in as new events.

use crate::beacon::{ConversionResult, CurrencyCatalog, CurrencySource};
use crate::converter::{transition, ConverterState, Effect, Event};
use crate::input::{Debouncer, DEBOUNCE_DELAY};
use crate::query::{CachePolicy, QueryCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Cache key for the single catalog query
const CATALOG_KEY: &str = "currencies";

/// Drives [`ConverterState`] against a [`CurrencySource`].
///
/// Fetches run as background tasks so the loop never blocks on the network.
/// Their completions come back through the event channel carrying the cache
/// key they answer, which the transition matches against the tracked key
/// before letting them land.
pub struct ConverterRuntime<S: CurrencySource + 'static> {
    source: Arc<S>,
    state: ConverterState,
    catalog_cache: QueryCache<CurrencyCatalog>,
    conversion_cache: QueryCache<ConversionResult>,
    debouncer: Debouncer,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
}

impl<S: CurrencySource + 'static> ConverterRuntime<S> {
    pub fn new(source: Arc<S>, policy: CachePolicy) -> Self {
        Self::with_debounce(source, policy, DEBOUNCE_DELAY)
    }

    /// Like [`Self::new`] with a custom debounce delay, so tests do not
    /// sit out the production quiet period
    pub fn with_debounce(source: Arc<S>, policy: CachePolicy, debounce_delay: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        Self {
            source,
            state: ConverterState::new(),
            catalog_cache: QueryCache::new(policy.catalog_stale_after),
            conversion_cache: QueryCache::new(policy.conversion_stale_after),
            debouncer: Debouncer::new(debounce_delay),
            event_rx,
            event_tx,
        }
    }

    pub fn state(&self) -> &ConverterState {
        &self.state
    }

    /// Apply one event: pure transition first, then execute the effects
    pub fn apply(&mut self, event: Event) {
        let result = transition(&self.state, event);
        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    /// Wait for the next internally generated event (a fetch completion or
    /// a debounce expiry) and apply it
    pub async fn tick(&mut self) {
        if let Some(event) = self.event_rx.recv().await {
            self.apply(event);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchCatalog => {
                tracing::debug!("Fetching currency catalog");
                let cache = self.catalog_cache.clone();
                let source = Arc::clone(&self.source);
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let fetcher =
                        async move { source.currencies().await.map(CurrencyCatalog::from) };
                    let event = match cache.fetch(CATALOG_KEY, fetcher).await {
                        Ok(catalog) => Event::CatalogLoaded(catalog),
                        Err(error) => Event::CatalogFailed(error),
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::FetchConversion { request } => {
                let cache = self.conversion_cache.clone();
                let source = Arc::clone(&self.source);
                let event_tx = self.event_tx.clone();
                let key = request.cache_key();
                tracing::debug!(%key, "Fetching conversion");
                tokio::spawn(async move {
                    let fetcher = async move { source.convert(&request).await };
                    let event = match cache.fetch(&key, fetcher).await {
                        Ok(result) => Event::ConversionLoaded { key, result },
                        Err(error) => Event::ConversionFailed { key, error },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::ArmDebounce { value } => {
                self.debouncer
                    .arm(&self.event_tx, Event::DebounceElapsed { value });
            }

            Effect::CancelDebounce => self.debouncer.cancel(),
        }
    }
}
