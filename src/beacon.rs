//! Currency provider abstraction
//!
//! Provides a common interface for fetching the currency catalog and
//! conversion results from a rate provider.

mod client;
mod error;
mod types;

pub use client::{BeaconClient, BeaconConfig};
pub use error::{FetchError, FetchErrorKind};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for currency rate providers
#[async_trait]
pub trait CurrencySource: Send + Sync {
    /// Fetch the full list of supported currencies
    async fn currencies(&self) -> Result<Vec<Currency>, FetchError>;

    /// Convert an amount between two currencies at the current rate
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, FetchError>;
}

/// Logging wrapper for currency sources
pub struct LoggingSource {
    inner: Arc<dyn CurrencySource>,
}

impl LoggingSource {
    pub fn new(inner: Arc<dyn CurrencySource>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CurrencySource for LoggingSource {
    async fn currencies(&self) -> Result<Vec<Currency>, FetchError> {
        let start = std::time::Instant::now();
        let result = self.inner.currencies().await;
        let duration = start.elapsed();

        match &result {
            Ok(currencies) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    count = currencies.len(),
                    "Currency catalog fetched"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    "Currency catalog fetch failed"
                );
            }
        }

        result
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, FetchError> {
        let start = std::time::Instant::now();
        let result = self.inner.convert(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(conversion) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    from = %request.from,
                    to = %request.to,
                    value = conversion.value,
                    "Conversion fetched"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    from = %request.from,
                    to = %request.to,
                    error = %e.message,
                    "Conversion fetch failed"
                );
            }
        }

        result
    }
}
