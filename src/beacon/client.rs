//! CurrencyBeacon-style HTTP client

use super::error::{FetchError, FetchErrorKind};
use super::types::{ApiEnvelope, ConversionRequest, ConversionResult, Currency};
use super::CurrencySource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.currencybeacon.com/v1";

/// Provider configuration, read once at process start
#[derive(Debug, Clone)]
pub struct BeaconConfig {
    /// API key credential; `None` triggers a startup warning but requests
    /// are still attempted (the server decides whether to reject them)
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BeaconConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("CURRENCY_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            base_url: std::env::var("CURRENCY_API_BASE")
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// HTTP client for the two provider endpoints
pub struct BeaconClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BeaconClient {
    pub fn new(config: &BeaconConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }

    async fn get_json<T>(
        &self,
        kind: FetchErrorKind,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(kind, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(kind, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(rejection_error(kind, status, &body));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| FetchError::new(kind, format!("Failed to parse response: {e}")))?;

        Ok(envelope.response)
    }
}

#[async_trait]
impl CurrencySource for BeaconClient {
    async fn currencies(&self) -> Result<Vec<Currency>, FetchError> {
        self.get_json(FetchErrorKind::Catalog, "currencies", &[])
            .await
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, FetchError> {
        let amount = request.amount.to_string();
        self.get_json(
            FetchErrorKind::Conversion,
            "convert",
            &[
                ("from", request.from.as_str()),
                ("to", request.to.as_str()),
                ("amount", amount.as_str()),
            ],
        )
        .await
    }
}

/// Network-level failure: the service never answered
fn transport_error(kind: FetchErrorKind, e: &reqwest::Error) -> FetchError {
    let message = if e.is_timeout() {
        format!("Currency service timed out: {e}")
    } else if e.is_connect() {
        format!("Currency service unreachable: {e}")
    } else {
        format!("Request failed: {e}")
    };
    FetchError::new(kind, message)
}

/// Non-2xx status: the service answered and rejected the request
fn rejection_error(kind: FetchErrorKind, status: reqwest::StatusCode, body: &str) -> FetchError {
    // Error bodies carry {response: {error: {code, message}}}; fall back to
    // the raw body when that shape is absent.
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("response")?
                .get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    FetchError::new(kind, format!("HTTP {status}: {detail}"))
}
