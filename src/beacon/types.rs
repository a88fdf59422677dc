//! Wire and domain types for the exchange-rate provider API

use serde::Deserialize;
use std::collections::HashMap;

/// Response envelope shared by every provider endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub meta: ApiMeta,
    pub response: T,
}

/// Provider metadata attached to every response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMeta {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub disclaimer: String,
}

/// One entry of the currency catalog
///
/// Unknown provider fields (precision, subunit, separators, ...) are ignored
/// on deserialization; only what the core renders and keys on is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Currency {
    pub id: u64,
    pub name: String,
    /// 3-letter code, the unique lookup key (e.g. "USD")
    pub short_code: String,
    /// Display glyph (e.g. "$")
    pub symbol: String,
    /// Whether the glyph precedes the numeric value
    pub symbol_first: bool,
}

impl Currency {
    /// Reduce to the projection held as UI selection state
    pub fn selected(&self) -> SelectedCurrency {
        SelectedCurrency {
            short_code: self.short_code.clone(),
            symbol: self.symbol.clone(),
            symbol_first: self.symbol_first,
        }
    }
}

/// The fetched catalog, immutable once built, indexed by short code
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrencyCatalog {
    currencies: Vec<Currency>,
    by_code: HashMap<String, usize>,
}

impl From<Vec<Currency>> for CurrencyCatalog {
    fn from(currencies: Vec<Currency>) -> Self {
        let by_code = currencies
            .iter()
            .enumerate()
            .map(|(idx, currency)| (currency.short_code.clone(), idx))
            .collect();
        Self {
            currencies,
            by_code,
        }
    }
}

impl CurrencyCatalog {
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Iterate in the provider's order (used for selector rows)
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    /// Look up a currency by short code
    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.by_code
            .get(code)
            .and_then(|idx| self.currencies.get(*idx))
    }

    /// Resolve a short code into selection state; `None` when the code is
    /// empty or no longer resolves against the catalog
    pub fn select(&self, code: &str) -> Option<SelectedCurrency> {
        self.get(code).map(Currency::selected)
    }
}

/// Reduced projection of a [`Currency`] held as selection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCurrency {
    pub short_code: String,
    pub symbol: String,
    pub symbol_first: bool,
}

/// A fully specified conversion to perform
///
/// Constructed fresh on every relevant state change; the enablement gate
/// (non-empty codes, amount > 0) lives in the coordinator, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// Cache key for this request: distinct amounts are distinct entries
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.from, self.to, self.amount)
    }
}

/// Immutable snapshot of one conversion as returned by the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    /// The converted total in the target currency
    pub value: f64,
    /// Calendar date string reported by the provider
    #[serde(default)]
    pub date: String,
    /// Unix seconds, UTC
    pub timestamp: i64,
}

impl ConversionResult {
    /// Exchange rate for one unit of the source currency
    pub fn unit_rate(&self) -> f64 {
        if self.amount.abs() < f64::EPSILON {
            return 0.0;
        }
        self.value / self.amount
    }
}
