//! Converter state types

use crate::beacon::{ConversionRequest, ConversionResult, CurrencyCatalog, SelectedCurrency};
use crate::query::QueryState;

/// Full state of the converter.
///
/// `amount_draft` tracks the field as typed; `amount` is the committed
/// text that drives conversion requests, updated when the debounce fires
/// or an edit is committed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConverterState {
    pub from_code: String,
    pub to_code: String,
    pub amount: String,
    pub amount_draft: String,
    pub catalog: QueryState<CurrencyCatalog>,
    pub conversion: QueryState<ConversionResult>,
    /// Cache key of the conversion the panel currently tracks; completion
    /// events for any other key are stale and get dropped
    pub conversion_key: Option<String>,
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversion request the current inputs call for, or `None`
    /// while inputs are incomplete or the amount is not positive
    pub fn derived_request(&self) -> Option<ConversionRequest> {
        if self.from_code.is_empty() || self.to_code.is_empty() {
            return None;
        }
        let amount: f64 = self.amount.parse().ok()?;
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        Some(ConversionRequest::new(
            &self.from_code,
            &self.to_code,
            amount,
        ))
    }

    /// Source currency as resolved against the loaded catalog
    pub fn from_currency(&self) -> Option<SelectedCurrency> {
        self.selected(&self.from_code)
    }

    /// Target currency as resolved against the loaded catalog
    pub fn to_currency(&self) -> Option<SelectedCurrency> {
        self.selected(&self.to_code)
    }

    fn selected(&self, code: &str) -> Option<SelectedCurrency> {
        self.catalog
            .data
            .as_ref()
            .and_then(|catalog| catalog.select(code))
    }

    /// Swapping needs both sides selected
    pub fn swap_enabled(&self) -> bool {
        !self.from_code.is_empty() && !self.to_code.is_empty()
    }
}
