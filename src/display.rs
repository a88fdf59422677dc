//! Presentation formatting
//!
//! Pure helpers from conversion data to display strings: currency-symbol
//! amounts, picker labels, timestamps, and the rendered view of the
//! conversion panel.

use crate::beacon::{ConversionResult, Currency, SelectedCurrency};
use crate::query::QueryState;
use chrono::{TimeZone, Utc};

/// Shown while a conversion fetch is in flight
pub const LOADING_MESSAGE: &str = "Converting...";

/// Shown when inputs are incomplete or invalid
pub const PLACEHOLDER_MESSAGE: &str =
    "Enter an amount and select currencies to see the conversion";

/// Format a monetary value with two decimals, thousands separators, and
/// the currency symbol on the side the catalog dictates
pub fn format_amount(value: f64, currency: &SelectedCurrency) -> String {
    let formatted = group_thousands(&format!("{:.2}", (value * 100.0).round() / 100.0));
    if currency.symbol_first {
        format!("{}{formatted}", currency.symbol)
    } else {
        format!("{formatted}{}", currency.symbol)
    }
}

/// Insert commas every three digits of the integer part. Input is a
/// non-negative `{:.2}`-style rendering.
fn group_thousands(amount: &str) -> String {
    let (int_part, frac_part) = match amount.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (amount, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(amount.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Picker label, e.g. "US Dollar | USD | $"
pub fn currency_label(currency: &Currency) -> String {
    format!(
        "{} | {} | {}",
        currency.name, currency.short_code, currency.symbol
    )
}

/// Render a provider timestamp (Unix seconds) as a UTC datetime,
/// e.g. "Jan 15, 2024, 10:50 AM"
pub fn format_timestamp(timestamp: i64) -> Option<String> {
    let datetime = Utc.timestamp_opt(timestamp, 0).single()?;
    Some(datetime.format("%b %-d, %Y, %I:%M %p").to_string())
}

/// What the conversion panel shows for the current query state
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionView {
    /// Fetch in flight
    Loading,
    /// Fetch settled with an error
    Error(String),
    /// Resolved conversion
    Ready {
        headline: String,
        rate_line: String,
        updated_line: String,
    },
    /// Inputs incomplete or invalid
    Placeholder,
}

/// Project the conversion query onto the panel.
///
/// Precedence: loading, then error, then data, then the placeholder.
/// A fetch in flight always shows as loading, even when earlier data or
/// an earlier error is still around.
pub fn conversion_view(
    query: &QueryState<ConversionResult>,
    from: Option<&SelectedCurrency>,
    to: Option<&SelectedCurrency>,
) -> ConversionView {
    if query.is_loading {
        return ConversionView::Loading;
    }
    if let Some(error) = &query.error {
        return ConversionView::Error(error.message.clone());
    }
    if let (Some(result), Some(from), Some(to)) = (&query.data, from, to) {
        let rate_line = format!(
            "1 {} = {:.6} {}",
            result.from,
            result.unit_rate(),
            result.to
        );
        let updated = format_timestamp(result.timestamp).unwrap_or_else(|| result.date.clone());

        return ConversionView::Ready {
            headline: format!(
                "{} = {}",
                format_amount(result.amount, from),
                format_amount(result.value, to)
            ),
            rate_line,
            updated_line: format!("Last updated: {updated}"),
        };
    }
    ConversionView::Placeholder
}
