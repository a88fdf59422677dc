//! Events that drive the converter

use crate::beacon::{ConversionResult, CurrencyCatalog, FetchError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Application start; kicks off the catalog fetch
    Started,

    // Catalog fetch outcomes
    CatalogLoaded(CurrencyCatalog),
    CatalogFailed(FetchError),

    // User input
    FromSelected(String),
    ToSelected(String),
    Swapped,
    /// A keystroke changed the amount field to this draft text
    AmountEdited(String),
    /// The user left the amount field (commit point)
    AmountCommitted,

    /// The debounce timer fired for a draft that survived the quiet period
    DebounceElapsed { value: String },

    // Conversion fetch outcomes, tagged with the cache key they answer
    ConversionLoaded {
        key: String,
        result: ConversionResult,
    },
    ConversionFailed {
        key: String,
        error: FetchError,
    },
}
