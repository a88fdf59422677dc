//! Effects produced by state transitions

use crate::beacon::ConversionRequest;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the currency catalog (spawned as a background task)
    FetchCatalog,

    /// Fetch a conversion for the derived request
    FetchConversion { request: ConversionRequest },

    /// Start (or restart) the amount debounce timer for this draft
    ArmDebounce { value: String },

    /// Discard any pending debounce timer
    CancelDebounce,
}
