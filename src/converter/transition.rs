//! Pure state transition function

use super::state::ConverterState;
use super::{Effect, Event};
use crate::input;
use crate::query::QueryState;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConverterState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConverterState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
///
/// Given the same state and event it always produces the same new state
/// and effects; all I/O lives in the runtime that executes the effects.
pub fn transition(state: &ConverterState, event: Event) -> TransitionResult {
    match event {
        Event::Started => {
            let mut next = state.clone();
            next.catalog.begin_loading();
            TransitionResult::new(next).with_effect(Effect::FetchCatalog)
        }

        Event::CatalogLoaded(catalog) => {
            let mut next = state.clone();
            next.catalog.resolve(Ok(catalog));
            TransitionResult::new(next)
        }

        Event::CatalogFailed(error) => {
            let mut next = state.clone();
            next.catalog.resolve(Err(error));
            TransitionResult::new(next)
        }

        Event::FromSelected(code) => {
            let mut next = state.clone();
            next.from_code = code;
            rederive(next)
        }

        Event::ToSelected(code) => {
            let mut next = state.clone();
            next.to_code = code;
            rederive(next)
        }

        Event::Swapped => {
            if !state.swap_enabled() {
                return TransitionResult::new(state.clone());
            }
            let mut next = state.clone();
            std::mem::swap(&mut next.from_code, &mut next.to_code);
            rederive(next)
        }

        // Rejected drafts leave the field as-is; accepted drafts update it
        // and restart the debounce without touching the committed amount
        Event::AmountEdited(text) => {
            if !input::accepts_amount(&text) {
                return TransitionResult::new(state.clone());
            }
            let mut next = state.clone();
            next.amount_draft.clone_from(&text);
            TransitionResult::new(next).with_effect(Effect::ArmDebounce { value: text })
        }

        Event::DebounceElapsed { value } => {
            let mut next = state.clone();
            next.amount = value;
            rederive(next)
        }

        // Commit point: drop any pending debounce, normalize the draft to
        // two decimals, and propagate immediately. Unparseable drafts
        // ("", ".") commit nothing.
        Event::AmountCommitted => {
            let mut next = state.clone();
            match input::format_on_commit(&next.amount_draft) {
                Some(formatted) => {
                    next.amount_draft.clone_from(&formatted);
                    next.amount = formatted;
                    let mut result = rederive(next);
                    result.effects.insert(0, Effect::CancelDebounce);
                    result
                }
                None => TransitionResult::new(next).with_effect(Effect::CancelDebounce),
            }
        }

        Event::ConversionLoaded { key, result } => {
            if state.conversion_key.as_deref() != Some(key.as_str()) {
                // Answer to a superseded request
                return TransitionResult::new(state.clone());
            }
            let mut next = state.clone();
            next.conversion.resolve(Ok(result));
            TransitionResult::new(next)
        }

        Event::ConversionFailed { key, error } => {
            if state.conversion_key.as_deref() != Some(key.as_str()) {
                return TransitionResult::new(state.clone());
            }
            let mut next = state.clone();
            next.conversion.resolve(Err(error));
            TransitionResult::new(next)
        }
    }
}

/// Recompute the conversion query after an input change.
///
/// A complete set of inputs with a new cache key starts a fetch; the same
/// key leaves the query untouched; incomplete inputs clear it back to the
/// placeholder.
fn rederive(mut next: ConverterState) -> TransitionResult {
    match next.derived_request() {
        Some(request) => {
            let key = request.cache_key();
            if next.conversion_key.as_deref() == Some(key.as_str()) {
                return TransitionResult::new(next);
            }
            next.conversion.begin_loading();
            next.conversion_key = Some(key);
            TransitionResult::new(next).with_effect(Effect::FetchConversion { request })
        }
        None => {
            next.conversion = QueryState::idle();
            next.conversion_key = None;
            TransitionResult::new(next)
        }
    }
}
