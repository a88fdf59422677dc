//! Property-based tests for the converter state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::*;
use crate::beacon::testing::{sample_conversion, sample_currencies};
use crate::beacon::{ConversionRequest, CurrencyCatalog, FetchError};
use crate::input;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn catalog() -> CurrencyCatalog {
    CurrencyCatalog::from(sample_currencies())
}

/// A state with the catalog loaded and the given inputs, with the tracked
/// conversion key kept consistent with those inputs.
fn seeded_state(from: &str, to: &str, amount: &str) -> ConverterState {
    let mut state = ConverterState::new();
    state.catalog.resolve(Ok(catalog()));
    state.from_code = from.to_string();
    state.to_code = to.to_string();
    state.amount = amount.to_string();
    state.amount_draft = amount.to_string();
    state.conversion_key = state.derived_request().map(|request| request.cache_key());
    state
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("GBP".to_string()),
        Just("JPY".to_string()),
        Just("CAD".to_string()),
    ]
}

/// Committed-amount shapes, weighted toward a few fixed values so that
/// generated conversion answers sometimes match an in-flight key.
fn arb_amount_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("0".to_string()),
        Just("1".to_string()),
        Just("100".to_string()),
        Just("2500".to_string()),
        "[0-9]{1,6}",
        r"[0-9]{0,3}\.[0-9]{0,3}",
    ]
}

/// Raw keystrokes: plausible amounts mixed with arbitrary printable junk
fn arb_edit_text() -> impl Strategy<Value = String> {
    prop_oneof![arb_amount_text(), "[ -~]{0,12}"]
}

fn arb_catalog_outcome() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::CatalogLoaded(catalog())),
        "[a-zA-Z ]{1,30}".prop_map(|message| Event::CatalogFailed(FetchError::catalog(message))),
    ]
}

fn arb_selection_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_code().prop_map(Event::FromSelected),
        arb_code().prop_map(Event::ToSelected),
        Just(Event::Swapped),
    ]
}

fn arb_amount_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_edit_text().prop_map(Event::AmountEdited),
        Just(Event::AmountCommitted),
        arb_amount_text().prop_map(|value| Event::DebounceElapsed { value }),
    ]
}

fn arb_conversion_outcome() -> impl Strategy<Value = Event> {
    let amount = prop_oneof![Just(1.0f64), Just(100.0), Just(2500.0)];
    (arb_code(), arb_code(), amount, any::<bool>()).prop_map(|(from, to, amount, ok)| {
        let key = ConversionRequest::new(&from, &to, amount).cache_key();
        if ok {
            Event::ConversionLoaded {
                key,
                result: sample_conversion(&from, &to, amount),
            }
        } else {
            Event::ConversionFailed {
                key,
                error: FetchError::conversion("HTTP 500: Internal server error"),
            }
        }
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Started),
        arb_catalog_outcome(),
        arb_selection_event(),
        arb_amount_event(),
        arb_conversion_outcome(),
    ]
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &ConverterState) -> bool {
    // A query is never loading and failed at the same time
    if state.catalog.is_loading && state.catalog.error.is_some() {
        return false;
    }
    if state.conversion.is_loading && state.conversion.error.is_some() {
        return false;
    }
    // A conversion in flight always has a key to match its answer against
    if state.conversion.is_loading && state.conversion_key.is_none() {
        return false;
    }
    // The tracked key always reflects exactly what the inputs derive
    let derived_key = state.derived_request().map(|request| request.cache_key());
    state.conversion_key == derived_key
}

fn effects_are_valid(effects: &[Effect], new_state: &ConverterState) -> bool {
    for effect in effects {
        match effect {
            Effect::FetchCatalog => {
                if !new_state.catalog.is_loading {
                    return false;
                }
            }
            Effect::FetchConversion { request } => {
                if !new_state.conversion.is_loading {
                    return false;
                }
                if new_state.conversion_key.as_deref() != Some(request.cache_key().as_str()) {
                    return false;
                }
            }
            Effect::ArmDebounce { value } => {
                if new_state.amount_draft != *value {
                    return false;
                }
            }
            Effect::CancelDebounce => {}
        }
    }
    true
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: queries and the tracked key stay consistent across any
    // event sequence starting from the initial state
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ConverterState::new();

        for event in events {
            let result = transition(&state, event);
            state = result.new_state;
            prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
            prop_assert!(
                effects_are_valid(&result.effects, &state),
                "Invalid effects for state {:?}: {:?}",
                state,
                result.effects
            );
        }
    }

    // Invariant 2: a conversion fetch fires only for a complete, positive
    // request whose key differs from the one already tracked
    #[test]
    fn prop_fetch_requires_new_key(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ConverterState::new();

        for event in events {
            let previous_key = state.conversion_key.clone();
            let result = transition(&state, event);
            state = result.new_state;

            for effect in &result.effects {
                if let Effect::FetchConversion { request } = effect {
                    prop_assert!(!request.from.is_empty() && !request.to.is_empty());
                    prop_assert!(request.amount > 0.0);
                    let fetched_key = request.cache_key();
                    prop_assert_ne!(
                        previous_key.as_deref(),
                        Some(fetched_key.as_str()),
                        "refetched a key that was already tracked"
                    );
                }
            }
        }
    }

    // Invariant 3: an edit either updates only the draft or changes nothing
    #[test]
    fn prop_edit_gate(
        from in arb_code(),
        to in arb_code(),
        amount in arb_amount_text(),
        text in arb_edit_text()
    ) {
        let state = seeded_state(&from, &to, &amount);
        let result = transition(&state, Event::AmountEdited(text.clone()));

        if input::accepts_amount(&text) {
            prop_assert_eq!(&result.new_state.amount_draft, &text);
            prop_assert_eq!(&result.new_state.amount, &state.amount, "commit waits for the timer");
            prop_assert_eq!(result.effects, vec![Effect::ArmDebounce { value: text }]);
        } else {
            prop_assert_eq!(result.new_state, state);
            prop_assert!(result.effects.is_empty());
        }
    }

    // Invariant 4: swapping twice restores the pair and never touches the
    // amount; a one-sided swap changes nothing at all
    #[test]
    fn prop_swap_round_trips(from in arb_code(), to in arb_code(), amount in arb_amount_text()) {
        let state = seeded_state(&from, &to, &amount);

        let once = transition(&state, Event::Swapped);
        prop_assert_eq!(&once.new_state.amount, &state.amount);
        prop_assert_eq!(&once.new_state.amount_draft, &state.amount_draft);
        if !state.swap_enabled() {
            prop_assert_eq!(&once.new_state, &state);
            prop_assert!(once.effects.is_empty());
        }

        let twice = transition(&once.new_state, Event::Swapped);
        prop_assert_eq!(&twice.new_state.from_code, &state.from_code);
        prop_assert_eq!(&twice.new_state.to_code, &state.to_code);
        prop_assert_eq!(&twice.new_state.amount, &state.amount);
    }

    // Invariant 5: answers for a key other than the tracked one never land
    #[test]
    fn prop_stale_answers_are_dropped(
        from in "[a-z]{3}", // Lowercase, so the key can never match the tracked one
        to in "[a-z]{3}",
        amount in 1u32..10_000,
        ok in any::<bool>()
    ) {
        let mut state = seeded_state("USD", "EUR", "100");
        state.conversion.begin_loading();
        let amount = f64::from(amount);

        let stale_key = ConversionRequest::new(&from, &to, amount).cache_key();
        let event = if ok {
            Event::ConversionLoaded {
                key: stale_key,
                result: sample_conversion(&from, &to, amount),
            }
        } else {
            Event::ConversionFailed {
                key: stale_key,
                error: FetchError::conversion("HTTP 500: Internal server error"),
            }
        };

        let result = transition(&state, event);
        prop_assert_eq!(result.new_state, state, "stale answer must not land");
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 6: the answer for the tracked key always resolves the query
    #[test]
    fn prop_matching_answer_lands(amount in 1u32..10_000, ok in any::<bool>()) {
        let amount = f64::from(amount);
        let mut state = seeded_state("USD", "EUR", &format!("{amount}"));
        state.conversion.begin_loading();
        let key = state.conversion_key.clone().unwrap();

        let event = if ok {
            Event::ConversionLoaded {
                key,
                result: sample_conversion("USD", "EUR", amount),
            }
        } else {
            Event::ConversionFailed {
                key,
                error: FetchError::conversion("HTTP 502: Bad gateway"),
            }
        };

        let result = transition(&state, event);
        let conversion = &result.new_state.conversion;
        prop_assert!(!conversion.is_loading);
        if ok {
            prop_assert!(conversion.data.is_some());
            prop_assert!(conversion.error.is_none());
        } else {
            prop_assert!(conversion.data.is_none());
            prop_assert!(conversion.error.is_some());
        }
    }

    // Invariant 7: catalog outcomes never disturb the inputs or the conversion
    #[test]
    fn prop_catalog_outcome_preserves_inputs(
        from in arb_code(),
        to in arb_code(),
        amount in arb_amount_text(),
        ok in any::<bool>()
    ) {
        let state = seeded_state(&from, &to, &amount);
        let event = if ok {
            Event::CatalogLoaded(catalog())
        } else {
            Event::CatalogFailed(FetchError::catalog("HTTP 500: Internal server error"))
        };

        let result = transition(&state, event);
        prop_assert_eq!(&result.new_state.from_code, &state.from_code);
        prop_assert_eq!(&result.new_state.to_code, &state.to_code);
        prop_assert_eq!(&result.new_state.amount, &state.amount);
        prop_assert_eq!(&result.new_state.conversion, &state.conversion);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 8: the draft filter admits exactly digit strings with at
    // most one decimal point
    #[test]
    fn prop_amount_filter_matches_model(text in "[ -~]{0,12}") {
        let model = text.chars().all(|c| c.is_ascii_digit() || c == '.')
            && text.chars().filter(|c| *c == '.').count() <= 1;
        prop_assert_eq!(input::accepts_amount(&text), model);
    }

    // Invariant 9: committing cancels the timer and lands on a two-decimal
    // amount, or leaves the committed amount alone when the draft is
    // unparseable
    #[test]
    fn prop_commit_normalizes_draft(
        from in arb_code(),
        to in arb_code(),
        draft in r"[0-9]{0,6}\.?[0-9]{0,6}"
    ) {
        let mut state = seeded_state(&from, &to, "100");
        state.amount_draft.clone_from(&draft);

        let result = transition(&state, Event::AmountCommitted);
        prop_assert_eq!(result.effects.first(), Some(&Effect::CancelDebounce));

        match input::format_on_commit(&draft) {
            Some(formatted) => {
                prop_assert_eq!(&result.new_state.amount, &formatted);
                prop_assert_eq!(&result.new_state.amount_draft, &formatted);
                let decimals = formatted.split_once('.').map(|(_, d)| d.len());
                prop_assert_eq!(decimals, Some(2));
            }
            None => {
                prop_assert_eq!(&result.new_state.amount, &state.amount);
                prop_assert_eq!(&result.new_state.amount_draft, &draft);
                prop_assert_eq!(result.effects, vec![Effect::CancelDebounce]);
            }
        }
    }
}

// ============================================================================
// Sequence Tests - Multi-Step Scenarios
// ============================================================================

/// Full happy path: startup, selection, a typing burst, debounce, result
#[test]
fn test_complete_conversion_cycle() {
    let mut state = ConverterState::new();

    let result = transition(&state, Event::Started);
    assert_eq!(result.effects, vec![Effect::FetchCatalog]);
    state = result.new_state;

    state = transition(&state, Event::CatalogLoaded(catalog())).new_state;
    assert!(!state.catalog.is_loading);

    state = transition(&state, Event::FromSelected("USD".to_string())).new_state;
    state = transition(&state, Event::ToSelected("EUR".to_string())).new_state;
    assert!(state.conversion_key.is_none(), "no amount typed yet");

    // Typing burst: every keystroke re-arms the debounce, none of them fetch
    for draft in ["1", "10", "100"] {
        let result = transition(&state, Event::AmountEdited(draft.to_string()));
        assert_eq!(
            result.effects,
            vec![Effect::ArmDebounce {
                value: draft.to_string()
            }]
        );
        state = result.new_state;
    }
    assert_eq!(state.amount, "", "commit waits for the timer");

    let result = transition(
        &state,
        Event::DebounceElapsed {
            value: "100".to_string(),
        },
    );
    state = result.new_state;
    assert_eq!(state.conversion_key.as_deref(), Some("USD:EUR:100"));
    assert_eq!(
        result.effects,
        vec![Effect::FetchConversion {
            request: ConversionRequest::new("USD", "EUR", 100.0)
        }]
    );
    assert!(state.conversion.is_loading);

    let result = transition(
        &state,
        Event::ConversionLoaded {
            key: "USD:EUR:100".to_string(),
            result: sample_conversion("USD", "EUR", 100.0),
        },
    );
    state = result.new_state;
    assert!(!state.conversion.is_loading);
    let value = state.conversion.data.map(|r| r.value).unwrap();
    assert!((value - 85.5).abs() < 1e-9);
}

/// A swap mid-flight: the old pair's late answer is dropped, the mirrored
/// pair's answer lands
#[test]
fn test_swap_mid_flight_drops_late_answer() {
    let mut state = ConverterState::new();
    state.catalog.resolve(Ok(catalog()));
    state.from_code = "USD".to_string();
    state.to_code = "EUR".to_string();

    let result = transition(
        &state,
        Event::DebounceElapsed {
            value: "100".to_string(),
        },
    );
    state = result.new_state;
    assert_eq!(state.conversion_key.as_deref(), Some("USD:EUR:100"));

    let result = transition(&state, Event::Swapped);
    state = result.new_state;
    assert_eq!(state.conversion_key.as_deref(), Some("EUR:USD:100"));
    assert_eq!(
        result.effects,
        vec![Effect::FetchConversion {
            request: ConversionRequest::new("EUR", "USD", 100.0)
        }]
    );

    // The pre-swap request answers late; it must not land
    let result = transition(
        &state,
        Event::ConversionLoaded {
            key: "USD:EUR:100".to_string(),
            result: sample_conversion("USD", "EUR", 100.0),
        },
    );
    assert_eq!(result.new_state, state);

    let result = transition(
        &state,
        Event::ConversionLoaded {
            key: "EUR:USD:100".to_string(),
            result: sample_conversion("EUR", "USD", 100.0),
        },
    );
    state = result.new_state;
    assert!(!state.conversion.is_loading);
    let landed = state.conversion.data.unwrap();
    assert_eq!(landed.from, "EUR");
    assert!((landed.value - 117.0).abs() < 1e-9);
}
