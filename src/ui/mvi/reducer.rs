//! Reducer trait and dispatch helper.

use super::intent::Intent;
use super::state::UiState;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where screen state transitions happen.
/// It is a pure function: side effects belong to the caller, which looks at
/// the previous and next state around the call.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Run `R` on `state` in place and return the state it replaced.
pub fn dispatch<R: Reducer>(state: &mut R::State, intent: R::Intent) -> R::State {
    let previous = std::mem::take(state);
    *state = R::reduce(previous.clone(), intent);
    previous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Counter(u32);
    impl UiState for Counter {}

    #[derive(Debug)]
    struct Add(u32);
    impl Intent for Add {}

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Intent = Add;

        fn reduce(state: Counter, intent: Add) -> Counter {
            Counter(state.0 + intent.0)
        }
    }

    #[test]
    fn dispatch_returns_previous_state() {
        let mut state = Counter(1);
        let previous = dispatch::<CounterReducer>(&mut state, Add(2));
        assert_eq!(previous, Counter(1));
        assert_eq!(state, Counter(3));
    }
}
