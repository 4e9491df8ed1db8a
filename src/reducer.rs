//! Reducers: pure transitions from `(state, action)` to the next state.

use crate::{Action, DuxideError, DuxideResult, StateValue};
use std::fmt;

/// The result of running a reducer against an action.
///
/// This is the explicit replacement for a global warning channel: a miss is
/// not an error, but callers can distinguish it from a handled transition and
/// decide whether to log or escalate.
#[derive(Clone, Debug, PartialEq)]
pub enum ReduceOutcome {
    /// A handler ran; the value is the finalized next state.
    Handled(StateValue),
    /// No case or default matched; the value is the unchanged prior state.
    Unhandled(StateValue),
}

impl ReduceOutcome {
    /// The resulting state, handled or not.
    #[inline]
    pub fn state(&self) -> &StateValue {
        match self {
            ReduceOutcome::Handled(s) | ReduceOutcome::Unhandled(s) => s,
        }
    }

    /// Consume into the resulting state.
    #[inline]
    pub fn into_state(self) -> StateValue {
        match self {
            ReduceOutcome::Handled(s) | ReduceOutcome::Unhandled(s) => s,
        }
    }

    /// True if a case, matcher-backed case, or default handler ran.
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, ReduceOutcome::Handled(_))
    }
}

type ReduceFn = dyn Fn(Option<&StateValue>, Option<&Action>) -> DuxideResult<ReduceOutcome>;

/// A callable computing the next state from the previous state and an action.
///
/// Construct one by hand with [`Reducer::from_fn`], from a builder with
/// [`create_reducer`](crate::create_reducer), or by composition with
/// [`combine_reducers`](crate::combine_reducers).
pub struct Reducer {
    inner: Box<ReduceFn>,
}

impl Reducer {
    /// Wrap a full-signature reduce function.
    ///
    /// Most callers want [`Reducer::from_fn`] or
    /// [`create_reducer`](crate::create_reducer) instead; this constructor is
    /// the escape hatch for reducers that need to control seeding and
    /// missing-state behavior themselves.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&StateValue>, Option<&Action>) -> DuxideResult<ReduceOutcome> + 'static,
    {
        Self { inner: Box::new(f) }
    }

    /// Wrap a plain `(state, action) -> state` function.
    ///
    /// Calls with no action pass the state through unchanged (seeding); calls
    /// with no state fail with an invalid-state error.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&StateValue, &Action) -> DuxideResult<StateValue> + 'static,
    {
        Self::new(move |state, action| match (state, action) {
            (Some(s), Some(a)) => Ok(ReduceOutcome::Handled(f(s, a)?)),
            (Some(s), None) => Ok(ReduceOutcome::Handled(s.clone())),
            (None, _) => Err(DuxideError::invalid_state(
                "a base state is required to reduce",
            )),
        })
    }

    /// Compute the next state.
    ///
    /// `state = None` is only meaningful for reducers that can self-seed
    /// (builder-produced reducers return their bound initial state when the
    /// action is also `None`).
    pub fn reduce(
        &self,
        state: Option<&StateValue>,
        action: Option<&Action>,
    ) -> DuxideResult<ReduceOutcome> {
        (self.inner)(state, action)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path, produce, state};

    #[test]
    fn from_fn_runs_the_function() {
        let reducer = Reducer::from_fn(|s, a| {
            produce(s, |d| {
                d.set(
                    path!("last"),
                    StateValue::from(a.kind()),
                )
            })
        });
        let outcome = reducer
            .reduce(Some(&state!({})), Some(&Action::new("PING")))
            .unwrap();
        assert!(outcome.is_handled());
        assert_eq!(
            outcome.state().get("last").and_then(|v| v.as_str().map(String::from)),
            Some("PING".to_owned())
        );
    }

    #[test]
    fn from_fn_passes_state_through_without_action() {
        let reducer = Reducer::from_fn(|s, _| Ok(s.clone()));
        let seed = state!({"x": 1});
        let outcome = reducer.reduce(Some(&seed), None).unwrap();
        assert_eq!(outcome.into_state(), seed);
    }

    #[test]
    fn from_fn_requires_a_state() {
        let reducer = Reducer::from_fn(|s, _| Ok(s.clone()));
        let err = reducer.reduce(None, Some(&Action::new("X"))).unwrap_err();
        assert!(matches!(err, DuxideError::InvalidState { .. }));
    }

    #[test]
    fn outcome_accessors() {
        let handled = ReduceOutcome::Handled(state!(1));
        let missed = ReduceOutcome::Unhandled(state!(2));
        assert!(handled.is_handled());
        assert!(!missed.is_handled());
        assert_eq!(missed.state(), &state!(2));
        assert_eq!(handled.into_state(), state!(1));
    }
}
