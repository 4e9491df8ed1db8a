//! Reducer builder: ordered case/matcher/default registration.
//!
//! Registration happens in three phases that must not interleave backwards:
//! exact cases first, then matchers, then at most one default. Each method
//! returns the builder so registrations chain with `?`.

use crate::{Action, Draft, DuxideError, DuxideResult, ReduceOutcome, Reducer, StateValue};

/// A handler mutating the draft for one action.
///
/// Receives the untouched base state, the draft to write through, and the
/// action being reduced. Return values other than errors are ignored.
pub type Handler = Box<dyn Fn(&StateValue, &mut Draft, &Action) -> DuxideResult<()>>;

/// A predicate deciding whether a matcher handler runs for an action.
pub type Matcher = Box<dyn Fn(&Action) -> bool>;

/// Accumulates handler registrations for [`create_reducer`].
///
/// # Examples
///
/// ```
/// use duxide::{create_reducer, path, state, Action, Store};
///
/// # fn main() -> duxide::DuxideResult<()> {
/// let reducer = create_reducer(state!({"hp": 100}), |b| {
///     b.add_case("DAMAGE", |state, draft, action| {
///         let hp = state.get("hp").and_then(|v| v.as_i64()).unwrap_or(0);
///         draft.set(path!("hp"), hp - action.payload_i64().unwrap_or(0))
///     })?;
///     Ok(())
/// })?;
///
/// let mut store = Store::from_reducer(reducer)?;
/// store.dispatch(&Action::with_payload("DAMAGE", 8))?;
/// assert_eq!(store.get_state().get("hp").and_then(|v| v.as_i64()), Some(92));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ReducerBuilder {
    cases: Vec<(String, Handler)>,
    matchers: Vec<(Matcher, Handler)>,
    default: Option<Handler>,
}

impl std::fmt::Debug for ReducerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerBuilder")
            .field("cases", &self.cases.len())
            .field("matchers", &self.matchers.len())
            .field("default", &self.default.is_some())
            .finish()
    }
}

impl ReducerBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an exact action type.
    ///
    /// Fails with a sequencing error once any matcher or the default is
    /// registered, with a duplicate-action error on a repeated type, and with
    /// a validation error on an empty type.
    pub fn add_case<F>(&mut self, kind: impl Into<String>, handler: F) -> DuxideResult<&mut Self>
    where
        F: Fn(&StateValue, &mut Draft, &Action) -> DuxideResult<()> + 'static,
    {
        if !self.matchers.is_empty() {
            return Err(DuxideError::sequencing("add_case", "add_matcher"));
        }
        if self.default.is_some() {
            return Err(DuxideError::sequencing("add_case", "set_default_reducer"));
        }
        let kind = kind.into();
        if kind.is_empty() {
            return Err(DuxideError::validation("action type is required"));
        }
        if self.cases.iter().any(|(registered, _)| *registered == kind) {
            return Err(DuxideError::duplicate_action(kind));
        }
        self.cases.push((kind, Box::new(handler)));
        Ok(self)
    }

    /// Register a predicate-guarded handler.
    ///
    /// Matchers are kept in insertion order. At reduce time every matcher
    /// whose predicate accepts the action runs (fan-out), in addition to the
    /// exact case or default.
    pub fn add_matcher<P, F>(&mut self, predicate: P, handler: F) -> DuxideResult<&mut Self>
    where
        P: Fn(&Action) -> bool + 'static,
        F: Fn(&StateValue, &mut Draft, &Action) -> DuxideResult<()> + 'static,
    {
        if self.default.is_some() {
            return Err(DuxideError::sequencing("add_matcher", "set_default_reducer"));
        }
        self.matchers.push((Box::new(predicate), Box::new(handler)));
        Ok(self)
    }

    /// Register the fallback handler, run when no exact case matches.
    ///
    /// At most one default may exist.
    pub fn set_default_reducer<F>(&mut self, handler: F) -> DuxideResult<&mut Self>
    where
        F: Fn(&StateValue, &mut Draft, &Action) -> DuxideResult<()> + 'static,
    {
        if self.default.is_some() {
            return Err(DuxideError::sequencing(
                "set_default_reducer",
                "set_default_reducer",
            ));
        }
        self.default = Some(Box::new(handler));
        Ok(self)
    }
}

/// Build a draft-backed reducer from registrations made by `configure`.
///
/// The produced reducer:
/// - returns `initial` when called with neither state nor action (seeding,
///   which is what lets [`Store::from_reducer`](crate::Store::from_reducer)
///   work);
/// - passes a given state through unchanged when there is no action;
/// - fails with an invalid-state error when an action arrives without state;
/// - otherwise opens a draft over the state, runs every matcher whose
///   predicate accepts the action, then exactly one of the matching exact
///   case or the default (case wins), and commits the draft.
///
/// When neither a case nor a default applies, the reducer emits a `tracing`
/// warning and returns [`ReduceOutcome::Unhandled`] with the original state;
/// nothing is committed. Matcher-only reducers are legitimate, so a miss is
/// deliberately not an error.
pub fn create_reducer<F>(initial: StateValue, configure: F) -> DuxideResult<Reducer>
where
    F: FnOnce(&mut ReducerBuilder) -> DuxideResult<()>,
{
    let mut builder = ReducerBuilder::new();
    configure(&mut builder)?;
    let ReducerBuilder {
        cases,
        matchers,
        default,
    } = builder;

    Ok(Reducer::new(move |state, action| {
        let (base, action) = match (state, action) {
            (Some(s), None) => return Ok(ReduceOutcome::Handled(s.clone())),
            (None, None) => return Ok(ReduceOutcome::Handled(initial.clone())),
            (None, Some(_)) => {
                return Err(DuxideError::invalid_state(
                    "a base state is required to reduce an action",
                ))
            }
            (Some(s), Some(a)) => (s, a),
        };

        let mut draft = Draft::new(base.clone());

        for (predicate, handler) in &matchers {
            if predicate(action) {
                handler(base, &mut draft, action)?;
            }
        }

        if let Some((_, handler)) = cases.iter().find(|(kind, _)| kind == action.kind()) {
            handler(base, &mut draft, action)?;
            return Ok(ReduceOutcome::Handled(draft.commit()));
        }

        if let Some(handler) = &default {
            handler(base, &mut draft, action)?;
            return Ok(ReduceOutcome::Handled(draft.commit()));
        }

        tracing::warn!(
            kind = action.kind(),
            "no case or default reducer matched the action"
        );
        Ok(ReduceOutcome::Unhandled(base.clone()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path, state};

    fn noop(_: &StateValue, _: &mut Draft, _: &Action) -> DuxideResult<()> {
        Ok(())
    }

    #[test]
    fn case_after_matcher_is_rejected() {
        let mut b = ReducerBuilder::new();
        b.add_matcher(|_| true, noop).unwrap();
        let err = b.add_case("X", noop).unwrap_err();
        assert!(matches!(err, DuxideError::Sequencing { .. }));
    }

    #[test]
    fn nothing_may_follow_the_default() {
        let mut b = ReducerBuilder::new();
        b.set_default_reducer(noop).unwrap();
        assert!(matches!(
            b.add_case("X", noop).unwrap_err(),
            DuxideError::Sequencing { .. }
        ));
        assert!(matches!(
            b.add_matcher(|_| true, noop).unwrap_err(),
            DuxideError::Sequencing { .. }
        ));
        assert!(matches!(
            b.set_default_reducer(noop).unwrap_err(),
            DuxideError::Sequencing { .. }
        ));
    }

    #[test]
    fn duplicate_case_is_rejected() {
        let mut b = ReducerBuilder::new();
        b.add_case("X", noop).unwrap();
        let err = b.add_case("X", noop).unwrap_err();
        assert!(matches!(err, DuxideError::DuplicateAction { kind } if kind == "X"));
    }

    #[test]
    fn empty_case_kind_is_rejected() {
        let mut b = ReducerBuilder::new();
        let err = b.add_case("", noop).unwrap_err();
        assert!(matches!(err, DuxideError::Validation { .. }));
    }

    #[test]
    fn registrations_chain() {
        let reducer = create_reducer(state!({}), |b| {
            b.add_case("A", noop)?
                .add_case("B", noop)?
                .add_matcher(|_| false, noop)?
                .set_default_reducer(noop)?;
            Ok(())
        });
        assert!(reducer.is_ok());
    }

    #[test]
    fn registration_errors_propagate_out_of_create_reducer() {
        let result = create_reducer(state!({}), |b| {
            b.add_case("", noop)?;
            Ok(())
        });
        assert!(matches!(result.unwrap_err(), DuxideError::Validation { .. }));
    }

    #[test]
    fn seeding_without_state_or_action_yields_the_initial() {
        let reducer = create_reducer(state!({"hp": 100}), |_| Ok(())).unwrap();
        let outcome = reducer.reduce(None, None).unwrap();
        assert_eq!(outcome.into_state(), state!({"hp": 100}));
    }

    #[test]
    fn action_without_state_is_invalid() {
        let reducer = create_reducer(state!({}), |_| Ok(())).unwrap();
        let err = reducer.reduce(None, Some(&Action::new("X"))).unwrap_err();
        assert!(matches!(err, DuxideError::InvalidState { .. }));
    }

    #[test]
    fn case_takes_precedence_over_default() {
        let reducer = create_reducer(state!({}), |b| {
            b.add_case("HIT", |_, d, _| d.set(path!("by"), "case"))?
                .set_default_reducer(|_, d, _| d.set(path!("by"), "default"))?;
            Ok(())
        })
        .unwrap();

        let hit = reducer
            .reduce(Some(&state!({})), Some(&Action::new("HIT")))
            .unwrap();
        assert_eq!(hit.state().get("by").and_then(|v| v.as_str().map(String::from)), Some("case".to_owned()));

        let other = reducer
            .reduce(Some(&state!({})), Some(&Action::new("MISS")))
            .unwrap();
        assert_eq!(other.state().get("by").and_then(|v| v.as_str().map(String::from)), Some("default".to_owned()));
    }

    #[test]
    fn all_matching_matchers_fan_out() {
        let reducer = create_reducer(state!({}), |b| {
            b.add_matcher(
                |a| a.kind().starts_with("GAME"),
                |_, d, _| d.set(path!("seen_prefix"), true),
            )?
            .add_matcher(
                |a| a.kind().ends_with("OVER"),
                |_, d, _| d.set(path!("seen_suffix"), true),
            )?
            .set_default_reducer(|_, d, _| d.set(path!("defaulted"), true))?;
            Ok(())
        })
        .unwrap();

        let outcome = reducer
            .reduce(Some(&state!({})), Some(&Action::new("GAME_OVER")))
            .unwrap();
        let next = outcome.into_state();
        assert_eq!(next.get("seen_prefix").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(next.get("seen_suffix").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(next.get("defaulted").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn unhandled_returns_the_original_state() {
        let base = state!({"hp": 100});
        let reducer = create_reducer(state!({}), |b| {
            // Matcher effects alone are never committed: a miss returns the
            // prior state untouched.
            b.add_matcher(|_| true, |_, d, _| d.set(path!("hp"), 0))?;
            Ok(())
        })
        .unwrap();

        let outcome = reducer
            .reduce(Some(&base), Some(&Action::new("UNKNOWN")))
            .unwrap();
        assert!(!outcome.is_handled());
        assert_eq!(outcome.state(), &base);
    }

    #[test]
    fn handler_error_aborts_without_partial_state() {
        let reducer = create_reducer(state!({}), |b| {
            b.add_case("BOOM", |_, d, _| {
                d.set(path!("half"), "written")?;
                Err(DuxideError::validation("handler exploded"))
            })?;
            Ok(())
        })
        .unwrap();

        let base = state!({"hp": 1});
        let err = reducer
            .reduce(Some(&base), Some(&Action::new("BOOM")))
            .unwrap_err();
        assert!(matches!(err, DuxideError::Validation { .. }));
        assert_eq!(base, state!({"hp": 1}));
    }
}
