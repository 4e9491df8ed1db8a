//! The store: owns the current state, runs the reducer, publishes changes.

use crate::{Action, DuxideResult, Reducer, StateValue, Subscription, ValueDispatcher};

/// Owns one current state and a reducer; exposes dispatch/subscribe/get-state.
///
/// The store retains exactly the two most recent states: the value before the
/// last dispatch and the value after it. Every dispatch publishes that
/// `(previous, next)` pair to subscribers synchronously, in registration
/// order, before `dispatch` returns.
///
/// # Examples
///
/// ```
/// use duxide::{state, Action, Reducer, Store};
///
/// # fn main() -> duxide::DuxideResult<()> {
/// let reducer = Reducer::from_fn(|s, a| {
///     duxide::produce(s, |d| {
///         d.push(duxide::path!("seen"), duxide::StateValue::from(a.kind()))
///     })
/// });
/// let mut store = Store::new(reducer, state!({"seen": []}));
///
/// let mut observed = 0;
/// // Subscribers receive the (previous, next) pair.
/// let _sub = store.subscribe(move |_prev, _next| observed += 1);
///
/// store.dispatch(&Action::new("START"))?;
/// assert_eq!(
///     store.get_state().get("seen").and_then(|v| v.as_array()).map(|a| a.len()),
///     Some(1)
/// );
/// # Ok(())
/// # }
/// ```
pub struct Store {
    reducer: Reducer,
    feed: ValueDispatcher<(StateValue, StateValue)>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store with an explicit initial state.
    pub fn new(reducer: Reducer, initial: StateValue) -> Self {
        Self {
            feed: ValueDispatcher::new((initial.clone(), initial)),
            reducer,
        }
    }

    /// Create a store, resolving the initial state from a producer.
    pub fn with_initial_producer(
        reducer: Reducer,
        producer: impl FnOnce() -> StateValue,
    ) -> Self {
        Self::new(reducer, producer())
    }

    /// Create a store seeded by the reducer itself.
    ///
    /// Calls `reducer.reduce(None, None)`; builder-produced reducers answer
    /// with their bound initial state. Reducers that cannot self-seed return
    /// an invalid-state error, which propagates here.
    pub fn from_reducer(reducer: Reducer) -> DuxideResult<Self> {
        let initial = reducer.reduce(None, None)?.into_state();
        Ok(Self::new(reducer, initial))
    }

    /// The current state.
    ///
    /// Returns a clone; with `Arc`-shared containers this is a reference
    /// bump, and callers cannot reach the store's internal value through it.
    pub fn get_state(&self) -> StateValue {
        self.feed.current().1.clone()
    }

    /// The state before the most recent dispatch.
    pub fn previous_state(&self) -> StateValue {
        self.feed.current().0.clone()
    }

    /// Run the reducer for `action`, commit the result, and publish the
    /// `(previous, next)` pair to all subscribers before returning.
    ///
    /// On a reducer or handler error the current state is left untouched and
    /// nothing is published. Reentrancy: `dispatch` takes `&mut self`, so a
    /// subscriber cannot call back into the same store during delivery; the
    /// borrow checker rejects it at compile time.
    pub fn dispatch(&mut self, action: &Action) -> DuxideResult<StateValue> {
        action.validate()?;
        let current = self.feed.current().1.clone();
        let outcome = self.reducer.reduce(Some(&current), Some(action))?;
        tracing::debug!(
            kind = action.kind(),
            handled = outcome.is_handled(),
            "dispatched action"
        );
        let next = outcome.into_state();
        self.feed.set((current, next.clone()));
        Ok(next)
    }

    /// Register a change handler; it receives every `(previous, next)` pair.
    ///
    /// Returns a token whose [`Subscription::unsubscribe`] removes exactly
    /// this handler, idempotently. Dropping the token does not unsubscribe.
    pub fn subscribe(
        &mut self,
        mut handler: impl FnMut(&StateValue, &StateValue) + 'static,
    ) -> Subscription {
        self.feed
            .subscribe(move |(previous, next)| handler(previous, next))
    }
}
