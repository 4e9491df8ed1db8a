//! Minimal unidirectional state management with copy-on-write drafts.
//!
//! `duxide` holds an immutable application state in a [`Store`]; consumers
//! dispatch [`Action`] records; pure [`Reducer`]s compute the next state; and
//! subscribers are notified of every `(previous, next)` transition.
//!
//! Reducer handlers write through a [`Draft`]: code reads like in-place
//! mutation, but the base state is never touched. Committing the draft
//! materializes a structurally new state that shares every untouched subtree
//! with the base, so the cost of a transition is proportional to what the
//! handler wrote, not to the size of the state.
//!
//! # Core concepts
//!
//! - **[`StateValue`]**: immutable JSON-shaped state tree, `Arc`-shared
//!   containers, built with the [`state!`] macro
//! - **[`Draft`] / [`produce`]**: scoped copy-on-write overlay for one
//!   reducer invocation
//! - **[`ReducerBuilder`] / [`create_reducer`]**: ordered case, matcher, and
//!   default handler registration
//! - **[`combine_reducers`]**: per-slice composition with an optional
//!   whole-state `"root"` reducer
//! - **[`Store`]**: dispatch/subscribe/get-state over a synchronous change
//!   feed
//!
//! # Quick start
//!
//! ```
//! use duxide::{create_reducer, path, state, Action, Store};
//!
//! # fn main() -> duxide::DuxideResult<()> {
//! let reducer = create_reducer(state!({"hp": 100, "logs": []}), |b| {
//!     b.add_case("DAMAGE", |state, draft, action| {
//!         let hp = state.get("hp").and_then(|v| v.as_i64()).unwrap_or(0);
//!         draft.set(path!("hp"), hp - action.payload_i64().unwrap_or(0))?;
//!         draft.push(path!("logs"), "took damage")
//!     })?;
//!     Ok(())
//! })?;
//!
//! let mut store = Store::from_reducer(reducer)?;
//! let mut sub = store.subscribe(|prev, next| {
//!     let before = prev.get("hp").and_then(|v| v.as_i64());
//!     let after = next.get("hp").and_then(|v| v.as_i64());
//!     assert_eq!((before, after), (Some(100), Some(92)));
//! });
//!
//! let next = store.dispatch(&Action::with_payload("DAMAGE", 8))?;
//! assert_eq!(next.get("hp").and_then(|v| v.as_i64()), Some(92));
//! assert_eq!(store.get_state(), next);
//! sub.unsubscribe();
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency model
//!
//! Single-threaded and synchronous by design: `dispatch` runs its reducer and
//! notifies every subscriber before returning. Interior sharing uses
//! `Rc`/`RefCell`; nothing here is `Send`, and reentrant dispatch from inside
//! a subscriber is rejected by the borrow checker rather than at runtime.

mod action;
mod builder;
mod combine;
mod draft;
mod error;
mod events;
mod path;
mod reducer;
mod store;
mod value;

pub use action::Action;
pub use builder::{create_reducer, Handler, Matcher, ReducerBuilder};
pub use combine::{combine_reducers, ROOT_SLICE};
pub use draft::{produce, Draft};
pub use error::{DuxideError, DuxideResult};
pub use events::{Subscription, ValueDispatcher};
pub use path::{Path, Seg};
pub use reducer::{ReduceOutcome, Reducer};
pub use store::Store;
pub use value::{Number, StateValue};
