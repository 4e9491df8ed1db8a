//! Slice composition: one reducer per named sub-tree of a composite state.

use crate::{DuxideError, ReduceOutcome, Reducer, StateValue};
use std::sync::Arc;

/// Reserved slice name for the whole-state reducer.
///
/// A reducer registered under this name runs after all named slices, over the
/// already slice-updated composite state.
pub const ROOT_SLICE: &str = "root";

/// Compose per-slice reducers (plus an optional [`ROOT_SLICE`] reducer) into
/// one reducer over a composite state.
///
/// For each non-root entry, in registration order: if the composite object
/// has a field of that name it is replaced with the sub-reducer's result;
/// missing fields are skipped silently (tolerant composition). An unhandled
/// slice keeps its prior value. The input composite is never mutated; its
/// field map is shallow-copied before replacement.
///
/// # Examples
///
/// ```
/// use duxide::{combine_reducers, state, Action, Reducer};
///
/// # fn main() -> duxide::DuxideResult<()> {
/// let bump = || Reducer::from_fn(|s, _| {
///     duxide::produce(s, |d| {
///         d.update(duxide::path!("n"), |cur| {
///             duxide::StateValue::from(cur.and_then(|v| v.as_i64()).unwrap_or(0) + 1)
///         })
///     })
/// });
///
/// let reducer = combine_reducers([("left", bump()), ("right", bump())]);
/// let next = reducer
///     .reduce(Some(&state!({"left": {"n": 0}, "right": {"n": 10}})), Some(&Action::new("TICK")))?
///     .into_state();
/// assert_eq!(next.get_path(&duxide::path!("left", "n")).and_then(|v| v.as_i64()), Some(1));
/// assert_eq!(next.get_path(&duxide::path!("right", "n")).and_then(|v| v.as_i64()), Some(11));
/// # Ok(())
/// # }
/// ```
pub fn combine_reducers<I, S>(slices: I) -> Reducer
where
    I: IntoIterator<Item = (S, Reducer)>,
    S: Into<String>,
{
    let slices: Vec<(String, Reducer)> = slices
        .into_iter()
        .map(|(name, reducer)| (name.into(), reducer))
        .collect();

    Reducer::new(move |state, action| {
        let (base, action) = match (state, action) {
            (Some(s), None) => return Ok(ReduceOutcome::Handled(s.clone())),
            (None, _) => {
                return Err(DuxideError::invalid_state(
                    "a composite state is required for combined reducers",
                ))
            }
            (Some(s), Some(a)) => (s, a),
        };

        let mut next = base.clone();

        // Slice routing only applies to an object composite; anything else
        // passes straight to the root reducer.
        if let StateValue::Object(map) = &next {
            let mut updated = (**map).clone();
            for (name, reducer) in &slices {
                if name == ROOT_SLICE {
                    continue;
                }
                let Some(sub) = updated.get(name).cloned() else {
                    continue;
                };
                let outcome = reducer.reduce(Some(&sub), Some(action))?;
                updated.insert(name.clone(), outcome.into_state());
            }
            next = StateValue::Object(Arc::new(updated));
        }

        if let Some((_, root)) = slices.iter().find(|(name, _)| name == ROOT_SLICE) {
            next = root.reduce(Some(&next), Some(action))?.into_state();
        }

        Ok(ReduceOutcome::Handled(next))
    })
}
