//! Copy-on-write drafts over immutable state.
//!
//! A [`Draft`] lets reducer handlers write to state as if it were mutable.
//! Writes are recorded on lazily instantiated draft nodes; the base value is
//! never touched. Committing the draft rebuilds only the containers that were
//! written through, handing every untouched subtree back by reference
//! (an `Arc` clone of the base), so the cost of producing the next state is
//! proportional to what the handler touched, not to the size of the state.

use crate::{DuxideError, DuxideResult, Path, Seg, StateValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A mutable overlay over one immutable state snapshot.
///
/// Drafts live for the duration of a single reducer invocation; use
/// [`produce`] to run a closure against a draft and obtain the finalized
/// next state.
#[derive(Debug)]
pub struct Draft {
    /// Effective base of this node: the original child, or the value most
    /// recently assigned wholesale at this position.
    base: StateValue,
    /// Touched descendants, keyed by the segment that reaches them.
    children: BTreeMap<Seg, Draft>,
}

impl Draft {
    pub(crate) fn new(base: StateValue) -> Self {
        Self {
            base,
            children: BTreeMap::new(),
        }
    }

    /// Read the current value at a path.
    ///
    /// Observes the most recent write for the path, falling back to the base
    /// snapshot for anything untouched. Returns `None` if the path does not
    /// exist in either.
    pub fn get(&self, path: &Path) -> Option<StateValue> {
        self.get_segments(path.segments())
    }

    fn get_segments(&self, segments: &[Seg]) -> Option<StateValue> {
        match segments {
            [] => Some(self.current()),
            [head, rest @ ..] => match self.children.get(head) {
                Some(child) => child.get_segments(rest),
                None => {
                    let mut value = self.base.at(head)?;
                    for seg in rest {
                        value = value.at(seg)?;
                    }
                    Some(value.clone())
                }
            },
        }
    }

    /// Assign a value at a path.
    ///
    /// Missing intermediate object keys are created. Assigning a whole
    /// subtree discards any deeper writes recorded under it; re-accessing
    /// below the assignment drafts over the replacement value.
    pub fn set(&mut self, path: Path, value: impl Into<StateValue>) -> DuxideResult<()> {
        let value = value.into();
        let full = path.clone();
        self.node_mut(path.segments(), &full)?.assign(value);
        Ok(())
    }

    /// Append a value to the sequence at a path.
    pub fn push(&mut self, path: Path, value: impl Into<StateValue>) -> DuxideResult<()> {
        let value = value.into();
        let full = path.clone();
        let node = self.node_mut(path.segments(), &full)?;
        match node.current() {
            StateValue::Array(items) => {
                let mut next = (*items).clone();
                next.push(value);
                node.assign(StateValue::Array(Arc::new(next)));
                Ok(())
            }
            // An absent target becomes a fresh one-element sequence.
            StateValue::Null => {
                node.assign(StateValue::Array(Arc::new(vec![value])));
                Ok(())
            }
            other => Err(other.mismatch(&full, "array")),
        }
    }

    /// Read-modify-write at a path.
    ///
    /// The closure receives the current value (`None` if absent) and returns
    /// the replacement.
    pub fn update(
        &mut self,
        path: Path,
        f: impl FnOnce(Option<StateValue>) -> StateValue,
    ) -> DuxideResult<()> {
        let current = self.get(&path);
        self.set(path, f(current))
    }

    /// Wholesale assignment at this node. Clears deeper drafts so a replaced
    /// subtree is not re-overlaid with stale writes.
    fn assign(&mut self, value: StateValue) {
        self.base = value;
        self.children.clear();
    }

    /// Navigate to the draft node for a path, instantiating draft nodes along
    /// the way so writes at any depth are captured.
    fn node_mut(&mut self, segments: &[Seg], full: &Path) -> DuxideResult<&mut Draft> {
        match segments {
            [] => Ok(self),
            [head, rest @ ..] => self.child_mut(head, full)?.node_mut(rest, full),
        }
    }

    fn child_mut(&mut self, seg: &Seg, full: &Path) -> DuxideResult<&mut Draft> {
        // Any existing child was created against the same effective base, so
        // recomputing the child base here is only an Arc bump.
        let child_base = self.child_base(seg, full)?;
        Ok(self
            .children
            .entry(seg.clone())
            .or_insert_with(|| Draft::new(child_base)))
    }

    fn child_base(&self, seg: &Seg, full: &Path) -> DuxideResult<StateValue> {
        match (seg, &self.base) {
            (Seg::Key(k), StateValue::Object(map)) => {
                Ok(map.get(k).cloned().unwrap_or(StateValue::Null))
            }
            // Writing a key under an absent node: an intermediate object is
            // created when the draft is committed.
            (Seg::Key(_), StateValue::Null) => Ok(StateValue::Null),
            (Seg::Key(_), other) => Err(other.mismatch(full, "object")),
            (Seg::Index(i), StateValue::Array(items)) => items.get(*i).cloned().ok_or_else(|| {
                DuxideError::index_out_of_bounds(full.clone(), *i, items.len())
            }),
            (Seg::Index(_), other) => Err(other.mismatch(full, "array")),
        }
    }

    /// Materialize the value this node currently stands for.
    ///
    /// Untouched nodes resolve to an `Arc` clone of their base; touched
    /// containers are rebuilt with their touched children overlaid.
    fn current(&self) -> StateValue {
        if self.children.is_empty() {
            return self.base.clone();
        }
        match &self.base {
            StateValue::Object(map) => {
                let mut next = (**map).clone();
                for (seg, child) in &self.children {
                    if let Seg::Key(k) = seg {
                        next.insert(k.clone(), child.current());
                    }
                }
                StateValue::Object(Arc::new(next))
            }
            StateValue::Array(items) => {
                let mut next = (**items).clone();
                for (seg, child) in &self.children {
                    if let Seg::Index(i) = seg {
                        if let Some(slot) = next.get_mut(*i) {
                            *slot = child.current();
                        }
                    }
                }
                StateValue::Array(Arc::new(next))
            }
            // Children recorded under a non-container base: the writes went
            // through intermediate-object creation.
            _ => {
                let mut next = BTreeMap::new();
                for (seg, child) in &self.children {
                    if let Seg::Key(k) = seg {
                        next.insert(k.clone(), child.current());
                    }
                }
                StateValue::Object(Arc::new(next))
            }
        }
    }

    /// Finalize the draft into the next immutable state.
    pub fn commit(self) -> StateValue {
        self.current()
    }
}

/// Run a mutation closure against a draft of `base` and return the finalized
/// next state.
///
/// On `Ok` the next state is materialized exactly once, with every untouched
/// subtree structurally shared with `base`. On `Err` nothing is committed and
/// the error propagates to the caller.
///
/// # Examples
///
/// ```
/// use duxide::{path, produce, state};
///
/// let base = state!({"player": {"hp": 100}, "logs": []});
/// let next = produce(&base, |draft| {
///     draft.set(path!("player", "hp"), 92)?;
///     draft.push(path!("logs"), "player was hit")
/// }).unwrap();
///
/// assert_eq!(next.get_path(&path!("player", "hp")).and_then(|v| v.as_i64()), Some(92));
/// assert_eq!(base.get_path(&path!("player", "hp")).and_then(|v| v.as_i64()), Some(100));
/// ```
pub fn produce<F>(base: &StateValue, f: F) -> DuxideResult<StateValue>
where
    F: FnOnce(&mut Draft) -> DuxideResult<()>,
{
    let mut draft = Draft::new(base.clone());
    f(&mut draft)?;
    Ok(draft.commit())
}
