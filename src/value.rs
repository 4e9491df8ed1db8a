//! Immutable state values with structurally shared containers.
//!
//! [`StateValue`] is the tree every store, draft, and reducer operates on.
//! Containers hold their children behind an `Arc`, so cloning a value is a
//! reference-count bump and a finalized draft can hand untouched subtrees
//! back to the new state without copying them.

use crate::{DuxideError, DuxideResult, Path, Seg};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A numeric state scalar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
}

impl Number {
    /// Convert to f64.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    /// Convert to i64 (truncates floats).
    #[inline]
    pub fn as_i64(&self) -> i64 {
        match self {
            Number::Int(i) => *i,
            Number::Float(f) => *f as i64,
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

/// An immutable, tree-shaped application state value.
///
/// The shape mirrors JSON: scalars, sequences, and string-keyed records.
/// Equality is structural. Identity of containers (whether two values share
/// the same backing allocation) is observable through [`StateValue::ptr_eq`],
/// which is what the structural-sharing guarantees of the draft engine are
/// stated in terms of.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Absent / null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Sequence of values.
    Array(Arc<Vec<StateValue>>),
    /// String-keyed record.
    Object(Arc<BTreeMap<String, StateValue>>),
}

impl StateValue {
    /// Build an object from key/value pairs.
    pub fn object(entries: impl IntoIterator<Item = (String, StateValue)>) -> Self {
        StateValue::Object(Arc::new(entries.into_iter().collect()))
    }

    /// Build an array from values.
    pub fn array(items: impl IntoIterator<Item = StateValue>) -> Self {
        StateValue::Array(Arc::new(items.into_iter().collect()))
    }

    /// Get an object field by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        match self {
            StateValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a sequence element by index.
    #[inline]
    pub fn index(&self, i: usize) -> Option<&StateValue> {
        match self {
            StateValue::Array(items) => items.get(i),
            _ => None,
        }
    }

    /// Get the child addressed by a single segment.
    #[inline]
    pub fn at(&self, seg: &Seg) -> Option<&StateValue> {
        match seg {
            Seg::Key(k) => self.get(k),
            Seg::Index(i) => self.index(*i),
        }
    }

    /// Walk a full path down the tree.
    pub fn get_path(&self, path: &Path) -> Option<&StateValue> {
        let mut current = self;
        for seg in path.segments() {
            current = current.at(seg)?;
        }
        Some(current)
    }

    /// Integer view of a numeric scalar.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => Some(n.as_i64()),
            _ => None,
        }
    }

    /// Floating-point view of a numeric scalar.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// String slice view.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Sequence view.
    #[inline]
    pub fn as_array(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Record view.
    #[inline]
    pub fn as_object(&self) -> Option<&BTreeMap<String, StateValue>> {
        match self {
            StateValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// True for `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    /// Name of this value's shape, for error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Bool(_) => "boolean",
            StateValue::Number(_) => "number",
            StateValue::String(_) => "string",
            StateValue::Array(_) => "array",
            StateValue::Object(_) => "object",
        }
    }

    /// Whether two containers share the same backing allocation.
    ///
    /// Returns `false` for scalars; use `==` for structural equality. This is
    /// the observable form of the draft engine's structural-sharing property:
    /// an untouched subtree of a committed draft is `ptr_eq` with the base.
    pub fn ptr_eq(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b),
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Convert any serializable value into a state value.
    pub fn from_typed<T: Serialize>(value: &T) -> DuxideResult<StateValue> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Deserialize this state value into a typed view.
    pub fn to_typed<T: DeserializeOwned>(&self) -> DuxideResult<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    /// Convert to a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            StateValue::Null => serde_json::Value::Null,
            StateValue::Bool(b) => serde_json::Value::Bool(*b),
            StateValue::Number(Number::Int(i)) => serde_json::Value::from(*i),
            StateValue::Number(Number::Float(f)) => serde_json::Value::from(*f),
            StateValue::String(s) => serde_json::Value::String(s.clone()),
            StateValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(StateValue::to_json).collect())
            }
            StateValue::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for StateValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => StateValue::Null,
            serde_json::Value::Bool(b) => StateValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    StateValue::Number(Number::Int(i))
                } else {
                    StateValue::Number(Number::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => StateValue::String(s),
            serde_json::Value::Array(items) => {
                StateValue::Array(Arc::new(items.into_iter().map(Into::into).collect()))
            }
            serde_json::Value::Object(map) => StateValue::Object(Arc::new(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
        }
    }
}

impl From<StateValue> for serde_json::Value {
    fn from(v: StateValue) -> Self {
        v.to_json()
    }
}

impl From<bool> for StateValue {
    fn from(v: bool) -> Self {
        StateValue::Bool(v)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Number(Number::Int(v))
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Number(Number::Int(v as i64))
    }
}

impl From<u32> for StateValue {
    fn from(v: u32) -> Self {
        StateValue::Number(Number::Int(v as i64))
    }
}

impl From<f64> for StateValue {
    fn from(v: f64) -> Self {
        StateValue::Number(Number::Float(v))
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue::String(v.to_owned())
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue::String(v)
    }
}

impl From<Number> for StateValue {
    fn from(v: Number) -> Self {
        StateValue::Number(v)
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(v: Vec<StateValue>) -> Self {
        StateValue::Array(Arc::new(v))
    }
}

impl From<BTreeMap<String, StateValue>> for StateValue {
    fn from(v: BTreeMap<String, StateValue>) -> Self {
        StateValue::Object(Arc::new(v))
    }
}

/// Error helper shared by value consumers.
impl StateValue {
    /// Build a type-mismatch error for this value at a path.
    pub(crate) fn mismatch(&self, path: &Path, expected: &'static str) -> DuxideError {
        DuxideError::type_mismatch(path.clone(), expected, self.type_name())
    }
}

/// Construct a [`StateValue`] with `serde_json::json!` literal syntax.
///
/// # Examples
///
/// ```
/// use duxide::state;
///
/// let s = state!({"hp": 100, "logs": []});
/// assert_eq!(s.get("hp").and_then(|v| v.as_i64()), Some(100));
/// ```
#[macro_export]
macro_rules! state {
    ($($json:tt)+) => {
        $crate::StateValue::from(::serde_json::json!($($json)+))
    };
}
