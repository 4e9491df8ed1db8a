//! Action records: tagged descriptions of intended state transitions.

use crate::{DuxideError, DuxideResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tagged record identifying an intended state transition.
///
/// Routing is by `kind` (serialized as `"type"`); the payload is an opaque
/// JSON value carried to the handler. Actions are immutable once constructed.
///
/// # Examples
///
/// ```
/// use duxide::Action;
///
/// let hit = Action::with_payload("DAMAGE", 8);
/// assert_eq!(hit.kind(), "DAMAGE");
/// assert_eq!(hit.payload_i64(), Some(8));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action type, non-empty by contract.
    #[serde(rename = "type")]
    kind: String,
    /// Optional payload carried to handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl Action {
    /// Create an action with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Create an action carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload.into()),
        }
    }

    /// The action type.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The payload, if any.
    #[inline]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Integer view of the payload.
    #[inline]
    pub fn payload_i64(&self) -> Option<i64> {
        self.payload.as_ref().and_then(Value::as_i64)
    }

    /// String view of the payload.
    #[inline]
    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Value::as_str)
    }

    /// Reject actions with an empty type.
    pub(crate) fn validate(&self) -> DuxideResult<()> {
        if self.kind.is_empty() {
            return Err(DuxideError::validation("action type is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_field_is_named_type() {
        let action = Action::with_payload("LOG", "turn ended");
        let text = serde_json::to_string(&action).unwrap();
        assert_eq!(text, r#"{"type":"LOG","payload":"turn ended"}"#);
    }

    #[test]
    fn payload_is_optional_on_the_wire() {
        let action: Action = serde_json::from_str(r#"{"type":"END_TURN"}"#).unwrap();
        assert_eq!(action, Action::new("END_TURN"));
        assert!(serde_json::to_string(&action).unwrap().ends_with(r#""END_TURN"}"#));
    }

    #[test]
    fn payload_views() {
        assert_eq!(Action::with_payload("A", 3).payload_i64(), Some(3));
        assert_eq!(Action::with_payload("A", "x").payload_str(), Some("x"));
        assert_eq!(Action::with_payload("A", json!({"n": 1})).payload_i64(), None);
        assert_eq!(Action::new("A").payload(), None);
    }

    #[test]
    fn empty_kind_fails_validation() {
        assert!(Action::new("").validate().is_err());
        assert!(Action::new("X").validate().is_ok());
    }
}
