//! Flow Execution Context
//!
//! The variable bag shared by every step of one instance. Steps read and
//! write variables here; it is the only channel for passing data between
//! steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variable key under which the engine records the last failure message.
pub const LAST_ERROR_KEY: &str = "lastError";

/// Mutable context owned by a single flow instance.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FlowContext {
    /// Id of the flow definition being executed
    #[serde(default)]
    pub flow_id: String,

    /// Id of the owning instance
    #[serde(default)]
    pub instance_id: String,

    /// Step variables
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

impl FlowContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, overwriting any previous value.
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder form of [`FlowContext::set_variable`].
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_variable(key, value);
        self
    }

    pub fn variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn variable_str(&self, key: &str) -> Option<&str> {
        self.variables.get(key).and_then(Value::as_str)
    }

    pub fn variable_i64(&self, key: &str) -> Option<i64> {
        self.variables.get(key).and_then(Value::as_i64)
    }

    pub fn variable_bool(&self, key: &str) -> Option<bool> {
        self.variables.get(key).and_then(Value::as_bool)
    }

    /// Removes a variable and returns its previous value.
    pub fn remove_variable(&mut self, key: &str) -> Option<Value> {
        self.variables.remove(key)
    }

    /// Returns the message recorded by the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.variable_str(LAST_ERROR_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_empty() {
        let ctx = FlowContext::new();
        assert!(ctx.flow_id.is_empty());
        assert!(ctx.instance_id.is_empty());
        assert!(ctx.variables.is_empty());
        assert!(ctx.last_error().is_none());
    }

    #[test]
    fn test_typed_getters() {
        let ctx = FlowContext::new()
            .with_variable("name", "alice")
            .with_variable("count", 3)
            .with_variable("enabled", true)
            .with_variable("tags", json!(["a", "b"]));

        assert_eq!(ctx.variable_str("name"), Some("alice"));
        assert_eq!(ctx.variable_i64("count"), Some(3));
        assert_eq!(ctx.variable_bool("enabled"), Some(true));
        assert_eq!(ctx.variable("tags"), Some(&json!(["a", "b"])));

        // Wrong type yields None rather than a coercion
        assert_eq!(ctx.variable_i64("name"), None);
        assert_eq!(ctx.variable_str("count"), None);
    }

    #[test]
    fn test_set_overwrites_and_remove() {
        let mut ctx = FlowContext::new();
        ctx.set_variable("k", 1);
        ctx.set_variable("k", 2);
        assert_eq!(ctx.variable_i64("k"), Some(2));

        assert_eq!(ctx.remove_variable("k"), Some(json!(2)));
        assert!(ctx.variable("k").is_none());
    }

    #[test]
    fn test_last_error_key() {
        let mut ctx = FlowContext::new();
        ctx.set_variable(LAST_ERROR_KEY, "boom");
        assert_eq!(ctx.last_error(), Some("boom"));
    }
}
