//! Flow Definition Model
//!
//! Declarative structures describing a flow: an identifier plus an ordered
//! list of step configurations.
//!
//! # Example YAML Format
//!
//! ```yaml
//! id: nightly_import
//! steps:
//!   - id: announce
//!     type: log
//!     config:
//!       message: "Starting import"
//!
//!   - id: fetch
//!     type: shell
//!     config:
//!       command: curl -sSf https://example.org/data.csv -o data.csv
//!
//!   - id: done
//!     type: set
//!     config:
//!       imported: true
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration of a single step within a flow definition.
///
/// The `config` map is opaque to the engine and only meaningful to the
/// runner registered for `step_type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepConfig {
    /// Identifier, unique within its definition
    #[serde(default)]
    pub id: String,

    /// Registry key selecting the runner for this step
    #[serde(rename = "type", default)]
    pub step_type: String,

    /// Runner-specific parameters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl StepConfig {
    /// Creates a step with an empty parameter map.
    ///
    /// # Example
    ///
    /// ```
    /// use flowrunner::workflow::StepConfig;
    ///
    /// let step = StepConfig::new("greet", "log").with_param("message", "hello");
    /// assert_eq!(step.param_str("message"), Some("hello"));
    /// ```
    pub fn new(id: impl Into<String>, step_type: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            step_type: step_type.into().trim().to_string(),
            config: Map::new(),
        }
    }

    /// Adds a parameter to this step's configuration.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Returns a raw parameter value.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Returns a parameter if it is a string.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

/// An immutable, ordered flow of steps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowDefinition {
    /// Flow identifier
    #[serde(default)]
    pub id: String,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl FlowDefinition {
    /// Creates a definition from an id and its steps.
    pub fn new(id: impl Into<String>, steps: Vec<StepConfig>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }

    /// Looks up a step by id.
    pub fn get_step(&self, id: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Returns the position of a step in execution order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Returns the id of the last step, if any.
    pub fn last_step_id(&self) -> Option<&str> {
        self.steps.last().map(|s| s.id.as_str())
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the flow has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
