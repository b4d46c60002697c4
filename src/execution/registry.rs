//! Step runner registry: maps a step type name to its runner.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use super::step::Step;

#[derive(Default, Clone)]
pub struct StepRegistry {
    runners: HashMap<String, Arc<dyn Step>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a runner for `step_type`.
    ///
    /// A later registration for the same type replaces the earlier one; the
    /// replaced runner is returned.
    pub fn register(
        &mut self,
        step_type: impl Into<String>,
        runner: impl Step + 'static,
    ) -> Option<Arc<dyn Step>> {
        self.register_arc(step_type, Arc::new(runner))
    }

    /// Registers an already shared runner.
    pub fn register_arc(
        &mut self,
        step_type: impl Into<String>,
        runner: Arc<dyn Step>,
    ) -> Option<Arc<dyn Step>> {
        let step_type = step_type.into();
        debug!("Registering runner for step type '{}'", step_type);
        self.runners.insert(step_type, runner)
    }

    /// Returns the runner for `step_type`, if registered.
    pub fn get_runner(&self, step_type: &str) -> Option<Arc<dyn Step>> {
        self.runners.get(step_type).cloned()
    }

    pub fn contains(&self, step_type: &str) -> bool {
        self.runners.contains_key(step_type)
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Registered step types, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.runners.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("types", &self.types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::step::{StepError, StepResult};
    use crate::workflow::{FlowContext, StepConfig};

    fn marker(value: &'static str) -> impl Step {
        move |ctx: &mut FlowContext, _: &StepConfig| -> Result<StepResult, StepError> {
            ctx.set_variable("runner", value);
            Ok(StepResult::success())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = StepRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("noop", marker("noop")).is_none());

        assert!(registry.contains("noop"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get_runner("noop").is_some());
    }

    #[test]
    fn test_missing_runner_is_none() {
        let registry = StepRegistry::new();
        assert!(registry.get_runner("http").is_none());
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let mut registry = StepRegistry::new();
        registry.register("log", marker("first"));
        let replaced = registry.register("log", marker("second"));

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);

        let mut ctx = FlowContext::new();
        registry
            .get_runner("log")
            .unwrap()
            .execute(&mut ctx, &StepConfig::new("s", "log"))
            .unwrap();
        assert_eq!(ctx.variable_str("runner"), Some("second"));
    }

    #[test]
    fn test_types_sorted() {
        let mut registry = StepRegistry::new();
        registry.register("shell", marker("a"));
        registry.register("log", marker("b"));
        registry.register("set", marker("c"));

        assert_eq!(registry.types(), vec!["log", "set", "shell"]);
        assert!(format!("{:?}", registry).contains("shell"));
    }
}
