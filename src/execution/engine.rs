//! Flow Execution Engine
//!
//! Runs a flow definition against a durable instance:
//! - Steps execute strictly in declared order on the caller's thread
//! - The instance is checkpointed before every step attempt
//! - The first failure halts the run and is recorded on the instance
//! - A failed or interrupted instance resumes at the step it was attempting
//!
//! Step failures never surface as `Err`. Callers inspect the persisted
//! instance's status and `lastError` variable to learn how a run ended.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::store::{StateStore, StoreError};
use crate::workflow::{FlowContext, FlowDefinition, FlowInstance, StepConfig};

use super::registry::StepRegistry;
use super::step::{Step, StepResult};

/// Errors surfaced to callers of [`Engine::start`] and [`Engine::resume`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Flow instance not found: {0}")]
    InstanceNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sequential, resumable flow execution engine.
///
/// The engine keeps no state between calls; everything that must survive a
/// run lives in the instance record held by the store.
///
/// # Example
///
/// ```
/// use flowrunner::execution::{Engine, StepRegistry, StepResult, StepError};
/// use flowrunner::store::{InMemoryStateStore, StateStore};
/// use flowrunner::workflow::{parse_flow, FlowContext, InstanceStatus, StepConfig};
///
/// let mut registry = StepRegistry::new();
/// registry.register("noop", |_: &mut FlowContext, _: &StepConfig| -> Result<StepResult, StepError> {
///     Ok(StepResult::success())
/// });
///
/// let engine = Engine::new(registry, InMemoryStateStore::new());
/// let definition = parse_flow("id: f\nsteps: [{id: s1, type: noop}]").unwrap();
///
/// let id = engine.start(&definition, None).unwrap();
/// let instance = engine.store().find_by_id(&id).unwrap().unwrap();
/// assert_eq!(instance.status, InstanceStatus::Completed);
/// ```
pub struct Engine<S: StateStore> {
    registry: StepRegistry,
    store: S,
}

impl<S: StateStore> Engine<S> {
    pub fn new(registry: StepRegistry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// The store holding instance records, for inspecting run outcomes.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a new instance of `definition` and runs it until it completes
    /// or a step fails.
    ///
    /// Returns the new instance id. The supplied context (or a fresh one) is
    /// owned by the instance and stamped with its ids.
    pub fn start(
        &self,
        definition: &FlowDefinition,
        initial_context: Option<FlowContext>,
    ) -> Result<String, EngineError> {
        let instance_id = Uuid::new_v4().to_string();
        let mut instance = FlowInstance::new(
            instance_id.clone(),
            definition.id.clone(),
            initial_context.unwrap_or_default(),
        );

        self.store.save(&instance)?;
        info!(
            "Started flow instance: {}, flowId: {}",
            instance_id, definition.id
        );

        self.execute(&mut instance, definition)?;
        Ok(instance_id)
    }

    /// Resumes a failed or interrupted instance from its checkpoint.
    ///
    /// The checkpointed step is executed again. Resuming a completed instance
    /// is a no-op.
    pub fn resume(&self, instance_id: &str, definition: &FlowDefinition) -> Result<(), EngineError> {
        let mut instance = self
            .store
            .find_by_id(instance_id)?
            .ok_or_else(|| EngineError::InstanceNotFound(instance_id.to_string()))?;

        if instance.status.is_terminal() {
            warn!("Flow instance {} is already {}", instance_id, instance.status);
            return Ok(());
        }

        instance.mark_running();
        self.store.update(&instance)?;
        info!(
            "Resuming flow instance: {}, currentStep: {}",
            instance_id,
            instance.current_step_id.as_deref().unwrap_or("<none>")
        );

        self.execute(&mut instance, definition)
    }

    /// Walks the definition from the instance checkpoint to the end.
    fn execute(
        &self,
        instance: &mut FlowInstance,
        definition: &FlowDefinition,
    ) -> Result<(), EngineError> {
        // Step ids are unique, so the checkpoint maps to exactly one position.
        let start_index = match instance.current_step_id.as_deref() {
            None => 0,
            Some(step_id) => match definition.position(step_id) {
                Some(index) => index,
                // Nothing left to run once the checkpoint is gone from the flow
                None => {
                    warn!(
                        "Checkpoint step '{}' of instance {} is not in flow '{}', skipping all steps",
                        step_id, instance.instance_id, definition.id
                    );
                    definition.len()
                }
            },
        };

        for step in &definition.steps[start_index..] {
            instance.checkpoint(&step.id);
            self.store.update(instance)?;

            let Some(runner) = self.registry.get_runner(&step.step_type) else {
                error!(
                    "No runner found for type: {} in step: {}",
                    step.step_type, step.id
                );
                let message = format!("No runner found for type: {}", step.step_type);
                return self.fail(instance, &message);
            };

            info!("Executing step: {} [{}]", step.id, step.step_type);
            match invoke(&*runner, &mut instance.context, step) {
                Ok(result) if result.success => {
                    debug!("Step '{}' completed: {}", step.id, result.message);
                }
                Ok(result) => {
                    error!(
                        "Step {} failed: {} (retryable: {})",
                        step.id, result.message, result.retryable
                    );
                    return self.fail(instance, &result.message);
                }
                Err(message) => {
                    error!("Error executing step {}: {}", step.id, message);
                    return self.fail(instance, &message);
                }
            }
        }

        instance.mark_completed();
        self.store.update(instance)?;
        info!("Flow instance {} COMPLETED", instance.instance_id);
        Ok(())
    }

    fn fail(&self, instance: &mut FlowInstance, message: &str) -> Result<(), EngineError> {
        instance.mark_failed(message);
        self.store.update(instance)?;
        warn!(
            "Flow instance {} FAILED at step {}",
            instance.instance_id,
            instance.current_step_id.as_deref().unwrap_or("<none>")
        );
        Ok(())
    }
}

/// Runs a step, converting both returned faults and panics into an error
/// message.
fn invoke(runner: &dyn Step, ctx: &mut FlowContext, step: &StepConfig) -> Result<StepResult, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| runner.execute(ctx, step))) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(fault)) => Err(fault.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "step panicked".to_string()
    }
}
