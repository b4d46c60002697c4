//! Flow Definition Validation
//!
//! Structural checks applied when a definition is loaded:
//! - Flow id is present
//! - At least one step
//! - Every step has an id and a type
//! - Step ids are unique
//!
//! The engine trusts these invariants and does not re-check them.

use std::collections::HashSet;

use log::{debug, info};
use thiserror::Error;

use super::model::{FlowDefinition, StepConfig};

/// Validation error types for user-friendly error messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Flow id is required")]
    EmptyFlowId,

    #[error("Flow must have at least one step")]
    NoSteps,

    #[error("Step id is required")]
    EmptyStepId,

    #[error("Step type is required for step: {0}")]
    EmptyStepType(String),

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),
}

/// Validates a single step's fields.
fn validate_step(step: &StepConfig) -> Result<(), ValidationError> {
    if step.id.trim().is_empty() {
        return Err(ValidationError::EmptyStepId);
    }

    if step.step_type.trim().is_empty() {
        return Err(ValidationError::EmptyStepType(step.id.clone()));
    }

    Ok(())
}

/// Validates a flow definition, stopping at the first problem.
pub fn validate_flow(definition: &FlowDefinition) -> Result<(), ValidationError> {
    if definition.id.trim().is_empty() {
        return Err(ValidationError::EmptyFlowId);
    }

    if definition.steps.is_empty() {
        return Err(ValidationError::NoSteps);
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for step in &definition.steps {
        validate_step(step)?;

        if !seen_ids.insert(step.id.as_str()) {
            return Err(ValidationError::DuplicateStepId(step.id.clone()));
        }
    }

    debug!(
        "Step order: {:?}",
        definition.steps.iter().map(|s| &s.id).collect::<Vec<_>>()
    );
    info!(
        "Flow '{}' validated: {} steps",
        definition.id,
        definition.steps.len()
    );
    Ok(())
}
