//! `fail` runner: fails a configurable number of attempts, then succeeds.
//!
//! Useful for exercising resume. The attempt limit comes from the `times`
//! parameter, falling back to the `failAt` context variable; with neither
//! set, every attempt fails. Attempts are counted in the context under
//! `{step_id}_attempts`, so the count survives across resumes.

use crate::execution::step::{Step, StepError, StepResult};
use crate::workflow::{FlowContext, StepConfig};

/// Context variable consulted when the step has no `times` parameter.
pub const FAIL_AT_KEY: &str = "failAt";

const DEFAULT_MESSAGE: &str = "Intentional failure";

#[derive(Debug, Default, Clone, Copy)]
pub struct FailStep;

/// Context key holding the attempt counter for a step.
pub fn attempts_key(step_id: &str) -> String {
    format!("{}_attempts", step_id)
}

impl Step for FailStep {
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
        let key = attempts_key(&config.id);
        let attempts = ctx.variable_i64(&key).unwrap_or(0) + 1;
        ctx.set_variable(key, attempts);

        let limit = config
            .param("times")
            .and_then(|v| v.as_i64())
            .or_else(|| ctx.variable_i64(FAIL_AT_KEY));

        let should_fail = match limit {
            Some(limit) => attempts <= limit,
            None => true,
        };

        if should_fail {
            let message = config.param_str("message").unwrap_or(DEFAULT_MESSAGE);
            Ok(StepResult::fail(message, true))
        } else {
            Ok(StepResult::success())
        }
    }
}
