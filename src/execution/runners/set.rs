//! `set` runner: copies its configuration entries into the context.

use log::debug;

use crate::execution::step::{Step, StepError, StepResult};
use crate::workflow::{FlowContext, StepConfig};

#[derive(Debug, Default, Clone, Copy)]
pub struct SetStep;

impl Step for SetStep {
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
        for (key, value) in &config.config {
            debug!("[{}] {} = {}", config.id, key, value);
            ctx.set_variable(key.clone(), value.clone());
        }

        Ok(StepResult::success())
    }
}
