//! `log` runner: emits the configured message and records it in the context.

use log::info;

use crate::execution::step::{Step, StepError, StepResult};
use crate::workflow::{FlowContext, StepConfig};

/// Context key holding the most recent logged message.
pub const LAST_LOG_KEY: &str = "lastLog";

#[derive(Debug, Default, Clone, Copy)]
pub struct LogStep;

impl Step for LogStep {
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
        let message = config.param_str("message").unwrap_or_default();

        info!("[{}] {}", config.id, message);
        ctx.set_variable(LAST_LOG_KEY, message);

        Ok(StepResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_message() {
        let mut ctx = FlowContext::new();
        let config = StepConfig::new("step1", "log").with_param("message", "Hello from step 1");

        let result = LogStep.execute(&mut ctx, &config).unwrap();

        assert!(result.success);
        assert_eq!(ctx.variable_str(LAST_LOG_KEY), Some("Hello from step 1"));
    }

    #[test]
    fn test_log_without_message() {
        let mut ctx = FlowContext::new();
        let result = LogStep.execute(&mut ctx, &StepConfig::new("s", "log")).unwrap();

        assert!(result.success);
        assert_eq!(ctx.variable_str(LAST_LOG_KEY), Some(""));
    }
}
