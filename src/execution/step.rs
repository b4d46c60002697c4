//! Step Contract
//!
//! The pluggable unit of work executed for a step type. The engine treats
//! runners as opaque: it hands them the instance context and the step's
//! configuration, and looks only at the returned [`StepResult`].
//!
//! Runners must tolerate being invoked more than once for the same step:
//! a failed step is re-executed on resume, with whatever context state the
//! earlier attempts left behind.

use std::error::Error;

use crate::workflow::{FlowContext, StepConfig};

/// Fault raised by a runner. The engine records its message as the failure.
pub type StepError = Box<dyn Error + Send + Sync>;

/// Outcome of a single step invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub success: bool,
    pub message: String,
    /// Hint for operators deciding whether to resume; the engine ignores it.
    pub retryable: bool,
}

impl StepResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            retryable: false,
        }
    }

    pub fn fail(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            success: false,
            message: message.into(),
            retryable,
        }
    }
}

/// A runner for one step type.
///
/// # Example
///
/// ```
/// use flowrunner::execution::{Step, StepError, StepResult};
/// use flowrunner::workflow::{FlowContext, StepConfig};
///
/// struct Touch;
///
/// impl Step for Touch {
///     fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
///         ctx.set_variable(format!("touched_{}", config.id), true);
///         Ok(StepResult::success())
///     }
/// }
/// ```
pub trait Step: Send + Sync {
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError>;
}

impl<F> Step for F
where
    F: Fn(&mut FlowContext, &StepConfig) -> Result<StepResult, StepError> + Send + Sync,
{
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
        self(ctx, config)
    }
}
