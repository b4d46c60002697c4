//! Flow Instance State
//!
//! The durable record of one execution of a flow definition. An instance is
//! checkpointed before every step attempt so that a failed or interrupted
//! run can be resumed from the step that was being attempted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::{FlowContext, LAST_ERROR_KEY};

/// Lifecycle status of a flow instance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    /// Steps are being executed (or the process died mid-run)
    Running,
    /// Every step succeeded
    Completed,
    /// A step failed; the instance may be resumed
    Failed,
}

impl InstanceStatus {
    /// Only `Completed` is terminal; `Failed` instances can be resumed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent state for one flow execution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlowInstance {
    /// Unique id, generated once
    pub instance_id: String,

    /// Id of the flow definition this instance runs
    pub flow_id: String,

    /// Step currently or most recently attempted
    pub current_step_id: Option<String>,

    pub status: InstanceStatus,

    /// Variables shared by the steps of this instance
    pub context: FlowContext,

    pub create_time: DateTime<Utc>,

    /// Refreshed on every persisted mutation
    pub update_time: DateTime<Utc>,
}

impl FlowInstance {
    /// Creates a new running instance owning `context`.
    ///
    /// The context is stamped with the flow and instance ids.
    pub fn new(
        instance_id: impl Into<String>,
        flow_id: impl Into<String>,
        mut context: FlowContext,
    ) -> Self {
        let instance_id = instance_id.into();
        let flow_id = flow_id.into();
        context.flow_id = flow_id.clone();
        context.instance_id = instance_id.clone();

        let now = Utc::now();
        Self {
            instance_id,
            flow_id,
            current_step_id: None,
            status: InstanceStatus::Running,
            context,
            create_time: now,
            update_time: now,
        }
    }

    /// Records that `step_id` is about to be attempted.
    pub fn checkpoint(&mut self, step_id: &str) {
        self.current_step_id = Some(step_id.to_string());
        self.touch();
    }

    /// Moves the instance back to running (used on resume).
    pub fn mark_running(&mut self) {
        self.status = InstanceStatus::Running;
        self.touch();
    }

    pub fn mark_completed(&mut self) {
        self.status = InstanceStatus::Completed;
        self.touch();
    }

    /// Marks the instance failed and records `message` under `lastError`.
    pub fn mark_failed(&mut self, message: &str) {
        self.status = InstanceStatus::Failed;
        self.context.set_variable(LAST_ERROR_KEY, message);
        self.touch();
    }

    /// Returns true if the instance has never attempted a step.
    pub fn is_fresh(&self) -> bool {
        self.current_step_id.is_none()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.context.last_error()
    }

    fn touch(&mut self) {
        self.update_time = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_creation() {
        let ctx = FlowContext::new().with_variable("seed", 1);
        let instance = FlowInstance::new("i-1", "flow_a", ctx);

        assert_eq!(instance.instance_id, "i-1");
        assert_eq!(instance.flow_id, "flow_a");
        assert_eq!(instance.status, InstanceStatus::Running);
        assert!(instance.is_fresh());
        assert_eq!(instance.context.flow_id, "flow_a");
        assert_eq!(instance.context.instance_id, "i-1");
        assert_eq!(instance.context.variable_i64("seed"), Some(1));
        assert_eq!(instance.create_time, instance.update_time);
    }

    #[test]
    fn test_checkpoint() {
        let mut instance = FlowInstance::new("i-1", "f", FlowContext::new());
        let created = instance.update_time;

        instance.checkpoint("s2");

        assert_eq!(instance.current_step_id.as_deref(), Some("s2"));
        assert!(!instance.is_fresh());
        assert!(instance.update_time >= created);
        assert_eq!(instance.status, InstanceStatus::Running);
    }

    #[test]
    fn test_mark_failed_records_error() {
        let mut instance = FlowInstance::new("i-1", "f", FlowContext::new());
        instance.mark_failed("disk full");

        assert_eq!(instance.status, InstanceStatus::Failed);
        assert_eq!(instance.last_error(), Some("disk full"));
    }

    #[test]
    fn test_failed_then_running_keeps_error() {
        let mut instance = FlowInstance::new("i-1", "f", FlowContext::new());
        instance.mark_failed("first");
        instance.mark_running();

        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.last_error(), Some("first"));
    }

    #[test]
    fn test_status_terminal() {
        assert!(InstanceStatus::Completed.is_terminal());
        assert!(!InstanceStatus::Failed.is_terminal());
        assert!(!InstanceStatus::Running.is_terminal());
    }

    #[test]
    fn test_status_serialized_uppercase() {
        let json = serde_json::to_string(&InstanceStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
        let parsed: InstanceStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, InstanceStatus::Failed);
        assert_eq!(InstanceStatus::Running.to_string(), "RUNNING");
    }

    #[test]
    fn test_instance_json_roundtrip() {
        let mut instance = FlowInstance::new("i-9", "f", FlowContext::new());
        instance.checkpoint("s1");
        instance.mark_failed("nope");

        let json = serde_json::to_string_pretty(&instance).unwrap();
        let loaded: FlowInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, instance);
    }
}
