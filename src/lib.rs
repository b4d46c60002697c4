//! FlowRunner - Resumable Sequential Workflow Executor
//!
//! Runs a declarative list of steps in order against a shared, mutable
//! context, checkpoints the instance before every step, and can resume a
//! failed or interrupted run from the step it was attempting.
//!
//! # Architecture
//!
//! The library is organized into three main modules:
//!
//! - [`workflow`]: Flow definitions, context and instance records
//! - [`execution`]: The engine, step contract and runner registry
//! - [`store`]: Persistence port and its in-memory and file backends
//!
//! # Example
//!
//! ```rust,no_run
//! use flowrunner::execution::runners::register_builtins;
//! use flowrunner::execution::{Engine, StepRegistry};
//! use flowrunner::store::{FileStateStore, StateStore};
//! use flowrunner::load_flow;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let definition = load_flow("import.yaml")?;
//!
//!     let mut registry = StepRegistry::new();
//!     register_builtins(&mut registry);
//!
//!     let engine = Engine::new(registry, FileStateStore::default());
//!     let id = engine.start(&definition, None)?;
//!
//!     let instance = engine.store().find_by_id(&id)?.expect("instance was saved");
//!     println!("{} -> {}", id, instance.status);
//!     Ok(())
//! }
//! ```

pub mod execution;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use execution::{Engine, EngineError, Step, StepRegistry, StepResult};
pub use store::{FileStateStore, InMemoryStateStore, StateStore};
pub use workflow::parser::{load_flow, parse_flow};
pub use workflow::{FlowContext, FlowDefinition, FlowInstance, InstanceStatus, StepConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "FlowRunner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "FlowRunner");
    }

    #[test]
    fn test_module_exports_step_config() {
        let step = StepConfig::new("test", "log");
        assert_eq!(step.id, "test");
        assert_eq!(step.step_type, "log");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine<InMemoryStateStore>>();
        assert_send_sync::<Engine<FileStateStore>>();
    }
}
