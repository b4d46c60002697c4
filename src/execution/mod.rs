//! Flow Execution Module
//!
//! The resumable sequential engine and the pieces it dispatches to.
//!
//! # Architecture
//!
//! - [`engine`]: Start/resume orchestration and the run loop
//! - [`step`]: The step runner contract
//! - [`registry`]: Step type to runner lookup
//! - [`runners`]: Built-in runners used by the command-line tool

pub mod engine;
pub mod registry;
pub mod runners;
pub mod step;

pub use engine::{Engine, EngineError};
pub use registry::StepRegistry;
pub use step::{Step, StepError, StepResult};
