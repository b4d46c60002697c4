//! Flow Definition Module
//!
//! Data structures for flow definitions and the durable state of their
//! executions.
//!
//! # Structure
//!
//! - [`model`]: Flow definition and step configuration
//! - [`parser`]: YAML parsing and loading
//! - [`validator`]: Structural validation rules
//! - [`context`]: Variable bag shared between steps
//! - [`instance`]: Durable record of one execution

pub mod context;
pub mod instance;
pub mod model;
pub mod parser;
pub mod validator;

pub use context::{FlowContext, LAST_ERROR_KEY};
pub use instance::{FlowInstance, InstanceStatus};
pub use model::{FlowDefinition, StepConfig};
pub use parser::{load_flow, parse_flow, save_flow, ParseError};
pub use validator::{validate_flow, ValidationError};
