//! Instance Persistence
//!
//! The engine depends only on the narrow [`StateStore`] port defined here.
//! Two implementations are provided:
//!
//! - [`memory`]: concurrent in-process map, for tests and embedding
//! - [`file`]: one JSON file per instance, so runs survive the process

pub mod file;
pub mod memory;

use std::io;

use thiserror::Error;

use crate::workflow::FlowInstance;

pub use file::FileStateStore;
pub use memory::InMemoryStateStore;

/// Errors raised by a state store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to (de)serialize instance: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid instance id for this store: '{0}'")]
    InvalidId(String),
}

/// Persistence port for flow instances.
///
/// Implementations must guarantee that a successful `update` followed by
/// `find_by_id` for the same id returns the updated value. Nothing stronger
/// is required: no locking, versioning or atomicity across writers.
pub trait StateStore: Send + Sync {
    /// Stores a newly created instance.
    fn save(&self, instance: &FlowInstance) -> Result<(), StoreError>;

    /// Looks up an instance by id.
    fn find_by_id(&self, instance_id: &str) -> Result<Option<FlowInstance>, StoreError>;

    /// Overwrites the stored copy of an instance.
    fn update(&self, instance: &FlowInstance) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn save(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        (**self).save(instance)
    }

    fn find_by_id(&self, instance_id: &str) -> Result<Option<FlowInstance>, StoreError> {
        (**self).find_by_id(instance_id)
    }

    fn update(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        (**self).update(instance)
    }
}
