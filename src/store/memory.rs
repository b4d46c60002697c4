//! In-memory state store backed by a concurrent map.
//!
//! Intended for tests and single-process embedding. Concurrent writers to
//! the same instance id can lose updates.

use dashmap::DashMap;
use log::debug;

use super::{StateStore, StoreError};
use crate::workflow::FlowInstance;

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    storage: DashMap<String, FlowInstance>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn save(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        debug!("Saving instance {}", instance.instance_id);
        self.storage.insert(instance.instance_id.clone(), instance.clone());
        Ok(())
    }

    fn find_by_id(&self, instance_id: &str) -> Result<Option<FlowInstance>, StoreError> {
        Ok(self.storage.get(instance_id).map(|entry| entry.value().clone()))
    }

    fn update(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        self.storage.insert(instance.instance_id.clone(), instance.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{FlowContext, InstanceStatus};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_save_and_find() {
        let store = InMemoryStateStore::new();
        assert!(store.is_empty());

        let instance = FlowInstance::new("i-1", "f", FlowContext::new());
        store.save(&instance).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id("i-1").unwrap(), Some(instance));
    }

    #[test]
    fn test_find_unknown() {
        let store = InMemoryStateStore::new();
        assert!(store.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_read_after_update() {
        let store = InMemoryStateStore::new();
        let mut instance = FlowInstance::new("i-1", "f", FlowContext::new());
        store.save(&instance).unwrap();

        instance.checkpoint("s3");
        instance.mark_completed();
        store.update(&instance).unwrap();

        let loaded = store.find_by_id("i-1").unwrap().unwrap();
        assert_eq!(loaded.status, InstanceStatus::Completed);
        assert_eq!(loaded.current_step_id.as_deref(), Some("s3"));
    }

    #[test]
    fn test_stored_copy_is_detached() {
        let store = InMemoryStateStore::new();
        let mut instance = FlowInstance::new("i-1", "f", FlowContext::new());
        store.save(&instance).unwrap();

        // Mutating the caller's value without update must not leak in
        instance.context.set_variable("x", 1);
        let loaded = store.find_by_id("i-1").unwrap().unwrap();
        assert!(loaded.context.variable("x").is_none());
    }

    #[test]
    fn test_concurrent_distinct_instances() {
        let store = Arc::new(InMemoryStateStore::new());

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let instance = FlowInstance::new(format!("i-{}", n), "f", FlowContext::new());
                    store.save(&instance).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        assert!(store.find_by_id("i-7").unwrap().is_some());
    }
}
