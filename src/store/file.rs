//! File-backed state store.
//!
//! Each instance is written to `{dir}/{instance_id}.json` as pretty JSON.
//! The directory is created on first write. Writes go to a temporary file in
//! the same directory which is then renamed over the target, so a reader
//! sees either the previous record or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use super::{StateStore, StoreError};
use crate::workflow::FlowInstance;

/// Default directory for instance files, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".flowrunner";

#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Creates a store rooted at `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds the given instance.
    pub fn instance_path(&self, instance_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", instance_id))
    }

    /// Resolves the file for an id, refusing ids that would leave `dir`.
    fn checked_path(&self, instance_id: &str) -> Result<PathBuf, StoreError> {
        let unsafe_id = instance_id.is_empty()
            || instance_id.starts_with('.')
            || instance_id.contains(['/', '\\', '\0']);
        if unsafe_id {
            return Err(StoreError::InvalidId(instance_id.to_string()));
        }
        Ok(self.instance_path(instance_id))
    }

    fn write(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        let path = self.checked_path(&instance.instance_id)?;
        let json = serde_json::to_string_pretty(instance)?;

        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!("Saved instance state to {}", path.display());
        Ok(())
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_DIR)
    }
}

impl StateStore for FileStateStore {
    fn save(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        self.write(instance)
    }

    fn find_by_id(&self, instance_id: &str) -> Result<Option<FlowInstance>, StoreError> {
        let path = self.checked_path(instance_id)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let instance: FlowInstance = serde_json::from_str(&content)?;
        info!("Loaded instance state from {}", path.display());
        Ok(Some(instance))
    }

    fn update(&self, instance: &FlowInstance) -> Result<(), StoreError> {
        self.write(instance)
    }
}
