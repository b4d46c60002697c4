//! Flow Definition Parser
//!
//! Loads flow definitions from YAML text or files and validates them before
//! they reach the engine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use super::model::FlowDefinition;
use super::validator::{validate_flow, ValidationError};

/// Errors raised while loading a flow definition.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read flow file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse flow YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid flow definition: {0}")]
    Invalid(#[from] ValidationError),
}

/// Parses and validates a flow definition from YAML text.
///
/// # Example
///
/// ```
/// use flowrunner::workflow::parse_flow;
///
/// let def = parse_flow("id: f\nsteps: [{id: s1, type: noop}]").unwrap();
/// assert_eq!(def.steps[0].step_type, "noop");
/// ```
pub fn parse_flow(yaml: &str) -> Result<FlowDefinition, ParseError> {
    debug!("YAML content loaded ({} bytes)", yaml.len());

    let definition: FlowDefinition = serde_yaml::from_str(yaml)?;
    validate_flow(&definition)?;

    Ok(definition)
}

/// Loads a flow definition from a YAML file.
///
/// # Example
///
/// ```rust,no_run
/// use flowrunner::workflow::load_flow;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let def = load_flow("import.yaml")?;
///     println!("Loaded {} steps", def.steps.len());
///     Ok(())
/// }
/// ```
pub fn load_flow(path: impl AsRef<Path>) -> Result<FlowDefinition, ParseError> {
    let path = path.as_ref();
    info!("Loading flow from: {}", path.display());

    let yaml = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let definition = parse_flow(&yaml)?;
    info!(
        "Parsed flow '{}' with {} steps",
        definition.id,
        definition.steps.len()
    );
    Ok(definition)
}

/// Saves a flow definition to a YAML file.
pub fn save_flow(definition: &FlowDefinition, path: impl AsRef<Path>) -> Result<(), ParseError> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(definition)?;
    fs::write(path, yaml).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Flow saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::StepConfig;
    use tempfile::tempdir;

    const TWO_STEPS: &str = r#"
id: test_flow
steps:
  - id: step1
    type: log
    config:
      message: "Hello from step 1"
  - id: step2
    type: log
    config:
      message: "Hello from step 2"
"#;

    #[test]
    fn test_parse_valid_flow() {
        let def = parse_flow(TWO_STEPS).unwrap();

        assert_eq!(def.id, "test_flow");
        assert_eq!(def.steps.len(), 2);
        assert_eq!(def.steps[0].id, "step1");
        assert_eq!(def.steps[1].param_str("message"), Some("Hello from step 2"));
    }

    #[test]
    fn test_parse_inline_flow() {
        let def = parse_flow("id: f\nsteps: [{id: s1, type: noop}]").unwrap();
        assert_eq!(def.steps.len(), 1);
        assert!(def.steps[0].config.is_empty());
    }

    #[test]
    fn test_parse_missing_id() {
        let err = parse_flow("steps: []").unwrap_err();
        assert!(matches!(err, ParseError::Invalid(ValidationError::EmptyFlowId)));
    }

    #[test]
    fn test_parse_no_steps() {
        let err = parse_flow("id: f\nsteps: []").unwrap_err();
        assert!(matches!(err, ParseError::Invalid(ValidationError::NoSteps)));
    }

    #[test]
    fn test_parse_duplicate_step_ids() {
        let yaml = "id: dup_flow\nsteps:\n  - id: s1\n    type: log\n  - id: s1\n    type: log";
        let err = parse_flow(yaml).unwrap_err();
        assert!(matches!(err, ParseError::Invalid(ValidationError::DuplicateStepId(ref id)) if id == "s1"));
    }

    #[test]
    fn test_parse_missing_type() {
        let err = parse_flow("id: f\nsteps:\n  - id: s1\n").unwrap_err();
        assert!(err.to_string().contains("Step type is required for step: s1"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse_flow("this is not valid yaml: [[[").unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
    }

    #[test]
    fn test_load_flow_file_not_found() {
        let err = load_flow("/nonexistent/path/flow.yaml").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/path/flow.yaml"));
    }

    #[test]
    fn test_save_and_load_flow() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("flow.yaml");

        let def = FlowDefinition::new(
            "saved",
            vec![StepConfig::new("s1", "log").with_param("message", "hi")],
        );
        save_flow(&def, &path).unwrap();
        assert!(path.exists());

        let loaded = load_flow(&path).unwrap();
        assert_eq!(loaded, def);
    }
}
