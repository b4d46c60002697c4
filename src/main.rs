//! FlowRunner CLI Entry Point
//!
//! Starts or resumes a flow instance using file-backed state.
//!
//! # Usage
//!
//! ```bash
//! # Start a new instance
//! flowrunner import.yaml
//!
//! # Seed context variables
//! flowrunner import.yaml --set retries=3 --set target=staging
//!
//! # Resume a failed instance
//! flowrunner import.yaml --resume 0b6c3f0e-...
//!
//! # Keep instance files elsewhere
//! flowrunner import.yaml --state-dir /var/lib/flowrunner
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use serde_json::Value;

use flowrunner::execution::runners::register_builtins;
use flowrunner::execution::{Engine, StepRegistry};
use flowrunner::store::file::DEFAULT_STATE_DIR;
use flowrunner::store::{FileStateStore, StateStore};
use flowrunner::workflow::{load_flow, FlowContext, FlowInstance, InstanceStatus};
use flowrunner::{APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    flow_path: Option<String>,
    resume_id: Option<String>,
    state_dir: PathBuf,
    variables: Vec<(String, Value)>,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flow_path: None,
            resume_id: None,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            variables: Vec::new(),
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: flowrunner [OPTIONS] <FLOW_FILE>");
    println!();
    println!("Arguments:");
    println!("  <FLOW_FILE>             Path to flow definition YAML file");
    println!();
    println!("Options:");
    println!("  --resume <INSTANCE_ID>  Resume an existing instance");
    println!("  --state-dir <DIR>       Directory for instance files (default: {})", DEFAULT_STATE_DIR);
    println!("  --set KEY=VALUE         Initial context variable (repeatable, new instances only)");
    println!("  --verbose               Enable debug logging");
    println!("  --help                  Show this help message");
    println!("  --version               Show version information");
    println!();
    println!("Examples:");
    println!("  flowrunner import.yaml");
    println!("  flowrunner import.yaml --set target=staging --set retries=3");
    println!("  flowrunner import.yaml --resume 0b6c3f0e-5c1d-4c1e-9d7a-0f2d3b4a5c6d");
}

/// Parses a `KEY=VALUE` pair. The value is read as JSON when possible,
/// otherwise kept as a plain string.
fn parse_variable(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("Invalid --set value '{}': expected KEY=VALUE", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid --set value '{}': empty key", arg));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--resume" => {
                i += 1;
                let id = args.get(i).ok_or("--resume requires an instance id")?;
                config.resume_id = Some(id.clone());
            }
            "--state-dir" => {
                i += 1;
                let dir = args.get(i).ok_or("--state-dir requires a path argument")?;
                config.state_dir = PathBuf::from(dir);
            }
            "--set" => {
                i += 1;
                let pair = args.get(i).ok_or("--set requires a KEY=VALUE argument")?;
                config.variables.push(parse_variable(pair)?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.flow_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.flow_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    if config.flow_path.is_none() {
        return Err("Missing flow file".to_string());
    }

    // A resumed instance runs on its stored context
    if config.resume_id.is_some() && !config.variables.is_empty() {
        return Err("--set cannot be combined with --resume".to_string());
    }

    Ok(config)
}

/// Prints the final state of an instance.
fn print_summary(instance: &FlowInstance) {
    println!();
    println!("Instance:  {}", instance.instance_id);
    println!("Flow:      {}", instance.flow_id);
    println!("Status:    {}", instance.status);
    println!(
        "Step:      {}",
        instance.current_step_id.as_deref().unwrap_or("-")
    );
    if instance.status == InstanceStatus::Failed {
        println!("Error:     {}", instance.last_error().unwrap_or("-"));
        println!();
        println!("Resume with: --resume {}", instance.instance_id);
    }
}

/// Main application entry point.
fn run() -> Result<InstanceStatus, Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);

    let flow_path = config.flow_path.unwrap_or_default();
    let definition = load_flow(&flow_path).map_err(|e| {
        error!("Failed to load flow: {}", e);
        e
    })?;

    let mut registry = StepRegistry::new();
    register_builtins(&mut registry);
    info!("Registered step types: {:?}", registry.types());

    let store = FileStateStore::new(&config.state_dir);
    info!("State directory: {}", store.dir().display());
    let engine = Engine::new(registry, store);

    let instance_id = match config.resume_id {
        Some(id) => {
            engine.resume(&id, &definition)?;
            id
        }
        None => {
            let mut context = FlowContext::new();
            for (key, value) in config.variables {
                context.set_variable(key, value);
            }
            engine.start(&definition, Some(context))?
        }
    };

    let instance = engine
        .store()
        .find_by_id(&instance_id)?
        .ok_or_else(|| format!("Instance {} disappeared from the state store", instance_id))?;

    print_summary(&instance);
    Ok(instance.status)
}

fn main() -> ExitCode {
    match run() {
        Ok(InstanceStatus::Completed) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
