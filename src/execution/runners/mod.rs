//! Built-in Step Runners
//!
//! The engine ships no runners of its own; these are the ones the
//! `flowrunner` binary registers at startup.
//!
//! | type    | behaviour                                              |
//! |---------|--------------------------------------------------------|
//! | `log`   | logs `message` and stores it in `lastLog`              |
//! | `set`   | copies every config entry into the context             |
//! | `fail`  | fails the first `times` attempts, then succeeds        |
//! | `shell` | runs `command` with bash, capturing stdout             |

pub mod fail;
pub mod logging;
pub mod set;
pub mod shell;

pub use self::fail::FailStep;
pub use self::logging::LogStep;
pub use self::set::SetStep;
pub use self::shell::ShellStep;

use super::registry::StepRegistry;

/// Registers every built-in runner under its default type name.
pub fn register_builtins(registry: &mut StepRegistry) {
    registry.register("log", LogStep);
    registry.register("set", SetStep);
    registry.register("fail", FailStep);
    registry.register("shell", ShellStep::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins() {
        let mut registry = StepRegistry::new();
        register_builtins(&mut registry);

        assert_eq!(registry.types(), vec!["fail", "log", "set", "shell"]);
    }
}
