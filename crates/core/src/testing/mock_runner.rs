//! Mock command runner for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::converter::{CommandRunner, CommandStatus, ConverterError, Invocation};

#[derive(Debug)]
struct MockState {
    invocations: Vec<Invocation>,
    exit_code: Option<i32>,
    create_output: bool,
    fail_spawn: bool,
}

/// Mock implementation of the CommandRunner trait.
///
/// Records every invocation instead of starting a process. Clones share
/// state, so a test can keep one handle and give another to the engine.
///
/// - `set_exit_code` controls the reported status (default `Some(0)`)
/// - `set_create_output` writes an empty file at `C2T_TO`
/// - `fail_spawn` makes every run fail as if the shell were missing
#[derive(Debug, Clone)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                invocations: Vec::new(),
                exit_code: Some(0),
                create_output: false,
                fail_spawn: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded invocations.
    pub fn recorded(&self) -> Vec<Invocation> {
        self.state().invocations.clone()
    }

    /// Get the number of commands run.
    pub fn invocation_count(&self) -> usize {
        self.state().invocations.len()
    }

    /// Clear recorded invocations.
    pub fn clear_recorded(&self) {
        self.state().invocations.clear();
    }

    /// Set the exit code reported for subsequent runs.
    pub fn set_exit_code(&self, code: Option<i32>) {
        self.state().exit_code = code;
    }

    /// Create the `C2T_TO` file on each run, like a real converter would.
    pub fn set_create_output(&self, create: bool) {
        self.state().create_output = create;
    }

    /// Fail every run with a spawn error.
    pub fn fail_spawn(&self, fail: bool) {
        self.state().fail_spawn = fail;
    }
}

impl CommandRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandStatus, ConverterError> {
        let mut state = self.state();

        if state.fail_spawn {
            return Err(ConverterError::spawn(
                &invocation.command,
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            ));
        }

        state.invocations.push(invocation.clone());

        if state.create_output {
            let target = match &invocation.working_dir {
                Some(dir) => dir.join(&invocation.to),
                None => invocation.to.clone().into(),
            };
            std::fs::write(&target, b"")
                .map_err(|e| ConverterError::spawn(&invocation.command, e))?;
        }

        Ok(CommandStatus {
            code: state.exit_code,
        })
    }
}
