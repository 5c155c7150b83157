//! Scripted process substitute
//!
//! Answers commands from a table keyed by command line and records every
//! invocation. Commands with no scripted answer fail to spawn, which is what
//! a missing tool looks like on a real system.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use autorecipe_errors::{Error, PlatformError};

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    SpawnFailure(String),
}

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command_line: String,
    pub current_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ScriptedProcess {
    responses: HashMap<String, Scripted>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedProcess {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command_line` with exit code 0 and the given stdout
    #[must_use]
    pub fn with_success(self, command_line: &str, stdout: &str) -> Self {
        self.with_output(command_line, Some(0), stdout)
    }

    /// Answer `command_line` with the given exit code and stdout
    #[must_use]
    pub fn with_output(mut self, command_line: &str, status: Option<i32>, stdout: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            Scripted::Output(CommandOutput {
                status,
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
            }),
        );
        self
    }

    /// Make `command_line` fail to spawn
    #[must_use]
    pub fn with_spawn_failure(mut self, command_line: &str, message: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            Scripted::SpawnFailure(message.to_string()),
        );
        self
    }

    /// Every command executed so far, in order
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Command lines executed so far, in order
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|invocation| invocation.command_line)
            .collect()
    }
}

impl ProcessOperations for ScriptedProcess {
    fn execute_command(
        &self,
        _ctx: &PlatformContext,
        cmd: &PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let command_line = cmd.command_line();
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push(Invocation {
                command_line: command_line.clone(),
                current_dir: cmd.get_current_dir().cloned(),
            });
        }

        match self.responses.get(&command_line) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::SpawnFailure(message)) => {
                Err(PlatformError::ProcessExecutionFailed {
                    command: command_line,
                    message: message.clone(),
                }
                .into())
            }
            None => Err(PlatformError::CommandNotFound {
                command: cmd.program().to_string(),
            }
            .into()),
        }
    }
}
