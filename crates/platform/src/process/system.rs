//! Process operations backed by `std::process`

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use autorecipe_errors::{Error, PlatformError};
use autorecipe_events::EventEmitter;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Runs commands on the host system, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcess;

impl SystemProcess {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProcessOperations for SystemProcess {
    fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: &PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let command_line = cmd.command_line();
        ctx.emit_debug(format!("running {command_line}"));

        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args()).stdin(Stdio::null());
        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PlatformError::CommandNotFound {
                    command: cmd.program().to_string(),
                }
            } else {
                PlatformError::ProcessExecutionFailed {
                    command: command_line.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(
            command = %command_line,
            status = ?output.status.code(),
            "process finished"
        );

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
