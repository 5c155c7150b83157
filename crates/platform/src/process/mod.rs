//! Process execution capability
//!
//! Version queries and git ref lookups go through [`ProcessOperations`] so
//! the resolution engine can run against a scripted substitute in tests.

use std::fmt;
use std::path::PathBuf;

use autorecipe_errors::Error;

use crate::core::PlatformContext;

pub mod scripted;
pub mod system;

pub use scripted::ScriptedProcess;
pub use system::SystemProcess;

/// Platform-specific command builder and execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl PlatformCommand {
    /// Create a new platform command
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Get the program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the current directory
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Program and arguments joined by single spaces
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Output from command execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Whether the process exited with code zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Standard output decoded lossily with surrounding whitespace removed
    #[must_use]
    pub fn stdout_trimmed(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    /// Standard error decoded lossily with surrounding whitespace removed
    #[must_use]
    pub fn stderr_trimmed(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Trait for process execution operations
pub trait ProcessOperations: Send + Sync {
    /// Execute a command and return the output
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be spawned. A non-zero exit
    /// is reported through [`CommandOutput::status`], not as an error.
    fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: &PlatformCommand,
    ) -> Result<CommandOutput, Error>;

    /// Create a new command builder
    fn create_command(&self, program: &str) -> PlatformCommand {
        PlatformCommand::new(program)
    }
}
