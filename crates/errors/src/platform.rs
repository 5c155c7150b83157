//! Platform-specific operation errors

use thiserror::Error;

/// Errors that can occur while running external tools
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("repository query failed: {message}")]
    RepositoryQueryFailed { message: String },
}

impl PlatformError {
    /// Stable error code for structured reporting.
    #[must_use]
    pub fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_execution_failed",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::RepositoryQueryFailed { .. } => "platform.repository_query_failed",
        };
        Some(code)
    }
}
