//! CLI error handling

use std::fmt;

use autorecipe_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded
    Config(autorecipe_errors::Error),
    /// Recipe generation failed
    Generate(autorecipe_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
}

fn write_user_facing(f: &mut fmt::Formatter<'_>, e: &autorecipe_errors::Error) -> fmt::Result {
    write!(f, "{}", e.user_message())?;
    if let Some(code) = e.user_code() {
        write!(f, "\n  Code: {code}")?;
    }
    if let Some(hint) = e.user_hint() {
        write!(f, "\n  Hint: {hint}")?;
    }
    Ok(())
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: ")?;
                write_user_facing(f, e)
            }
            CliError::Generate(e) => write_user_facing(f, e),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) | CliError::Generate(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<autorecipe_errors::Error> for CliError {
    fn from(e: autorecipe_errors::Error) -> Self {
        CliError::Generate(e)
    }
}
