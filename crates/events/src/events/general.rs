use serde::{Deserialize, Serialize};

/// Cross-cutting diagnostics not tied to one recipe section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneralEvent {
    /// A detection step fell back or input was ignored; shown to the user
    Warning { message: String },

    /// Detail only rendered with `--debug`, e.g. an external command line
    Diagnostic { message: String },

    OperationStarted { operation: String },

    OperationCompleted { operation: String },

    OperationFailed { operation: String, error: String },
}

impl GeneralEvent {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn diagnostic(message: impl Into<String>) -> Self {
        Self::Diagnostic {
            message: message.into(),
        }
    }
}
